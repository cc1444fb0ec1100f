use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use lantern::player::{cursor_grab, keyboard_mouse_input, ControlSet, ControllerPlugin};
use lantern::settings::loader as settings_loader;
use lantern::ui::{spawn_hud, touch_buttons, update_hud};

mod app;

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::settings_watcher_or_stub(settings_loader::SETTINGS_DIR);

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "lantern".to_string(),
            position: WindowPosition::Centered(MonitorSelection::Primary),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    app.insert_resource(settings);
    app.insert_resource(settings_watcher);
    app.insert_resource(ClearColor(Color::srgb(0.01, 0.01, 0.02)));
    app.insert_resource(AmbientLight {
        color: Color::srgb(0.3, 0.35, 0.5),
        brightness: 15.0,
    });

    app.add_plugins(ControllerPlugin);

    app.add_systems(Startup, app::setup_level);
    app.add_systems(Startup, spawn_hud);
    app.add_systems(
        Update,
        (keyboard_mouse_input, touch_buttons).in_set(ControlSet::Input),
    );
    app.add_systems(Update, cursor_grab);
    app.add_systems(Update, app::hazard_damage.in_set(ControlSet::React));
    app.add_systems(Update, app::release_cursor_on_death);
    app.add_systems(Update, update_hud.after(ControlSet::React));
    app.add_systems(Update, settings_loader::check_settings_changes);

    app.run();
}
