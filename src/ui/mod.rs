//! Player HUD and on-screen touch controls.
//!
//! The HUD shows stamina, health and sanity (refreshed on a short timer), the
//! prompt of whatever interactable is under the crosshair, and a crosshair.
//! Touch buttons feed the same `CharacterInput` the keyboard does.

use bevy::prelude::*;

use crate::interaction::InteractionPrompt;
use crate::player::{CharacterInput, Player, Vitals};

const HUD_REFRESH_SECS: f32 = 0.1;

#[derive(Resource)]
pub struct HudTimer(pub Timer);

impl Default for HudTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(HUD_REFRESH_SECS, TimerMode::Repeating))
    }
}

/// Marker for the stat readout text.
#[derive(Component)]
pub struct HudText;

/// Marker for the interaction prompt text.
#[derive(Component)]
pub struct PromptText;

/// An on-screen control and the input it produces.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchButton {
    /// Held to run.
    Run,
    Crouch,
    Interact,
    Flashlight,
}

impl TouchButton {
    const ALL: [TouchButton; 4] = [Self::Run, Self::Crouch, Self::Interact, Self::Flashlight];

    fn label(self) -> &'static str {
        match self {
            Self::Run => "RUN",
            Self::Crouch => "CROUCH",
            Self::Interact => "USE",
            Self::Flashlight => "LIGHT",
        }
    }

    /// Write this button's state into `input`. `just_pressed` is true on the
    /// frame the press started.
    pub fn apply(self, pressed: bool, just_pressed: bool, input: &mut CharacterInput) {
        match self {
            Self::Run => input.run |= pressed,
            Self::Crouch => input.crouch_pressed |= just_pressed,
            Self::Interact => input.interact_pressed |= just_pressed,
            Self::Flashlight => input.flashlight_pressed |= just_pressed,
        }
    }
}

/// Format the stat readout.
#[must_use]
pub fn format_vitals(vitals: &Vitals) -> String {
    let pct = |f: f32| (f * 100.0).round();
    if vitals.is_dead() {
        return "You died".to_string();
    }
    format!(
        "Stamina {:>3}%\nHealth  {:>3}%\nSanity  {:>3}%",
        pct(vitals.stamina.fraction()),
        pct(vitals.health.fraction()),
        pct(vitals.sanity.fraction()),
    )
}

fn text_style(size: f32) -> TextStyle {
    TextStyle {
        font_size: size,
        color: Color::srgb(0.9, 0.9, 0.85),
        ..default()
    }
}

/// Spawn the HUD, crosshair and touch buttons.
pub fn spawn_hud(mut commands: Commands) {
    commands.init_resource::<HudTimer>();

    commands.spawn((
        TextBundle::from_section("", text_style(18.0)).with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(12.0),
            ..default()
        }),
        HudText,
    ));

    commands.spawn((
        TextBundle::from_section("", text_style(22.0)).with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Percent(45.0),
            top: Val::Percent(55.0),
            ..default()
        }),
        PromptText,
    ));

    spawn_crosshair(&mut commands);

    commands
        .spawn(NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                right: Val::Px(16.0),
                bottom: Val::Px(16.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
            ..default()
        })
        .with_children(|column| {
            for button in TouchButton::ALL {
                column
                    .spawn((
                        ButtonBundle {
                            style: Style {
                                width: Val::Px(96.0),
                                height: Val::Px(48.0),
                                justify_content: JustifyContent::Center,
                                align_items: AlignItems::Center,
                                ..default()
                            },
                            background_color: Color::srgba(0.1, 0.1, 0.1, 0.6).into(),
                            ..default()
                        },
                        button,
                    ))
                    .with_children(|b| {
                        b.spawn(TextBundle::from_section(button.label(), text_style(16.0)));
                    });
            }
        });
}

/// Spawn a crosshair UI element centered on the screen.
pub fn spawn_crosshair(commands: &mut Commands) {
    commands
        .spawn(NodeBundle {
            style: Style {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            ..default()
        })
        .with_children(|p| {
            p.spawn(NodeBundle {
                style: Style {
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    ..default()
                },
                background_color: Color::WHITE.into(),
                ..default()
            });
        });
}

/// Feed touch button state into `CharacterInput`.
pub fn touch_buttons(
    buttons: Query<(Ref<Interaction>, &TouchButton)>,
    mut input: ResMut<CharacterInput>,
) {
    for (interaction, button) in &buttons {
        let pressed = *interaction == Interaction::Pressed;
        button.apply(pressed, pressed && interaction.is_changed(), &mut input);
    }
}

/// Refresh the stat readout and interaction prompt.
#[allow(clippy::needless_pass_by_value)]
pub fn update_hud(
    time: Res<Time>,
    mut timer: ResMut<HudTimer>,
    prompt: Res<InteractionPrompt>,
    players: Query<&Vitals, With<Player>>,
    mut hud: Query<&mut Text, (With<HudText>, Without<PromptText>)>,
    mut prompt_text: Query<&mut Text, (With<PromptText>, Without<HudText>)>,
) {
    if prompt.is_changed() {
        if let Ok(mut text) = prompt_text.get_single_mut() {
            text.sections[0].value = prompt.0.clone().unwrap_or_default();
        }
    }

    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    let (Ok(vitals), Ok(mut text)) = (players.get_single(), hud.get_single_mut()) else { return };
    text.sections[0].value = format_vitals(vitals);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn run_follows_hold_and_others_fire_on_press() {
        let mut input = CharacterInput::default();
        TouchButton::Run.apply(true, false, &mut input);
        TouchButton::Crouch.apply(true, false, &mut input);
        assert!(input.run);
        assert!(!input.crouch_pressed);

        TouchButton::Interact.apply(true, true, &mut input);
        TouchButton::Flashlight.apply(true, true, &mut input);
        assert!(input.interact_pressed);
        assert!(input.flashlight_pressed);
    }

    #[test]
    fn readout_shows_percentages_and_death() {
        let mut v = Vitals::from_settings(&Settings::default());
        v.stamina.set(2.5);
        let text = format_vitals(&v);
        assert!(text.contains("Stamina  50%"), "{text}");
        assert!(text.contains("Health  100%"), "{text}");

        v.take_damage(1_000.0);
        assert_eq!(format_vitals(&v), "You died");
    }
}
