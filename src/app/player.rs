use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use lantern::player::{DamageEvent, Player, PlayerDied};

/// Area that hurts a player standing in it.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hazard {
    pub radius: f32,
    pub damage_per_second: f32,
}

/// Send damage for every player inside a hazard this frame.
#[allow(clippy::needless_pass_by_value)]
pub fn hazard_damage(
    time: Res<Time>,
    hazards: Query<(&GlobalTransform, &Hazard)>,
    players: Query<(Entity, &GlobalTransform), With<Player>>,
    mut damage: EventWriter<DamageEvent>,
) {
    let dt = time.delta_seconds();
    for (player, player_tf) in &players {
        let pos = player_tf.translation();
        for (hazard_tf, hazard) in &hazards {
            if hazard_tf.translation().distance(pos) <= hazard.radius {
                damage.send(DamageEvent {
                    target: player,
                    amount: hazard.damage_per_second * dt,
                });
            }
        }
    }
}

/// Free the cursor once the player dies so the window can be used again.
pub fn release_cursor_on_death(
    mut died: EventReader<PlayerDied>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    for event in died.read() {
        info!("player {:?} died, releasing cursor", event.entity);
        if let Ok(mut window) = windows.get_single_mut() {
            window.cursor.grab_mode = CursorGrabMode::None;
            window.cursor.visible = true;
        }
    }
}
