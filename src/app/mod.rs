pub mod player;
pub mod setup;

pub use player::{hazard_damage, release_cursor_on_death, Hazard};
pub use setup::setup_level;
