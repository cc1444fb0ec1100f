pub mod interaction;
pub mod lighting;
pub mod player;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod settings;
pub mod task;
pub mod ui;
pub mod world;
