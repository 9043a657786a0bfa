pub mod config;
pub mod engine;
pub mod error;
pub mod math;
pub mod menubar;
pub mod player;
pub mod renderer;
pub mod types;
