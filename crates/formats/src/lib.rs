pub mod config;
pub mod loader;
pub mod projects;
pub mod svg_map;

pub use config::*;
pub use loader::*;
pub use projects::*;
pub use svg_map::*;
