pub mod config;
pub mod item;
pub mod project;

pub use config::*;
pub use item::*;
pub use project::*;
