pub mod content;
pub mod week;
