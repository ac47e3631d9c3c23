pub mod app;
pub mod cli;
pub mod command;
pub mod model;
pub mod ops;
pub mod session;
pub mod store;
pub mod suggest;
pub mod util;
