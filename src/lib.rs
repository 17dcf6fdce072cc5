pub mod config;
pub mod externals;
pub mod internals;
pub mod logging;
pub mod models;
pub mod tasks;
