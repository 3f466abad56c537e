pub mod config;
pub mod parameters;
