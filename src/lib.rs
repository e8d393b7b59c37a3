pub mod config;
pub mod core;
pub mod modules;
pub mod ui;
