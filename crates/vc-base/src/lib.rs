pub mod actions;
pub mod config;
pub mod errors;
pub mod memo;
pub mod modules;
pub mod panels;
pub mod route;
pub mod settings;
pub mod state;
pub mod types;
pub mod ui;
