pub mod app;
pub mod components;
pub mod config;
pub mod detail;
pub mod logging;
pub mod notify;
