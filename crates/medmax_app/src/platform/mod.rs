//! Headless host for the router: stdin navigation, a one-second clock,
//! effect execution and text rendering.
mod app;
mod config;
mod effects;
mod history;
mod input;
mod logging;
mod persistence;
mod render;

pub use app::run_app;
