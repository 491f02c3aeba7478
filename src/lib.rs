pub mod app;
pub mod client;
pub mod config;
pub mod decode;
pub mod extras;
pub mod favorites;
pub mod loader;
pub mod models;
pub mod planner;
