//! Terminal front end: wiring between stdin, the query store and the engine.
mod app;
mod config;
mod effects;
mod input;
mod render;

pub use app::run_app;
