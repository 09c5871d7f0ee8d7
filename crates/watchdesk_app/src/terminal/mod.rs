//! Line-oriented terminal front-end.
mod app;
mod commands;
mod effects;
mod render;

pub use app::run;
