//! Playback Monitor server: library crate for the HTTP surface.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `pm-e2e-tests`) can access `AppState`, `build_router` and
//! `ServerConfig`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
