//! Configuration loading and management.
//!
//! Settings live under `.mic-session/` in the project root: a global
//! `config.toml` and a `scenarios/` directory of scripted sessions.

pub mod error;
pub mod loader;
pub mod models;
