//! # ms-protocol
//!
//! Core protocol definitions and data models for mic-session.
//!
//! This crate defines all shared data structures used for:
//! - Device descriptions handed over by a device enumerator
//! - The device session value owned by the caller of the tracker
//! - Effects the tracker asks the caller to run against the audio pipeline
//! - Configuration file parsing (TOML config, YAML scenarios)
//! - Communication between a presentation layer and the session driver
//!
//! ## Modules
//!
//! - [`device_models`]: Audio devices and their kind
//! - [`session_models`]: Session state, status, history records
//! - [`effect_models`]: Side-effect requests emitted by the tracker
//! - [`config_models`]: Global configuration from config.toml
//! - [`scenario_models`]: Scripted sessions from scenarios/*.yaml
//! - [`ipc`]: Operations and Events for presentation-driver communication
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, chrono and uuid
//! - TypeScript generation: All types derive `TS` for browser front ends
//! - Independent compilation: No dependencies on other mic-session crates

pub mod config_models;
pub mod device_models;
pub mod effect_models;
pub mod ipc;
pub mod scenario_models;
pub mod session_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use device_models::*;
pub use effect_models::*;
pub use ipc::*;
pub use scenario_models::*;
pub use session_models::*;
