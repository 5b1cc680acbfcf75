//! # ms-core
//!
//! Microphone session tracking for an audio capture pipeline whose
//! processing stage (noise suppression) silently reverts the capture device.
//!
//! This crate provides:
//! - A pure session tracker that reconciles user intent with pipeline reports
//! - The pipeline seams and an in-memory simulated pipeline
//! - An async driver that executes tracker effects against a pipeline
//! - Configuration loading from the `.mic-session/` directory
//! - Scripted scenario replay
//!
//! ## Modules
//!
//! - [`tracker`]: Session state machine
//! - [`pipeline`]: Device enumerator and pipeline controller traits
//! - [`engine`]: Session driver
//! - [`config`]: Configuration loading and management
//! - [`scenario`]: Scenario replay against the tracker
//! - [`init`]: `.mic-session/` generation

pub mod config;
pub mod engine;
pub mod init;
pub mod pipeline;
pub mod scenario;
pub mod tracker;
