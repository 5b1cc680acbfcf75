//! Initialization of a `.mic-session/` directory.
//!
//! Generates the global `config.toml` and a set of scenarios reproducing the
//! device revert, from templates embedded in the binary.
//!
//! # Example
//!
//! ```no_run
//! use ms_core::init::{InitOptions, generate_session_structure};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//!
//! generate_session_structure(options).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_session_structure, InitOptions};
pub use templates::{get_template, list_templates};
