//! Common test utilities shared by the integration tests.
//!
//! - Fixtures (configs, projects, simulated drivers)
//! - Event assertions
//! - Mock pipelines

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod mock_pipelines;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_pipelines::*;
