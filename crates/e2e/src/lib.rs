//! Mock API E2E Test Harness
//!
//! Runs the mock API server in-process on an ephemeral port and probes it
//! over real TCP, the way the client test suites that depend on it do.

pub mod error;
pub mod probe;
pub mod server;

pub use error::{E2eError, E2eResult};
pub use probe::{ApiProbe, OrdersSample, TimedResponse};
pub use server::{HarnessConfig, ServerHandle};
