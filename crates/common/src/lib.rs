//! Mock API Common Library
//!
//! Wire records, the fixed payload catalog and the route table shared by the
//! server and its test harness.

pub mod catalog;
pub mod error;
pub mod routes;
pub mod types;

pub use error::{Error, Result};
pub use routes::{
    CacheDirective, Endpoint, Outcome, ResponsePolicy, RouteSpec, Simulation, ROUTES,
};
pub use types::*;

/// Mock API version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
