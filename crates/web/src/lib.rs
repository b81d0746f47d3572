//! Mock API Web Server
//!
//! Serves the fixed mock routes plus a static demo page directory.

pub mod config;
pub mod handlers;
pub mod server;
pub mod static_files;

pub use config::ServerConfig;
pub use server::{serve, AppState, MockServer};
