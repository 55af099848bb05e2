//! # storerate Library
//!
//! This library exposes the storerate CLI modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod backend;
pub mod cli;
pub mod config;
pub mod session_file;

// Re-export the engine and client crates for convenience
pub use storerate_client;
pub use storerate_core;
