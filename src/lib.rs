//! OVERSCAN — Over-Goals Fixture Scanner Service
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod pipeline;
pub mod upstream;
pub mod server;
