// ABOUTME: Library root for cdrelease - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod artifact;
pub mod config;
pub mod credentials;
pub mod deployment;
pub mod diagnostics;
pub mod error;
pub mod exec;
pub mod output;
pub mod pipeline;
pub mod storage;
pub mod types;
