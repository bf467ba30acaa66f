//! Build matrix runner for game projects
//!
//! This library provides the build-and-publish pipeline:
//! - per-platform builds through a pluggable engine backend
//! - zip packaging with shipping exclusions and versioned copies
//! - uploads to itch.io through `butler`
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use error::{AppError, CliError, Result};
