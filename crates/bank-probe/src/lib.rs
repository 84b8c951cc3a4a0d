//! Diagnostic concurrency probe.
//!
//! A probe writes marker values to caller-chosen keys around a delayed
//! write, so an operator can confirm that the hosting store commits a write
//! issued off the main request path, and in the right order relative to the
//! synchronous writes around it. Two modes:
//!
//! - [`ProbeMode::ForkJoin`] -- write, spawn a delayed writer, join, write
//! - [`ProbeMode::SingleDelay`] -- sleep, then write once

pub mod config;
pub mod error;
pub mod probe;

pub use config::ProbeConfig;
pub use error::{ProbeError, ProbeResult};
pub use probe::{Probe, ProbeMode, ProbeReport};
