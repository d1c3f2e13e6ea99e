//! Loopsmith - web video derivation tool
//!
//! This library crate exposes the core functionality for integration testing.

pub mod batch;
pub mod hero;
pub mod transcode;
