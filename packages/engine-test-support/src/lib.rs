//! Shared test utilities for the engine crates.

pub mod logging;
