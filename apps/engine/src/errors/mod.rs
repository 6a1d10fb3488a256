//! Error handling for the match engine.

pub mod domain;

pub use domain::{EngineError, PickRejection};
