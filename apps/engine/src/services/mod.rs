//! Engine services orchestrating lobby, rounds, and finalization.

pub mod match_flow;
