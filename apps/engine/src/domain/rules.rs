use std::ops::RangeInclusive;

use crate::errors::domain::PickRejection;

/// Inclusive range of legal pick values.
pub const PICK_RANGE: RangeInclusive<u8> = 0..=100;

/// Parse a raw pick submission.
///
/// The chat layer hands the engine the text exactly as typed; validating
/// it is the engine's job, not the delivery layer's. Signs, decimals, and
/// anything non-numeric are `NotANumber`; integers beyond the pick range
/// are `OutOfRange`.
pub fn parse_pick(text: &str) -> Result<u8, PickRejection> {
    let value: u64 = text
        .trim()
        .parse()
        .map_err(|_| PickRejection::NotANumber)?;
    if value > u64::from(*PICK_RANGE.end()) {
        return Err(PickRejection::OutOfRange);
    }
    Ok(value as u8)
}

/// Target for a round: `factor` times the mean of the numeric picks.
/// `None` when no numeric picks exist.
pub fn compute_target(picks: &[u8], factor: f64) -> Option<f64> {
    if picks.is_empty() {
        return None;
    }
    let sum: u32 = picks.iter().map(|&n| u32::from(n)).sum();
    Some(sum as f64 / picks.len() as f64 * factor)
}
