//! Probability, expected work and hashrate conversions.
//!
//! Difficulty is `D = 2^zBits` and a single hash succeeds with probability
//! `p = 1 / D`.

use crate::error::{ensure_positive, Result};
use crate::note::{ensure_note, NoteInput, Sharenote};
use crate::reliability::{multiplier_for_confidence, resolve_multiplier, Reliability};

/// Decimal places used by [`format_probability`] by default.
pub const DEFAULT_PROBABILITY_PRECISION: usize = 8;

/// Probability that one hash meets the note.
pub fn probability_per_hash(note: impl Into<NoteInput>) -> Result<f64> {
    let note = ensure_note(note)?;
    Ok((-note.z_bits()).exp2())
}

/// Mean number of hashes until the first success.
pub fn expected_hashes(note: impl Into<NoteInput>) -> Result<f64> {
    let note = ensure_note(note)?;
    Ok(note.difficulty())
}

/// Hashrate needed to expect one success in `seconds`, scaled by `multiplier`.
pub fn required_hashrate(note: impl Into<NoteInput>, seconds: f64, multiplier: f64) -> Result<f64> {
    let note = ensure_note(note)?;
    let seconds = ensure_positive("seconds", seconds)?;
    let multiplier = ensure_positive("multiplier", multiplier)?;
    Ok(note.difficulty() * multiplier / seconds)
}

/// Hashrate that finds the note once per `seconds` on average.
pub fn required_hashrate_mean(note: impl Into<NoteInput>, seconds: f64) -> Result<f64> {
    required_hashrate(note, seconds, 1.0)
}

/// Hashrate that finds the note within `seconds` with probability `confidence`.
pub fn required_hashrate_quantile(
    note: impl Into<NoteInput>,
    seconds: f64,
    confidence: f64,
) -> Result<f64> {
    let multiplier = multiplier_for_confidence(confidence)?;
    required_hashrate(note, seconds, multiplier)
}

/// Heaviest continuous exponent reachable at `hashrate` within `seconds`.
pub fn max_z_bits_for_hashrate(hashrate: f64, seconds: f64, multiplier: f64) -> Result<f64> {
    let hashrate = ensure_positive("hashrate", hashrate)?;
    let seconds = ensure_positive("seconds", seconds)?;
    let multiplier = ensure_positive("multiplier", multiplier)?;
    Ok((hashrate * seconds / multiplier).log2())
}

/// Heaviest note reachable at `hashrate` within `seconds`.
///
/// An explicit `multiplier` takes precedence over `reliability`.
pub fn note_from_hashrate(
    hashrate: f64,
    seconds: f64,
    reliability: Option<Reliability>,
    multiplier: Option<f64>,
) -> Result<Sharenote> {
    let multiplier = resolve_multiplier(reliability, multiplier)?;
    let z_bits = max_z_bits_for_hashrate(hashrate, seconds, multiplier)?;
    Sharenote::from_z_bits(z_bits)
}

/// Render the per-hash probability as `1 / 2^{zBits}`.
pub fn format_probability(note: &Sharenote, precision: usize) -> String {
    format!("1 / 2^{:.*}", precision, note.z_bits())
}
