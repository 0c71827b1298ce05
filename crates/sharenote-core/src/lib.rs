//! Sharenote: proof-of-work difficulty as a human-friendly label.
//!
//! A note such as `33Z53` names the difficulty `2^33.53`. This crate provides:
//! - Note construction from components, continuous exponents and labels
//! - Probability, expected work and required hashrate conversions
//! - Reliability (confidence quantile) multipliers
//! - 256-bit targets and the compact "nBits" encoding
//! - Arithmetic over implied difficulty
//! - Hashrate parsing and display
//!
//! Everything is a pure function over immutable values.

pub mod arithmetic;
pub mod error;
pub mod estimate;
pub mod hashrate;
pub mod label;
pub mod note;
pub mod probability;
pub mod reliability;
pub mod target;

pub use num_bigint::BigUint;

pub use arithmetic::{combine_serial, compare_notes, divide_notes, note_difference, scale_note};
pub use error::{Result, SharenoteError};
pub use estimate::{estimate_bill, plan_sharenote, BillEstimate, EstimateOptions, PrimaryMode, SharenotePlan};
pub use hashrate::{human_hashes, human_hashrate, parse_hashrate, HashrateInput, HashrateUnit, HumanHashes, HumanHashrate};
pub use label::{parse_label, to_label};
pub use note::{ensure_note, NoteInput, Sharenote};
pub use probability::{
    expected_hashes, format_probability, max_z_bits_for_hashrate, note_from_hashrate,
    probability_per_hash, required_hashrate, required_hashrate_mean, required_hashrate_quantile,
};
pub use reliability::{
    multiplier_for_confidence, reliability_levels, resolve_multiplier, Reliability, ReliabilityId,
    ReliabilityLevel,
};
pub use target::{
    compact_for_note, compact_from_target, hash_meets_note, note_from_compact, note_from_hash,
    target_for, target_from_compact,
};
