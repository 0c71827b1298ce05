//! 256-bit targets and the compact "nBits" encoding.
//!
//! A note with exponent `zBits` corresponds to the target `2^(256 - zBits)`:
//! a hash, read as a 256-bit big-endian integer, meets the note when it is
//! at or below that target.
//!
//! The compact format is: [exponent (1 byte)][mantissa (3 bytes)]
//! Target = mantissa * 256^(exponent - 3)

use log::trace;
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::{Result, SharenoteError};
use crate::note::{ensure_note, NoteInput, Sharenote};

/// Width of the target space in bits.
pub const TARGET_BITS: u32 = 256;

/// Fixed-point precision of the fractional exponent scale.
pub const SCALE_FRACTION_BITS: u32 = 48;

/// Sign bit of the compact mantissa.
const COMPACT_SIGN_BIT: u32 = 0x0080_0000;

/// Compute the target threshold for a note.
///
/// The fractional part of the exponent is applied as a 48-bit fixed-point
/// factor so the result is exact integer arithmetic past that point.
pub fn target_for(note: impl Into<NoteInput>) -> Result<BigUint> {
    let note = ensure_note(note)?;
    let z_bits = note.z_bits();
    let whole = z_bits.floor();
    let fraction = z_bits - whole;

    if whole > TARGET_BITS as f64 {
        return Err(SharenoteError::TargetUnderflow(z_bits));
    }
    let base_exponent = TARGET_BITS - whole as u32;

    let scale = (-fraction).exp2();
    let scale_factor = (scale * (1u64 << SCALE_FRACTION_BITS) as f64).round() as u64;

    let target = (BigUint::one() << base_exponent as usize) * BigUint::from(scale_factor);
    Ok(target >> SCALE_FRACTION_BITS as usize)
}

/// Encode a target in compact form.
pub fn compact_from_target(target: &BigUint) -> Result<u32> {
    if target.is_zero() {
        return Err(SharenoteError::invalid_argument("target must be greater than zero"));
    }

    // Number of bytes needed to hold the target
    let mut size = (target.bits() + 7) / 8;

    let shifted = if size <= 3 {
        target << (8 * (3 - size)) as usize
    } else {
        target >> (8 * (size - 3)) as usize
    };
    let mut mantissa = shifted.to_u32().ok_or(SharenoteError::Overflow(size))?;

    // A set high bit would read as a negative target, so move it down a byte
    if mantissa & COMPACT_SIGN_BIT != 0 {
        mantissa >>= 8;
        size += 1;
    }

    if size > 0xff {
        return Err(SharenoteError::Overflow(size));
    }

    Ok(((size as u32) << 24) | mantissa)
}

/// Expand a compact value to its full target.
///
/// A set sign bit yields a zero target, as does a zero exponent.
pub fn target_from_compact(bits: u32) -> BigUint {
    let exponent = bits >> 24;
    let mantissa = bits & 0x007f_ffff;

    if bits & COMPACT_SIGN_BIT != 0 {
        return BigUint::zero();
    }

    if exponent <= 3 {
        BigUint::from(mantissa >> (8 * (3 - exponent)))
    } else {
        BigUint::from(mantissa) << (8 * (exponent - 3)) as usize
    }
}

/// Render a compact value as 8 lowercase hex digits.
pub fn format_compact(bits: u32) -> String {
    hex::encode(bits.to_be_bytes())
}

/// Parse 8 hex digits, optionally `0x`-prefixed, into a compact value.
pub fn parse_compact(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() != 8 {
        return Err(SharenoteError::InvalidFormat(format!(
            "compact value must be 8 hex digits, got {:?}",
            text
        )));
    }

    let mut bytes = [0u8; 4];
    hex::decode_to_slice(digits, &mut bytes).map_err(|e| {
        SharenoteError::InvalidFormat(format!("invalid compact hex {:?}: {}", text, e))
    })?;
    Ok(u32::from_be_bytes(bytes))
}

/// Decode a compact hex string into the note it represents.
pub fn note_from_compact(text: &str) -> Result<Sharenote> {
    let bits = parse_compact(text)?;
    let exponent = bits >> 24;
    let mantissa = bits & 0x00ff_ffff;

    if mantissa == 0 {
        return Err(SharenoteError::invalid_argument(format!(
            "compact value {} has a zero mantissa",
            format_compact(bits)
        )));
    }

    let log2_target = (mantissa as f64).log2() + 8.0 * (exponent as f64 - 3.0);
    trace!("compact {:08x} -> log2 target {}", bits, log2_target);
    Sharenote::from_z_bits(TARGET_BITS as f64 - log2_target)
}

/// Compact hex encoding of a note's target.
///
/// Only about 24 bits of mantissa survive, so decoding the result gives back
/// a note that is close to, not identical with, the input.
pub fn compact_for_note(note: impl Into<NoteInput>) -> Result<String> {
    let target = target_for(note)?;
    Ok(format_compact(compact_from_target(&target)?))
}

/// A target as 32 big-endian bytes, saturating at `2^256 - 1`.
pub fn target_to_bytes(target: &BigUint) -> [u8; 32] {
    let bytes = target.to_bytes_be();
    if bytes.len() > 32 {
        return [0xff; 32];
    }

    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Check whether a 32-byte big-endian hash meets a note.
pub fn hash_meets_note(hash: &[u8; 32], note: impl Into<NoteInput>) -> Result<bool> {
    let target = target_for(note)?;
    Ok(BigUint::from_bytes_be(hash) <= target)
}

/// The heaviest note a 32-byte big-endian hash satisfies.
pub fn note_from_hash(hash: &[u8; 32]) -> Result<Sharenote> {
    let value = BigUint::from_bytes_be(hash);
    if value.is_zero() {
        return Err(SharenoteError::invalid_argument("hash of all zeros has no finite note"));
    }

    // Keep the top 53 bits so the f64 conversion is exact
    let shift = value.bits().saturating_sub(53);
    let top = (&value >> shift as usize).to_u64().unwrap_or(u64::MAX) as f64;
    let log2_value = top.log2() + shift as f64;

    Sharenote::from_z_bits((TARGET_BITS as f64 - log2_value).max(0.0))
}
