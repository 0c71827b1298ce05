//! Arithmetic over implied difficulty.
//!
//! Operands are converted to `D = 2^zBits`, combined, and converted back
//! with `log2`.

use core::cmp::Ordering;

use crate::error::{ensure_non_negative, Result, SharenoteError};
use crate::note::{ensure_note, NoteInput, Sharenote};

/// Note for a raw difficulty, flooring anything below difficulty 1 at zero.
fn note_for_difficulty(difficulty: f64) -> Result<Sharenote> {
    if !difficulty.is_finite() || difficulty <= 1.0 {
        return Ok(Sharenote::zero());
    }
    Sharenote::from_z_bits(difficulty.log2())
}

/// Combine serial attempts by summing their difficulties.
///
/// Two `25Z00` notes combine to `26Z00`.
pub fn combine_serial<I, N>(notes: I) -> Result<Sharenote>
where
    I: IntoIterator<Item = N>,
    N: Into<NoteInput>,
{
    let mut total = 0.0;
    let mut count = 0usize;
    for note in notes {
        total += ensure_note(note)?.difficulty();
        count += 1;
    }

    if count == 0 {
        return Err(SharenoteError::invalid_argument(
            "at least one note is required to combine",
        ));
    }
    if !total.is_finite() || total <= 0.0 {
        return Ok(Sharenote::zero());
    }
    Sharenote::from_z_bits(total.log2())
}

/// Difficulty remaining after removing `b` from `a`. Never negative.
pub fn note_difference(a: impl Into<NoteInput>, b: impl Into<NoteInput>) -> Result<Sharenote> {
    let a = ensure_note(a)?;
    let b = ensure_note(b)?;
    note_for_difficulty(a.difficulty() - b.difficulty())
}

/// Multiply a note's difficulty by `factor`.
pub fn scale_note(note: impl Into<NoteInput>, factor: f64) -> Result<Sharenote> {
    let note = ensure_note(note)?;
    let factor = ensure_non_negative("factor", factor)?;
    if factor == 0.0 {
        return Ok(Sharenote::zero());
    }
    Sharenote::from_z_bits((note.difficulty() * factor).log2())
}

/// Ratio of two notes' difficulties.
pub fn divide_notes(numerator: impl Into<NoteInput>, denominator: impl Into<NoteInput>) -> Result<f64> {
    let numerator = ensure_note(numerator)?;
    let denominator = ensure_note(denominator)?;

    let divisor = denominator.difficulty();
    if !(divisor > 0.0) {
        return Err(SharenoteError::DivisionByZero);
    }
    Ok(numerator.difficulty() / divisor)
}

/// Order notes by their label components `(z, cents)`.
///
/// `Greater` means `a` is the rarer note. Notes whose `zBits` differ by less
/// than a cent can compare `Equal`.
pub fn compare_notes(a: impl Into<NoteInput>, b: impl Into<NoteInput>) -> Result<Ordering> {
    let a = ensure_note(a)?;
    let b = ensure_note(b)?;
    Ok((a.z(), a.cents()).cmp(&(b.z(), b.cents())))
}
