//! The canonical Sharenote value and its constructors.

use core::fmt;
use core::str::FromStr;

use log::trace;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{Result, SharenoteError};
use crate::label::{parse_label, to_label};

/// One cent of a note, in zBits.
pub const CENT_Z_BIT_STEP: f64 = 0.01;

/// Highest cent value a label can carry.
pub const MAX_CENTS: u8 = 99;

/// Absorbs binary round-off when deriving cents from a continuous exponent.
pub const CENT_EPSILON: f64 = 1e-9;

/// A difficulty level expressed as a base-2 exponent.
///
/// `z_bits` is the value used for all math. `z` and `cents` are the rounded
/// components shown in the label, so two notes with the same label can carry
/// slightly different `z_bits`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sharenote {
    z: u32,
    cents: u8,
    z_bits: f64,
}

impl Sharenote {
    /// Build a note from a whole exponent and a cent value.
    ///
    /// `z` must be a non-negative integer. `cents` is rounded and clamped to
    /// `[0, 99]` rather than rejected.
    pub fn from_components(z: f64, cents: f64) -> Result<Self> {
        if !z.is_finite() || z < 0.0 || z.fract() != 0.0 {
            return Err(SharenoteError::invalid_argument(format!(
                "z must be a non-negative integer, got {}",
                z
            )));
        }
        if z > u32::MAX as f64 {
            return Err(SharenoteError::invalid_argument(format!(
                "z {} is out of range",
                z
            )));
        }
        if !cents.is_finite() {
            return Err(SharenoteError::invalid_argument(format!(
                "cents must be finite, got {}",
                cents
            )));
        }

        let cents = cents.round().trunc().clamp(0.0, MAX_CENTS as f64) as u8;
        let z = z as u32;

        Ok(Sharenote {
            z,
            cents,
            z_bits: z as f64 + cents as f64 * CENT_Z_BIT_STEP,
        })
    }

    /// Build a note from a continuous exponent.
    ///
    /// The label is rounded down to whole cents but the returned note keeps
    /// `z_bits` exactly as given.
    pub fn from_z_bits(z_bits: f64) -> Result<Self> {
        if !z_bits.is_finite() || z_bits < 0.0 {
            return Err(SharenoteError::invalid_argument(format!(
                "zBits must be a finite non-negative number, got {}",
                z_bits
            )));
        }
        if z_bits >= u32::MAX as f64 {
            return Err(SharenoteError::invalid_argument(format!(
                "zBits {} is out of range",
                z_bits
            )));
        }

        let z = z_bits.floor().max(0.0);
        let cents = ((z_bits - z) / CENT_Z_BIT_STEP + CENT_EPSILON)
            .floor()
            .clamp(0.0, MAX_CENTS as f64);

        Ok(Sharenote {
            z: z as u32,
            cents: cents as u8,
            z_bits,
        })
    }

    /// The zero-exponent note (difficulty 1).
    pub fn zero() -> Self {
        Sharenote {
            z: 0,
            cents: 0,
            z_bits: 0.0,
        }
    }

    /// Whole doublings.
    pub fn z(&self) -> u32 {
        self.z
    }

    /// Hundredths of a doubling, `0..=99`.
    pub fn cents(&self) -> u8 {
        self.cents
    }

    /// Continuous exponent used for all arithmetic.
    pub fn z_bits(&self) -> f64 {
        self.z_bits
    }

    /// Implied difficulty, `2^zBits`.
    pub fn difficulty(&self) -> f64 {
        self.z_bits.exp2()
    }

    /// Canonical label such as `33Z53`.
    pub fn label(&self) -> String {
        to_label(self.z, self.cents)
    }
}

impl fmt::Display for Sharenote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Z{:02}", self.z, self.cents)
    }
}

impl FromStr for Sharenote {
    type Err = SharenoteError;

    fn from_str(s: &str) -> Result<Self> {
        parse_label(s)
    }
}

impl Serialize for Sharenote {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Sharenote", 4)?;
        state.serialize_field("z", &self.z)?;
        state.serialize_field("cents", &self.cents)?;
        state.serialize_field("zBits", &self.z_bits)?;
        state.serialize_field("label", &self.label())?;
        state.end()
    }
}

/// Anything an operation accepts where a note is expected.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteInput {
    /// An already constructed note
    Note(Sharenote),
    /// A label such as `33Z53` or `33.5Z`
    Label(String),
    /// Whole exponent and cents
    Components { z: f64, cents: f64 },
    /// A continuous exponent
    Bits(f64),
}

impl From<Sharenote> for NoteInput {
    fn from(note: Sharenote) -> Self {
        NoteInput::Note(note)
    }
}

impl From<&Sharenote> for NoteInput {
    fn from(note: &Sharenote) -> Self {
        NoteInput::Note(*note)
    }
}

impl From<&str> for NoteInput {
    fn from(label: &str) -> Self {
        NoteInput::Label(label.to_string())
    }
}

impl From<String> for NoteInput {
    fn from(label: String) -> Self {
        NoteInput::Label(label)
    }
}

impl From<f64> for NoteInput {
    fn from(z_bits: f64) -> Self {
        NoteInput::Bits(z_bits)
    }
}

/// Resolve any supported note shape into a [`Sharenote`].
///
/// Passing the result back in returns the same note.
pub fn ensure_note(input: impl Into<NoteInput>) -> Result<Sharenote> {
    let input = input.into();
    trace!("resolving note input {:?}", input);
    match input {
        NoteInput::Note(note) => Ok(note),
        NoteInput::Label(label) => parse_label(&label),
        NoteInput::Components { z, cents } => Sharenote::from_components(z, cents),
        NoteInput::Bits(z_bits) => Sharenote::from_z_bits(z_bits),
    }
}
