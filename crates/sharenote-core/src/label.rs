//! Label text codec.
//!
//! Accepted forms (case and whitespace insensitive):
//! - `33Z53`, `33Z 53CZ`, `33Z` - whole exponent and cent digits
//! - `33.53Z`, `33.5Z` - dotted cents, where `.5` means 50 cents
//! - `33.537812Z` - a raw continuous exponent

use crate::error::{Result, SharenoteError};
use crate::note::Sharenote;

/// Render `(z, cents)` as a canonical label.
pub fn to_label(z: u32, cents: u8) -> String {
    format!("{}Z{:02}", z, cents)
}

/// Parse a label into a note.
pub fn parse_label(text: &str) -> Result<Sharenote> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();

    if let Some((z, cents)) = split_z_cents(&cleaned) {
        return Sharenote::from_components(parse_digits(z)?, parse_cents(cents)?);
    }

    if let Some((z, cents)) = split_dotted_cents(&cleaned) {
        let mut padded = cents.to_string();
        while padded.len() < 2 {
            padded.push('0');
        }
        return Sharenote::from_components(parse_digits(z)?, parse_cents(&padded)?);
    }

    if let Some(exponent) = split_decimal_exponent(&cleaned) {
        let z_bits: f64 = exponent
            .parse()
            .map_err(|_| SharenoteError::InvalidLabel(text.to_string()))?;
        return Sharenote::from_z_bits(z_bits);
    }

    Err(SharenoteError::InvalidLabel(text.to_string()))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `{digits}Z{0-2 digits}`, with an optional `CZ` suffix after the cents.
fn split_z_cents(s: &str) -> Option<(&str, &str)> {
    let (z, rest) = s.split_once('Z')?;
    if !is_digits(z) {
        return None;
    }

    let cents = match rest.strip_suffix("CZ") {
        Some(cents) if !cents.is_empty() => cents,
        Some(_) => return None,
        None => rest,
    };

    if cents.len() > 2 || !cents.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((z, cents))
}

/// `{digits}.{1-2 digits}Z`
fn split_dotted_cents(s: &str) -> Option<(&str, &str)> {
    let body = s.strip_suffix('Z')?;
    let (z, cents) = body.split_once('.')?;
    if is_digits(z) && is_digits(cents) && cents.len() <= 2 {
        Some((z, cents))
    } else {
        None
    }
}

/// `{digits}(.{digits})?Z`
fn split_decimal_exponent(s: &str) -> Option<&str> {
    let body = s.strip_suffix('Z')?;
    let valid = match body.split_once('.') {
        Some((whole, frac)) => is_digits(whole) && is_digits(frac),
        None => is_digits(body),
    };
    valid.then_some(body)
}

fn parse_digits(s: &str) -> Result<f64> {
    s.parse::<f64>()
        .map_err(|_| SharenoteError::invalid_argument(format!("invalid exponent digits {:?}", s)))
}

fn parse_cents(s: &str) -> Result<f64> {
    if s.is_empty() {
        return Ok(0.0);
    }
    parse_digits(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(label: &str) -> (u32, u8) {
        let note = parse_label(label).unwrap();
        (note.z(), note.cents())
    }

    #[test]
    fn test_to_label_pads_cents() {
        assert_eq!(to_label(33, 53), "33Z53");
        assert_eq!(to_label(20, 1), "20Z01");
        assert_eq!(to_label(0, 0), "0Z00");
    }

    #[test]
    fn test_parse_component_forms() {
        assert_eq!(parts("33Z53"), (33, 53));
        assert_eq!(parts("33z53"), (33, 53));
        assert_eq!(parts("33Z 53CZ"), (33, 53));
        assert_eq!(parts(" 33 z 53 cz "), (33, 53));
        assert_eq!(parts("33Z"), (33, 0));
        assert_eq!(parts("33Z5"), (33, 5));
    }

    #[test]
    fn test_parse_dotted_cents_are_literal() {
        assert_eq!(parts("33.53Z"), (33, 53));
        assert_eq!(parts("33.5Z"), (33, 50));
        assert_eq!(parts("33.05Z"), (33, 5));
    }

    #[test]
    fn test_parse_decimal_exponent() {
        let note = parse_label("33.537812Z").unwrap();
        assert_eq!(note.label(), "33Z53");
        assert_eq!(note.z_bits(), 33.537812);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "Z53", "33", "33Z123", "33ZCZ", "-1Z00", "33.Z", "abc", "33Z5x"] {
            assert!(
                matches!(parse_label(bad), Err(SharenoteError::InvalidLabel(_))),
                "{:?} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_label_roundtrip() {
        for z in [0u32, 1, 17, 33, 64, 255] {
            for cents in 0u8..=99 {
                let note = parse_label(&to_label(z, cents)).unwrap();
                assert_eq!((note.z(), note.cents()), (z, cents));
            }
        }
    }
}
