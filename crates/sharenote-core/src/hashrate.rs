//! Hashrate parsing and human-readable display.

use core::fmt;
use core::str::FromStr;

use serde::Serialize;

use crate::error::{ensure_non_negative, Result, SharenoteError};

/// Decimal exponent between neighbouring units.
pub const UNIT_EXPONENT_STEP: i32 = 3;

/// Hashrate units, powers of 1000 apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HashrateUnit {
    #[serde(rename = "H/s")]
    Hash,
    #[serde(rename = "KH/s")]
    Kilo,
    #[serde(rename = "MH/s")]
    Mega,
    #[serde(rename = "GH/s")]
    Giga,
    #[serde(rename = "TH/s")]
    Tera,
    #[serde(rename = "PH/s")]
    Peta,
    #[serde(rename = "EH/s")]
    Exa,
    #[serde(rename = "ZH/s")]
    Zetta,
}

impl HashrateUnit {
    /// All units, smallest first.
    pub const ALL: [HashrateUnit; 8] = [
        HashrateUnit::Hash,
        HashrateUnit::Kilo,
        HashrateUnit::Mega,
        HashrateUnit::Giga,
        HashrateUnit::Tera,
        HashrateUnit::Peta,
        HashrateUnit::Exa,
        HashrateUnit::Zetta,
    ];

    /// Metric prefix letter, empty for plain hashes.
    pub fn prefix(&self) -> &'static str {
        match self {
            HashrateUnit::Hash => "",
            HashrateUnit::Kilo => "K",
            HashrateUnit::Mega => "M",
            HashrateUnit::Giga => "G",
            HashrateUnit::Tera => "T",
            HashrateUnit::Peta => "P",
            HashrateUnit::Exa => "E",
            HashrateUnit::Zetta => "Z",
        }
    }

    /// Rate symbol such as `GH/s`.
    pub fn symbol(&self) -> &'static str {
        match self {
            HashrateUnit::Hash => "H/s",
            HashrateUnit::Kilo => "KH/s",
            HashrateUnit::Mega => "MH/s",
            HashrateUnit::Giga => "GH/s",
            HashrateUnit::Tera => "TH/s",
            HashrateUnit::Peta => "PH/s",
            HashrateUnit::Exa => "EH/s",
            HashrateUnit::Zetta => "ZH/s",
        }
    }

    /// Count symbol such as `GH`, for hash totals rather than rates.
    pub fn count_symbol(&self) -> &'static str {
        let symbol = self.symbol();
        &symbol[..symbol.len() - 2]
    }

    /// Decimal exponent of the unit.
    pub fn exponent(&self) -> i32 {
        self.index() as i32 * UNIT_EXPONENT_STEP
    }

    /// Hashes per second in one of this unit.
    pub fn multiplier(&self) -> f64 {
        10f64.powi(self.exponent())
    }

    fn index(&self) -> usize {
        *self as usize
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        HashrateUnit::ALL
            .iter()
            .copied()
            .find(|unit| unit.prefix() == prefix)
    }
}

impl fmt::Display for HashrateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for HashrateUnit {
    type Err = SharenoteError;

    /// Accepts `GH/s`, `ghps`, `GH`, `G`, `h/s` and so on. Empty means H/s.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        let prefix = normalized
            .strip_suffix("H/S")
            .or_else(|| normalized.strip_suffix("HPS"))
            .or_else(|| normalized.strip_suffix('H'))
            .unwrap_or(&normalized);

        HashrateUnit::from_prefix(prefix).ok_or_else(|| SharenoteError::InvalidUnit(s.to_string()))
    }
}

/// Hashrate in any accepted shape.
#[derive(Debug, Clone, PartialEq)]
pub enum HashrateInput {
    /// Hashes per second
    Value(f64),
    /// Text such as `"5 GH/s"` or `"1_200.5 khps"`
    Text(String),
    /// A magnitude with a separate unit
    Measured { value: f64, unit: String },
}

impl From<f64> for HashrateInput {
    fn from(value: f64) -> Self {
        HashrateInput::Value(value)
    }
}

impl From<&str> for HashrateInput {
    fn from(text: &str) -> Self {
        HashrateInput::Text(text.to_string())
    }
}

impl From<String> for HashrateInput {
    fn from(text: String) -> Self {
        HashrateInput::Text(text)
    }
}

/// Resolve a hashrate to hashes per second.
pub fn parse_hashrate(input: impl Into<HashrateInput>) -> Result<f64> {
    match input.into() {
        HashrateInput::Value(value) => ensure_non_negative("hashrate", value),
        HashrateInput::Text(text) => parse_hashrate_text(&text),
        HashrateInput::Measured { value, unit } => {
            let value = ensure_non_negative("hashrate", value)?;
            let unit: HashrateUnit = unit.parse()?;
            ensure_non_negative("hashrate", value * unit.multiplier())
        }
    }
}

fn parse_hashrate_text(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let (magnitude, rest) = split_magnitude(trimmed)
        .ok_or_else(|| SharenoteError::InvalidFormat(format!("unrecognized hashrate {:?}", text)))?;

    let cleaned: String = magnitude.chars().filter(|c| *c != '_' && *c != ',').collect();
    let value: f64 = cleaned
        .parse()
        .map_err(|_| SharenoteError::InvalidFormat(format!("unrecognized hashrate {:?}", text)))?;

    let unit: HashrateUnit = rest.trim().parse()?;
    ensure_non_negative("hashrate", value * unit.multiplier())
}

/// Split `text` into its numeric prefix and the remainder.
///
/// The prefix is an optional sign, grouped digits, an optional fraction and
/// an optional exponent. Returns `None` when no digit is present.
fn split_magnitude(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    let mut end = 0;
    let mut digits = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'_' || bytes[end] == b',') {
        if bytes[end].is_ascii_digit() {
            digits += 1;
        }
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            digits += 1;
            end += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    // Only treat `e` as an exponent when digits follow, so `5EH/s` stays exa
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut cursor = end + 1;
        if cursor < bytes.len() && (bytes[cursor] == b'+' || bytes[cursor] == b'-') {
            cursor += 1;
        }
        let start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > start {
            end = cursor;
        }
    }

    Some((&text[..end], &text[end..]))
}

/// A hashrate scaled into its largest whole unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumanHashrate {
    pub value: f64,
    pub unit: HashrateUnit,
    pub exponent: i32,
    pub display: String,
}

/// A hash count scaled into its largest whole unit (`"12.7 GH"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumanHashes {
    pub value: f64,
    pub unit: &'static str,
    pub exponent: i32,
    pub display: String,
}

/// Default decimals: none from 100 up, one from 10 up, two below.
fn tiered_precision(value: f64) -> usize {
    if value >= 100.0 {
        0
    } else if value >= 10.0 {
        1
    } else {
        2
    }
}

fn scale_to_unit(amount: f64) -> (f64, HashrateUnit) {
    let index = if amount > 0.0 {
        let raw = (amount.log10() / UNIT_EXPONENT_STEP as f64).floor();
        raw.clamp(0.0, (HashrateUnit::ALL.len() - 1) as f64) as usize
    } else {
        0
    };
    let unit = HashrateUnit::ALL[index];
    (amount / unit.multiplier(), unit)
}

/// Render a hashrate, e.g. `5e9` as `"5.00 GH/s"`.
pub fn human_hashrate(hashrate: f64, precision: Option<usize>) -> Result<HumanHashrate> {
    let hashrate = ensure_non_negative("hashrate", hashrate)?;
    let (value, unit) = scale_to_unit(hashrate);
    let precision = precision.unwrap_or_else(|| tiered_precision(value));

    Ok(HumanHashrate {
        value,
        unit,
        exponent: unit.exponent(),
        display: format!("{:.*} {}", precision, value, unit.symbol()),
    })
}

/// Render a hash count, e.g. `1.27e10` as `"12.7 GH"`.
pub fn human_hashes(count: f64, precision: Option<usize>) -> Result<HumanHashes> {
    let count = ensure_non_negative("hash count", count)?;
    let (value, unit) = scale_to_unit(count);
    let precision = precision.unwrap_or_else(|| tiered_precision(value));

    Ok(HumanHashes {
        value,
        unit: unit.count_symbol(),
        exponent: unit.exponent(),
        display: format!("{:.*} {}", precision, value, unit.count_symbol()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_units() {
        assert_eq!(parse_hashrate("5 GH/s").unwrap(), 5e9);
        assert_eq!(parse_hashrate("5GH/s").unwrap(), 5e9);
        assert_eq!(parse_hashrate("5 gh/s").unwrap(), 5e9);
        assert_eq!(parse_hashrate("5 Ghps").unwrap(), 5e9);
        assert_eq!(parse_hashrate("5 G").unwrap(), 5e9);
        assert_eq!(parse_hashrate("5 GH").unwrap(), 5e9);
        assert_eq!(parse_hashrate("12").unwrap(), 12.0);
        assert_eq!(parse_hashrate("12 H/s").unwrap(), 12.0);
        assert_eq!(parse_hashrate("2 EH/s").unwrap(), 2e18);
        assert_eq!(parse_hashrate("2EH/s").unwrap(), 2e18);
        assert_eq!(parse_hashrate("1 ZH/s").unwrap(), 1e21);
    }

    #[test]
    fn test_parse_grouping_and_scientific() {
        assert_eq!(parse_hashrate("1,000 H/s").unwrap(), 1000.0);
        assert_eq!(parse_hashrate("1_500 KH/s").unwrap(), 1.5e6);
        assert_eq!(parse_hashrate("2.5e3 MH/s").unwrap(), 2.5e9);
        assert_eq!(parse_hashrate("4E2").unwrap(), 400.0);
        assert_eq!(parse_hashrate(".5 TH/s").unwrap(), 5e11);
        assert_eq!(parse_hashrate("+3 kh/s").unwrap(), 3000.0);
    }

    #[test]
    fn test_parse_numeric_and_measured() {
        assert_eq!(parse_hashrate(42.0).unwrap(), 42.0);
        assert_eq!(
            parse_hashrate(HashrateInput::Measured {
                value: 3.0,
                unit: "TH/s".into()
            })
            .unwrap(),
            3e12
        );
        assert!(parse_hashrate(-1.0).is_err());
        assert!(parse_hashrate(f64::NAN).is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_hashrate("5 XH/s"),
            Err(SharenoteError::InvalidUnit(_))
        ));
        assert!(matches!(
            parse_hashrate("fast"),
            Err(SharenoteError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_hashrate("-5 GH/s"),
            Err(SharenoteError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_hashrate(HashrateInput::Measured {
                value: 1.0,
                unit: "bogus".into()
            }),
            Err(SharenoteError::InvalidUnit(_))
        ));
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!("".parse::<HashrateUnit>().unwrap(), HashrateUnit::Hash);
        assert_eq!("hps".parse::<HashrateUnit>().unwrap(), HashrateUnit::Hash);
        assert_eq!("P H / s".parse::<HashrateUnit>().unwrap(), HashrateUnit::Peta);
        assert_eq!(HashrateUnit::Giga.count_symbol(), "GH");
        assert_eq!(HashrateUnit::Tera.exponent(), 12);
    }

    #[test]
    fn test_human_hashrate() {
        let human = human_hashrate(5e9, None).unwrap();
        assert_eq!(human.display, "5.00 GH/s");
        assert_eq!(human.unit, HashrateUnit::Giga);
        assert_eq!(human.exponent, 9);

        assert_eq!(human_hashrate(12_345.0, None).unwrap().display, "12.3 KH/s");
        assert_eq!(human_hashrate(123_456.0, None).unwrap().display, "123 KH/s");
        assert_eq!(human_hashrate(999.0, None).unwrap().display, "999 H/s");
        assert_eq!(human_hashrate(0.5, None).unwrap().display, "0.50 H/s");
        assert_eq!(human_hashrate(0.0, None).unwrap().display, "0.00 H/s");
        assert_eq!(human_hashrate(5e9, Some(1)).unwrap().display, "5.0 GH/s");
    }

    #[test]
    fn test_human_hashrate_clamps_to_table() {
        assert_eq!(human_hashrate(5e24, None).unwrap().display, "5000 ZH/s");
        assert!(human_hashrate(-1.0, None).is_err());
    }

    #[test]
    fn test_human_hashes() {
        let human = human_hashes(12_700_000_000.0, None).unwrap();
        assert_eq!(human.display, "12.7 GH");
        assert_eq!(human.unit, "GH");
        assert_eq!(human_hashes(1.0, None).unwrap().display, "1.00 H");
    }
}
