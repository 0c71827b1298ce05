//! Reliability levels and quantile multipliers.
//!
//! Under an exponential time-to-first-share model, finding a share within
//! `t` seconds with confidence `q` needs `-ln(1 - q)` times the mean rate.

use core::fmt;
use core::str::FromStr;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{ensure_positive, Result, SharenoteError};

/// Identifier of a catalog reliability level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReliabilityId {
    /// Expected value, multiplier 1
    Mean,
    /// 90% confidence
    P90,
    /// 95% confidence
    P95,
    /// 99% confidence
    P99,
    /// 99.9% confidence
    P999,
}

impl ReliabilityId {
    /// All catalog ids, lightest first.
    pub const ALL: [ReliabilityId; 5] = [
        ReliabilityId::Mean,
        ReliabilityId::P90,
        ReliabilityId::P95,
        ReliabilityId::P99,
        ReliabilityId::P999,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReliabilityId::Mean => "mean",
            ReliabilityId::P90 => "p90",
            ReliabilityId::P95 => "p95",
            ReliabilityId::P99 => "p99",
            ReliabilityId::P999 => "p999",
        }
    }

    fn confidence(&self) -> Option<f64> {
        match self {
            ReliabilityId::Mean => None,
            ReliabilityId::P90 => Some(0.90),
            ReliabilityId::P95 => Some(0.95),
            ReliabilityId::P99 => Some(0.99),
            ReliabilityId::P999 => Some(0.999),
        }
    }

    fn display_label(&self) -> &'static str {
        match self {
            ReliabilityId::Mean => "Mean",
            ReliabilityId::P90 => "90%",
            ReliabilityId::P95 => "95%",
            ReliabilityId::P99 => "99%",
            ReliabilityId::P999 => "99.9%",
        }
    }

    /// The catalog entry for this id.
    pub fn level(&self) -> &'static ReliabilityLevel {
        let index = ReliabilityId::ALL
            .iter()
            .position(|id| id == self)
            .unwrap_or(0);
        &RELIABILITY_LEVELS[index]
    }
}

impl fmt::Display for ReliabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReliabilityId {
    type Err = SharenoteError;

    /// Accepts ids (`p95`), labels (`95%`) and `mean`/`average`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "mean" | "average" | "avg" => Ok(ReliabilityId::Mean),
            "p90" | "90%" | "90" => Ok(ReliabilityId::P90),
            "p95" | "95%" | "95" => Ok(ReliabilityId::P95),
            "p99" | "99%" | "99" => Ok(ReliabilityId::P99),
            "p999" | "99.9%" | "99.9" => Ok(ReliabilityId::P999),
            _ => Err(SharenoteError::invalid_argument(format!(
                "unknown reliability level {:?}",
                s
            ))),
        }
    }
}

/// A named confidence level and its rate multiplier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReliabilityLevel {
    pub id: ReliabilityId,
    pub label: &'static str,
    /// `None` for the mean level.
    pub confidence: Option<f64>,
    pub multiplier: f64,
}

/// Read-only catalog of reliability levels, lightest first.
pub static RELIABILITY_LEVELS: Lazy<Vec<ReliabilityLevel>> = Lazy::new(|| {
    ReliabilityId::ALL
        .iter()
        .map(|id| {
            let confidence = id.confidence();
            ReliabilityLevel {
                id: *id,
                label: id.display_label(),
                confidence,
                multiplier: confidence.map(|q| -(1.0 - q).ln()).unwrap_or(1.0),
            }
        })
        .collect()
});

/// Reliability requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reliability {
    /// A catalog level
    Level(ReliabilityId),
    /// An arbitrary confidence in `(0, 1)`
    Confidence(f64),
}

impl From<ReliabilityId> for Reliability {
    fn from(id: ReliabilityId) -> Self {
        Reliability::Level(id)
    }
}

impl Reliability {
    /// Rate multiplier for this reliability.
    pub fn multiplier(&self) -> Result<f64> {
        match self {
            Reliability::Level(id) => Ok(id.level().multiplier),
            Reliability::Confidence(q) => multiplier_for_confidence(*q),
        }
    }
}

/// `-ln(1 - q)` for a confidence strictly inside `(0, 1)`.
pub fn multiplier_for_confidence(confidence: f64) -> Result<f64> {
    if !confidence.is_finite() || confidence <= 0.0 || confidence >= 1.0 {
        return Err(SharenoteError::invalid_argument(format!(
            "confidence must lie strictly between 0 and 1, got {}",
            confidence
        )));
    }
    Ok(-(1.0 - confidence).ln())
}

/// Pick the rate multiplier for a request.
///
/// An explicit multiplier wins over a reliability; with neither the mean
/// (multiplier 1) is used.
pub fn resolve_multiplier(reliability: Option<Reliability>, multiplier: Option<f64>) -> Result<f64> {
    match (multiplier, reliability) {
        (Some(m), _) => ensure_positive("multiplier", m),
        (None, Some(r)) => r.multiplier(),
        (None, None) => Ok(1.0),
    }
}

/// The full catalog.
pub fn reliability_levels() -> &'static [ReliabilityLevel] {
    &RELIABILITY_LEVELS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog() {
        let levels = reliability_levels();
        assert_eq!(levels.len(), 5);

        let mean = &levels[0];
        assert_eq!(mean.id, ReliabilityId::Mean);
        assert_eq!(mean.confidence, None);
        assert_eq!(mean.multiplier, 1.0);

        let p90 = ReliabilityId::P90.level();
        assert_eq!(p90.confidence, Some(0.90));
        assert!((p90.multiplier - 2.302585092994046).abs() < 1e-12);

        let p999 = ReliabilityId::P999.level();
        assert!((p999.multiplier - 6.907755278982137).abs() < 1e-9);
    }

    #[test]
    fn test_multipliers_increase() {
        let levels = reliability_levels();
        for pair in levels.windows(2) {
            assert!(pair[1].multiplier > pair[0].multiplier);
        }
    }

    #[test]
    fn test_multiplier_for_confidence_domain() {
        assert!((multiplier_for_confidence(0.5).unwrap() - core::f64::consts::LN_2).abs() < 1e-12);
        assert!(multiplier_for_confidence(0.0).is_err());
        assert!(multiplier_for_confidence(1.0).is_err());
        assert!(multiplier_for_confidence(-0.2).is_err());
        assert!(multiplier_for_confidence(f64::NAN).is_err());
    }

    #[test]
    fn test_resolve_multiplier_precedence() {
        let p95 = Some(Reliability::Level(ReliabilityId::P95));
        assert_eq!(resolve_multiplier(None, None).unwrap(), 1.0);
        assert_eq!(resolve_multiplier(p95, Some(3.0)).unwrap(), 3.0);
        assert_eq!(
            resolve_multiplier(p95, None).unwrap(),
            ReliabilityId::P95.level().multiplier
        );
        assert!(resolve_multiplier(None, Some(0.0)).is_err());
        assert!(resolve_multiplier(Some(Reliability::Confidence(1.0)), None).is_err());
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!("P95".parse::<ReliabilityId>().unwrap(), ReliabilityId::P95);
        assert_eq!("99.9%".parse::<ReliabilityId>().unwrap(), ReliabilityId::P999);
        assert_eq!("average".parse::<ReliabilityId>().unwrap(), ReliabilityId::Mean);
        assert!("p42".parse::<ReliabilityId>().is_err());
    }
}
