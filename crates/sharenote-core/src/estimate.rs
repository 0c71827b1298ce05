//! Estimate reports bundling a note with its derived rates.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, Result};
use crate::hashrate::{human_hashes, human_hashrate, parse_hashrate, HashrateInput, HumanHashrate};
use crate::note::{ensure_note, NoteInput, Sharenote};
use crate::probability::{
    expected_hashes, format_probability, note_from_hashrate, probability_per_hash,
    required_hashrate, DEFAULT_PROBABILITY_PRECISION,
};
use crate::reliability::{resolve_multiplier, Reliability, ReliabilityLevel};

/// Which required hashrate a report leads with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryMode {
    Mean,
    Quantile,
}

/// Options for [`estimate_bill`] and [`plan_sharenote`].
#[derive(Debug, Clone, Default)]
pub struct EstimateOptions {
    pub reliability: Option<Reliability>,
    /// Overrides `reliability` when set.
    pub multiplier: Option<f64>,
    /// Defaults to quantile when a reliability or multiplier is given.
    pub primary_mode: Option<PrimaryMode>,
    /// Decimals in `probability_display`, default 8.
    pub probability_precision: Option<usize>,
}

impl EstimateOptions {
    pub fn with_reliability(mut self, reliability: impl Into<Reliability>) -> Self {
        self.reliability = Some(reliability.into());
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    pub fn with_primary_mode(mut self, mode: PrimaryMode) -> Self {
        self.primary_mode = Some(mode);
        self
    }

    pub fn with_probability_precision(mut self, precision: usize) -> Self {
        self.probability_precision = Some(precision);
        self
    }

    fn primary_mode(&self) -> PrimaryMode {
        match self.primary_mode {
            Some(mode) => mode,
            None if self.reliability.is_some() || self.multiplier.is_some() => PrimaryMode::Quantile,
            None => PrimaryMode::Mean,
        }
    }

    /// The catalog level named by the options, if any.
    fn level(&self) -> Option<ReliabilityLevel> {
        match self.reliability {
            Some(Reliability::Level(id)) => Some(id.level().clone()),
            _ => None,
        }
    }
}

/// What it takes to hit a note within a time window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillEstimate {
    pub note: Sharenote,
    pub seconds: f64,
    pub probability_per_hash: f64,
    pub probability_display: String,
    pub expected_hashes: f64,
    pub expected_hashes_display: String,
    pub multiplier: f64,
    pub reliability: Option<ReliabilityLevel>,
    pub primary_mode: PrimaryMode,
    pub required_hashrate_mean: f64,
    pub required_hashrate_quantile: f64,
    pub required_hashrate_primary: f64,
    pub required_hashrate_mean_human: HumanHashrate,
    pub required_hashrate_quantile_human: HumanHashrate,
    pub required_hashrate_primary_human: HumanHashrate,
}

/// The heaviest note a hashrate reaches, and its bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharenotePlan {
    pub input_hashrate: f64,
    pub input_hashrate_human: HumanHashrate,
    pub note: Sharenote,
    pub bill: BillEstimate,
}

/// Derive probability, expected work and required hashrates for a note.
pub fn estimate_bill(
    note: impl Into<NoteInput>,
    seconds: f64,
    options: &EstimateOptions,
) -> Result<BillEstimate> {
    let note = ensure_note(note)?;
    let seconds = ensure_positive("seconds", seconds)?;
    let multiplier = resolve_multiplier(options.reliability, options.multiplier)?;
    let precision = options
        .probability_precision
        .unwrap_or(DEFAULT_PROBABILITY_PRECISION);

    let expected = expected_hashes(note)?;
    let mean = required_hashrate(note, seconds, 1.0)?;
    let quantile = required_hashrate(note, seconds, multiplier)?;

    let primary_mode = options.primary_mode();
    let primary = match primary_mode {
        PrimaryMode::Mean => mean,
        PrimaryMode::Quantile => quantile,
    };

    Ok(BillEstimate {
        note,
        seconds,
        probability_per_hash: probability_per_hash(note)?,
        probability_display: format_probability(&note, precision),
        expected_hashes: expected,
        expected_hashes_display: human_hashes(expected, None)?.display,
        multiplier,
        reliability: options.level(),
        primary_mode,
        required_hashrate_mean: mean,
        required_hashrate_quantile: quantile,
        required_hashrate_primary: primary,
        required_hashrate_mean_human: human_hashrate(mean, None)?,
        required_hashrate_quantile_human: human_hashrate(quantile, None)?,
        required_hashrate_primary_human: human_hashrate(primary, None)?,
    })
}

/// Find the heaviest note `hashrate` reaches in `seconds` and bill it.
pub fn plan_sharenote(
    hashrate: impl Into<HashrateInput>,
    seconds: f64,
    options: &EstimateOptions,
) -> Result<SharenotePlan> {
    let input_hashrate = parse_hashrate(hashrate)?;
    let note = note_from_hashrate(input_hashrate, seconds, options.reliability, options.multiplier)?;
    let bill = estimate_bill(note, seconds, options)?;

    Ok(SharenotePlan {
        input_hashrate,
        input_hashrate_human: human_hashrate(input_hashrate, None)?,
        note,
        bill,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SharenoteError;
    use crate::reliability::ReliabilityId;

    #[test]
    fn test_mean_bill() {
        let bill = estimate_bill("32Z00", 4.0, &EstimateOptions::default()).unwrap();
        assert_eq!(bill.primary_mode, PrimaryMode::Mean);
        assert_eq!(bill.multiplier, 1.0);
        assert_eq!(bill.reliability, None);
        assert_eq!(bill.required_hashrate_primary, bill.required_hashrate_mean);
        assert_eq!(bill.required_hashrate_quantile, bill.required_hashrate_mean);
        assert_eq!(bill.probability_display, "1 / 2^32.00000000");
        assert_eq!(bill.expected_hashes_display, "4.29 GH");
        assert_eq!(bill.required_hashrate_mean_human.display, "1.07 GH/s");
    }

    #[test]
    fn test_reliability_bill_leads_with_quantile() {
        let options = EstimateOptions::default().with_reliability(ReliabilityId::P95);
        let bill = estimate_bill("33Z53", 5.0, &options).unwrap();

        assert_eq!(bill.primary_mode, PrimaryMode::Quantile);
        assert_eq!(bill.reliability.as_ref().map(|l| l.id), Some(ReliabilityId::P95));
        assert_eq!(bill.required_hashrate_primary, bill.required_hashrate_quantile);
        let ratio = bill.required_hashrate_quantile / bill.required_hashrate_mean;
        assert!((ratio - -(0.05f64).ln()).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_primary_mode_wins() {
        let options = EstimateOptions::default()
            .with_reliability(Reliability::Confidence(0.5))
            .with_primary_mode(PrimaryMode::Mean);
        let bill = estimate_bill("20Z00", 1.0, &options).unwrap();
        assert_eq!(bill.primary_mode, PrimaryMode::Mean);
        assert_eq!(bill.reliability, None);
        assert_eq!(bill.required_hashrate_primary, bill.required_hashrate_mean);

        let options = EstimateOptions::default().with_primary_mode(PrimaryMode::Quantile);
        let bill = estimate_bill("20Z00", 1.0, &options).unwrap();
        assert_eq!(bill.primary_mode, PrimaryMode::Quantile);
    }

    #[test]
    fn test_probability_precision() {
        let options = EstimateOptions::default().with_probability_precision(2);
        let bill = estimate_bill(33.537812, 5.0, &options).unwrap();
        assert_eq!(bill.probability_display, "1 / 2^33.54");
    }

    #[test]
    fn test_bill_rejects_zero_seconds() {
        assert!(matches!(
            estimate_bill("20Z00", 0.0, &EstimateOptions::default()),
            Err(SharenoteError::InvalidArgument(_))
        ));
        assert!(plan_sharenote("5 GH/s", 0.0, &EstimateOptions::default()).is_err());
    }

    #[test]
    fn test_plan_from_text() {
        let plan = plan_sharenote("5 GH/s", 5.0, &EstimateOptions::default()).unwrap();
        assert_eq!(plan.input_hashrate, 5e9);
        assert_eq!(plan.input_hashrate_human.display, "5.00 GH/s");
        assert_eq!(plan.note, plan.bill.note);
        // the planned note is exactly reachable at the input rate
        assert!((plan.bill.required_hashrate_primary / 5e9 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_plan_with_reliability_is_lighter() {
        let mean = plan_sharenote(5e9, 5.0, &EstimateOptions::default()).unwrap();
        let options = EstimateOptions::default().with_reliability(ReliabilityId::P99);
        let reliable = plan_sharenote(5e9, 5.0, &options).unwrap();

        assert!(reliable.note.z_bits() < mean.note.z_bits());
        assert!((reliable.bill.required_hashrate_primary / 5e9 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bill_serializes_camel_case() {
        let options = EstimateOptions::default().with_reliability(ReliabilityId::P90);
        let bill = estimate_bill("20Z10", 10.0, &options).unwrap();
        let json = serde_json::to_value(&bill).unwrap();

        assert_eq!(json["note"]["label"], "20Z10");
        assert_eq!(json["primaryMode"], "quantile");
        assert_eq!(json["reliability"]["id"], "p90");
        assert_eq!(json["requiredHashrateMeanHuman"]["unit"], "KH/s");
        assert!(json["probabilityPerHash"].as_f64().is_some());
    }
}
