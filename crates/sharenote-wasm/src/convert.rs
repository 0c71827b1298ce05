//! Conversions between JS values and core types.

use serde::{Deserialize, Serialize};
use sharenote_core::{
    EstimateOptions, HashrateInput, NoteInput, PrimaryMode, Reliability, ReliabilityId,
    SharenoteError,
};
use wasm_bindgen::prelude::*;

/// Serialize a value into a plain JS object.
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
}

/// Turn a core error into a JS `Error` named after its kind.
pub fn js_error(err: SharenoteError) -> JsValue {
    let error = js_sys::Error::new(&err.to_string());
    error.set_name(err.code());
    error.into()
}

fn unsupported(what: &str, err: serde_wasm_bindgen::Error) -> JsValue {
    js_error(SharenoteError::InvalidArgument(format!(
        "unsupported {}: {}",
        what, err
    )))
}

/// Note-like values as they arrive from JS.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsNoteInput {
    Label(String),
    Bits(f64),
    /// A note object from an earlier call; only its exponent is trusted
    Note {
        #[serde(rename = "zBits")]
        z_bits: f64,
    },
    Components {
        z: f64,
        #[serde(default)]
        cents: f64,
    },
}

impl From<JsNoteInput> for NoteInput {
    fn from(input: JsNoteInput) -> Self {
        match input {
            JsNoteInput::Label(label) => NoteInput::Label(label),
            JsNoteInput::Bits(z_bits) | JsNoteInput::Note { z_bits } => NoteInput::Bits(z_bits),
            JsNoteInput::Components { z, cents } => NoteInput::Components { z, cents },
        }
    }
}

/// Read one note-like value.
pub fn note_input(value: JsValue) -> Result<NoteInput, JsValue> {
    serde_wasm_bindgen::from_value::<JsNoteInput>(value)
        .map(NoteInput::from)
        .map_err(|e| unsupported("note input", e))
}

/// Read an array of note-like values.
pub fn note_inputs(value: JsValue) -> Result<Vec<NoteInput>, JsValue> {
    serde_wasm_bindgen::from_value::<Vec<JsNoteInput>>(value)
        .map(|inputs| inputs.into_iter().map(NoteInput::from).collect())
        .map_err(|e| unsupported("note list", e))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsHashrateInput {
    Value(f64),
    Text(String),
    Measured { value: f64, unit: String },
}

/// Read a hashrate given as a number, text or `{ value, unit }`.
pub fn hashrate_input(value: JsValue) -> Result<HashrateInput, JsValue> {
    let input = serde_wasm_bindgen::from_value::<JsHashrateInput>(value)
        .map_err(|e| unsupported("hashrate input", e))?;
    Ok(match input {
        JsHashrateInput::Value(value) => HashrateInput::Value(value),
        JsHashrateInput::Text(text) => HashrateInput::Text(text),
        JsHashrateInput::Measured { value, unit } => HashrateInput::Measured { value, unit },
    })
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsReliability {
    Id(String),
    Confidence(f64),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsEstimateOptions {
    reliability: Option<JsReliability>,
    multiplier: Option<f64>,
    primary_mode: Option<PrimaryMode>,
    probability_precision: Option<usize>,
}

/// Read estimate options; `undefined` and `null` mean defaults.
pub fn estimate_options(value: JsValue) -> Result<EstimateOptions, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(EstimateOptions::default());
    }

    let raw = serde_wasm_bindgen::from_value::<JsEstimateOptions>(value)
        .map_err(|e| unsupported("estimate options", e))?;

    let reliability = match raw.reliability {
        Some(JsReliability::Id(id)) => Some(Reliability::Level(
            id.parse::<ReliabilityId>().map_err(js_error)?,
        )),
        Some(JsReliability::Confidence(q)) => Some(Reliability::Confidence(q)),
        None => None,
    };

    Ok(EstimateOptions {
        reliability,
        multiplier: raw.multiplier,
        primary_mode: raw.primary_mode,
        probability_precision: raw.probability_precision,
    })
}
