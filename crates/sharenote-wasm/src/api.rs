//! JavaScript-facing functions.
//!
//! Every function resolves its note-like arguments once, calls into
//! `sharenote_core` and returns plain JS values. Errors are thrown as JS
//! `Error`s whose `name` is the error kind, e.g. `InvalidLabel`.

use core::cmp::Ordering;

use sharenote_core as core_api;
use sharenote_core::{reliability_levels, Sharenote};
use wasm_bindgen::prelude::*;

use crate::convert::{estimate_options, hashrate_input, js_error, note_inputs, note_input, to_js};

fn note_to_js(note: Sharenote) -> Result<JsValue, JsValue> {
    to_js(&note)
}

fn resolve(value: JsValue) -> Result<Sharenote, JsValue> {
    core_api::ensure_note(note_input(value)?).map_err(js_error)
}

/// Normalize any note-like value into a note object.
#[wasm_bindgen(js_name = ensureNote)]
pub fn ensure_note(input: JsValue) -> Result<JsValue, JsValue> {
    note_to_js(resolve(input)?)
}

/// Build a note from a whole exponent and cents.
#[wasm_bindgen(js_name = noteFromComponents)]
pub fn note_from_components(z: f64, cents: f64) -> Result<JsValue, JsValue> {
    note_to_js(Sharenote::from_components(z, cents).map_err(js_error)?)
}

/// Build a note from a continuous exponent.
#[wasm_bindgen(js_name = noteFromZBits)]
pub fn note_from_z_bits(z_bits: f64) -> Result<JsValue, JsValue> {
    note_to_js(Sharenote::from_z_bits(z_bits).map_err(js_error)?)
}

/// Parse a label such as `33Z53`.
#[wasm_bindgen(js_name = parseLabel)]
pub fn parse_label(text: &str) -> Result<JsValue, JsValue> {
    note_to_js(core_api::parse_label(text).map_err(js_error)?)
}

/// Render components as a canonical label.
#[wasm_bindgen(js_name = toLabel)]
pub fn to_label(z: f64, cents: f64) -> Result<String, JsValue> {
    Ok(Sharenote::from_components(z, cents).map_err(js_error)?.label())
}

#[wasm_bindgen(js_name = probabilityPerHash)]
pub fn probability_per_hash(note: JsValue) -> Result<f64, JsValue> {
    core_api::probability_per_hash(resolve(note)?).map_err(js_error)
}

#[wasm_bindgen(js_name = expectedHashes)]
pub fn expected_hashes(note: JsValue) -> Result<f64, JsValue> {
    core_api::expected_hashes(resolve(note)?).map_err(js_error)
}

#[wasm_bindgen(js_name = requiredHashrate)]
pub fn required_hashrate(note: JsValue, seconds: f64, multiplier: f64) -> Result<f64, JsValue> {
    core_api::required_hashrate(resolve(note)?, seconds, multiplier).map_err(js_error)
}

#[wasm_bindgen(js_name = requiredHashrateMean)]
pub fn required_hashrate_mean(note: JsValue, seconds: f64) -> Result<f64, JsValue> {
    core_api::required_hashrate_mean(resolve(note)?, seconds).map_err(js_error)
}

#[wasm_bindgen(js_name = requiredHashrateQuantile)]
pub fn required_hashrate_quantile(note: JsValue, seconds: f64, confidence: f64) -> Result<f64, JsValue> {
    core_api::required_hashrate_quantile(resolve(note)?, seconds, confidence).map_err(js_error)
}

/// Heaviest exponent reachable at a rate; `multiplier` defaults to 1.
#[wasm_bindgen(js_name = maxZBitsForHashrate)]
pub fn max_z_bits_for_hashrate(hashrate: f64, seconds: f64, multiplier: Option<f64>) -> Result<f64, JsValue> {
    core_api::max_z_bits_for_hashrate(hashrate, seconds, multiplier.unwrap_or(1.0)).map_err(js_error)
}

/// Heaviest note reachable at a rate. `options` takes `reliability` and `multiplier`.
#[wasm_bindgen(js_name = noteFromHashrate)]
pub fn note_from_hashrate(hashrate: JsValue, seconds: f64, options: JsValue) -> Result<JsValue, JsValue> {
    let rate = core_api::parse_hashrate(hashrate_input(hashrate)?).map_err(js_error)?;
    let options = estimate_options(options)?;
    let note = core_api::note_from_hashrate(rate, seconds, options.reliability, options.multiplier)
        .map_err(js_error)?;
    note_to_js(note)
}

/// Decode a compact "nBits" hex string.
#[wasm_bindgen(js_name = nbitsToSharenote)]
pub fn nbits_to_sharenote(hex: &str) -> Result<JsValue, JsValue> {
    note_to_js(core_api::note_from_compact(hex).map_err(js_error)?)
}

/// Encode a note's target as compact "nBits" hex.
#[wasm_bindgen(js_name = sharenoteToNbits)]
pub fn sharenote_to_nbits(note: JsValue) -> Result<String, JsValue> {
    core_api::compact_for_note(resolve(note)?).map_err(js_error)
}

/// The note's full target as lowercase hex, zero-padded to 64 digits.
#[wasm_bindgen(js_name = targetHex)]
pub fn target_hex(note: JsValue) -> Result<String, JsValue> {
    let target = core_api::target_for(resolve(note)?).map_err(js_error)?;
    Ok(format!("{:064x}", target))
}

#[wasm_bindgen(js_name = combineNotesSerial)]
pub fn combine_notes_serial(notes: JsValue) -> Result<JsValue, JsValue> {
    note_to_js(core_api::combine_serial(note_inputs(notes)?).map_err(js_error)?)
}

#[wasm_bindgen(js_name = noteDifference)]
pub fn note_difference(a: JsValue, b: JsValue) -> Result<JsValue, JsValue> {
    note_to_js(core_api::note_difference(resolve(a)?, resolve(b)?).map_err(js_error)?)
}

#[wasm_bindgen(js_name = scaleNote)]
pub fn scale_note(note: JsValue, factor: f64) -> Result<JsValue, JsValue> {
    note_to_js(core_api::scale_note(resolve(note)?, factor).map_err(js_error)?)
}

#[wasm_bindgen(js_name = divideNotes)]
pub fn divide_notes(numerator: JsValue, denominator: JsValue) -> Result<f64, JsValue> {
    core_api::divide_notes(resolve(numerator)?, resolve(denominator)?).map_err(js_error)
}

/// Compare by label components: 1 if `a` is rarer, -1 if `b` is, else 0.
#[wasm_bindgen(js_name = compareNotes)]
pub fn compare_notes(a: JsValue, b: JsValue) -> Result<i32, JsValue> {
    let ordering = core_api::compare_notes(resolve(a)?, resolve(b)?).map_err(js_error)?;
    Ok(match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    })
}

#[wasm_bindgen(js_name = parseHashrate)]
pub fn parse_hashrate(input: JsValue) -> Result<f64, JsValue> {
    core_api::parse_hashrate(hashrate_input(input)?).map_err(js_error)
}

#[wasm_bindgen(js_name = humanHashrate)]
pub fn human_hashrate(hashrate: f64, precision: Option<usize>) -> Result<JsValue, JsValue> {
    to_js(&core_api::human_hashrate(hashrate, precision).map_err(js_error)?)
}

#[wasm_bindgen(js_name = humanHashes)]
pub fn human_hashes(count: f64, precision: Option<usize>) -> Result<JsValue, JsValue> {
    to_js(&core_api::human_hashes(count, precision).map_err(js_error)?)
}

/// Bill a note over `seconds`.
///
/// `options`: `{ reliability?: "p95" | 0.95, multiplier?, primaryMode?, probabilityPrecision? }`
#[wasm_bindgen(js_name = estimateBill)]
pub fn estimate_bill(note: JsValue, seconds: f64, options: JsValue) -> Result<JsValue, JsValue> {
    let note = resolve(note)?;
    let options = estimate_options(options)?;
    to_js(&core_api::estimate_bill(note, seconds, &options).map_err(js_error)?)
}

/// Plan the heaviest note a hashrate reaches in `seconds`.
#[wasm_bindgen(js_name = planSharenote)]
pub fn plan_sharenote(hashrate: JsValue, seconds: f64, options: JsValue) -> Result<JsValue, JsValue> {
    let hashrate = hashrate_input(hashrate)?;
    let options = estimate_options(options)?;
    to_js(&core_api::plan_sharenote(hashrate, seconds, &options).map_err(js_error)?)
}

/// The reliability level catalog.
#[wasm_bindgen(js_name = reliabilityLevels)]
pub fn reliability_levels_js() -> Result<JsValue, JsValue> {
    to_js(&reliability_levels())
}
