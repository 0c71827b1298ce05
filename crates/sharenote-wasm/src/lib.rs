//! WebAssembly bindings for the Sharenote library.
//!
//! Exposes note construction, probability math, compact target conversion,
//! note arithmetic and hashrate display to JavaScript. Note-like arguments
//! accept a label string, a zBits number, a `{ z, cents }` object or a note
//! object returned by another call.

use wasm_bindgen::prelude::*;

pub mod api;
pub mod convert;

/// Initialize the WASM module with better panic messages.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Log to the browser console.
#[wasm_bindgen(js_name = consoleLog)]
pub fn console_log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}
