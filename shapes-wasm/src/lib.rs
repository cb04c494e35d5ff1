//! WASM bindings for square/polygon intersection.
//!
//! Lets a browser client check a square against polygons it already holds, with the same
//! parsing and ray-casting rules the server applies on create.

use log::{error, info};
use shapes_core::{Polygon, Square};
use wasm_bindgen::prelude::*;
use wasm_bindgen_console_logger::DEFAULT_LOGGER;

/// Initializes the logging system for WASM.
///
/// Sets up console logging and panic hooks for better error reporting in the browser.
/// Should be called once at application startup.
#[wasm_bindgen]
pub fn init_logs() {
    match log::set_logger(&DEFAULT_LOGGER) {
        Ok(_) => info!("Initialized console.logger"),
        Err(e) => error!("failed to set console.logger: {}", e),
    };
    console_error_panic_hook::set_once();
}

/// Updates the log level filter.
///
/// # Arguments
/// * `level` - Log level string: "error", "warn", "info", "debug", or "trace".
///   Defaults to "info" if empty or null.
#[wasm_bindgen]
pub fn update_log_level(level: JsValue) -> Result<(), JsError> {
    let level: Option<String> = serde_wasm_bindgen::from_value(level)?;
    let level = shapes_core::parse_log_level(level.as_deref())?;
    log::set_max_level(level);
    Ok(())
}

/// Ids of the polygons with at least one vertex inside a square.
///
/// # Arguments
/// * `square` - `{ xPoints, yPoints }` coordinate text, e.g. `"0,10,10,0"`.
/// * `polygons` - Array of `{ id, xPoints, yPoints }`.
///
/// # Returns
/// The intersected polygon ids, in input order.
///
/// # Errors
/// If the square or any polygon has malformed coordinates.
#[wasm_bindgen]
pub fn intersected_polygons(square: JsValue, polygons: JsValue) -> Result<JsValue, JsError> {
    let square: Square = serde_wasm_bindgen::from_value(square)?;
    let polygons: Vec<Polygon> = serde_wasm_bindgen::from_value(polygons)?;
    let ids = shapes_core::intersected_polygons(&square, &polygons)?;
    Ok(serde_wasm_bindgen::to_value(&ids)?)
}
