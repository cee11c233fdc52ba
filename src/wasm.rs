//! WASM bindings for Phasor Core.
//!
//! This module provides JavaScript-friendly bindings for use in a browser
//! front-end that uploads a netlist and displays the result listing.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { simulate } from 'phasor_core';
//!
//! await init();
//!
//! const netlist = `
//!   V1 1 0 15∠45
//!   R1 1 2 1k
//!   R2 2 0 2k
//! `;
//!
//! try {
//!   output.textContent = simulate(netlist, "auto");
//! } catch (e) {
//!   output.textContent = `Error: ${e}`;
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::dsl;
use crate::error::CircuitError;
use crate::solver::{report, AnalysisMode, Simulator, SimulatorConfig};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Solve a netlist and return the text result listing.
///
/// # Arguments
/// * `netlist` - The circuit description, one component per line
/// * `mode` - `"auto"`, `"dc"` or `"ac"`
///
/// # Returns
/// The result listing, or an error message if the netlist is malformed or
/// the circuit cannot be solved.
#[wasm_bindgen]
pub fn simulate(netlist: &str, mode: &str) -> Result<String, JsValue> {
    let mode: AnalysisMode = mode
        .parse()
        .map_err(|message| CircuitError::WasmError { message })
        .map_err(to_js)?;

    let netlist = dsl::parse_netlist(netlist).map_err(to_js)?;
    let solution = Simulator::with_config(SimulatorConfig::new().with_mode(mode))
        .solve(&netlist)
        .map_err(to_js)?;

    Ok(report::render(&netlist, &solution))
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js(err: CircuitError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
