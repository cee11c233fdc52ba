//! # Phasor Core
//!
//! A linear circuit solver for DC and single-frequency AC (phasor) netlists.
//!
//! This library provides:
//! - A parser for a SPICE-like netlist of resistors and voltage sources
//! - Netlist validation (values, names, ground reference, connectivity)
//! - Modified Nodal Analysis (MNA) assembly and direct LU solve, generic
//!   over real (DC) and complex (AC) arithmetic
//! - Node voltages, source currents and resistor currents, with a text
//!   report for presentation
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Parser for the netlist text format
//! - [`circuit`] - Netlist representation and validation
//! - [`components`] - Resistor and voltage source models
//! - [`solver`] - MNA matrix assembly and numerical solving
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! RUST_LOG=debug phasor divider.txt --mode auto
//! ```
//!
//! ### Library
//!
//! ```
//! use phasor_core::{circuit::Node, dsl, Simulator};
//!
//! let netlist = dsl::parse_netlist("V1 1 0 10\nR1 1 2 1k\nR2 2 0 2k").unwrap();
//! let solution = Simulator::new().solve(&netlist).unwrap();
//! let v2 = solution.as_dc().unwrap().node_voltage(&Node::Index(2)).unwrap();
//! assert!((v2 - 20.0 / 3.0).abs() < 1e-9);
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { simulate } from 'phasor_core';
//!
//! const report = simulate("V1 1 0 15∠45\nR1 1 2 1k\nR2 2 0 2k", "auto");
//! ```
//!
//! ## Solution Method
//!
//! For a netlist with `n` non-ground nodes and `m` voltage sources:
//!
//! 1. Assemble the `(n+m)×(n+m)` system matrix A and source vector z
//! 2. Factor A by LU with partial pivoting, rejecting vanishing pivots
//! 3. Solve Ax = z for node voltages and source branch currents
//! 4. Derive each resistor current from its node voltages
//!
//! A netlist with any phasor source (`magnitude∠phase`, phase in degrees)
//! is solved in complex arithmetic; otherwise in real arithmetic.

pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod solver;

// Re-export main types for convenience
pub use circuit::Netlist;
pub use error::{CircuitError, Result};
pub use solver::{Simulator, SimulatorConfig, Solution};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::simulate;

/// Solve a netlist with the default configuration.
pub fn solve(netlist: &Netlist) -> Result<Solution> {
    Simulator::new().solve(netlist)
}
