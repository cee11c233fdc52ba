//! MNA (Modified Nodal Analysis) solver.
//!
//! This module provides the numerical engine for circuit solving.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = z where:
//! - x contains node voltages and voltage source branch currents
//! - A is the conductance/incidence matrix
//! - z is the source vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ 0 ]
//! [ C   D ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the conductance matrix (node equations)
//! - B connects voltage sources to nodes, C = Bᵗ
//! - D is 0 for ideal voltage sources
//! - v is the vector of node voltages
//! - j is the vector of voltage source currents
//! - e is the vector of voltage source values
//!
//! The same assembly and LU solve run over `f64` for DC netlists and
//! `Complex64` for AC phasor netlists; see [`Scalar`].

mod mna;
pub mod report;
mod result;
mod scalar;
mod simulator;

pub use mna::{source_scalar, stamp_netlist, MnaMatrix, SingularPivot};
pub use result::{polar, NumericWarning, SimulationResult, Solution};
pub use scalar::Scalar;
pub use simulator::{AnalysisMode, Simulator, SimulatorConfig};

/// Relative pivot threshold below which the MNA matrix is treated as singular.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-13;

/// Pivot-ratio condition estimate above which results carry a warning.
pub const DEFAULT_CONDITION_LIMIT: f64 = 1e12;
