//! Solved circuit quantities.

use std::fmt;

use indexmap::IndexMap;
use num_complex::Complex64;

use super::scalar::Scalar;
use crate::circuit::{Domain, Node};

/// Advisory raised when a system is solvable but has lost precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericWarning {
    /// Pivot-ratio estimate of the condition number exceeded the limit.
    IllConditioned { estimate: f64, limit: f64 },
}

impl fmt::Display for NumericWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericWarning::IllConditioned { estimate, limit } => write!(
                f,
                "ill-conditioned system (condition estimate {:.2e} > {:.2e}); results may have lost precision",
                estimate, limit
            ),
        }
    }
}

/// Node voltages and branch currents of one solve.
///
/// Maps keep netlist order: nodes in unknown order, sources and resistors
/// in the order they were listed. Ground is not stored; its voltage is
/// reported as zero by [`SimulationResult::node_voltage`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult<T: Scalar> {
    /// Voltage of every non-ground node
    pub node_voltages: IndexMap<Node, T>,
    /// Current delivered by each voltage source, leaving its `+` terminal
    pub source_currents: IndexMap<String, T>,
    /// Current through each resistor from its first to its second node
    pub resistor_currents: IndexMap<String, T>,
    /// Precision advisories
    pub warnings: Vec<NumericWarning>,
}

/// Magnitude and phase in degrees of a solved value.
pub fn polar<T: Scalar>(value: T) -> (f64, f64) {
    (value.modulus(), value.arg().to_degrees())
}

impl<T: Scalar> SimulationResult<T> {
    /// Voltage at `node`; zero for ground, `None` for unknown nodes.
    pub fn node_voltage(&self, node: &Node) -> Option<T> {
        if node.is_ground() {
            Some(T::zero())
        } else {
            self.node_voltages.get(node).copied()
        }
    }

    /// Current delivered by the named voltage source.
    pub fn source_current(&self, name: &str) -> Option<T> {
        self.source_currents.get(name).copied()
    }

    /// Current through the named resistor.
    pub fn resistor_current(&self, name: &str) -> Option<T> {
        self.resistor_currents.get(name).copied()
    }

    /// Magnitude and phase (degrees) of a node voltage.
    pub fn node_polar(&self, node: &Node) -> Option<(f64, f64)> {
        self.node_voltage(node).map(polar)
    }

    /// Magnitude and phase (degrees) of a source current.
    pub fn source_polar(&self, name: &str) -> Option<(f64, f64)> {
        self.source_current(name).map(polar)
    }

    /// Magnitude and phase (degrees) of a resistor current.
    pub fn resistor_polar(&self, name: &str) -> Option<(f64, f64)> {
        self.resistor_current(name).map(polar)
    }

    /// Whether no precision advisory was raised.
    pub fn is_well_conditioned(&self) -> bool {
        self.warnings.is_empty()
    }
}

impl SimulationResult<Complex64> {
    /// Magnitude of a node voltage phasor.
    pub fn node_magnitude(&self, node: &Node) -> Option<f64> {
        self.node_polar(node).map(|(mag, _)| mag)
    }

    /// Phase of a node voltage phasor, in degrees.
    pub fn node_phase_deg(&self, node: &Node) -> Option<f64> {
        self.node_polar(node).map(|(_, phase)| phase)
    }

    /// Magnitude of a source current phasor.
    pub fn source_magnitude(&self, name: &str) -> Option<f64> {
        self.source_polar(name).map(|(mag, _)| mag)
    }

    /// Phase of a source current phasor, in degrees.
    pub fn source_phase_deg(&self, name: &str) -> Option<f64> {
        self.source_polar(name).map(|(_, phase)| phase)
    }

    /// Magnitude of a resistor current phasor.
    pub fn resistor_magnitude(&self, name: &str) -> Option<f64> {
        self.resistor_polar(name).map(|(mag, _)| mag)
    }

    /// Phase of a resistor current phasor, in degrees.
    pub fn resistor_phase_deg(&self, name: &str) -> Option<f64> {
        self.resistor_polar(name).map(|(_, phase)| phase)
    }
}

/// Result of a solve in the field the netlist was classified into.
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    /// Real-valued solution of a DC netlist
    Dc(SimulationResult<f64>),
    /// Phasor solution of an AC netlist
    Ac(SimulationResult<Complex64>),
}

impl Solution {
    /// The field this solution was computed in.
    pub fn domain(&self) -> Domain {
        match self {
            Solution::Dc(_) => Domain::Dc,
            Solution::Ac(_) => Domain::Ac,
        }
    }

    /// Precision advisories raised during the solve.
    pub fn warnings(&self) -> &[NumericWarning] {
        match self {
            Solution::Dc(r) => &r.warnings,
            Solution::Ac(r) => &r.warnings,
        }
    }

    /// The DC result, if this is a DC solution.
    pub fn as_dc(&self) -> Option<&SimulationResult<f64>> {
        match self {
            Solution::Dc(r) => Some(r),
            Solution::Ac(_) => None,
        }
    }

    /// The AC result, if this is an AC solution.
    pub fn as_ac(&self) -> Option<&SimulationResult<Complex64>> {
        match self {
            Solution::Ac(r) => Some(r),
            Solution::Dc(_) => None,
        }
    }
}
