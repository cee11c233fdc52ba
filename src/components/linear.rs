//! Linear passive components.

use crate::circuit::Node;

/// A resistor component.
///
/// Current through the resistor is positive when flowing from `nodes[0]`
/// to `nodes[1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    pub name: String,
    pub nodes: [Node; 2], // [a, b]
    /// Resistance in ohms
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    ///
    /// The value is checked when the resistor becomes part of a
    /// [`Netlist`](crate::circuit::Netlist).
    pub fn new(name: impl Into<String>, a: impl Into<Node>, b: impl Into<Node>, resistance: f64) -> Self {
        Self {
            name: name.into(),
            nodes: [a.into(), b.into()],
            resistance,
        }
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }

    /// Whether the resistance is a finite, strictly positive number.
    pub fn has_valid_resistance(&self) -> bool {
        self.resistance.is_finite() && self.resistance > 0.0
    }
}
