//! Component models for circuit simulation.
//!
//! Two component kinds are supported:
//! - Linear: Resistor
//! - Sources: independent Voltage Source (DC value or phasor)
//!
//! Each component is stamped into the MNA matrix by the solver.

mod linear;
mod sources;

pub use linear::Resistor;
pub use sources::{SourceValue, VoltageSource};
