//! Netlist representation and validation.
//!
//! This module provides the in-memory model of a parsed circuit. The
//! [`Netlist`] struct holds all components, the ordered set of non-ground
//! nodes, and the scalar [`Domain`] the circuit must be solved in.

mod netlist;
mod types;
mod validate;

pub use netlist::Netlist;
pub use types::*;
pub use validate::{floating_nodes, validate_components};
