//! Netlist validation and connectivity checks.

use std::collections::{HashMap, HashSet};

use super::{Netlist, Node};
use crate::components::{Resistor, VoltageSource};
use crate::error::{CircuitError, Result};

/// Validate components before they become a [`Netlist`].
///
/// Checks:
/// - At least one component exists
/// - No duplicate component names
/// - Resistances are finite and positive, source values are finite and
///   phasor magnitudes non-negative
/// - Some component touches ground
pub fn validate_components(resistors: &[Resistor], sources: &[VoltageSource]) -> Result<()> {
    if resistors.is_empty() && sources.is_empty() {
        return Err(CircuitError::EmptyCircuit);
    }

    let mut seen = HashSet::new();
    let names = resistors
        .iter()
        .map(|r| r.name.as_str())
        .chain(sources.iter().map(|v| v.name.as_str()));
    for name in names {
        if !seen.insert(name) {
            return Err(CircuitError::DuplicateComponent {
                name: name.to_string(),
            });
        }
    }

    for r in resistors {
        if !r.has_valid_resistance() {
            return Err(CircuitError::malformed(
                &r.name,
                format!("has invalid resistance {} (must be positive)", r.resistance),
            ));
        }
    }

    for v in sources {
        if let Some(problem) = v.value_problem() {
            return Err(CircuitError::malformed(&v.name, problem));
        }
    }

    let touches_ground = resistors
        .iter()
        .flat_map(|r| r.nodes.iter())
        .chain(sources.iter().flat_map(|v| v.nodes.iter()))
        .any(Node::is_ground);
    if !touches_ground {
        return Err(CircuitError::MissingGround);
    }

    Ok(())
}

/// Nodes with no path to ground through any component, in unknown order.
///
/// Such a node has no reference for its voltage and makes the MNA system
/// singular.
pub fn floating_nodes(netlist: &Netlist) -> Vec<Node> {
    let mut adjacency: HashMap<&Node, Vec<&Node>> = HashMap::new();
    let edges = netlist
        .resistors()
        .iter()
        .map(|r| &r.nodes)
        .chain(netlist.sources().iter().map(|v| &v.nodes));
    for [a, b] in edges {
        adjacency.entry(a).or_default().push(b);
        adjacency.entry(b).or_default().push(a);
    }

    let mut reached: HashSet<&Node> = HashSet::new();
    let mut stack = vec![&Node::Ground];
    while let Some(node) = stack.pop() {
        if !reached.insert(node) {
            continue;
        }
        if let Some(neighbours) = adjacency.get(node) {
            stack.extend(neighbours.iter().copied().filter(|n| !reached.contains(*n)));
        }
    }

    netlist
        .nodes()
        .iter()
        .filter(|n| !reached.contains(n))
        .cloned()
        .collect()
}
