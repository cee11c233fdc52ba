//! Netlist model: validated components and the MNA unknown layout.

use std::collections::BTreeSet;

use super::types::{Domain, Node};
use super::validate::validate_components;
use crate::components::{Resistor, SourceValue, VoltageSource};
use crate::dsl::{ComponentDef, ComponentType, NetlistAst, ValueDef};
use crate::error::{CircuitError, Result};

/// A validated, immutable circuit ready for solving.
#[derive(Debug, Clone, PartialEq)]
pub struct Netlist {
    /// Resistors in netlist order
    resistors: Vec<Resistor>,

    /// Voltage sources in netlist order; source `k` owns branch `k`
    sources: Vec<VoltageSource>,

    /// Distinct non-ground nodes in unknown order
    nodes: Vec<Node>,

    /// Scalar field needed to solve this netlist
    domain: Domain,
}

impl Netlist {
    /// Build a netlist from components, validating every cross-reference.
    pub fn new(resistors: Vec<Resistor>, sources: Vec<VoltageSource>) -> Result<Self> {
        validate_components(&resistors, &sources)?;

        let nodes: BTreeSet<Node> = resistors
            .iter()
            .flat_map(|r| r.nodes.iter())
            .chain(sources.iter().flat_map(|v| v.nodes.iter()))
            .filter(|n| !n.is_ground())
            .cloned()
            .collect();

        let domain = if sources.iter().any(|v| v.value.is_phasor()) {
            Domain::Ac
        } else {
            Domain::Dc
        };

        Ok(Netlist {
            resistors,
            sources,
            nodes: nodes.into_iter().collect(),
            domain,
        })
    }

    /// Build a netlist from a parsed AST.
    pub fn from_ast(ast: NetlistAst) -> Result<Self> {
        let mut resistors = Vec::new();
        let mut sources = Vec::new();

        for def in ast.components {
            match def.component_type {
                ComponentType::Resistor => {
                    let [a, b] = resolve_nodes(&def)?;
                    let resistance = match def.value {
                        Some(ValueDef::Real(r)) => r,
                        Some(ValueDef::Phasor { .. }) => {
                            return Err(CircuitError::invalid_component(
                                &def.name,
                                def.line,
                                "resistance cannot be a phasor",
                            ))
                        }
                        None => {
                            return Err(CircuitError::invalid_component(
                                &def.name,
                                def.line,
                                "resistor requires a value",
                            ))
                        }
                    };
                    resistors.push(Resistor::new(def.name, a, b, resistance));
                }

                ComponentType::VoltageSource => {
                    let [pos, neg] = resolve_nodes(&def)?;
                    let value = match def.value {
                        Some(ValueDef::Real(v)) => SourceValue::Dc(v),
                        Some(ValueDef::Phasor {
                            magnitude,
                            phase_deg,
                        }) => SourceValue::phasor(magnitude, phase_deg),
                        None => {
                            return Err(CircuitError::invalid_component(
                                &def.name,
                                def.line,
                                "voltage source requires a value",
                            ))
                        }
                    };
                    sources.push(VoltageSource::new(def.name, pos, neg, value));
                }
            }
        }

        Self::new(resistors, sources)
    }

    /// Resistors in netlist order.
    pub fn resistors(&self) -> &[Resistor] {
        &self.resistors
    }

    /// Voltage sources in netlist order.
    pub fn sources(&self) -> &[VoltageSource] {
        &self.sources
    }

    /// Non-ground nodes in unknown order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Whether this netlist needs complex arithmetic.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Number of node-voltage unknowns.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of branch-current unknowns (one per voltage source).
    pub fn num_branches(&self) -> usize {
        self.sources.len()
    }

    /// Get the total size of the MNA solution vector.
    pub fn matrix_size(&self) -> usize {
        self.num_nodes() + self.num_branches()
    }

    /// Get the matrix index for a node voltage.
    /// Returns None for ground and for nodes not in this netlist.
    pub fn node_index(&self, node: &Node) -> Option<usize> {
        if node.is_ground() {
            None
        } else {
            self.nodes.binary_search(node).ok()
        }
    }

    /// Get the matrix index for the branch current of source `k`.
    pub fn branch_index(&self, k: usize) -> usize {
        self.num_nodes() + k
    }

    /// Find a node by its netlist spelling.
    pub fn find_node(&self, name: &str) -> Option<Node> {
        let node = Node::parse(name);
        if node.is_ground() || self.node_index(&node).is_some() {
            Some(node)
        } else {
            None
        }
    }

    /// Human-readable name of MNA unknown `index` (`V(n)` or `I(Vk)`).
    pub fn unknown_name(&self, index: usize) -> String {
        if index < self.num_nodes() {
            format!("V({})", self.nodes[index])
        } else {
            match self.sources.get(index - self.num_nodes()) {
                Some(v) => format!("I({})", v.name),
                None => format!("x[{}]", index),
            }
        }
    }

    /// Return a copy with every source value multiplied by `k`.
    pub fn with_scaled_sources(&self, k: f64) -> Result<Self> {
        let sources = self
            .sources
            .iter()
            .map(|v| VoltageSource {
                value: v.value.scaled(k),
                ..v.clone()
            })
            .collect();
        Self::new(self.resistors.clone(), sources)
    }
}

fn resolve_nodes(def: &ComponentDef) -> Result<[Node; 2]> {
    let expected = def.component_type.expected_node_count();
    if def.nodes.len() < expected {
        return Err(CircuitError::invalid_component(
            &def.name,
            def.line,
            format!("expected {} nodes, got {}", expected, def.nodes.len()),
        ));
    }
    Ok([Node::parse(&def.nodes[0]), Node::parse(&def.nodes[1])])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;

    fn divider() -> Netlist {
        Netlist::new(
            vec![Resistor::new("R1", "1", "2", 1000.0), Resistor::new("R2", "2", "0", 2000.0)],
            vec![VoltageSource::dc("V1", "1", "0", 10.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_unknown_layout() {
        let netlist = divider();
        assert_eq!(netlist.nodes(), &[Node::Index(1), Node::Index(2)]);
        assert_eq!(netlist.matrix_size(), 3);
        assert_eq!(netlist.node_index(&Node::Ground), None);
        assert_eq!(netlist.node_index(&Node::Index(2)), Some(1));
        assert_eq!(netlist.branch_index(0), 2);
        assert_eq!(netlist.unknown_name(1), "V(2)");
        assert_eq!(netlist.unknown_name(2), "I(V1)");
        assert_eq!(netlist.domain(), Domain::Dc);
    }

    #[test]
    fn test_node_order_is_sorted_not_first_appearance() {
        let netlist = dsl::parse_netlist("V1 out 0 1\nR1 out 10 1k\nR2 10 3 1k\nR3 3 0 1k").unwrap();
        assert_eq!(
            netlist.nodes(),
            &[Node::Index(3), Node::Index(10), Node::Label("out".to_string())]
        );
        assert_eq!(netlist.find_node("out"), Some(Node::Label("out".to_string())));
        assert_eq!(netlist.find_node("GND"), Some(Node::Ground));
        assert_eq!(netlist.find_node("missing"), None);
    }

    #[test]
    fn test_domain_classification() {
        let netlist = dsl::parse_netlist("V1 1 0 15∠0\nR1 1 0 1k").unwrap();
        assert_eq!(netlist.domain(), Domain::Ac);
    }

    #[test]
    fn test_from_ast_node_count() {
        let err = dsl::parse_netlist("V1 1 0 5\nR1 1").unwrap_err();
        assert!(matches!(
            err,
            CircuitError::InvalidComponent { ref name, line: 2, .. } if name == "R1"
        ));
    }

    #[test]
    fn test_from_ast_missing_value() {
        let err = dsl::parse_netlist("V1 1 0").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_phasor_resistance_rejected() {
        let err = dsl::parse_netlist("V1 1 0 1\nR1 1 0 1k∠30").unwrap_err();
        assert!(matches!(err, CircuitError::InvalidComponent { line: 2, .. }));
    }

    #[test]
    fn test_scaled_sources() {
        let scaled = divider().with_scaled_sources(3.0).unwrap();
        assert_eq!(scaled.sources()[0].value, SourceValue::Dc(30.0));
        assert_eq!(scaled.resistors(), divider().resistors());
    }
}
