//! Abstract Syntax Tree types for the netlist format.

/// Complete AST representation of a parsed netlist.
#[derive(Debug, Clone, Default)]
pub struct NetlistAst {
    /// All component instances, in file order
    pub components: Vec<ComponentDef>,
}

impl NetlistAst {
    /// Create a new empty netlist AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A component definition from the netlist.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDef {
    /// Component type (R or V)
    pub component_type: ComponentType,
    /// Unique component name, including its type prefix (e.g. `R1`)
    pub name: String,
    /// Connected node names
    pub nodes: Vec<String>,
    /// Component value (resistance or source value)
    pub value: Option<ValueDef>,
    /// Source line number for error reporting
    pub line: usize,
}

/// A literal value on a component line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueDef {
    /// Plain real number (after unit suffix scaling)
    Real(f64),
    /// `<magnitude>∠<phase_degrees>`
    Phasor { magnitude: f64, phase_deg: f64 },
}

/// Component types supported by the netlist format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    /// Resistor
    Resistor,
    /// Voltage Source
    VoltageSource,
}

impl ComponentType {
    /// Parse a component type from its netlist prefix.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix.to_ascii_uppercase() {
            'R' => Some(Self::Resistor),
            'V' => Some(Self::VoltageSource),
            _ => None,
        }
    }

    /// Get the expected number of nodes for this component type.
    pub fn expected_node_count(&self) -> usize {
        match self {
            Self::Resistor => 2,
            Self::VoltageSource => 2, // n+, n-
        }
    }
}
