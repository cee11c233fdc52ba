//! Core types for circuit representation.

use std::fmt;

/// An electrical junction in the netlist.
///
/// Ordering is the ordering of node-voltage unknowns in the MNA system:
/// ground first (never an unknown), then numeric ids ascending, then
/// labelled nodes in lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    /// The reference node, fixed at 0 V.
    Ground,
    /// A numbered node (non-zero).
    Index(u32),
    /// A named node such as `in` or `out`.
    Label(String),
}

impl Node {
    /// Parse a node identifier as it appears in a netlist.
    ///
    /// `0`, `GND` and `gnd` are ground; unsigned integers become
    /// [`Node::Index`]; anything else is a [`Node::Label`].
    pub fn parse(text: &str) -> Self {
        if text.eq_ignore_ascii_case("gnd") {
            return Node::Ground;
        }
        match text.parse::<u32>() {
            Ok(0) => Node::Ground,
            Ok(n) => Node::Index(n),
            Err(_) => Node::Label(text.to_string()),
        }
    }

    /// Check if this is the ground node.
    pub fn is_ground(&self) -> bool {
        matches!(self, Node::Ground)
    }
}

impl From<u32> for Node {
    fn from(n: u32) -> Self {
        if n == 0 {
            Node::Ground
        } else {
            Node::Index(n)
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::parse(text)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Ground => write!(f, "0"),
            Node::Index(n) => write!(f, "{}", n),
            Node::Label(name) => write!(f, "{}", name),
        }
    }
}

/// Scalar field a netlist is solved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Every source is a plain real value; solved with `f64`.
    Dc,
    /// At least one source is a phasor; solved with `Complex64`.
    Ac,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Dc => write!(f, "DC"),
            Domain::Ac => write!(f, "AC"),
        }
    }
}
