//! Error types for the Phasor circuit solver.
//!
//! This module provides a unified error type [`CircuitError`] that covers
//! all error conditions that can occur during netlist parsing, netlist
//! validation, and solving.

use thiserror::Error;

/// Result type alias using [`CircuitError`].
pub type Result<T> = std::result::Result<T, CircuitError>;

/// Unified error type for all Phasor operations.
#[derive(Error, Debug)]
pub enum CircuitError {
    // ============ Netlist Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    // ============ Malformed Netlist Errors ============
    /// Invalid component definition coming from netlist text
    #[error("Invalid component '{name}' at line {line}: {message}")]
    InvalidComponent {
        name: String,
        line: usize,
        message: String,
    },

    /// Component with an out-of-range or non-finite value
    #[error("Malformed netlist: component '{component}' {message}")]
    MalformedNetlist { component: String, message: String },

    /// Netlist without any resistor or voltage source
    #[error("Malformed netlist: circuit has no components")]
    EmptyCircuit,

    /// No component touches the reference node
    #[error("Malformed netlist: circuit has no ground node (use '0' or 'GND')")]
    MissingGround,

    /// Duplicate component name
    #[error("Malformed netlist: duplicate component name '{name}'")]
    DuplicateComponent { name: String },

    // ============ Solve Errors ============
    /// MNA matrix is singular and cannot be solved
    #[error(
        "Singular system at unknown {unknown} - circuit may have a floating node or a voltage source loop{}",
        format_floating(.floating_nodes)
    )]
    SingularSystem {
        unknown: String,
        floating_nodes: Vec<String>,
    },

    /// Real (DC) arithmetic requested for a netlist containing phasor sources
    #[error("Source '{source_name}' is a phasor and cannot be solved in DC mode")]
    DomainMismatch { source_name: String },

    // ============ I/O Errors ============
    /// Error reading netlist file
    #[error("Failed to read netlist file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ WASM Errors ============
    /// Unrecognized analysis mode passed from JavaScript
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

fn format_floating(nodes: &[String]) -> String {
    if nodes.is_empty() {
        String::new()
    } else {
        format!(" (no path to ground: {})", nodes.join(", "))
    }
}

impl CircuitError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid component error
    pub fn invalid_component(name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidComponent {
            name: name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a malformed netlist error
    pub fn malformed(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedNetlist {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a structural problem in the netlist itself.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::InvalidComponent { .. }
                | Self::MalformedNetlist { .. }
                | Self::EmptyCircuit
                | Self::MissingGround
                | Self::DuplicateComponent { .. }
        )
    }

    /// Whether this error reports an unsolvable (singular) MNA system.
    pub fn is_singular(&self) -> bool {
        matches!(self, Self::SingularSystem { .. })
    }
}
