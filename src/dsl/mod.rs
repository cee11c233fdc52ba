//! Parser for the netlist text format.
//!
//! The format is line-oriented, one component per line.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist     = { line }
//! line        = comment | component | ignored | empty
//! comment     = ('#' | ';') { any_char }
//! component   = name node node value
//!
//! name        = ('R' | 'V') { letter | digit | '_' }
//! node        = identifier | integer          ; "0" and "GND" are ground
//! value       = number [ '∠' number [ '°' ] ] ; phase in degrees
//!
//! number      = ['-'|'+'] digit* ['.' digit*] [('e'|'E') ['-'|'+'] digit+] [unit_suffix]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! Lines whose first field does not start with `R` or `V` are ignored.
//!
//! # Example
//!
//! ```text
//! # Resistive divider driven by an AC phasor
//! V1 1 0 15∠45
//! R1 1 2 1k
//! R2 2 0 2k
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind, ANGLE_SYMBOL, DEGREE_SYMBOL};
pub use parser::Parser;

use crate::circuit::Netlist;
use crate::error::Result;

/// Parse netlist text into an AST.
pub fn parse(input: &str) -> Result<NetlistAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse and validate netlist text in one step.
pub fn parse_netlist(input: &str) -> Result<Netlist> {
    Netlist::from_ast(parse(input)?)
}

/// Parse a netlist file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<Netlist> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::CircuitError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_netlist(&content)
}
