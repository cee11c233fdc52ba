//! Parser for the netlist format.

use tracing::debug;

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::error::{CircuitError, Result};

/// Parser for netlist text.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Result<Self> {
        let mut parser = Self {
            lexer,
            current: Token {
                kind: TokenKind::Eof,
                text: String::new(),
                line: 1,
                column: 1,
            },
        };
        parser.start_line()?;
        Ok(parser)
    }

    /// Parse the entire netlist.
    pub fn parse(&mut self) -> Result<NetlistAst> {
        let mut ast = NetlistAst::new();

        while self.current.kind != TokenKind::Eof {
            // Skip empty lines
            if self.current.kind == TokenKind::Newline {
                self.start_line()?;
                continue;
            }

            let component_type = match self.current.kind {
                TokenKind::Identifier => self
                    .current
                    .text
                    .chars()
                    .next()
                    .and_then(ComponentType::from_prefix),
                _ => None,
            };

            match component_type {
                Some(ct) => {
                    let component = self.parse_component(ct)?;
                    ast.components.push(component);
                }
                None => {
                    debug!(line = self.current.line, token = %self.current.text, "ignoring line");
                    self.skip_line()?;
                }
            }

            // Consume newline or EOF
            if self.current.kind == TokenKind::Newline {
                self.start_line()?;
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    /// Load the first token of the next line.
    ///
    /// A line whose first character cannot start a component is dropped
    /// unlexed, so directives like `.end` or rulers like `* ----` are
    /// never tokenized.
    fn start_line(&mut self) -> Result<()> {
        if let Some(ch) = self.lexer.peek_char() {
            if ch != '\n' && ComponentType::from_prefix(ch).is_none() {
                debug!(line = self.lexer.line(), "ignoring line");
                self.lexer.skip_to_eol();
            }
        }
        self.advance()
    }

    fn at_line_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Newline | TokenKind::Eof)
    }

    fn skip_line(&mut self) -> Result<()> {
        if !self.at_line_end() {
            self.lexer.skip_to_eol();
            self.advance()?;
        }
        Ok(())
    }

    fn parse_component(&mut self, component_type: ComponentType) -> Result<ComponentDef> {
        let name = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let expected_nodes = component_type.expected_node_count();
        let mut nodes = Vec::with_capacity(expected_nodes);

        while nodes.len() < expected_nodes && !self.at_line_end() {
            match self.current.kind {
                TokenKind::Identifier | TokenKind::Number => {
                    nodes.push(self.current.text.clone());
                    self.advance()?;
                }
                _ => {
                    return Err(CircuitError::invalid_component(
                        &name,
                        line,
                        format!("unexpected '{}' where a node was expected", self.current.text),
                    ));
                }
            }
        }

        let value = if self.at_line_end() {
            None
        } else {
            Some(self.parse_value_def(&name, line)?)
        };

        // Anything after the value is ignored
        if !self.at_line_end() {
            debug!(line, component = %name, "ignoring trailing fields");
            self.skip_line()?;
        }

        Ok(ComponentDef {
            component_type,
            name,
            nodes,
            value,
            line,
        })
    }

    /// value = number [ '∠' number [ '°' ] ]
    fn parse_value_def(&mut self, name: &str, line: usize) -> Result<ValueDef> {
        let magnitude = self.expect_number(name, line)?;

        if self.current.kind != TokenKind::Angle {
            return Ok(ValueDef::Real(magnitude));
        }
        self.advance()?;

        let phase_deg = self.expect_number(name, line)?;
        if self.current.kind == TokenKind::Degree {
            self.advance()?;
        }

        Ok(ValueDef::Phasor {
            magnitude,
            phase_deg,
        })
    }

    fn expect_number(&mut self, name: &str, line: usize) -> Result<f64> {
        if self.current.kind != TokenKind::Number {
            return Err(CircuitError::invalid_component(
                name,
                line,
                format!("expected a number, got '{}'", self.current.text.trim()),
            ));
        }
        let text = self.current.text.clone();
        let value = parse_value(&text).ok_or_else(|| {
            CircuitError::invalid_component(name, line, format!("invalid number: {}", text))
        })?;
        self.advance()?;
        Ok(value)
    }
}
