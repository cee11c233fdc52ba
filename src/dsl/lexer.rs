//! Lexer (tokenizer) for the netlist format.

use crate::error::{CircuitError, Result};

/// Separator between phasor magnitude and phase.
pub const ANGLE_SYMBOL: char = '∠';

/// Optional marker after a phase angle.
pub const DEGREE_SYMBOL: char = '°';

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters)
    pub column: usize,
}

/// Token types in the netlist format.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// An identifier (component name, node name)
    Identifier,
    /// A number (integer or floating point, possibly with suffix)
    Number,
    /// Phasor separator '∠'
    Angle,
    /// Degree marker '°'
    Degree,
    /// Any other character; only an error inside a component line
    Symbol,
    /// Newline
    Newline,
    /// End of file
    Eof,
}

/// Lexer for tokenizing netlist input.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let ch = match self.chars.peek().copied() {
            Some(ch) => ch,
            None => return Ok(self.token(TokenKind::Eof, String::new(), self.line, self.column)),
        };

        let start_column = self.column;
        let start_line = self.line;

        let token = match ch {
            '\n' => {
                self.advance();
                self.token(TokenKind::Newline, "\n".to_string(), start_line, start_column)
            }
            ANGLE_SYMBOL => {
                self.advance();
                self.token(TokenKind::Angle, ch.to_string(), start_line, start_column)
            }
            DEGREE_SYMBOL => {
                self.advance();
                self.token(TokenKind::Degree, ch.to_string(), start_line, start_column)
            }
            '-' | '+' | '.' | '0'..='9' => {
                let (kind, text) = self.read_number(start_line, start_column)?;
                self.token(kind, text, start_line, start_column)
            }
            _ if ch.is_alphabetic() || ch == '_' => {
                let text = self.read_identifier();
                self.token(TokenKind::Identifier, text, start_line, start_column)
            }
            _ => {
                self.advance();
                self.token(TokenKind::Symbol, ch.to_string(), start_line, start_column)
            }
        };

        Ok(token)
    }

    /// Peek at the next significant character, skipping blanks and comments.
    pub fn peek_char(&mut self) -> Option<char> {
        self.skip_whitespace_and_comments();
        self.chars.peek().copied()
    }

    /// Consume raw characters up to, but not including, the next newline.
    ///
    /// Nothing is tokenized, so the skipped text cannot raise a lexer error.
    pub fn skip_to_eol(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Current line number (1-indexed).
    pub fn line(&self) -> usize {
        self.line
    }

    fn token(&self, kind: TokenKind, text: String, line: usize, column: usize) -> Token {
        Token {
            kind,
            text,
            line,
            column,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else if ch == '#' || ch == ';' {
                self.skip_to_eol();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn read_digits(&mut self, text: &mut String) -> usize {
        let mut count = 0;
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    /// Read a number; a sign or dot without digits is a `Symbol`.
    fn read_number(&mut self, line: usize, column: usize) -> Result<(TokenKind, String)> {
        let mut text = String::new();

        // Optional sign
        if let Some(&ch) = self.chars.peek() {
            if ch == '-' || ch == '+' {
                text.push(ch);
                self.advance();
            }
        }

        // Integer part
        let mut digits = self.read_digits(&mut text);

        // Decimal part
        if let Some(&'.') = self.chars.peek() {
            text.push('.');
            self.advance();
            digits += self.read_digits(&mut text);
        }

        if digits == 0 {
            return Ok((TokenKind::Symbol, text));
        }

        // Exponent part
        if let Some(&ch) = self.chars.peek() {
            if ch == 'e' || ch == 'E' {
                text.push(ch);
                self.advance();
                if let Some(&sign) = self.chars.peek() {
                    if sign == '-' || sign == '+' {
                        text.push(sign);
                        self.advance();
                    }
                }
                if self.read_digits(&mut text) == 0 {
                    return Err(CircuitError::lexer(
                        line,
                        column,
                        format!("missing exponent digits in number '{}'", text),
                    ));
                }
            }
        }

        // Unit suffix (p, n, u, m, k, M, G)
        if let Some(&ch) = self.chars.peek() {
            if matches!(ch, 'p' | 'n' | 'u' | 'µ' | 'm' | 'k' | 'K' | 'M' | 'G') {
                text.push(ch);
                self.advance();
            }
        }

        Ok((TokenKind::Number, text))
    }
}

/// Parse a number string with optional unit suffix.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(last) = text.chars().last() {
        let mult = match last {
            'p' => 1e-12,
            'n' => 1e-9,
            'u' | 'µ' => 1e-6,
            'm' => 1e-3,
            'k' | 'K' => 1e3,
            'M' => 1e6,
            'G' => 1e9,
            _ => 1.0,
        };
        if mult != 1.0 {
            (&text[..text.len() - last.len_utf8()], mult)
        } else {
            (text, 1.0)
        }
    } else {
        (text, 1.0)
    };

    num_str.parse::<f64>().ok().map(|v| v * multiplier)
}
