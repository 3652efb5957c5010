//! Boolean "background" formulas over layer states.
//!
//! A symbol (`M`, `R`, `P`) is true when that layer is `Unchanged` for the
//! gene. Operators: `~` (not), `&` (and), `|` (or), parentheses for grouping.
//! Precedence is `~` > `&` > `|`; binary operators associate to the left.
//! Both the parenthesis/negation nesting and the depth of the parsed tree
//! are capped at `MAX_DEPTH`.

use std::fmt;

use thiserror::Error;

use crate::model::layers::{Layer, LayerCalls};

pub const DEFAULT_BACKGROUND: &str = "P|(M&R)";

pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionSyntaxError {
    #[error("background formula is empty")]
    Empty,
    #[error("unknown symbol '{symbol}' at position {position} (expected M, R or P)")]
    UnknownSymbol { symbol: char, position: usize },
    #[error("unbalanced parentheses: '(' at position {0} is never closed")]
    UnclosedParen(usize),
    #[error("unbalanced parentheses: unexpected ')' at position {0}")]
    UnexpectedCloseParen(usize),
    #[error("expected M, R, P, '~' or '(' at position {0}")]
    ExpectedOperand(usize),
    #[error("unexpected '{found}' at position {position}")]
    UnexpectedToken { found: char, position: usize },
    #[error("formula nests deeper than {} levels at position {0}", MAX_DEPTH)]
    TooDeep(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundExpr {
    Symbol(Layer),
    Not(Box<BackgroundExpr>),
    And(Box<BackgroundExpr>, Box<BackgroundExpr>),
    Or(Box<BackgroundExpr>, Box<BackgroundExpr>),
}

impl BackgroundExpr {
    pub fn parse(input: &str) -> Result<Self, ExpressionSyntaxError> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(ExpressionSyntaxError::Empty);
        }
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            end: input.chars().count(),
            nesting: 0,
        };
        let (expr, _) = parser.parse_or()?;
        if let Some(tok) = parser.peek() {
            return Err(match tok.kind {
                TokenKind::Close => ExpressionSyntaxError::UnexpectedCloseParen(tok.position),
                _ => ExpressionSyntaxError::UnexpectedToken {
                    found: tok.kind.as_char(),
                    position: tok.position,
                },
            });
        }
        Ok(expr)
    }

    pub fn evaluate(&self, calls: &LayerCalls) -> bool {
        match self {
            BackgroundExpr::Symbol(layer) => calls.is_unchanged(*layer),
            BackgroundExpr::Not(inner) => !inner.evaluate(calls),
            BackgroundExpr::And(lhs, rhs) => lhs.evaluate(calls) && rhs.evaluate(calls),
            BackgroundExpr::Or(lhs, rhs) => lhs.evaluate(calls) || rhs.evaluate(calls),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            BackgroundExpr::Or(..) => 1,
            BackgroundExpr::And(..) => 2,
            BackgroundExpr::Not(_) | BackgroundExpr::Symbol(_) => 3,
        }
    }

    fn fmt_operand(
        &self,
        f: &mut fmt::Formatter<'_>,
        parent: u8,
        right: bool,
    ) -> fmt::Result {
        // Right operands of equal precedence need parentheses to keep the
        // left-associative reading; `&` under `|` is bracketed for readability.
        let own = self.precedence();
        if own < parent || (right && own == parent && own < 3) || (parent == 1 && own == 2) {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for BackgroundExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundExpr::Symbol(layer) => write!(f, "{}", layer.symbol()),
            BackgroundExpr::Not(inner) => {
                f.write_str("~")?;
                inner.fmt_operand(f, 3, false)
            }
            BackgroundExpr::And(lhs, rhs) => {
                lhs.fmt_operand(f, 2, false)?;
                f.write_str("&")?;
                rhs.fmt_operand(f, 2, true)
            }
            BackgroundExpr::Or(lhs, rhs) => {
                lhs.fmt_operand(f, 1, false)?;
                f.write_str("|")?;
                rhs.fmt_operand(f, 1, true)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Symbol(Layer),
    Not,
    And,
    Or,
    Open,
    Close,
}

impl TokenKind {
    fn as_char(self) -> char {
        match self {
            TokenKind::Symbol(layer) => layer.symbol(),
            TokenKind::Not => '~',
            TokenKind::And => '&',
            TokenKind::Or => '|',
            TokenKind::Open => '(',
            TokenKind::Close => ')',
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Token {
    kind: TokenKind,
    position: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExpressionSyntaxError> {
    let mut tokens = Vec::new();
    for (position, c) in input.chars().enumerate() {
        let kind = match c {
            c if c.is_whitespace() => continue,
            '~' => TokenKind::Not,
            '&' => TokenKind::And,
            '|' => TokenKind::Or,
            '(' => TokenKind::Open,
            ')' => TokenKind::Close,
            other => match Layer::from_symbol(other) {
                Some(layer) => TokenKind::Symbol(layer),
                None => {
                    return Err(ExpressionSyntaxError::UnknownSymbol {
                        symbol: other,
                        position,
                    });
                }
            },
        };
        tokens.push(Token { kind, position });
    }
    Ok(tokens)
}

/// Depth of a node whose deepest child has depth `child`.
fn deeper(child: usize, position: usize) -> Result<usize, ExpressionSyntaxError> {
    let depth = child + 1;
    if depth > MAX_DEPTH {
        Err(ExpressionSyntaxError::TooDeep(position))
    } else {
        Ok(depth)
    }
}

/// Each `parse_*` returns the subtree and its depth.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    end: usize,
    nesting: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next_position(&self) -> usize {
        self.peek().map(|t| t.position).unwrap_or(self.end)
    }

    fn enter(&mut self, position: usize) -> Result<(), ExpressionSyntaxError> {
        self.nesting += 1;
        if self.nesting > MAX_DEPTH {
            return Err(ExpressionSyntaxError::TooDeep(position));
        }
        Ok(())
    }

    fn eat_operator(&mut self, kind: TokenKind) -> Option<usize> {
        let tok = self.peek().filter(|t| t.kind == kind)?;
        self.pos += 1;
        Some(tok.position)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().is_some_and(|t| t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Result<(BackgroundExpr, usize), ExpressionSyntaxError> {
        let (mut lhs, mut depth) = self.parse_and()?;
        while let Some(position) = self.eat_operator(TokenKind::Or) {
            let (rhs, rhs_depth) = self.parse_and()?;
            depth = deeper(depth.max(rhs_depth), position)?;
            lhs = BackgroundExpr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok((lhs, depth))
    }

    fn parse_and(&mut self) -> Result<(BackgroundExpr, usize), ExpressionSyntaxError> {
        let (mut lhs, mut depth) = self.parse_not()?;
        while let Some(position) = self.eat_operator(TokenKind::And) {
            let (rhs, rhs_depth) = self.parse_not()?;
            depth = deeper(depth.max(rhs_depth), position)?;
            lhs = BackgroundExpr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok((lhs, depth))
    }

    fn parse_not(&mut self) -> Result<(BackgroundExpr, usize), ExpressionSyntaxError> {
        if let Some(position) = self.eat_operator(TokenKind::Not) {
            self.enter(position)?;
            let (inner, depth) = self.parse_not()?;
            self.nesting -= 1;
            return Ok((BackgroundExpr::Not(Box::new(inner)), deeper(depth, position)?));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<(BackgroundExpr, usize), ExpressionSyntaxError> {
        let position = self.next_position();
        match self.peek().map(|t| t.kind) {
            Some(TokenKind::Symbol(layer)) => {
                self.pos += 1;
                Ok((BackgroundExpr::Symbol(layer), 0))
            }
            Some(TokenKind::Open) => {
                self.pos += 1;
                self.enter(position)?;
                let inner = self.parse_or()?;
                if !self.eat(TokenKind::Close) {
                    return Err(ExpressionSyntaxError::UnclosedParen(position));
                }
                self.nesting -= 1;
                Ok(inner)
            }
            Some(TokenKind::Close) => Err(ExpressionSyntaxError::UnexpectedCloseParen(position)),
            _ => Err(ExpressionSyntaxError::ExpectedOperand(position)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/background.rs"]
mod tests;
