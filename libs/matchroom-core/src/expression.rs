//! Arithmetic expressions printed on cards.
//!
//! # Format
//! ```text
//! 7
//! 3 + 4
//! 9 - 2
//! 2 × 6
//! 12 ÷ 3
//! ```
//!
//! A label is either a non-negative integer literal or one binary operation
//! between two literals. `x`/`*` and `/` are accepted as aliases for `×` and `÷`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operator used on cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// Symbol printed on cards.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '×',
            Self::Div => '÷',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' | '−' => Some(Self::Sub),
            '×' | 'x' | 'X' | '*' => Some(Self::Mul),
            '÷' | '/' => Some(Self::Div),
            _ => None,
        }
    }

    /// Apply the operator. Overflow, division by zero and inexact division
    /// yield `None`.
    pub fn apply(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            Self::Add => lhs.checked_add(rhs),
            Self::Sub => lhs.checked_sub(rhs),
            Self::Mul => lhs.checked_mul(rhs),
            Self::Div => {
                if rhs == 0 || lhs % rhs != 0 {
                    None
                } else {
                    Some(lhs / rhs)
                }
            }
        }
    }
}

/// A single binary expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expression {
    pub lhs: i64,
    pub op: Operator,
    pub rhs: i64,
}

impl Expression {
    pub fn new(lhs: i64, op: Operator, rhs: i64) -> Self {
        Self { lhs, op, rhs }
    }

    pub fn value(&self) -> Option<i64> {
        self.op.apply(self.lhs, self.rhs)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op.symbol(), self.rhs)
    }
}

/// Evaluate a card label. Returns `None` for anything that is not a
/// well-formed literal or binary expression.
pub fn evaluate_label(label: &str) -> Option<i64> {
    let mut cursor = Cursor::new(label);
    let lhs = cursor.number()?;

    if cursor.is_done() {
        return Some(lhs);
    }

    let op = cursor.operator()?;
    let rhs = cursor.number()?;
    if !cursor.is_done() {
        return None;
    }

    op.apply(lhs, rhs)
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn number(&mut self) -> Option<i64> {
        let s = self.rest.trim_start();
        let end = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        if end == 0 {
            return None;
        }
        let value = s[..end].parse().ok()?;
        self.rest = &s[end..];
        Some(value)
    }

    fn operator(&mut self) -> Option<Operator> {
        let s = self.rest.trim_start();
        let c = s.chars().next()?;
        let op = Operator::from_symbol(c)?;
        self.rest = &s[c.len_utf8()..];
        Some(op)
    }

    fn is_done(&self) -> bool {
        self.rest.trim().is_empty()
    }
}
