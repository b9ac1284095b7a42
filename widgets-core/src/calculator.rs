//! Four-function calculator driven by discrete button/keyboard events.
//!
//! The [`Calculator`] owns its state and only changes it through the input
//! operations. Every operation is total: a non-finite result moves the engine
//! into its error phase instead of returning an error.

use std::{convert::TryFrom, fmt, str::FromStr};

use thiserror::Error;

pub mod engine;
pub mod keymap;

pub use engine::{Calculator, CalculatorState, Display};

/// Text shown in the result line after a non-finite computation.
pub const ERROR_MARKER: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// Symbol used in the expression line.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
        }
    }

    pub const fn all() -> &'static [Operation] {
        &[Operation::Add, Operation::Subtract, Operation::Multiply, Operation::Divide]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown operator '{0}'. Supported operators: + - * /.")]
pub struct ParseOperationError(pub String);

impl TryFrom<&str> for Operation {
    type Error = ParseOperationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operation::Add),
            "-" | "−" => Ok(Operation::Subtract),
            "*" | "x" | "×" => Ok(Operation::Multiply),
            "/" | "÷" => Ok(Operation::Divide),
            _ => Err(ParseOperationError(value.to_string())),
        }
    }
}

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::try_from(s)
    }
}

/// A single decimal digit, 0 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<char> for Digit {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        c.to_digit(10).and_then(|d| Digit::new(d as u8)).ok_or(c)
    }
}

/// One input event, as produced by a button press or key stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Digit(Digit),
    Decimal,
    Operation(Operation),
    Equals,
    Clear,
    Backspace,
    ToggleSign,
}

/// Coarse view of the engine, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    PendingOperator,
    Result,
    Error,
}

/// Applies a binary operation. Division by zero yields NaN, never infinity.
pub fn compute(a: f64, op: Operation, b: f64) -> f64 {
    match op {
        Operation::Add => a + b,
        Operation::Subtract => a - b,
        Operation::Multiply => a * b,
        Operation::Divide => {
            if b == 0.0 {
                f64::NAN
            } else {
                a / b
            }
        }
    }
}

/// Renders a number for display, rounded to 12 decimal places.
pub fn format(n: f64) -> String {
    if !n.is_finite() {
        return ERROR_MARKER.to_string();
    }

    let scaled = (n + f64::EPSILON) * 1e12;
    // Past ~1e296 the scaling overflows; such values have no fractional part anyway.
    let rounded = if scaled.is_finite() { (scaled + 0.5).floor() / 1e12 } else { n };

    if rounded == 0.0 { "0".to_string() } else { rounded.to_string() }
}
