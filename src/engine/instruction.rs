//! Instruction and operand model consumed by the executor.
//!
//! A program is a flat, ordered list of [`Instruction`]s. `Calc` assigns the
//! result of a binary [`ArithmeticOp`] to a variable, `Print` asks for the
//! value of a variable to be emitted as a [`PrintResult`].

use super::errors::ExecError;
use serde::Serialize;
use std::fmt;

/// Binary arithmetic operations over `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
}

impl ArithmeticOp {
    pub const ALL: [ArithmeticOp; 3] = [
        ArithmeticOp::Add,
        ArithmeticOp::Subtract,
        ArithmeticOp::Multiply,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
        }
    }

    pub fn from_symbol(raw: &str) -> Result<Self, ExecError> {
        Self::ALL
            .into_iter()
            .find(|op| op.symbol() == raw)
            .ok_or_else(|| ExecError::UnsupportedOperation(raw.to_string()))
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Input to a calculation: an integer literal or a reference to another variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Literal(i64),
    Variable(String),
}

impl Operand {
    pub fn var(name: impl Into<String>) -> Self {
        Operand::Variable(name.into())
    }

    /// The referenced variable, if this operand is one.
    pub fn variable(&self) -> Option<&str> {
        match self {
            Operand::Literal(_) => None,
            Operand::Variable(name) => Some(name),
        }
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Literal(value)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(value) => write!(f, "{}", value),
            Operand::Variable(name) => f.write_str(name),
        }
    }
}

/// `var = left op right`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalcInstruction {
    pub var: String,
    pub op: ArithmeticOp,
    pub left: Operand,
    pub right: Operand,
}

impl CalcInstruction {
    /// Names of the variables this calculation reads, left operand first.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.left
            .variable()
            .into_iter()
            .chain(self.right.variable())
    }
}

impl fmt::Display for CalcInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} {} {}", self.var, self.left, self.op, self.right)
    }
}

/// Request to emit the value of `var`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintInstruction {
    pub var: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Calc(CalcInstruction),
    Print(PrintInstruction),
}

impl Instruction {
    pub fn calc(var: impl Into<String>, op: ArithmeticOp, left: Operand, right: Operand) -> Self {
        Instruction::Calc(CalcInstruction {
            var: var.into(),
            op,
            left,
            right,
        })
    }

    pub fn print(var: impl Into<String>) -> Self {
        Instruction::Print(PrintInstruction { var: var.into() })
    }

    /// The variable this instruction defines or prints.
    pub fn target(&self) -> &str {
        match self {
            Instruction::Calc(calc) => &calc.var,
            Instruction::Print(print) => &print.var,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Calc(calc) => calc.fmt(f),
            Instruction::Print(print) => write!(f, "print {}", print.var),
        }
    }
}

/// One emitted value, in the order its `Print` appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintResult {
    pub var: String,
    pub value: i64,
}

impl PrintResult {
    pub fn new(var: impl Into<String>, value: i64) -> Self {
        PrintResult {
            var: var.into(),
            value,
        }
    }
}
