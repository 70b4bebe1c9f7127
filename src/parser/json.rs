//! JSON request and response bodies
//!
//! ```json
//! {"instructions": [
//!   {"type": "calc", "op": "+", "var": "x", "left": 1, "right": "y"},
//!   {"type": "print", "var": "x"}
//! ]}
//! ```
//!
//! An operand is a JSON integer (literal) or a JSON string (variable name);
//! any other token is rejected.

use super::ParseError;
use crate::engine::errors::ExecError;
use crate::engine::instruction::{ArithmeticOp, Instruction, Operand, PrintResult};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExecuteProgramRequest {
    instructions: Vec<InstructionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum InstructionDto {
    Calc {
        var: String,
        op: String,
        left: OperandDto,
        right: OperandDto,
    },
    Print {
        var: String,
    },
}

#[derive(Debug)]
struct OperandDto(Operand);

impl<'de> Deserialize<'de> for OperandDto {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OperandVisitor)
    }
}

struct OperandVisitor;

impl<'de> Visitor<'de> for OperandVisitor {
    type Value = OperandDto;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer literal or variable name")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(OperandDto(Operand::Literal(value)))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        i64::try_from(value)
            .map(|v| OperandDto(Operand::Literal(v)))
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(OperandDto(Operand::Variable(value.to_string())))
    }
}

/// Parse a request body into instructions. At least one instruction is required.
pub fn parse_request(body: &str) -> Result<Vec<Instruction>, ParseError> {
    let request: ExecuteProgramRequest = serde_json::from_str(body)?;
    if request.instructions.is_empty() {
        return Err(ParseError::Invalid(
            "instructions: must contain at least one instruction".to_string(),
        ));
    }

    request
        .instructions
        .into_iter()
        .map(|dto| match dto {
            InstructionDto::Calc {
                var,
                op,
                left,
                right,
            } => {
                let op = ArithmeticOp::from_symbol(&op)
                    .map_err(|err| ParseError::Invalid(err.to_string()))?;
                Ok(Instruction::calc(var, op, left.0, right.0))
            }
            InstructionDto::Print { var } => Ok(Instruction::print(var)),
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ExecuteProgramResponse<'a> {
    pub items: &'a [PrintResult],
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl From<&ExecError> for ErrorResponse {
    fn from(err: &ExecError) -> Self {
        let message = if err.is_client_error() {
            err.to_string()
        } else {
            "Internal server error".to_string()
        };
        ErrorResponse { message }
    }
}

pub fn render_results(results: &[PrintResult]) -> String {
    // Serializing plain strings and integers cannot fail
    serde_json::to_string(&ExecuteProgramResponse { items: results }).unwrap_or_default()
}

pub fn render_error(err: &ExecError) -> String {
    serde_json::to_string(&ErrorResponse::from(err)).unwrap_or_default()
}
