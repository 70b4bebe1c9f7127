//! Program loaders
//!
//! Turn program files into the engine's instruction list:
//! - [`lexer`] + [`parser`]: the line-oriented text format
//! - [`json`]: the JSON request body (`{"instructions": [...]}`), with the
//!   matching result and error bodies
//!
//! Both loaders only check shape. Semantic problems (duplicate definitions,
//! undefined variables, cycles) are left to the engine.

pub mod json;
pub mod lexer;
pub mod parser;

use crate::engine::instruction::Instruction;
use lexer::LexError;
use std::path::Path;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("parse error at line {}, column {}: {message}", .location.line, .location.column)]
    Syntax {
        message: String,
        location: SourceLocation,
    },

    #[error("invalid request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    /// `.json` files are JSON, everything else is text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Text,
        }
    }
}

pub fn parse_program(source: &str, format: Format) -> Result<Vec<Instruction>, ParseError> {
    match format {
        Format::Text => parser::Parser::new(source)?.parse_program(),
        Format::Json => json::parse_request(source),
    }
}
