use super::lexer::{Lexer, Token};
use super::{ParseError, SourceLocation};
use crate::engine::instruction::{ArithmeticOp, Instruction, Operand};

/// Recursive descent parser for the line-oriented program format
///
/// ```text
/// x = 10 + 2      # calc: <var> = <operand> <op> <operand>
/// y = x * -3
/// print y         # print: print <var>
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse the entire program
    pub fn parse_program(&mut self) -> Result<Vec<Instruction>, ParseError> {
        let mut instructions = Vec::new();

        loop {
            match self.peek_token() {
                Token::Eof(_) => break,
                Token::Newline(_) => {
                    self.advance();
                }
                _ => {
                    instructions.push(self.parse_instruction()?);
                    self.expect_line_end()?;
                }
            }
        }

        Ok(instructions)
    }

    fn parse_instruction(&mut self) -> Result<Instruction, ParseError> {
        match self.advance() {
            Token::Print(_) => {
                let var = self.expect_identifier("after 'print'")?;
                Ok(Instruction::print(var))
            }
            Token::Ident(var, _) => {
                match self.advance() {
                    Token::Eq(_) => {}
                    other => return Err(unexpected(&other, "'=' after variable name")),
                }
                let left = self.parse_operand()?;
                let op = self.parse_operator()?;
                let right = self.parse_operand()?;
                Ok(Instruction::calc(var, op, left, right))
            }
            other => Err(unexpected(&other, "'print' or a variable name")),
        }
    }

    /// Operand: identifier, or integer literal with optional leading '-'
    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        match self.advance() {
            Token::Ident(name, _) => Ok(Operand::Variable(name)),
            Token::IntLiteral(value, loc) => Ok(Operand::Literal(to_i64(value, false, loc)?)),
            Token::Minus(loc) => match self.advance() {
                Token::IntLiteral(value, _) => Ok(Operand::Literal(to_i64(value, true, loc)?)),
                other => Err(unexpected(&other, "integer literal after '-'")),
            },
            other => Err(unexpected(&other, "an operand")),
        }
    }

    fn parse_operator(&mut self) -> Result<ArithmeticOp, ParseError> {
        match self.advance() {
            Token::Plus(_) => Ok(ArithmeticOp::Add),
            Token::Minus(_) => Ok(ArithmeticOp::Subtract),
            Token::Star(_) => Ok(ArithmeticOp::Multiply),
            other => Err(unexpected(&other, "'+', '-' or '*'")),
        }
    }

    fn expect_identifier(&mut self, context: &str) -> Result<String, ParseError> {
        match self.advance() {
            Token::Ident(name, _) => Ok(name),
            other => Err(unexpected(&other, &format!("variable name {}", context))),
        }
    }

    fn expect_line_end(&mut self) -> Result<(), ParseError> {
        match self.peek_token() {
            Token::Newline(_) => {
                self.advance();
                Ok(())
            }
            Token::Eof(_) => Ok(()),
            other => Err(unexpected(other, "end of line")),
        }
    }

    fn peek_token(&self) -> &Token {
        // The lexer always ends the stream with Eof, and advance never moves past it
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek_token().clone();
        if !matches!(token, Token::Eof(_)) {
            self.position += 1;
        }
        token
    }
}

fn unexpected(found: &Token, expected: &str) -> ParseError {
    ParseError::Syntax {
        message: format!("expected {}, found {}", expected, found),
        location: found.location(),
    }
}

fn to_i64(magnitude: u64, negative: bool, loc: SourceLocation) -> Result<i64, ParseError> {
    let value = if negative {
        -(magnitude as i128)
    } else {
        magnitude as i128
    };
    i64::try_from(value).map_err(|_| ParseError::Syntax {
        message: format!("integer literal out of range: {}", value),
        location: loc,
    })
}
