//! Pipeline generation stage
//!
//!     Walks a postfix token stream and builds pipeline text with a stack of strings.
//!
//! Algorithm
//!
//!     - Number and Variable tokens push their text; Ternary tokens push their packed call.
//!     - `!` pops one operand `a` and pushes `a | not`.
//!     - Every other operator pops `b` (its right operand, pushed last) and then `a` (its
//!       left operand), and pushes `a | fn b`.
//!
//!     The left operand becomes the head of the pipeline and the right operand the stage
//!     argument. The runtime functions treat the piped value, which arrives as their LAST
//!     argument, as the left-hand side, so `a - b - c` becoming `a | sub b | sub c` evaluates
//!     left to right.
//!
//!     A right operand that is itself a pipeline is parenthesized. Without that, `2 + 3 * 4`
//!     would come out as `2 | add 3 | mul 4`, which is `(2 + 3) * 4`.
//!
//! Failure
//!
//!     Stack underflow, a symbol missing from the operator table, a parenthesis left in the
//!     postfix stream, or anything other than exactly one value at the end are reported as a
//!     `CodegenError`. The stage never emits a call it cannot vouch for.

use crate::pipefix::operators::{Arity, OperatorTable, OPERATORS};
use crate::pipefix::token::{Token, TokenKind};
use crate::pipefix::transforms::{Runnable, TransformError};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    /// An operator found fewer operands than its arity
    StackUnderflow { operator: String },
    UnknownOperator(String),
    /// A token kind that has no meaning in postfix, i.e. a leftover parenthesis
    UnexpectedToken(String),
    /// The walk did not end with exactly one value
    Unbalanced { remaining: usize },
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenError::StackUnderflow { operator } => {
                write!(f, "not enough operands for '{}'", operator)
            }
            CodegenError::UnknownOperator(symbol) => write!(f, "unknown operator '{}'", symbol),
            CodegenError::UnexpectedToken(text) => write!(f, "unexpected token '{}'", text),
            CodegenError::Unbalanced { remaining } => {
                write!(f, "expected one value at the end, found {}", remaining)
            }
        }
    }
}

impl std::error::Error for CodegenError {}

impl From<CodegenError> for TransformError {
    fn from(err: CodegenError) -> Self {
        TransformError::StageFailed {
            stage: "codegen".to_string(),
            message: err.to_string(),
        }
    }
}

pub struct PipelineGeneration {
    table: &'static OperatorTable,
}

impl PipelineGeneration {
    pub fn new() -> Self {
        PipelineGeneration { table: &OPERATORS }
    }
}

impl Default for PipelineGeneration {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Token>, String> for PipelineGeneration {
    fn run(&self, input: Vec<Token>) -> Result<String, TransformError> {
        Ok(generate(&input, self.table)?)
    }
}

/// Wrap `text` in parentheses when it is a pipeline of its own
fn as_argument(text: String) -> String {
    if has_top_level_pipe(&text) {
        format!("({})", text)
    } else {
        text
    }
}

fn has_top_level_pipe(text: &str) -> bool {
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

pub fn generate(rpn: &[Token], table: &OperatorTable) -> Result<String, CodegenError> {
    let mut stack: Vec<String> = Vec::new();

    for token in rpn {
        match token.kind {
            TokenKind::Number | TokenKind::Variable | TokenKind::Ternary => {
                stack.push(token.text.clone());
            }
            TokenKind::Operator => {
                let op = table
                    .get(&token.text)
                    .ok_or_else(|| CodegenError::UnknownOperator(token.text.clone()))?;
                let underflow = || CodegenError::StackUnderflow {
                    operator: token.text.clone(),
                };

                match op.arity {
                    Arity::Unary => {
                        let a = stack.pop().ok_or_else(underflow)?;
                        stack.push(format!("{} | {}", a, op.function));
                    }
                    Arity::Binary => {
                        let b = stack.pop().ok_or_else(underflow)?;
                        let a = stack.pop().ok_or_else(underflow)?;
                        stack.push(format!("{} | {} {}", a, op.function, as_argument(b)));
                    }
                }
            }
            TokenKind::Paren => return Err(CodegenError::UnexpectedToken(token.text.clone())),
        }
    }

    if stack.len() != 1 {
        return Err(CodegenError::Unbalanced {
            remaining: stack.len(),
        });
    }
    Ok(stack.remove(0))
}
