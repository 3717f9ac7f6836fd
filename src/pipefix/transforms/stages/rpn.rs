//! Shunting-yard stage
//!
//!     Reorders an infix token stream into postfix (RPN) using the precedence column of the
//!     operator table.
//!
//! Algorithm
//!
//!     - Number, Variable and Ternary tokens go straight to the output.
//!     - An operator first pops every operator on top of the stack whose precedence is greater
//!       than or equal to its own, then is pushed. Ties pop, so equal-precedence operators are
//!       left-associative. This applies to `!` as well: whether an operator is unary is only
//!       decided by the generator, from how many operands it finds.
//!     - `(` is pushed. `)` pops to the output until the matching `(`, and both are dropped.
//!     - At the end the stack is emptied onto the output, top first.
//!
//! Lenient Parentheses
//!
//!     A `)` with no `(` on the stack is ignored. A `(` never closed stays on the stack and is
//!     flushed to the output at the end, where the generator rejects it. Neither case is an
//!     error here.

use crate::pipefix::operators::{OperatorTable, OPERATORS};
use crate::pipefix::token::{Token, TokenKind};
use crate::pipefix::transforms::{Runnable, TransformError};

pub struct ShuntingYard {
    table: &'static OperatorTable,
}

impl ShuntingYard {
    pub fn new() -> Self {
        ShuntingYard { table: &OPERATORS }
    }
}

impl Default for ShuntingYard {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Token>, Vec<Token>> for ShuntingYard {
    fn run(&self, input: Vec<Token>) -> Result<Vec<Token>, TransformError> {
        Ok(to_rpn(&input, self.table))
    }
}

pub fn to_rpn(tokens: &[Token], table: &OperatorTable) -> Vec<Token> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Number | TokenKind::Variable | TokenKind::Ternary => {
                output.push(token.clone());
            }
            TokenKind::Operator => {
                let incoming = table.precedence(&token.text);
                while let Some(top) = stack.last() {
                    if top.kind != TokenKind::Operator || table.precedence(&top.text) < incoming {
                        break;
                    }
                    output.extend(stack.pop());
                }
                stack.push(token.clone());
            }
            TokenKind::Paren if token.text == "(" => stack.push(token.clone()),
            TokenKind::Paren => {
                let mut matched = false;
                while let Some(top) = stack.pop() {
                    if top.kind == TokenKind::Paren && top.text == "(" {
                        matched = true;
                        break;
                    }
                    output.push(top);
                }
                if !matched {
                    log::debug!("unmatched ')' ignored");
                }
            }
        }
    }

    while let Some(top) = stack.pop() {
        output.push(top);
    }

    output
}
