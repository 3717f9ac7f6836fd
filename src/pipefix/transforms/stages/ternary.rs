//! Ternary desugaring stage
//!
//!     Collapses one `cond ? a : b` into a single Ternary token, so the shunting-yard parser
//!     never has to deal with a three-operand operator.
//!
//! Algorithm
//!
//!     1. Copy tokens to the output until the first `?` operator.
//!     2. Pop the last output token: that single token is the condition. A `?` with no
//!        operand right before it (nothing, an operator, or a parenthesis as in
//!        `(a > 1) ? x : y`) is copied through and scanning continues.
//!     3. Scan forward for the matching `:`. A nested `?` raises the depth and a `:` at depth
//!        above zero lowers it, so ternaries nested in the true branch are skipped over.
//!     4. No matching `:`: put the condition back, copy the rest verbatim and stop.
//!     5. Otherwise the tokens between `?` and `:` are the true branch and EVERYTHING after
//!        `:` is the false branch. Both are flattened to text, packed with the condition
//!        into one Ternary token, and the stream ends there.
//!
//!     Because the false branch swallows the rest of the stream, at most one top-level
//!     ternary is recognised per expression; a second `?` after the `:` just lands inside the
//!     false-branch text. Branch texts are not desugared or converted either.

use crate::pipefix::token::{TernaryParts, Token};
use crate::pipefix::transforms::{Runnable, TransformError};

pub struct TernaryDesugaring;

impl TernaryDesugaring {
    pub fn new() -> Self {
        TernaryDesugaring
    }
}

impl Default for TernaryDesugaring {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Token>, Vec<Token>> for TernaryDesugaring {
    fn run(&self, input: Vec<Token>) -> Result<Vec<Token>, TransformError> {
        Ok(desugar(input))
    }
}

/// Index of the `:` matching a `?` just before `from`
fn find_matching_colon(tokens: &[Token], from: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, token) in tokens[from..].iter().enumerate() {
        if token.is_operator("?") {
            depth += 1;
        } else if token.is_operator(":") {
            if depth == 0 {
                return Some(from + offset);
            }
            depth -= 1;
        }
    }
    None
}

pub fn desugar(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());

    for (i, token) in tokens.iter().enumerate() {
        if !token.is_operator("?") {
            out.push(token.clone());
            continue;
        }

        let condition = match out.pop() {
            Some(condition) if condition.is_operand() => condition,
            other => {
                log::debug!("'?' without an operand before it, left in place");
                out.extend(other);
                out.push(token.clone());
                continue;
            }
        };

        let Some(colon) = find_matching_colon(&tokens, i + 1) else {
            log::debug!("ternary without matching ':', leaving tokens as they are");
            out.push(condition);
            out.extend_from_slice(&tokens[i..]);
            return out;
        };

        let parts = TernaryParts::new(&condition, &tokens[i + 1..colon], &tokens[colon + 1..]);
        out.push(Token::ternary(&parts));
        return out;
    }

    out
}
