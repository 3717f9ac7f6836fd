//! Tokenization stage
//!
//! Converts one expression into a flat token stream. First stage of every pipeline.

use crate::pipefix::lexing;
use crate::pipefix::token::Token;
use crate::pipefix::transforms::{Runnable, TransformError};

pub struct Tokenization;

impl Tokenization {
    pub fn new() -> Self {
        Tokenization
    }
}

impl Default for Tokenization {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<String, Vec<Token>> for Tokenization {
    fn run(&self, input: String) -> Result<Vec<Token>, TransformError> {
        Ok(lexing::tokenize(&input))
    }
}
