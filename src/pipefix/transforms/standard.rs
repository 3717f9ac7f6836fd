//! Standard transform definitions
//!
//! Pre-built pipelines, defined once as statics with `once_cell::sync::Lazy`.

use crate::pipefix::token::Token;
use crate::pipefix::transforms::stages::{
    PipelineGeneration, ShuntingYard, TernaryDesugaring, Tokenization,
};
use crate::pipefix::transforms::Transform;
use once_cell::sync::Lazy;

/// Type alias for transforms that stop at a token stream
pub type TokenTransform = Transform<String, Vec<Token>>;

/// Type alias for token stream to token stream transforms
pub type ParsingTransform = Transform<Vec<Token>, Vec<Token>>;

/// Type alias for transforms that produce pipeline text
pub type GenerationTransform = Transform<Vec<Token>, String>;

/// Expression → flat tokens
pub static LEXING: Lazy<TokenTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(Tokenization::new()));

/// Flat tokens → postfix tokens
///
/// 1. Ternary desugaring
/// 2. Shunting yard
pub static PARSING: Lazy<ParsingTransform> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then(TernaryDesugaring::new())
        .then(ShuntingYard::new())
});

/// Expression → postfix tokens
pub static TO_RPN: Lazy<TokenTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then_transform(&LEXING).then_transform(&PARSING));

/// Postfix tokens → pipeline text
///
/// The preprocessor runs `LEXING`, `PARSING` and `GENERATION` one at a time, since it needs
/// the intermediate tokens to decide on conversion and to build its fallback.
pub static GENERATION: Lazy<GenerationTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(PipelineGeneration::new()));
