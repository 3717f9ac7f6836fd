//! Individual transformation stages
//!
//! Each stage implements the `Runnable` trait.

pub mod codegen;
pub mod rpn;
pub mod ternary;
pub mod tokenization;

pub use codegen::{CodegenError, PipelineGeneration};
pub use rpn::ShuntingYard;
pub use ternary::TernaryDesugaring;
pub use tokenization::Tokenization;
