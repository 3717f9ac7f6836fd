//! Transform pipeline infrastructure
//!
//!     Every conversion step is a stage with a typed input and output. Stages compose into a
//!     `Transform` with `.then()`, and the compiler checks that each stage's input is the
//!     previous stage's output:
//!
//! ```rust,ignore
//! let to_rpn = Transform::from_fn(Ok)
//!     .then(Tokenization::new())      // String      → Vec<Token>
//!     .then(TernaryDesugaring::new()) // Vec<Token>  → Vec<Token>
//!     .then(ShuntingYard::new());     // Vec<Token>  → Vec<Token> (postfix)
//! ```
//!
//!     The standard pipelines are pre-built statics, see [`standard`].
//!
//! Failure
//!
//!     A stage reports failure through `TransformError`; it never substitutes fallback text
//!     itself. Turning a failed conversion into fallback output is the preprocessor's job
//!     alone.

pub mod stages;
pub mod standard;

use std::fmt;

/// Error that can occur during transformation
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Stage failed with specific error
    StageFailed { stage: String, message: String },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::StageFailed { stage, message } => {
                write!(f, "Stage '{}' failed: {}", stage, message)
            }
        }
    }
}

impl std::error::Error for TransformError {}

/// Trait for anything that can transform an input to an output
pub trait Runnable<I, O> {
    fn run(&self, input: I) -> Result<O, TransformError>;
}

/// A composable transformation pipeline from `I` to `O`
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> Result<O, TransformError> + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    /// Create a transform from a function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, TransformError> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Chain a stage after this transform
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                stage.run(intermediate)
            }),
        }
    }

    /// Chain a pre-built static transform after this one
    pub fn then_transform<O2>(self, next: &'static Transform<O, O2>) -> Transform<I, O2>
    where
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                next.run(intermediate)
            }),
        }
    }

    /// Execute this transform on the given input
    pub fn run(&self, input: I) -> Result<O, TransformError> {
        (self.run_fn)(input)
    }
}

impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> Result<O, TransformError> {
        Transform::run(self, input)
    }
}
