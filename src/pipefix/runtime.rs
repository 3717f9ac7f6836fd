//! Runtime side of the pipeline dialect
//!
//!     The preprocessor only emits text. Something has to execute `a | add b` at render
//!     time, and that something needs functions with matching argument conventions. This
//!     module holds them:
//!
//!         - value: the dynamic `Value` passed between stages, and its coercion rules
//!         - functions: the operator functions (`add`, `eq`, `tern`, ...)
//!         - presentation: `thousand`, `dollar` and `json` formatting helpers
//!         - registry: name to function map that hosts register into
//!         - evaluator: a small reference evaluator for generated pipelines, used by the
//!           CLI and by tests to check that conversion keeps meaning
//!
//! Accumulator Convention
//!
//!     In `x | f a b` the piped value `x` arrives as the LAST argument: `f(a, b, x)`. Every
//!     function here treats that last argument as the left-hand side of the operator.

pub mod evaluator;
pub mod functions;
pub mod presentation;
pub mod registry;
pub mod value;

pub use evaluator::{evaluate, EvalError};
pub use registry::{FunctionRegistry, RuntimeFunction};
pub use value::Value;
