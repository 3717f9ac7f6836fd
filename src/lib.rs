//! # pipefix
//!
//! Rewrites infix expressions inside template placeholders into left-to-right pipeline
//! calls, and supplies the runtime functions those pipelines call.
//!
//! Layout
//!
//!     src/pipefix
//!       ├── token, operators      Shared token model and the operator table
//!       ├── lexing                logos based tokenization of one expression
//!       ├── transforms            Runnable stages (tokenize, ternary, rpn, codegen) and
//!       │                         the pre-built static pipelines
//!       ├── variables             `$name.path` rewriting, before and after conversion
//!       ├── preprocessor          Placeholder scanning and reassembly
//!       ├── config                Delimiters and variable prefixes
//!       └── runtime               Values, operator functions, registry and a reference
//!                                 evaluator for the generated pipeline dialect
//!
//! A template goes through the preprocessor once, ahead of rendering:
//!
//! ```text
//! {{ $price * $qty + 1 }}  →  {{ $.Vars.price | mul $.Vars.qty | add 1 }}
//! ```

pub mod pipefix;

pub use pipefix::config::PreprocessorConfig;
pub use pipefix::preprocessor::Preprocessor;
pub use pipefix::runtime::{FunctionRegistry, Value};
