//! Template preprocessor
//!
//!     Finds every placeholder in a template, converts the expression inside it, and puts the
//!     template back together. Text outside placeholders is copied byte for byte.
//!
//! Per Placeholder
//!
//!     1. Trim the interior and rewrite `$name` reads (see [variables](crate::pipefix::variables)).
//!     2. Declarations (`$x := expr`, `$x = expr`) keep their left side; only the
//!        expression on the right is converted.
//!     3. Lex. Without any operator token the text is kept as is, so plain references and
//!        existing pipelines such as `.Name | upper` pass through.
//!     4. Desugar the ternary, reorder to postfix, generate the pipeline.
//!     5. If generation fails, the postfix tokens joined by spaces are used instead.
//!     6. Qualify the variable namespace with the root selector and re-wrap as
//!        `{{ expr }}`.
//!
//!     A missing close delimiter ends the scan: the remainder is copied verbatim.
//!
//! Failure Policy
//!
//!     The preprocessor always produces output. Step 5 is the only place where a failed
//!     conversion turns into fallback text; the fallback keeps the placeholder well formed
//!     but is not guaranteed to mean the same as the original expression.

use crate::pipefix::config::{ConfigError, PreprocessorConfig};
use crate::pipefix::lexing;
use crate::pipefix::token::detokenize;
use crate::pipefix::transforms::standard::{GENERATION, LEXING, PARSING};
use crate::pipefix::variables::{self, RootQualifier};
use once_cell::sync::Lazy;
use regex::Regex;

static DECLARATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$\w+\s*:?=").unwrap());

#[derive(Debug, Clone)]
pub struct Preprocessor {
    config: PreprocessorConfig,
    qualifier: RootQualifier,
}

impl Preprocessor {
    /// Create a preprocessor with the default `{{ }}` / `$.Vars` configuration
    pub fn new() -> Self {
        Self::with_config(PreprocessorConfig::default()).expect("default config is valid")
    }

    pub fn with_config(config: PreprocessorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let qualifier = RootQualifier::new(&config.namespace, &config.root_selector).map_err(
            |err| ConfigError::Invalid {
                field: "namespace",
                message: err.to_string(),
            },
        )?;
        Ok(Preprocessor { config, qualifier })
    }

    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    /// Rewrite every placeholder in `template`
    pub fn process(&self, template: &str) -> String {
        let open = self.config.open_delimiter.as_str();
        let close = self.config.close_delimiter.as_str();
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find(open) {
            out.push_str(&rest[..start]);
            let inner = &rest[start + open.len()..];

            let Some(end) = inner.find(close) else {
                log::debug!("unterminated placeholder, copying the rest verbatim");
                out.push_str(&rest[start..]);
                return out;
            };

            let interior = inner[..end].trim();
            let expr = self.convert_expression(interior);
            log::debug!("placeholder '{}' => '{}'", interior, expr);

            out.push_str(open);
            out.push(' ');
            out.push_str(&expr);
            out.push(' ');
            out.push_str(close);

            rest = &inner[end + close.len()..];
        }

        out.push_str(rest);
        out
    }

    /// Convert one placeholder expression, without delimiters
    pub fn convert_expression(&self, raw: &str) -> String {
        let rewritten = variables::rewrite_references(raw, &self.config.namespace);

        let converted = match DECLARATION.find(&rewritten) {
            Some(head) => {
                let tail = &rewritten[head.end()..];
                let value = tail.trim();
                if value.is_empty() || value.starts_with('=') {
                    rewritten.clone()
                } else {
                    let value_start = head.end() + (tail.len() - tail.trim_start().len());
                    format!("{}{}", &rewritten[..value_start], convert_operators(value))
                }
            }
            None => convert_operators(&rewritten),
        };

        self.qualifier.qualify(&converted)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Lex, and convert when the expression contains an operator
fn convert_operators(expr: &str) -> String {
    let tokens = match LEXING.run(expr.to_string()) {
        Ok(tokens) => tokens,
        Err(err) => {
            log::debug!("lexing '{}' failed: {}", expr, err);
            return expr.to_string();
        }
    };
    if !lexing::has_operator(&tokens) {
        return expr.to_string();
    }

    let rpn = match PARSING.run(tokens) {
        Ok(rpn) => rpn,
        Err(err) => {
            log::debug!("parsing '{}' failed: {}", expr, err);
            return expr.to_string();
        }
    };

    match GENERATION.run(rpn.clone()) {
        Ok(pipeline) => {
            log::trace!("'{}' => '{}'", expr, pipeline);
            pipeline
        }
        Err(err) => {
            let fallback = detokenize(&rpn);
            log::debug!("'{}' kept as '{}': {}", expr, fallback, err);
            fallback
        }
    }
}
