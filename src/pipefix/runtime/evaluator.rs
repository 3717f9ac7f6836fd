//! Reference evaluator for generated pipelines
//!
//!     Executes the pipeline dialect the preprocessor emits against a JSON context. It is
//!     not a template engine: it evaluates one expression, the text between the delimiters.
//!
//! Grammar
//!
//!     pipeline := command ('|' command)*
//!     command  := operand+
//!     operand  := number | "string" | true | false | nil
//!               | field | '(' pipeline ')' | identifier
//!     field    := '$' ('.' name)* | ('.' name)+ | '.'
//!
//!     The first command may start with a function name, which is called with the other
//!     operands, or be a single value. Every later command must start with a function
//!     name; the previous result is appended as its last argument.
//!
//!     Field paths are looked up in the context. `$` and `.` both name the context root. A
//!     missing field reads as `Invalid`.

use super::registry::FunctionRegistry;
use super::value::Value;
use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"\s+")]
enum PipeToken {
    #[token("|")]
    Pipe,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("nil")]
    Nil,

    #[regex(r"-?[0-9]+(\.[0-9]*)?")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    Str,

    #[regex(r"\$(\.[\p{L}_][\p{L}\p{Nd}_]*)*")]
    #[regex(r"(\.[\p{L}_][\p{L}\p{Nd}_]*)+")]
    #[token(".")]
    Field,

    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Text the pipeline lexer does not accept, or a token out of place
    UnexpectedToken(String),
    UnknownFunction(String),
    UnbalancedParens,
    /// `||`, `()` or an empty input
    EmptyCommand,
    /// A later pipeline stage that starts with a value instead of a function
    NotAFunction(String),
    /// A value followed by more operands, e.g. `1 2`
    BareValueWithArguments(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnexpectedToken(text) => write!(f, "unexpected '{}'", text),
            EvalError::UnknownFunction(name) => write!(f, "function '{}' not defined", name),
            EvalError::UnbalancedParens => write!(f, "unbalanced parentheses"),
            EvalError::EmptyCommand => write!(f, "empty command"),
            EvalError::NotAFunction(text) => {
                write!(f, "cannot pipe into '{}', it is not a function", text)
            }
            EvalError::BareValueWithArguments(text) => {
                write!(f, "'{}' is not a function but has arguments", text)
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Evaluate with the shared function registry
pub fn evaluate(pipeline: &str, context: &serde_json::Value) -> Result<Value, EvalError> {
    evaluate_with(pipeline, context, FunctionRegistry::global())
}

pub fn evaluate_with(
    pipeline: &str,
    context: &serde_json::Value,
    registry: &FunctionRegistry,
) -> Result<Value, EvalError> {
    let tokens = lex(pipeline)?;
    let mut evaluator = Evaluator {
        tokens,
        pos: 0,
        context,
        registry,
    };

    let value = evaluator.pipeline()?;
    match evaluator.peek() {
        None => Ok(value),
        Some((PipeToken::RParen, _)) => Err(EvalError::UnbalancedParens),
        Some((_, text)) => Err(EvalError::UnexpectedToken(text.to_string())),
    }
}

fn lex(source: &str) -> Result<Vec<(PipeToken, &str)>, EvalError> {
    let mut lexer = PipeToken::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.slice())),
            Err(()) => return Err(EvalError::UnexpectedToken(lexer.slice().to_string())),
        }
    }
    Ok(tokens)
}

enum Operand<'s> {
    Function(&'s str),
    Value { value: Value, text: &'s str },
}

struct Evaluator<'s, 'c> {
    tokens: Vec<(PipeToken, &'s str)>,
    pos: usize,
    context: &'c serde_json::Value,
    registry: &'c FunctionRegistry,
}

impl<'s, 'c> Evaluator<'s, 'c> {
    fn peek(&self) -> Option<(PipeToken, &'s str)> {
        self.tokens.get(self.pos).copied()
    }

    fn pipeline(&mut self) -> Result<Value, EvalError> {
        let mut result = self.command(None)?;
        while let Some((PipeToken::Pipe, _)) = self.peek() {
            self.pos += 1;
            result = self.command(Some(result))?;
        }
        Ok(result)
    }

    fn command(&mut self, piped: Option<Value>) -> Result<Value, EvalError> {
        let mut operands = Vec::new();
        while let Some((token, _)) = self.peek() {
            if matches!(token, PipeToken::Pipe | PipeToken::RParen) {
                break;
            }
            operands.push(self.operand()?);
        }

        let mut operands = operands.into_iter();
        let head = operands.next().ok_or(EvalError::EmptyCommand)?;

        match head {
            Operand::Function(name) => {
                let mut args = operands
                    .map(|operand| self.resolve(operand))
                    .collect::<Result<Vec<_>, _>>()?;
                args.extend(piped);
                self.call(name, &args)
            }
            Operand::Value { value, text } => {
                if piped.is_some() {
                    return Err(EvalError::NotAFunction(text.to_string()));
                }
                if operands.next().is_some() {
                    return Err(EvalError::BareValueWithArguments(text.to_string()));
                }
                Ok(value)
            }
        }
    }

    fn operand(&mut self) -> Result<Operand<'s>, EvalError> {
        let Some((token, text)) = self.peek() else {
            return Err(EvalError::EmptyCommand);
        };
        self.pos += 1;

        let value = match token {
            PipeToken::Identifier => return Ok(Operand::Function(text)),
            PipeToken::True => Value::Boolean(true),
            PipeToken::False => Value::Boolean(false),
            PipeToken::Nil => Value::Invalid,
            PipeToken::Number => text
                .parse::<f64>()
                .map(Value::Number)
                .map_err(|_| EvalError::UnexpectedToken(text.to_string()))?,
            PipeToken::Str => serde_json::from_str::<String>(text)
                .map(Value::String)
                .map_err(|_| EvalError::UnexpectedToken(text.to_string()))?,
            PipeToken::Field => self.lookup(text),
            PipeToken::LParen => {
                let value = self.pipeline()?;
                match self.peek() {
                    Some((PipeToken::RParen, _)) => self.pos += 1,
                    _ => return Err(EvalError::UnbalancedParens),
                }
                value
            }
            PipeToken::Pipe | PipeToken::RParen => {
                return Err(EvalError::UnexpectedToken(text.to_string()))
            }
        };
        Ok(Operand::Value { value, text })
    }

    /// A bare function name in argument position is called without arguments
    fn resolve(&self, operand: Operand<'s>) -> Result<Value, EvalError> {
        match operand {
            Operand::Function(name) => self.call(name, &[]),
            Operand::Value { value, .. } => Ok(value),
        }
    }

    fn call(&self, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        let function = self
            .registry
            .get(name)
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
        log::trace!("{}({:?})", name, args);
        Ok(function(args))
    }

    fn lookup(&self, path: &str) -> Value {
        let path = path.strip_prefix('$').unwrap_or(path);
        let mut current = self.context;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            match current.get(segment) {
                Some(next) => current = next,
                None => return Value::Invalid,
            }
        }
        Value::from(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(pipeline: &str) -> Result<Value, EvalError> {
        evaluate(pipeline, &json!({"Vars": {"a": 2, "b": 3, "name": "Ada", "zero": 0}}))
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval("14").unwrap(), Value::Number(14.0));
        assert_eq!(eval("\"hi\\n\"").unwrap(), Value::from("hi\n"));
        assert_eq!(eval("true").unwrap(), Value::Boolean(true));
        assert_eq!(eval("nil").unwrap(), Value::Invalid);
        assert_eq!(eval("-1.5").unwrap(), Value::Number(-1.5));
    }

    #[test]
    fn test_fields() {
        assert_eq!(eval("$.Vars.a").unwrap(), Value::Number(2.0));
        assert_eq!(eval(".Vars.name").unwrap(), Value::from("Ada"));
        assert_eq!(eval("$.Vars.missing.deeper").unwrap(), Value::Invalid);
    }

    #[test]
    fn test_pipeline_appends_piped_value() {
        assert_eq!(eval("10 | sub 3 | sub 2").unwrap(), Value::Number(5.0));
        assert_eq!(eval("$.Vars.a | mul $.Vars.b").unwrap(), Value::Number(6.0));
    }

    #[test]
    fn test_parenthesized_argument() {
        assert_eq!(eval("2 | add (3 | mul 4)").unwrap(), Value::Number(14.0));
    }

    #[test]
    fn test_function_first() {
        assert_eq!(eval("(tern 1 2 3)").unwrap(), Value::Number(2.0));
        assert_eq!(eval("tern 0 2 3").unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_piped_value_is_the_second_nullish_argument() {
        // `x | nullish y` calls nullish(y, x): the stage argument is checked, not the piped value
        assert_eq!(eval("$.Vars.a | nullish 5").unwrap(), Value::Number(5.0));
        assert_eq!(eval("$.Vars.a | nullish 0").unwrap(), Value::Number(2.0));
        assert_eq!(eval("$.Vars.zero | nullish 0").unwrap(), Value::Number(0.0));
        assert_eq!(eval("nullish $.Vars.a 5").unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_errors() {
        assert_eq!(eval("upper 1"), Err(EvalError::UnknownFunction("upper".to_string())));
        assert_eq!(eval("1 +"), Err(EvalError::UnexpectedToken("+".to_string())));
        assert_eq!(eval("(1 | add 2"), Err(EvalError::UnbalancedParens));
        assert_eq!(eval("1)"), Err(EvalError::UnbalancedParens));
        assert_eq!(eval(""), Err(EvalError::EmptyCommand));
        assert_eq!(eval("1 | | add 2"), Err(EvalError::EmptyCommand));
        assert_eq!(eval("1 | 2"), Err(EvalError::NotAFunction("2".to_string())));
        assert_eq!(
            eval("1 2"),
            Err(EvalError::BareValueWithArguments("1".to_string()))
        );
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = FunctionRegistry::new();
        registry.register("five", |_: &[Value]| Value::Number(5.0));
        let value = evaluate_with("five | add 1", &json!({}), &registry).unwrap();
        assert_eq!(value, Value::Number(6.0));
        assert!(evaluate("five", &json!({})).is_err());
    }
}
