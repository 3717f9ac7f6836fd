//! Function registry
//!
//!     Maps function names used in pipelines to their implementations. The shared
//!     instance from [FunctionRegistry::global] is built once and never changes; callers
//!     that need extra functions take their own copy with [FunctionRegistry::new] and
//!     register into that.

use super::functions;
use super::presentation;
use super::value::Value;
use crate::pipefix::operators::OPERATORS;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type RuntimeFunction = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

static GLOBAL: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::core);

#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, RuntimeFunction>,
}

impl FunctionRegistry {
    /// The shared registry holding the operator functions
    pub fn global() -> &'static FunctionRegistry {
        &GLOBAL
    }

    /// An independent copy of the shared registry
    pub fn new() -> Self {
        GLOBAL.clone()
    }

    /// A copy of the shared registry with the presentation helpers added
    pub fn with_presentation() -> Self {
        let mut registry = Self::new();
        registry.register("thousand", presentation::thousand);
        registry.register("dollar", presentation::dollar);
        registry.register("json", presentation::json);
        registry
    }

    fn core() -> Self {
        let mut registry = FunctionRegistry {
            functions: HashMap::new(),
        };
        registry.register("add", functions::add);
        registry.register("sub", functions::sub);
        registry.register("mul", functions::mul);
        registry.register("div", functions::div);
        registry.register("not", functions::not);
        registry.register("eq", functions::eq);
        registry.register("ne", functions::ne);
        registry.register("gt", functions::gt);
        registry.register("lt", functions::lt);
        registry.register("gte", functions::gte);
        registry.register("lte", functions::lte);
        registry.register("and", functions::and);
        registry.register("or", functions::or);
        registry.register("nullish", functions::nullish);
        registry.register("tern", functions::tern);

        debug_assert!(OPERATORS
            .function_names()
            .iter()
            .all(|name| registry.contains(name)));
        registry
    }

    /// Add or replace a function
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn get(&self, name: &str) -> Option<&RuntimeFunction> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Sorted function names
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_has_every_operator_function() {
        let registry = FunctionRegistry::global();
        for name in OPERATORS.function_names() {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert_eq!(registry.len(), 15);
    }

    #[test]
    fn test_names_are_sorted() {
        let names = FunctionRegistry::global().names();
        assert_eq!(names.first(), Some(&"add"));
        assert_eq!(names.last(), Some(&"tern"));
    }

    #[test]
    fn test_register_does_not_touch_global() {
        let mut registry = FunctionRegistry::new();
        registry.register("double", |args: &[Value]| {
            Value::Number(args.last().map(Value::as_f64).unwrap_or(0.0) * 2.0)
        });
        assert!(registry.contains("double"));
        assert!(!FunctionRegistry::global().contains("double"));

        let double = registry.get("double").unwrap();
        assert_eq!(double(&[Value::Number(4.0)]), Value::Number(8.0));
    }

    #[test]
    fn test_lookup() {
        let add = FunctionRegistry::global().get("add").unwrap();
        assert_eq!(add(&[Value::Number(1.0), Value::Number(2.0)]), Value::Number(3.0));
        assert!(FunctionRegistry::global().get("upper").is_none());
    }

    #[test]
    fn test_presentation_helpers() {
        let registry = FunctionRegistry::with_presentation();
        let thousand = registry.get("thousand").unwrap();
        let args = [
            Value::from("."),
            Value::Number(2.0),
            Value::from(","),
            Value::Number(1234567.891),
        ];
        assert_eq!(thousand(&args), Value::from("1.234.567,89"));

        let dollar = registry.get("dollar").unwrap();
        assert_eq!(dollar(&[Value::Number(1234.5)]), Value::from("$1.234,50"));

        assert!(registry.contains("json"));
        assert!(!FunctionRegistry::global().contains("dollar"));
    }

    #[test]
    fn test_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FunctionRegistry>();
    }
}
