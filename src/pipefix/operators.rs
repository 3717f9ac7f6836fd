//! Operator table
//!
//!     Maps each infix symbol to the runtime function that implements it, its precedence and
//!     its arity. The parser only reads precedence; the generator reads the function name and
//!     arity. The table is built once, on first use, and never changes afterwards.
//!
//!     Precedence, high to low:
//!
//!         6   !
//!         5   *  /
//!         4   +  -
//!         3   >  <  >=  <=  ==  !=
//!         2   &&
//!         1   ||
//!         0   ??  ?
//!
//!     `?` only reaches the generator when a ternary had no matching `:`; it is kept in the
//!     table so that case still produces a call to `tern` instead of a failure.

use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    pub symbol: &'static str,
    pub function: &'static str,
    pub precedence: u8,
    pub arity: Arity,
}

pub struct OperatorTable {
    operators: HashMap<&'static str, Operator>,
}

const ENTRIES: &[(&str, &str, u8, Arity)] = &[
    ("!", "not", 6, Arity::Unary),
    ("*", "mul", 5, Arity::Binary),
    ("/", "div", 5, Arity::Binary),
    ("+", "add", 4, Arity::Binary),
    ("-", "sub", 4, Arity::Binary),
    (">", "gt", 3, Arity::Binary),
    ("<", "lt", 3, Arity::Binary),
    (">=", "gte", 3, Arity::Binary),
    ("<=", "lte", 3, Arity::Binary),
    ("==", "eq", 3, Arity::Binary),
    ("!=", "ne", 3, Arity::Binary),
    ("&&", "and", 2, Arity::Binary),
    ("||", "or", 1, Arity::Binary),
    ("??", "nullish", 0, Arity::Binary),
    ("?", "tern", 0, Arity::Binary),
];

/// The process-wide operator table
pub static OPERATORS: Lazy<OperatorTable> = Lazy::new(OperatorTable::standard);

impl OperatorTable {
    fn standard() -> Self {
        let operators = ENTRIES
            .iter()
            .map(|&(symbol, function, precedence, arity)| {
                (
                    symbol,
                    Operator {
                        symbol,
                        function,
                        precedence,
                        arity,
                    },
                )
            })
            .collect();
        OperatorTable { operators }
    }

    pub fn get(&self, symbol: &str) -> Option<&Operator> {
        self.operators.get(symbol)
    }

    /// Precedence used by the parser. Symbols missing from the table rank lowest.
    pub fn precedence(&self, symbol: &str) -> u8 {
        self.get(symbol).map(|op| op.precedence).unwrap_or(0)
    }

    /// Every runtime function name the generator can emit, sorted
    pub fn function_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.operators.values().map(|op| op.function).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let op = OPERATORS.get("-").unwrap();
        assert_eq!(op.function, "sub");
        assert_eq!(op.precedence, 4);
        assert_eq!(op.arity, Arity::Binary);

        assert_eq!(OPERATORS.get("!").unwrap().arity, Arity::Unary);
        assert!(OPERATORS.get(":").is_none());
    }

    #[test]
    fn test_precedence_order() {
        assert!(OPERATORS.precedence("*") > OPERATORS.precedence("+"));
        assert!(OPERATORS.precedence("+") > OPERATORS.precedence("=="));
        assert!(OPERATORS.precedence("==") > OPERATORS.precedence("&&"));
        assert!(OPERATORS.precedence("&&") > OPERATORS.precedence("||"));
        assert!(OPERATORS.precedence("||") > OPERATORS.precedence("??"));
        assert_eq!(OPERATORS.precedence(":"), 0);
    }

    #[test]
    fn test_function_names() {
        let names = OPERATORS.function_names();
        assert_eq!(names.len(), 15);
        assert!(names.contains(&"nullish"));
        assert!(names.contains(&"tern"));
        assert_eq!(OPERATORS.len(), 15);
    }
}
