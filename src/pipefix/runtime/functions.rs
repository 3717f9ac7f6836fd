//! Operator functions
//!
//!     One function per entry of the operator table, all with the signature
//!     `fn(&[Value]) -> Value`. None of them panics, whatever the argument count.
//!
//! Arithmetic
//!
//!     `add sub mul div` are variadic. The last argument seeds the accumulator and every
//!     earlier argument is folded into it left to right, so `10 | sub 3` is `sub(3, 10)`
//!     = 10 - 3. Arguments coerce with [Value::as_f64]. Dividing by zero gives 0.
//!
//! Comparison and Logic
//!
//!     The last argument is the left side, the first argument the right side. Strings
//!     compare as strings only against strings; everything else compares numerically.
//!     `and`, `or` and `not` use [Value::truthy] and always return a Boolean.
//!
//! Selection
//!
//!     `nullish(a, b)` returns `b` when `a` is a zero value, else `a`. Note that
//!     `x ?? y` converts to `x | nullish y`, which calls `nullish(y, x)`.
//!
//!     `tern(cond, a, b)` picks `a` or `b`. A Boolean condition is used as is, anything
//!     else is true when its numeric value is non-zero. Missing operands are Invalid.

use super::value::Value;
use std::cmp::Ordering;

fn fold(args: &[Value], op: impl Fn(f64, f64) -> f64) -> Value {
    let Some((last, rest)) = args.split_last() else {
        return Value::Number(0.0);
    };
    let acc = rest
        .iter()
        .fold(last.as_f64(), |acc, operand| op(acc, operand.as_f64()));
    Value::Number(acc)
}

pub fn add(args: &[Value]) -> Value {
    fold(args, |a, b| a + b)
}

pub fn sub(args: &[Value]) -> Value {
    fold(args, |a, b| a - b)
}

pub fn mul(args: &[Value]) -> Value {
    fold(args, |a, b| a * b)
}

pub fn div(args: &[Value]) -> Value {
    let Some((last, rest)) = args.split_last() else {
        return Value::Number(0.0);
    };
    let mut acc = last.as_f64();
    for operand in rest {
        let divisor = operand.as_f64();
        if divisor == 0.0 {
            return Value::Number(0.0);
        }
        acc /= divisor;
    }
    Value::Number(acc)
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Invalid => None,
    }
}

fn equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Invalid, Value::Invalid) => true,
        _ => match (numeric(left), numeric(right)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => left.as_f64().partial_cmp(&right.as_f64()),
    }
}

/// Left side (last argument) and right side (first argument)
fn sides(args: &[Value]) -> Option<(&Value, &Value)> {
    if args.len() < 2 {
        return None;
    }
    Some((&args[args.len() - 1], &args[0]))
}

fn ordered(args: &[Value], accept: impl Fn(Ordering) -> bool) -> Value {
    let result = sides(args)
        .and_then(|(left, right)| compare(left, right))
        .map(accept)
        .unwrap_or(false);
    Value::Boolean(result)
}

/// True when the left side equals any other argument
pub fn eq(args: &[Value]) -> Value {
    let Some((left, rest)) = args.split_last() else {
        return Value::Boolean(false);
    };
    Value::Boolean(rest.iter().any(|other| equal(left, other)))
}

pub fn ne(args: &[Value]) -> Value {
    let result = sides(args)
        .map(|(left, right)| !equal(left, right))
        .unwrap_or(false);
    Value::Boolean(result)
}

pub fn gt(args: &[Value]) -> Value {
    ordered(args, |ord| ord == Ordering::Greater)
}

pub fn lt(args: &[Value]) -> Value {
    ordered(args, |ord| ord == Ordering::Less)
}

pub fn gte(args: &[Value]) -> Value {
    ordered(args, |ord| ord != Ordering::Less)
}

pub fn lte(args: &[Value]) -> Value {
    ordered(args, |ord| ord != Ordering::Greater)
}

pub fn and(args: &[Value]) -> Value {
    Value::Boolean(!args.is_empty() && args.iter().all(Value::truthy))
}

pub fn or(args: &[Value]) -> Value {
    Value::Boolean(args.iter().any(Value::truthy))
}

pub fn not(args: &[Value]) -> Value {
    Value::Boolean(!args.last().map(Value::truthy).unwrap_or(false))
}

pub fn nullish(args: &[Value]) -> Value {
    match args.first() {
        Some(first) if !first.is_zero() => first.clone(),
        _ => args.get(1).cloned().unwrap_or(Value::Invalid),
    }
}

pub fn tern(args: &[Value]) -> Value {
    let condition = match args.first() {
        Some(Value::Boolean(b)) => *b,
        Some(other) => other.as_f64() != 0.0,
        None => false,
    };
    let pick = if condition { 1 } else { 2 };
    args.get(pick).cloned().unwrap_or(Value::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn n(x: f64) -> Value {
        Value::Number(x)
    }

    #[test]
    fn test_accumulator_is_last() {
        // 10 | sub 3
        assert_eq!(sub(&[n(3.0), n(10.0)]), n(7.0));
        // 12 | div 4
        assert_eq!(div(&[n(4.0), n(12.0)]), n(3.0));
        assert_eq!(add(&[n(1.0), n(2.0), n(3.0)]), n(6.0));
        assert_eq!(sub(&[n(1.0), n(2.0), n(10.0)]), n(7.0));
    }

    #[test]
    fn test_arithmetic_coerces() {
        assert_eq!(add(&[Value::from("2"), Value::Boolean(true)]), n(3.0));
        assert_eq!(mul(&[Value::from("x"), n(5.0)]), n(0.0));
        assert_eq!(add(&[]), n(0.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(div(&[n(0.0), n(5.0)]), n(0.0));
        assert_eq!(div(&[Value::Invalid, n(5.0)]), n(0.0));
    }

    #[rstest]
    #[case(eq, 1.0, 1.0, true)]
    #[case(eq, 1.0, 2.0, false)]
    #[case(ne, 1.0, 2.0, true)]
    #[case(gt, 3.0, 2.0, true)]
    #[case(gt, 2.0, 3.0, false)]
    #[case(lt, 2.0, 3.0, true)]
    #[case(gte, 2.0, 2.0, true)]
    #[case(lte, 3.0, 2.0, false)]
    fn test_comparisons(
        #[case] f: fn(&[Value]) -> Value,
        #[case] left: f64,
        #[case] right: f64,
        #[case] expected: bool,
    ) {
        // left | f right
        assert_eq!(f(&[n(right), n(left)]), Value::Boolean(expected));
    }

    #[test]
    fn test_eq_matches_any() {
        assert_eq!(eq(&[n(1.0), n(2.0), n(2.0)]), Value::Boolean(true));
        assert_eq!(eq(&[Value::from("a"), Value::from("a")]), Value::Boolean(true));
        assert_eq!(eq(&[Value::from("2"), n(2.0)]), Value::Boolean(true));
        assert_eq!(eq(&[Value::from("a"), n(0.0)]), Value::Boolean(false));
        assert_eq!(eq(&[n(1.0)]), Value::Boolean(false));
    }

    #[test]
    fn test_string_ordering() {
        assert_eq!(gt(&[Value::from("apple"), Value::from("pear")]), Value::Boolean(true));
        assert_eq!(lt(&[n(1.0)]), Value::Boolean(false));
    }

    #[test]
    fn test_logic() {
        assert_eq!(and(&[n(1.0), Value::from("x")]), Value::Boolean(true));
        assert_eq!(and(&[n(1.0), Value::Invalid]), Value::Boolean(false));
        assert_eq!(or(&[n(0.0), Value::Boolean(true)]), Value::Boolean(true));
        assert_eq!(or(&[]), Value::Boolean(false));
        assert_eq!(not(&[n(0.0)]), Value::Boolean(true));
        assert_eq!(not(&[Value::from("x")]), Value::Boolean(false));
        assert_eq!(not(&[]), Value::Boolean(true));
    }

    #[test]
    fn test_nullish() {
        assert_eq!(nullish(&[n(0.0), n(5.0)]), n(5.0));
        assert_eq!(nullish(&[Value::from(""), n(5.0)]), n(5.0));
        assert_eq!(nullish(&[Value::Invalid, n(5.0)]), n(5.0));
        assert_eq!(nullish(&[n(3.0), n(5.0)]), n(3.0));
        assert_eq!(nullish(&[]), Value::Invalid);
    }

    #[test]
    fn test_tern() {
        assert_eq!(tern(&[n(1.0), n(2.0), n(3.0)]), n(2.0));
        assert_eq!(tern(&[n(0.0), n(2.0), n(3.0)]), n(3.0));
        assert_eq!(tern(&[Value::Boolean(false), n(2.0), n(3.0)]), n(3.0));
        assert_eq!(tern(&[Value::from("7"), n(2.0), n(3.0)]), n(2.0));
        assert_eq!(tern(&[n(0.0), n(2.0)]), Value::Invalid);
        assert_eq!(tern(&[]), Value::Invalid);
    }
}
