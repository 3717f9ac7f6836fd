//! Presentation helpers
//!
//!     Formatting functions that are not operators. They are not in the shared registry;
//!     [FunctionRegistry::with_presentation](super::FunctionRegistry::with_presentation)
//!     adds them to a copy.
//!
//! thousand
//!
//!     `x | thousand [sep [decimals [point]]]`, called as `thousand(sep, decimals, point, x)`.
//!     Defaults are `.` for the group separator, 0 decimals and `,` for the decimal point, so
//!     `1234567 | thousand` is `1.234.567` and `1234567.891 | thousand "." 2 ","` is
//!     `1.234.567,89`. The value is rounded half away from zero. A value that is not a
//!     number, or a string that does not parse as one, formats as "".
//!
//! dollar
//!
//!     `"$"` followed by `thousand(".", 2, ",", x)`: `1234.5 | dollar` is `$1.234,50`.

use super::value::Value;

const DEFAULT_SEPARATOR: &str = ".";
const DEFAULT_POINT: &str = ",";

fn piped(args: &[Value]) -> Value {
    args.last().cloned().unwrap_or(Value::Invalid)
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::String(s) => s.parse().ok(),
        Value::Boolean(_) | Value::Invalid => None,
    }
}

fn text_option<'a>(args: &'a [Value], index: usize, default: &'a str) -> &'a str {
    match args.get(index) {
        Some(Value::String(s)) => s.as_str(),
        _ => default,
    }
}

fn decimals_option(args: &[Value], index: usize) -> usize {
    match args.get(index) {
        Some(Value::Number(n)) if *n >= 0.0 && n.fract() == 0.0 => *n as usize,
        _ => 0,
    }
}

/// Group the integer digits of `n` in threes
pub fn format_thousands(n: f64, separator: &str, decimals: usize, point: &str) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (n * scale).round() / scale;
    let text = format!("{:.*}", decimals, rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (text.as_str(), ""),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 * separator.len() + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    if decimals > 0 && !frac_part.is_empty() {
        out.push_str(point);
        out.push_str(frac_part);
    }
    out
}

pub fn thousand(args: &[Value]) -> Value {
    let Some(n) = number_of(&piped(args)) else {
        return Value::String(String::new());
    };

    // options only count when the value is preceded by them
    let options = &args[..args.len().saturating_sub(1)];
    let separator = text_option(options, 0, DEFAULT_SEPARATOR);
    let decimals = decimals_option(options, 1);
    let point = text_option(options, 2, DEFAULT_POINT);

    Value::String(format_thousands(n, separator, decimals, point))
}

pub fn dollar(args: &[Value]) -> Value {
    let formatted = thousand(&[
        Value::from(DEFAULT_SEPARATOR),
        Value::Number(2.0),
        Value::from(DEFAULT_POINT),
        piped(args),
    ]);
    Value::String(format!("${}", formatted))
}

pub fn json(args: &[Value]) -> Value {
    Value::String(piped(args).to_json().to_string())
}
