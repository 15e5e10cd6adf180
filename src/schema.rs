//! JSON-Schema-based implicit typing of plain scalars, plus explicit
//! `!!tag` overrides.

use crate::error::SchemaError;
use crate::value::Value;

/// Classify a scalar lexeme into a [`Value`], honoring an explicit tag when
/// present and falling back to JSON-Schema implicit typing otherwise.
pub fn resolve_scalar(lexeme: &str, tag: Option<&str>) -> Result<Value, SchemaError> {
    match tag {
        Some("!!null") => Ok(Value::Null),
        Some("!!bool") => parse_bool(lexeme)
            .map(Value::Bool)
            .ok_or_else(|| SchemaError::InvalidBool(lexeme.to_owned())),
        Some("!!int") => parse_int(lexeme)
            .map(Value::Int)
            .ok_or_else(|| SchemaError::InvalidInt(lexeme.to_owned())),
        Some("!!float") => parse_float(lexeme)
            .map(Value::Float)
            .ok_or_else(|| SchemaError::InvalidFloat(lexeme.to_owned())),
        Some("!!str") | Some(_) => Ok(Value::String(lexeme.to_owned())),
        None => Ok(resolve_implicit(lexeme)),
    }
}

fn resolve_implicit(lexeme: &str) -> Value {
    if is_null(lexeme) {
        return Value::Null;
    }
    if let Some(b) = parse_bool(lexeme) {
        return Value::Bool(b);
    }
    if let Some(i) = parse_int(lexeme) {
        return Value::Int(i);
    }
    if let Some(f) = parse_special_float(lexeme) {
        return Value::Float(f);
    }
    if looks_like_float(lexeme) {
        if let Some(f) = parse_float(lexeme) {
            return Value::Float(f);
        }
    }
    Value::String(lexeme.to_owned())
}

fn is_null(lexeme: &str) -> bool {
    matches!(lexeme, "" | "null" | "Null" | "NULL" | "~")
}

fn parse_bool(lexeme: &str) -> Option<bool> {
    match lexeme {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_int(lexeme: &str) -> Option<i64> {
    let (sign, rest) = match lexeme.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, lexeme.strip_prefix('+').unwrap_or(lexeme)),
    };
    if rest.is_empty() {
        return None;
    }
    if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        let digits = strip_underscores(hex);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return i64::from_str_radix(&digits, 16).ok().map(|v| v * sign);
    }
    if let Some(oct) = rest.strip_prefix("0o").or_else(|| rest.strip_prefix("0O")) {
        let digits = strip_underscores(oct);
        if digits.is_empty() || !digits.chars().all(|c| ('0'..='7').contains(&c)) {
            return None;
        }
        return i64::from_str_radix(&digits, 8).ok().map(|v| v * sign);
    }
    if !rest.chars().all(|c| c.is_ascii_digit() || c == '_') || !rest.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let digits = strip_underscores(rest);
    digits.parse::<i64>().ok().map(|v| v * sign)
}

fn parse_special_float(lexeme: &str) -> Option<f64> {
    match lexeme {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
        _ => None,
    }
}

/// Cheap pre-filter before attempting the (allocating) float parse: requires
/// at most one `.` and at most one `e`/`E`, with signs only at the start or
/// immediately after the exponent marker. This is what keeps `1.0.0` a
/// string instead of a float.
fn looks_like_float(lexeme: &str) -> bool {
    let bytes = lexeme.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut i = 0;
    if bytes[i] == b'+' || bytes[i] == b'-' {
        i += 1;
    }
    if i >= bytes.len() {
        return false;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    let mut prev_was_exp = false;
    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b'0'..=b'9' | b'_' => {
                if c != b'_' {
                    seen_digit = true;
                }
                prev_was_exp = false;
            }
            b'.' => {
                if seen_dot || seen_exp {
                    return false;
                }
                seen_dot = true;
                prev_was_exp = false;
            }
            b'e' | b'E' => {
                if seen_exp || !seen_digit {
                    return false;
                }
                seen_exp = true;
                prev_was_exp = true;
            }
            b'+' | b'-' => {
                if !prev_was_exp {
                    return false;
                }
                prev_was_exp = false;
            }
            _ => return false,
        }
        i += 1;
    }
    seen_digit && (seen_dot || seen_exp)
}

fn parse_float(lexeme: &str) -> Option<f64> {
    strip_underscores(lexeme).parse::<f64>().ok()
}

/// True if implicit classification would treat `lexeme` as something other
/// than a plain string. Used by the serializer's quoting decision so a
/// string that merely *looks* like a number or null round-trips correctly.
pub(crate) fn looks_like_non_string(lexeme: &str) -> bool {
    !matches!(resolve_implicit(lexeme), Value::String(_))
}

fn strip_underscores(s: &str) -> String {
    if s.contains('_') {
        s.chars().filter(|&c| c != '_').collect()
    } else {
        s.to_owned()
    }
}
