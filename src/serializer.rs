//! `Value` tree → YAML text, with quoting, indentation, key sorting, and
//! optional flow-style compaction.

use std::io::Write;

use crate::error::EmitterError;
use crate::schema;
use crate::value::{Mapping, Value};

/// Tunables for [`write`]/[`stringify_with_options`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SerializerOptions {
    /// Spaces per nesting level. Default 2.
    pub indent_size: u32,
    /// Render an all-scalar sequence as `[...]` when short enough.
    pub compact_sequences: bool,
    /// Render a small all-scalar mapping as `{...}` when short enough.
    pub compact_mappings: bool,
    /// Maximum rendered length (bytes) a flow collection may reach before
    /// falling back to block style.
    pub flow_threshold: u32,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        SerializerOptions {
            indent_size: 2,
            compact_sequences: false,
            compact_mappings: false,
            flow_threshold: 60,
        }
    }
}

/// Renders `value` as a `String` using default options.
pub fn stringify(value: &Value) -> Result<String, EmitterError> {
    stringify_with_options(value, SerializerOptions::default())
}

/// Renders `value` as a `String` using the given options.
pub fn stringify_with_options(value: &Value, options: SerializerOptions) -> Result<String, EmitterError> {
    let mut buf = Vec::new();
    write(value, &mut buf, options)?;
    Ok(String::from_utf8(buf).expect("serializer only ever writes valid UTF-8"))
}

/// Writes `value` to `writer` as YAML text, followed by a single trailing LF.
pub fn write(value: &Value, mut writer: impl Write, options: SerializerOptions) -> Result<(), EmitterError> {
    let mut out = String::new();
    emit(value, 0, &mut out, &options);
    out.push('\n');
    writer.write_all(out.as_bytes())?;
    log::debug!("serialized {} bytes", out.len());
    Ok(())
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Sequence(_) | Value::Mapping(_))
}

fn push_indent(out: &mut String, level: u32, options: &SerializerOptions) {
    for _ in 0..(level * options.indent_size) {
        out.push(' ');
    }
}

fn emit(value: &Value, level: u32, out: &mut String, options: &SerializerOptions) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => {
            let mut buf = itoa::Buffer::new();
            out.push_str(buf.format(*i));
        }
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::String(s) => emit_string(s, out),
        Value::Sequence(items) => emit_sequence(items, level, out, options),
        Value::Mapping(map) => emit_mapping(map, level, out, options),
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        return ".nan".to_owned();
    }
    if f.is_infinite() {
        return if f > 0.0 { ".inf".to_owned() } else { "-.inf".to_owned() };
    }
    let mut buf = ryu::Buffer::new();
    let s = buf.format(f);
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s.to_owned()
    } else {
        format!("{s}.0")
    }
}

const INDICATOR_CHARS: &str = "-?:,[]{}#&*!|>'\"%@`\\\n\r\t";

fn needs_quoting(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if matches!(
        s,
        "null" | "Null" | "NULL" | "~" | "true" | "True" | "TRUE" | "false" | "False" | "FALSE" |
        "yes" | "Yes" | "YES" | "no" | "No" | "NO" | "on" | "On" | "ON" | "off" | "Off" | "OFF"
    ) {
        return true;
    }
    if schema::looks_like_non_string(s) {
        return true;
    }
    let first = s.chars().next().expect("checked non-empty above");
    if INDICATOR_CHARS.contains(first) {
        return true;
    }
    if s.starts_with(' ') || s.ends_with(' ') {
        return true;
    }
    s.chars().any(|c| (c as u32) < 0x20 || (c as u32) == 0x7F || c == ':' || c == '#')
}

fn emit_string(s: &str, out: &mut String) {
    if !needs_quoting(s) {
        out.push_str(s);
        return;
    }
    out.push('"');
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c if (c as u32) < 0x20 || (c as u32) == 0x7F => {
                out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn render_flow_sequence(items: &[Value], options: &SerializerOptions) -> String {
    let mut out = String::from("[");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        emit(item, 0, &mut out, options);
    }
    out.push(']');
    out
}

fn render_flow_mapping(map: &Mapping, keys: &[&String], options: &SerializerOptions) -> String {
    let mut out = String::from("{");
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        emit_string(key, &mut out);
        out.push_str(": ");
        emit(&map[key.as_str()], 0, &mut out, options);
    }
    out.push('}');
    out
}

fn emit_sequence(items: &[Value], level: u32, out: &mut String, options: &SerializerOptions) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    if options.compact_sequences && items.iter().all(is_scalar) {
        let flow = render_flow_sequence(items, options);
        if flow.len() as u32 <= options.flow_threshold {
            out.push_str(&flow);
            return;
        }
    }
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        push_indent(out, level, options);
        match item {
            Value::Sequence(s) if !s.is_empty() => {
                out.push('-');
                out.push('\n');
                emit(item, level + 1, out, options);
            }
            Value::Mapping(m) if !m.is_empty() => {
                out.push('-');
                out.push('\n');
                emit(item, level + 1, out, options);
            }
            _ => {
                out.push_str("- ");
                emit(item, level, out, options);
            }
        }
    }
}

fn emit_mapping(map: &Mapping, level: u32, out: &mut String, options: &SerializerOptions) {
    if map.is_empty() {
        out.push_str("{}");
        return;
    }
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    if options.compact_mappings && keys.len() <= 4 && map.values().all(is_scalar) {
        let flow = render_flow_mapping(map, &keys, options);
        if flow.len() as u32 <= options.flow_threshold {
            out.push_str(&flow);
            return;
        }
    }

    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        push_indent(out, level, options);
        let value = &map[key.as_str()];
        emit_string(key, out);
        out.push(':');
        match value {
            Value::Sequence(s) if !s.is_empty() => {
                out.push('\n');
                emit(value, level + 1, out, options);
            }
            Value::Mapping(m) if !m.is_empty() => {
                out.push('\n');
                emit(value, level + 1, out, options);
            }
            _ => {
                out.push(' ');
                emit(value, level, out, options);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_mapping_keys() {
        let mut map = Mapping::new();
        map.insert("name".to_owned(), Value::from_string("yaml"));
        map.insert("count".to_owned(), Value::from_int(100));
        map.insert("active".to_owned(), Value::from_bool(true));
        let out = stringify(&Value::mapping(map)).unwrap();
        assert_eq!(out, "active: true\ncount: 100\nname: yaml\n");
    }

    #[test]
    fn quotes_string_that_looks_like_null() {
        let out = stringify(&Value::from_string("null")).unwrap();
        assert_eq!(out, "\"null\"\n");
    }

    #[test]
    fn preserves_float_dot_zero() {
        let out = stringify(&Value::from_float(3.0)).unwrap();
        assert_eq!(out, "3.0\n");
    }

    #[test]
    fn sequence_block_style() {
        let out = stringify(&Value::sequence(vec![Value::from_int(1), Value::from_int(2), Value::from_int(3)])).unwrap();
        assert_eq!(out, "- 1\n- 2\n- 3\n");
    }

    #[test]
    fn nested_mapping_keeps_consistent_indent() {
        let mut inner = Mapping::new();
        inner.insert("x".to_owned(), Value::from_int(1));
        inner.insert("y".to_owned(), Value::from_int(2));
        let mut outer = Mapping::new();
        outer.insert("a".to_owned(), Value::mapping(inner));
        let out = stringify(&Value::mapping(outer)).unwrap();
        assert_eq!(out, "a:\n  x: 1\n  y: 2\n");
    }

    #[test]
    fn empty_collections() {
        assert_eq!(stringify(&Value::sequence(vec![])).unwrap(), "[]\n");
        assert_eq!(stringify(&Value::mapping(Mapping::new())).unwrap(), "{}\n");
    }

    #[test]
    fn always_ends_with_single_trailing_newline() {
        let out = stringify(&Value::from_string("hello")).unwrap();
        assert!(out.ends_with('\n') && !out.ends_with("\n\n"));
    }

    #[test]
    fn compact_sequence_when_enabled() {
        let options = SerializerOptions {
            compact_sequences: true,
            ..SerializerOptions::default()
        };
        let out = stringify_with_options(&Value::sequence(vec![Value::from_int(1), Value::from_int(2)]), options).unwrap();
        assert_eq!(out, "[1, 2]\n");
    }

    #[test]
    fn special_floats_round_trip_textually() {
        assert_eq!(stringify(&Value::from_float(f64::INFINITY)).unwrap(), ".inf\n");
        assert_eq!(stringify(&Value::from_float(f64::NEG_INFINITY)).unwrap(), "-.inf\n");
        assert_eq!(stringify(&Value::from_float(f64::NAN)).unwrap(), ".nan\n");
    }
}
