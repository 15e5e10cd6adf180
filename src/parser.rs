//! Token stream → `Value` tree, with one-token lookahead, anchor/alias
//! resolution, and tag propagation.

use std::collections::{HashMap, VecDeque};

use crate::error::{Mark, ParserError, SchemaError};
use crate::scanner::Scanner;
use crate::schema;
use crate::token::{ScalarStyle, Token, TokenData};
use crate::value::{Mapping, Value};

/// The root of a parsed document, plus whatever storage it owns.
///
/// Dropping a `Parsed` recursively drops the whole `Value` tree; there is no
/// separate arena to release.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub root: Value,
}

/// Parses one YAML document from a string.
pub fn parse_from_slice(input: &str) -> Result<Parsed, ParserError> {
    let mut parser = Parser::new(input);
    let root = parser.parse_document()?;
    log::debug!("parsed document, root is a {}", value_kind(&root));
    Ok(Parsed { root })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
    }
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    pending: VecDeque<Token>,
    anchors: HashMap<String, Value>,
    current_tag: Option<String>,
    flow_depth: i32,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            scanner: Scanner::new(input),
            pending: VecDeque::new(),
            anchors: HashMap::new(),
            current_tag: None,
            flow_depth: 0,
        }
    }

    fn next_token(&mut self) -> Result<Token, ParserError> {
        let token = match self.pending.pop_front() {
            Some(token) => token,
            None => self.scanner.next()?,
        };
        log::trace!("token: {:?}", token.data);
        Ok(token)
    }

    fn push_back(&mut self, token: Token) {
        self.pending.push_front(token);
    }

    fn parse_document(&mut self) -> Result<Value, ParserError> {
        let first = self.next_token()?;
        let mut next = if matches!(first.data, TokenData::StreamStart) {
            self.next_token()?
        } else {
            first
        };
        if matches!(next.data, TokenData::DocumentStart) {
            log::debug!("document start marker");
            next = self.next_token()?;
        }
        if matches!(next.data, TokenData::StreamEnd | TokenData::DocumentEnd) {
            return Ok(Value::Null);
        }
        self.parse_value(next)
    }

    fn parse_value(&mut self, token: Token) -> Result<Value, ParserError> {
        match token.data {
            TokenData::Scalar { value, style } => self.parse_scalar_or_mapping(value, style, token.start_mark),
            TokenData::Alias { name } => self
                .anchors
                .get(&name)
                .cloned()
                .ok_or(ParserError::UnknownAlias { name, mark: token.start_mark }),
            TokenData::Anchor { name } => {
                let next = self.next_token()?;
                let value = self.parse_value(next)?;
                self.anchors.insert(name, value.clone());
                Ok(value)
            }
            TokenData::Tag { value: tag } => {
                let next = self.next_token()?;
                if matches!(
                    next.data,
                    TokenData::FlowSequenceStart | TokenData::FlowMappingStart | TokenData::BlockEntry | TokenData::Key
                ) {
                    return Err(ParserError::InvalidTag { mark: token.start_mark });
                }
                self.current_tag = Some(tag);
                self.parse_value(next)
            }
            TokenData::BlockEntry => self.parse_block_sequence(token.start_mark.column),
            TokenData::FlowSequenceStart => self.parse_flow_sequence(),
            TokenData::FlowMappingStart => self.parse_flow_mapping(),
            TokenData::Key => self.parse_explicit_key_mapping(token),
            _ => Err(ParserError::UnexpectedToken { mark: token.start_mark }),
        }
    }

    fn parse_scalar_or_mapping(&mut self, lexeme: String, style: ScalarStyle, mark: Mark) -> Result<Value, ParserError> {
        if self.flow_depth > 0 {
            return self.resolve(lexeme, style, mark);
        }
        let next = self.next_token()?;
        if matches!(next.data, TokenData::Value) {
            return self.parse_block_mapping(lexeme, mark.column);
        }
        self.push_back(next);
        self.resolve(lexeme, style, mark)
    }

    fn resolve(&mut self, lexeme: String, style: ScalarStyle, mark: Mark) -> Result<Value, ParserError> {
        let tag = self.current_tag.take();
        match (style, tag) {
            (_, Some(tag)) => schema::resolve_scalar(&lexeme, Some(&tag)).map_err(|e| schema_to_parser_error(e, mark)),
            (ScalarStyle::Plain, None) => Ok(schema::resolve_scalar(&lexeme, None).expect("implicit classification never fails")),
            (_, None) => Ok(Value::String(lexeme)),
        }
    }

    /// `column` is the column of this mapping's first key; a sibling key
    /// must repeat it exactly, since the scanner emits no dedent token to
    /// mark where a nested mapping or sequence ends.
    fn parse_block_mapping(&mut self, first_key: String, column: u64) -> Result<Value, ParserError> {
        let mut map = Mapping::new();
        let mut key = first_key;
        loop {
            let value_token = self.next_token()?;
            let value = if matches!(
                value_token.data,
                TokenData::StreamEnd | TokenData::DocumentEnd | TokenData::DocumentStart
            ) || value_token.start_mark.column <= column
            {
                self.push_back(value_token);
                Value::Null
            } else {
                self.parse_value(value_token)?
            };
            map.insert(key, value);

            let candidate = self.next_token()?;
            match candidate.data {
                TokenData::Scalar { value: lexeme, style: ScalarStyle::Plain }
                    if self.flow_depth == 0 && candidate.start_mark.column == column =>
                {
                    let colon = self.next_token()?;
                    if matches!(colon.data, TokenData::Value) {
                        key = lexeme;
                        continue;
                    }
                    self.push_back(colon);
                    self.push_back(Token::new(
                        TokenData::Scalar { value: lexeme, style: ScalarStyle::Plain },
                        candidate.start_mark,
                        candidate.end_mark,
                    ));
                    break;
                }
                _ => {
                    self.push_back(candidate);
                    break;
                }
            }
        }
        Ok(Value::Mapping(map))
    }

    /// `column` is the column of this sequence's first `-`; a sibling entry
    /// must repeat it exactly, for the same reason as `parse_block_mapping`.
    fn parse_block_sequence(&mut self, column: u64) -> Result<Value, ParserError> {
        let mut items = Vec::new();
        loop {
            let item_token = self.next_token()?;
            items.push(self.parse_value(item_token)?);
            let next = self.next_token()?;
            if matches!(next.data, TokenData::BlockEntry) && next.start_mark.column == column {
                continue;
            }
            self.push_back(next);
            break;
        }
        Ok(Value::Sequence(items))
    }

    fn parse_flow_sequence(&mut self) -> Result<Value, ParserError> {
        self.flow_depth += 1;
        let mut items = Vec::new();
        let result = loop {
            let token = self.next_token()?;
            match token.data {
                TokenData::FlowSequenceEnd => break Ok(()),
                TokenData::FlowEntry => continue,
                TokenData::StreamEnd => break Err(ParserError::UnexpectedEndOfStream),
                _ => items.push(self.parse_value(token)?),
            }
        };
        self.flow_depth -= 1;
        result?;
        Ok(Value::Sequence(items))
    }

    fn parse_flow_mapping(&mut self) -> Result<Value, ParserError> {
        self.flow_depth += 1;
        let mut map = Mapping::new();
        let result = self.parse_flow_mapping_body(&mut map);
        self.flow_depth -= 1;
        result?;
        Ok(Value::Mapping(map))
    }

    fn parse_flow_mapping_body(&mut self, map: &mut Mapping) -> Result<(), ParserError> {
        loop {
            let token = self.next_token()?;
            match token.data {
                TokenData::FlowMappingEnd => return Ok(()),
                TokenData::FlowEntry => continue,
                TokenData::StreamEnd => return Err(ParserError::UnexpectedEndOfStream),
                TokenData::Scalar { value: key, .. } => {
                    let colon = self.next_token()?;
                    if !matches!(colon.data, TokenData::Value) {
                        return Err(ParserError::InvalidSyntax {
                            problem: "expected ':' in flow mapping entry",
                            mark: colon.start_mark,
                        });
                    }
                    let value_token = self.next_token()?;
                    let value = self.parse_value(value_token)?;
                    map.insert(key, value);
                }
                _ => {
                    return Err(ParserError::InvalidSyntax {
                        problem: "flow mapping key must be a scalar",
                        mark: token.start_mark,
                    })
                }
            }
        }
    }

    fn parse_explicit_key_mapping(&mut self, first_key_token: Token) -> Result<Value, ParserError> {
        let mut map = Mapping::new();
        let mut key_marker_mark = first_key_token.start_mark;
        loop {
            let key_value_token = self.next_token()?;
            let key_value = self.parse_value(key_value_token)?;
            let key = key_value.as_str().map(str::to_owned).ok_or(ParserError::InvalidSyntax {
                problem: "explicit mapping key must resolve to a string",
                mark: key_marker_mark,
            })?;

            let colon = self.next_token()?;
            let value = if matches!(colon.data, TokenData::Value) {
                let value_token = self.next_token()?;
                self.parse_value(value_token)?
            } else {
                self.push_back(colon);
                Value::Null
            };
            map.insert(key, value);

            let candidate = self.next_token()?;
            if matches!(candidate.data, TokenData::Key) {
                key_marker_mark = candidate.start_mark;
                continue;
            }
            self.push_back(candidate);
            break;
        }
        Ok(Value::Mapping(map))
    }
}

fn schema_to_parser_error(err: SchemaError, mark: Mark) -> ParserError {
    match err {
        SchemaError::InvalidBool(lexeme) => ParserError::InvalidBool { lexeme, mark },
        SchemaError::InvalidInt(lexeme) => ParserError::InvalidInt { lexeme, mark },
        SchemaError::InvalidFloat(lexeme) => ParserError::InvalidFloat { lexeme, mark },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Value {
        parse_from_slice(input).unwrap().root
    }

    #[test]
    fn block_sequence_of_strings() {
        let v = parse("- a\n- b\n- c");
        let seq = v.as_sequence().unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq[0].as_str(), Some("a"));
        assert_eq!(seq[2].as_str(), Some("c"));
    }

    #[test]
    fn block_mapping_two_keys() {
        let v = parse("key1: value1\nkey2: value2");
        let map = v.as_mapping().unwrap();
        assert_eq!(map.get("key1").unwrap().as_str(), Some("value1"));
        assert_eq!(map.get("key2").unwrap().as_str(), Some("value2"));
    }

    #[test]
    fn flow_sequence_of_ints() {
        let v = parse("[1, 2, 3]");
        let seq = v.as_sequence().unwrap();
        assert_eq!(seq.iter().map(|v| v.as_int().unwrap()).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn flow_mapping() {
        let v = parse("{a: 1, b: 2}");
        let map = v.as_mapping().unwrap();
        assert_eq!(map.get("a").unwrap().as_int(), Some(1));
        assert_eq!(map.get("b").unwrap().as_int(), Some(2));
    }

    #[test]
    fn double_quoted_escape() {
        let v = parse(r#""line1\nline2""#);
        assert_eq!(v.as_str(), Some("line1\nline2"));
    }

    #[test]
    fn single_quoted_escape() {
        let v = parse("'it''s'");
        assert_eq!(v.as_str(), Some("it's"));
    }

    #[test]
    fn octal_and_hex_ints() {
        assert_eq!(parse("0o755").as_int(), Some(493));
        assert_eq!(parse("0xFF").as_int(), Some(255));
    }

    #[test]
    fn special_floats() {
        assert!(parse(".inf").as_float().unwrap().is_infinite());
        assert!(parse("-.inf").as_float().unwrap().is_sign_negative());
        assert!(parse(".nan").as_float().unwrap().is_nan());
    }

    #[test]
    fn document_start_marker_is_skipped() {
        let v = parse("---\nfoo: bar");
        assert_eq!(v.as_mapping().unwrap().get("foo").unwrap().as_str(), Some("bar"));
    }

    #[test]
    fn literal_block_scalar() {
        let v = parse("|\n  line1\n  line2");
        assert_eq!(v.as_str(), Some("line1\nline2\n"));
    }

    #[test]
    fn folded_block_scalar() {
        let v = parse(">\n  a\n  b");
        assert_eq!(v.as_str(), Some("a b"));
    }

    #[test]
    fn anchor_and_alias_deep_clone() {
        let v = parse("- &a\n  x: 1\n- *a");
        let seq = v.as_sequence().unwrap();
        assert_eq!(seq[0], seq[1]);
    }

    #[test]
    fn unknown_alias_is_an_error() {
        assert!(parse_from_slice("*missing").is_err());
    }

    #[test]
    fn explicit_tag_overrides_classification() {
        let v = parse("!!str 123");
        assert_eq!(v.as_str(), Some("123"));
    }

    #[test]
    fn tag_before_collection_is_rejected() {
        assert!(matches!(
            parse_from_slice("!!seq\n- 1"),
            Err(ParserError::InvalidTag { .. })
        ));
    }

    #[test]
    fn empty_document_is_null() {
        assert_eq!(parse(""), Value::Null);
        assert_eq!(parse("~"), Value::Null);
    }

    #[test]
    fn nested_mapping_of_sequences() {
        let v = parse("parent:\n  - a\n  - b\nother: 1");
        let map = v.as_mapping().unwrap();
        assert_eq!(map.get("parent").unwrap().as_sequence().unwrap().len(), 2);
        assert_eq!(map.get("other").unwrap().as_int(), Some(1));
    }

    #[test]
    fn empty_key_followed_by_sibling_is_null_not_nested() {
        let v = parse("a:\nb: 1");
        let map = v.as_mapping().unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.get("a").unwrap().is_null());
        assert_eq!(map.get("b").unwrap().as_int(), Some(1));
    }

    #[test]
    fn quoted_scalar_can_be_a_mapping_key() {
        let v = parse("\"key\": value");
        let map = v.as_mapping().unwrap();
        assert_eq!(map.get("key").unwrap().as_str(), Some("value"));
    }
}
