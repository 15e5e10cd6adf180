//! A YAML 1.2.2 reader and writer built around a tagged value tree.
//!
//! The crate is organized leaf-first: [`value`] and [`schema`] have no
//! dependents within the crate, [`scanner`] turns text into [`token::Token`]s,
//! [`parser`] turns tokens into a [`value::Value`] tree, and [`serializer`]
//! turns a tree back into text. [`loader`] and [`dumper`] are thin
//! file-facing wrappers around the parser and serializer respectively.
#![deny(unsafe_code)]

mod dumper;
mod error;
mod loader;
mod parser;
mod scanner;
mod schema;
mod serializer;
mod token;
mod value;

pub use crate::dumper::serialize_to_file;
pub use crate::error::{EmitterError, Error, LoadError, Mark, ParserError, SaveError, ScannerError, SchemaError};
pub use crate::loader::parse_from_file;
pub use crate::parser::{parse_from_slice, Parsed};
pub use crate::serializer::{stringify, stringify_with_options, write, SerializerOptions};
pub use crate::token::{ScalarStyle, Token, TokenData};
pub use crate::value::{Mapping, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_reserializes_a_manifest() {
        let input = "name: demo\nreplicas: 3\ntags:\n  - web\n  - stable\n";
        let parsed = parse_from_slice(input).unwrap();
        let map = parsed.root.as_mapping().unwrap();
        assert_eq!(map.get("name").unwrap().as_str(), Some("demo"));
        assert_eq!(map.get("replicas").unwrap().as_int(), Some(3));

        let out = stringify(&parsed.root).unwrap();
        let reparsed = parse_from_slice(&out).unwrap();
        assert_eq!(reparsed.root, parsed.root);
    }

    #[test]
    fn crate_level_error_wraps_parser_and_emitter_errors() {
        fn accepts_error(_: Error) {}
        let parser_err = ParserError::UnexpectedEndOfStream;
        accepts_error(Error::from(parser_err));
    }
}
