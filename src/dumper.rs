//! File-facing entry point for serialization: render to a buffer, then
//! write it out in one shot.

use std::fs;
use std::path::Path;

use crate::error::SaveError;
use crate::serializer::{stringify_with_options, SerializerOptions};
use crate::value::Value;

/// Serializes `value` and writes it to `path`, creating or truncating the file.
pub fn serialize_to_file(value: &Value, path: impl AsRef<Path>, options: Option<SerializerOptions>) -> Result<(), SaveError> {
    let path = path.as_ref();
    let text = stringify_with_options(value, options.unwrap_or_default())?;
    fs::write(path, text).map_err(|source| SaveError::Io {
        path: path.to_owned(),
        source,
    })?;
    log::debug!("saved document to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_from_slice;

    #[test]
    fn round_trips_through_a_temp_file() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("yamltree-dumper-test-{:p}.yaml", &dir));
        let value = Value::mapping({
            let mut m = crate::value::Mapping::new();
            m.insert("key".to_owned(), Value::from_string("value"));
            m
        });
        serialize_to_file(&value, &path, None).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let parsed = parse_from_slice(&text).unwrap();
        assert_eq!(parsed.root, value);
        let _ = fs::remove_file(&path);
    }
}
