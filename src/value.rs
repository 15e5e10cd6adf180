use indexmap::IndexMap;

/// An ordered-insertion YAML mapping.
pub type Mapping = IndexMap<String, Value>;

/// A parsed or to-be-serialized YAML value.
///
/// `Value` owns every string and child it reaches; dropping a `Value` drops
/// its whole subtree. Anchors are resolved by deep-cloning the aliased
/// subtree at each alias site (see `DESIGN.md`), so there is never shared
/// substructure between two `Value`s.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    pub fn from_bool(b: bool) -> Value {
        Value::Bool(b)
    }

    pub fn from_int(i: i64) -> Value {
        Value::Int(i)
    }

    pub fn from_float(f: f64) -> Value {
        Value::Float(f)
    }

    pub fn from_string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    pub fn sequence(items: Vec<Value>) -> Value {
        Value::Sequence(items)
    }

    pub fn mapping(entries: Mapping) -> Value {
        Value::Mapping(entries)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as an `f64`, widening an `Int` if necessary. This
    /// widening is a read-time convenience only: it never changes the stored
    /// variant (see the data model's `int`→`float` widening invariant).
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}
