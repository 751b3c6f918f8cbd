//! The dynamic structured value the marshalling engine converts.
//!
//! A `SoapValue` carries no type information of its own; the declared
//! type is supplied externally at each conversion call, which is what
//! makes subtype disambiguation necessary in the first place.

use indexmap::IndexMap;

/// A structured runtime value: a scalar, an ordered sequence, or a
/// mapping from property name to nested value.
///
/// `Clone` is a deep copy and `PartialEq` is structural.
#[derive(Debug, Clone, PartialEq)]
pub enum SoapValue {
    /// Absent / null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer (covers both `int` and `long` wire types).
    Int(i64),
    /// Floating-point number.
    Double(f64),
    /// Text.
    String(String),
    /// Ordered sequence.
    List(Vec<SoapValue>),
    /// Property map, in insertion order.
    Object(IndexMap<String, SoapValue>),
}

impl SoapValue {
    /// Whether this is the absent value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this is a scalar (not a list or object).
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Object(_))
    }

    /// The boolean, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The number, if this is a `Double`.
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// The text, if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The sequence, if this is a `List`.
    #[must_use]
    pub fn as_list(&self) -> Option<&[SoapValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The property map, if this is an `Object`.
    #[must_use]
    pub fn as_object(&self) -> Option<&IndexMap<String, SoapValue>> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// The wire text form of a scalar: `None` for `Null`, lists, and
    /// objects. Booleans render as exactly `true`/`false`.
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(if *b { "true" } else { "false" }.to_owned()),
            Self::Int(i) => Some(i.to_string()),
            Self::Double(d) => Some(d.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Null | Self::List(_) | Self::Object(_) => None,
        }
    }

    /// A short tag naming the variant, for diagnostics.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }
}

impl From<&str> for SoapValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for SoapValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for SoapValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for SoapValue {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<bool> for SoapValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<SoapValue>> for SoapValue {
    fn from(items: Vec<SoapValue>) -> Self {
        Self::List(items)
    }
}

impl FromIterator<(String, SoapValue)> for SoapValue {
    fn from_iter<I: IntoIterator<Item = (String, SoapValue)>>(iter: I) -> Self {
        Self::Object(iter.into_iter().collect())
    }
}
