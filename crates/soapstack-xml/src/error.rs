//! Error types for XML encoding and decoding.
//!
//! Encode errors are local contract violations raised while converting a
//! value to XML. Decode errors additionally include [`DecodeError::ServerFault`],
//! which originates from the remote peer and is semantically distinct
//! from every structural/validation failure.

use std::fmt;
use std::io;

use soapstack_schema::{SchemaError, SoapValue};

/// Errors raised while encoding a value to XML.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// A scalar value failed validation against its declared type.
    #[error("invalid value for type {type_name}: {value}")]
    InvalidValue {
        /// The declared type.
        type_name: String,
        /// Display form of the offending value.
        value: String,
    },

    /// A non-optional property has no corresponding key in the value.
    #[error("missing required property {property} on type {type_name}")]
    MissingRequiredProperty {
        /// The owning object type.
        type_name: String,
        /// The absent property.
        property: String,
    },

    /// A property's array-ness disagrees with the supplied value shape.
    #[error("property {property} on type {type_name} expects {expected}, got {actual}")]
    ArrayShapeMismatch {
        /// The owning object type.
        type_name: String,
        /// The mismatched property.
        property: String,
        /// `"a sequence"` or `"a single value"`.
        expected: &'static str,
        /// Variant tag of what was supplied.
        actual: &'static str,
    },

    /// The value carries keys no declared property consumes, and the type
    /// has no descendant types left to try.
    #[error("value keys {keys:?} are not declared on type {type_name} or its descendants")]
    UnrecognizedProperties {
        /// The declared object type the search started from.
        type_name: String,
        /// The unconsumed keys.
        keys: Vec<String>,
    },

    /// A type-graph lookup failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// An I/O error from the XML writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The writer produced bytes that are not valid UTF-8.
    #[error("generated XML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors raised while decoding XML into a value.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A type-override attribute names a type absent from the index.
    #[error("unrecognized type override: {0}")]
    UnrecognizedType(String),

    /// A child element's tag matches no declared property on the resolved
    /// type or any of its descendants.
    #[error("unrecognized property element {element} for type {type_name}")]
    UnrecognizedProperty {
        /// The resolved object type.
        type_name: String,
        /// The unmatched child tag.
        element: String,
    },

    /// An element has child elements but its resolved type is a primitive
    /// or enum.
    #[error("type {type_name} cannot hold child elements")]
    InvalidUsage {
        /// The resolved non-object type.
        type_name: String,
    },

    /// Leaf text failed to parse against its declared type.
    #[error("invalid {type_name} value: {text}")]
    InvalidValue {
        /// The declared leaf type.
        type_name: String,
        /// The offending text.
        text: String,
    },

    /// The remote peer reported an operation-level failure.
    #[error("server fault: {0}")]
    ServerFault(Fault),

    /// A type-graph lookup failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The underlying XML reader reported an error.
    #[error("XML processing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The input text is not a usable XML document.
    #[error("malformed XML: {0}")]
    Malformed(String),
}

/// A decoded fault envelope.
///
/// `code` and `message` are pulled from the conventional `faultcode` /
/// `faultstring` fields when present; `detail` carries the full decoded
/// fault value.
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    /// Fault code reported by the peer, if present.
    pub code: Option<String>,
    /// Human-readable fault message, if present.
    pub message: Option<String>,
    /// The complete decoded fault value.
    pub detail: SoapValue,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{code}: {message}"),
            (Some(code), None) => write!(f, "{code}"),
            (None, Some(message)) => write!(f, "{message}"),
            (None, None) => write!(f, "unspecified fault"),
        }
    }
}
