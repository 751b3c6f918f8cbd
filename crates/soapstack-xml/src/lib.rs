//! Schema-directed XML marshalling for Soapstack.
//!
//! This crate converts between [`SoapValue`](soapstack_schema::SoapValue)
//! structured values and XML text, driven entirely by a runtime
//! [`TypeIndex`](soapstack_schema::TypeIndex) rather than compiled,
//! per-type code.
//!
//! # Key components
//!
//! - [`Encoder`] — value plus declared type to XML fragment, with
//!   structural subtype inference and `xsi:type` emission
//! - [`Decoder`] — XML element plus declared type to value, honoring
//!   `xsi:type` overrides, with memoized conversion and fault-envelope
//!   detection
//! - [`XmlElement`] — the parsed element tree both sides operate on
//!
//! # Wire conventions
//!
//! - Type overrides: a `type` attribute (schema-instance style, so
//!   `xsi:type` qualifies) naming the concrete subtype
//! - Booleans: lowercase `true`/`false`
//! - Text escaping: the five reserved characters (`& < > " '`), applied
//!   to text content only, never to tag names
//! - Fragments carry no XML declaration; the caller wraps them in the
//!   operation envelope

mod decode;
mod element;
mod encode;
mod error;

pub use decode::Decoder;
pub use element::XmlElement;
pub use encode::{Encoder, SubtypeHint};
pub use error::{DecodeError, EncodeError, Fault};
