//! Runtime type-graph model for schema-directed SOAP marshalling.
//!
//! This crate provides the data structures that describe a SOAP schema at
//! runtime — primitives, enumerations, and object types related by single
//! inheritance — together with the property resolver that flattens a type's
//! inheritance chain into its full effective property set.
//!
//! # Key components
//!
//! - [`SoapType`], [`Property`], and [`TypeIndex`] — the immutable type graph,
//!   built once per schema via [`TypeIndex::builder`] and shared read-only
//!   across encoder/decoder instances
//! - [`PropertyResolver`] — memoized inheritance flattening
//! - [`SoapValue`] — the dynamic structured value the XML layer converts
//!   to and from
//!
//! The type graph carries no behavior beyond structural queries; all
//! conversion logic lives in the XML layer.

mod error;
mod index;
mod resolver;
mod types;
mod value;

pub use error::{SchemaError, SchemaResult};
pub use index::{TypeIndex, TypeIndexBuilder};
pub use resolver::PropertyResolver;
pub use types::{EnumType, ObjectType, Primitive, Property, SoapType};
pub use value::SoapValue;
