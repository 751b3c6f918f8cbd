//! Integration tests for the Soapstack marshalling engine.
//!
//! These tests drive the encoder and decoder together over a shared
//! fixture type graph, covering the full encode → parse → decode path
//! rather than either side in isolation.

use std::sync::Arc;
use std::sync::Once;

use soapstack_schema::{EnumType, ObjectType, Property, SoapValue, TypeIndex};
use soapstack_xml::{Decoder, Encoder};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// The shared fixture type graph: an inheritance tree with a deep
/// descendant, a value-holder pair only a hint can tell apart, an
/// operation response type, and a fault type.
#[must_use]
pub fn fixture_index() -> Arc<TypeIndex> {
    Arc::new(
        TypeIndex::builder()
            .enum_type(EnumType::new("Status", ["active", "retired"]))
            .object(
                ObjectType::new("Animal")
                    .property(Property::new("name", "string"))
                    .property(Property::new("tags", "string").array().optional()),
            )
            .object(
                ObjectType::new("Dog")
                    .with_base("Animal")
                    .property(Property::new("breed", "string")),
            )
            .object(
                ObjectType::new("Puppy")
                    .with_base("Dog")
                    .property(Property::new("toy", "string")),
            )
            .object(ObjectType::new("AnyValue"))
            .object(
                ObjectType::new("StringValue")
                    .with_base("AnyValue")
                    .property(Property::new("value", "string")),
            )
            .object(
                ObjectType::new("IntValue")
                    .with_base("AnyValue")
                    .property(Property::new("value", "string")),
            )
            .object(
                ObjectType::new("SearchResponse")
                    .property(Property::new("result", "Animal").array().optional())
                    .property(Property::new("total", "int").optional())
                    .property(Property::new("status", "Status").optional()),
            )
            .object(
                ObjectType::new("Fault")
                    .property(Property::new("faultcode", "string").optional())
                    .property(Property::new("faultstring", "string").optional()),
            )
            .build()
            .expect("fixture graph is valid"),
    )
}

/// An encoder over the fixture graph with the value-holder hint
/// installed.
#[must_use]
pub fn fixture_encoder(index: &Arc<TypeIndex>) -> Encoder {
    init_tracing();
    Encoder::new(Arc::clone(index)).with_subtype_hint("AnyValue", |fields| {
        match fields.get("value") {
            Some(SoapValue::Int(_)) => Some("IntValue".to_owned()),
            Some(_) => Some("StringValue".to_owned()),
            None => None,
        }
    })
}

/// A decoder over the fixture graph.
#[must_use]
pub fn fixture_decoder(index: &Arc<TypeIndex>) -> Decoder {
    init_tracing();
    Decoder::new(Arc::clone(index))
}

/// Build an object value from name/value pairs.
#[must_use]
pub fn object(pairs: &[(&str, SoapValue)]) -> SoapValue {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_owned(), value.clone()))
        .collect()
}

mod test_decode;
mod test_fault;
mod test_roundtrip;
