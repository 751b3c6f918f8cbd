//! Schema-directed decoding: XML element plus declared type to value.
//!
//! The declared type is only a starting point: an `xsi:type` override on
//! the element re-resolves the concrete type, and property lookup spans
//! the resolved type's whole descendant tree so polymorphic children that
//! arrive without an override still decode.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use soapstack_schema::{
    ObjectType, Primitive, Property, PropertyResolver, SoapType, SoapValue, TypeIndex,
};

use crate::element::XmlElement;
use crate::error::{DecodeError, Fault};

/// Local attribute name carrying a concrete-subtype override.
const TYPE_ATTRIBUTE: &str = "type";

/// Converts XML elements into structured values under the direction of a
/// shared [`TypeIndex`].
///
/// Converted results are memoized by declared type name plus the
/// element's canonical form; repeated decoding of identical fragments
/// (common when a batched response repeats nested sub-objects) is a map
/// hit returning a fresh, independently mutable copy.
#[derive(Debug)]
pub struct Decoder {
    index: Arc<TypeIndex>,
    resolver: PropertyResolver,
    fault_tag: String,
    fault_type: String,
    memo: RwLock<HashMap<(String, String), SoapValue>>,
}

impl Decoder {
    /// Create a decoder over a shared type index. The fault envelope
    /// defaults to a `Fault` tag decoded against a `Fault` type.
    #[must_use]
    pub fn new(index: Arc<TypeIndex>) -> Self {
        Self {
            resolver: PropertyResolver::new(Arc::clone(&index)),
            index,
            fault_tag: "Fault".to_owned(),
            fault_type: "Fault".to_owned(),
            memo: RwLock::new(HashMap::new()),
        }
    }

    /// Override the fault envelope's tag name and the type it decodes
    /// against.
    #[must_use]
    pub fn with_fault_type(mut self, tag: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.fault_tag = tag.into();
        self.fault_type = type_name.into();
        self
    }

    /// Decode `element` against its declared type.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` when an override names an unknown type, a
    /// child element matches no declared property, or the element shape
    /// disagrees with the resolved type.
    pub fn decode(&self, ty: &SoapType, element: &XmlElement) -> Result<SoapValue, DecodeError> {
        let key = (ty.name().to_owned(), element.canonical());
        if let Some(hit) = self.memo.read().get(&key) {
            return Ok(hit.clone());
        }
        let value = self.convert(ty, element)?;
        self.memo.write().insert(key, value.clone());
        Ok(value)
    }

    /// Decode a top-level response root, redirecting to the fault type
    /// when the root's primary child is the recognized fault envelope.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ServerFault`] carrying the decoded fault
    /// fields when the peer reported a fault; other variants for local
    /// structural failures.
    pub fn decode_response(
        &self,
        response_type: &SoapType,
        root: &XmlElement,
    ) -> Result<SoapValue, DecodeError> {
        if let Some(first) = root.children.first() {
            if first.name == self.fault_tag {
                tracing::debug!(tag = %first.name, "fault envelope detected");
                let fault_type = self.index.resolve(&self.fault_type)?;
                let detail = self.decode(fault_type, first)?;
                return Err(DecodeError::ServerFault(fault_from(detail)));
            }
        }
        self.decode(response_type, root)
    }

    fn convert(&self, declared: &SoapType, element: &XmlElement) -> Result<SoapValue, DecodeError> {
        // An explicit override beats the declared/contextual type.
        let ty = match element.attribute(TYPE_ATTRIBUTE) {
            Some(name) => {
                let local = name.rsplit(':').next().unwrap_or(name);
                self.index
                    .get(local)
                    .ok_or_else(|| DecodeError::UnrecognizedType(local.to_owned()))?
            }
            None => declared,
        };

        if element.children.is_empty() {
            return convert_leaf(ty, &element.text);
        }

        let SoapType::Object(obj) = ty else {
            return Err(DecodeError::InvalidUsage {
                type_name: ty.name().to_owned(),
            });
        };
        self.convert_object(obj, element)
    }

    fn convert_object(
        &self,
        obj: &ObjectType,
        element: &XmlElement,
    ) -> Result<SoapValue, DecodeError> {
        let properties = self.union_properties(obj)?;
        let mut fields: IndexMap<String, SoapValue> = IndexMap::new();

        for child in &element.children {
            let Some(property) = properties.get(child.name.as_str()) else {
                return Err(DecodeError::UnrecognizedProperty {
                    type_name: obj.name.clone(),
                    element: child.name.clone(),
                });
            };
            let child_type = self.index.resolve(&property.type_name)?;
            let value = self.decode(child_type, child)?;

            if property.is_array {
                let entry = fields
                    .entry(property.name.clone())
                    .or_insert_with(|| SoapValue::List(Vec::new()));
                // Empty entries are markers of an explicitly empty array,
                // not members of it.
                if !is_empty_entry(&value) {
                    if let SoapValue::List(items) = entry {
                        items.push(value);
                    }
                }
            } else {
                fields.insert(property.name.clone(), value);
            }
        }

        Ok(SoapValue::Object(fields))
    }

    /// The union of `obj`'s own flattened properties and those of every
    /// descendant type, own properties taking precedence.
    fn union_properties(
        &self,
        obj: &ObjectType,
    ) -> Result<IndexMap<String, Property>, DecodeError> {
        let mut merged = (*self.resolver.all_properties(obj)?).clone();
        for descendant in self.index.descendants(&obj.name) {
            let properties = self.resolver.all_properties(descendant)?;
            for (name, property) in properties.iter() {
                if !merged.contains_key(name) {
                    merged.insert(name.clone(), property.clone());
                }
            }
        }
        Ok(merged)
    }
}

/// Decode an element with no children from its text content.
fn convert_leaf(ty: &SoapType, text: &str) -> Result<SoapValue, DecodeError> {
    match ty {
        SoapType::Primitive(Primitive::Int | Primitive::Long) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Ok(SoapValue::Null)
            } else {
                trimmed
                    .parse::<i64>()
                    .map(SoapValue::Int)
                    .map_err(|_| DecodeError::InvalidValue {
                        type_name: ty.name().to_owned(),
                        text: text.to_owned(),
                    })
            }
        }
        SoapType::Primitive(Primitive::Double) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Ok(SoapValue::Null)
            } else {
                trimmed
                    .parse::<f64>()
                    .map(SoapValue::Double)
                    .map_err(|_| DecodeError::InvalidValue {
                        type_name: ty.name().to_owned(),
                        text: text.to_owned(),
                    })
            }
        }
        SoapType::Primitive(Primitive::Boolean) => Ok(SoapValue::Bool(text == "true")),
        SoapType::Primitive(Primitive::String) | SoapType::Enum(_) => {
            Ok(SoapValue::String(text.to_owned()))
        }
        SoapType::Object(_) => {
            if text.trim().is_empty() {
                Ok(SoapValue::Null)
            } else {
                Ok(SoapValue::String(text.to_owned()))
            }
        }
    }
}

/// Whether a decoded array entry is the empty marker to drop.
fn is_empty_entry(value: &SoapValue) -> bool {
    match value {
        SoapValue::Null => true,
        SoapValue::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Lift the conventional `faultcode`/`faultstring` fields out of a
/// decoded fault value.
fn fault_from(detail: SoapValue) -> Fault {
    let field = |name: &str| {
        detail
            .as_object()
            .and_then(|fields| fields.get(name))
            .and_then(SoapValue::as_str)
            .map(str::to_owned)
    };
    Fault {
        code: field("faultcode"),
        message: field("faultstring"),
        detail,
    }
}
