//! Schema-directed encoding: structured value plus declared type to XML.
//!
//! The hard case is subtype inference: the declared type may be a base
//! type while the value structurally belongs to one of its descendants.
//! Encoding first tries the declared type exactly; if value keys are left
//! over, it searches the descendant tree depth-first for the first type
//! that consumes every key, and records the concrete choice on the wire
//! as an `xsi:type` attribute so decoding never has to repeat the search.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use indexmap::IndexMap;
use quick_xml::Writer;
use quick_xml::events::{BytesText, Event};

use soapstack_schema::{
    EnumType, ObjectType, Primitive, Property, PropertyResolver, SoapType, SoapValue, TypeIndex,
};

use crate::error::EncodeError;

/// A per-parent-type disambiguation predicate: given the value's fields,
/// name the child type to try first, or `None` to fall through to the
/// generic structural search.
pub type SubtypeHint = Box<dyn Fn(&IndexMap<String, SoapValue>) -> Option<String> + Send + Sync>;

/// Converts structured values into XML fragments under the direction of a
/// shared [`TypeIndex`].
///
/// The only mutable state is the property-resolution cache inside the
/// resolver, so a single encoder is safe to share across threads.
pub struct Encoder {
    index: Arc<TypeIndex>,
    resolver: PropertyResolver,
    hints: HashMap<String, SubtypeHint>,
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder")
            .field("types", &self.index.len())
            .field("hints", &self.hints.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Result of resolving a value against an object type: the encoded inner
/// fragment and the concrete type the value actually matched.
struct ObjectFragment {
    xml: String,
    concrete: String,
}

impl Encoder {
    /// Create an encoder over a shared type index.
    #[must_use]
    pub fn new(index: Arc<TypeIndex>) -> Self {
        Self {
            resolver: PropertyResolver::new(Arc::clone(&index)),
            index,
            hints: HashMap::new(),
        }
    }

    /// Install a disambiguation predicate for a parent type whose sibling
    /// subtypes are structurally identical. The predicate is consulted
    /// before the generic structural search whenever the search descends
    /// from that parent.
    #[must_use]
    pub fn with_subtype_hint<F>(mut self, parent: impl Into<String>, hint: F) -> Self
    where
        F: Fn(&IndexMap<String, SoapValue>) -> Option<String> + Send + Sync + 'static,
    {
        self.hints.insert(parent.into(), Box::new(hint));
        self
    }

    /// Encode `value` against its declared type into an XML fragment.
    ///
    /// For object types the fragment is the concatenation of the property
    /// elements, with no enclosing tag: the caller wraps the whole object
    /// in its own operation or property tag. For primitives and enums the
    /// fragment is the escaped text node.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError` when the value fails validation against the
    /// declared type or none of its descendants.
    pub fn encode(&self, ty: &SoapType, value: &SoapValue) -> Result<String, EncodeError> {
        match ty {
            SoapType::Primitive(p) => Ok(self
                .primitive_text(p, value)?
                .map(|text| quick_xml::escape::escape(&text).into_owned())
                .unwrap_or_default()),
            SoapType::Enum(e) => Ok(self
                .enum_text(e, value)?
                .map(|text| quick_xml::escape::escape(&text).into_owned())
                .unwrap_or_default()),
            SoapType::Object(obj) => {
                if value.is_null() {
                    return Ok(String::new());
                }
                let fields = value.as_object().ok_or_else(|| EncodeError::InvalidValue {
                    type_name: obj.name.clone(),
                    value: value.variant_name().to_owned(),
                })?;
                Ok(self.resolve_concrete(obj, fields)?.xml)
            }
        }
    }

    /// Encode an object value, searching the descendant tree of `ty` for
    /// the concrete type that consumes every value key.
    fn resolve_concrete(
        &self,
        ty: &ObjectType,
        fields: &IndexMap<String, SoapValue>,
    ) -> Result<ObjectFragment, EncodeError> {
        match self.encode_exact(ty, fields) {
            Ok(xml) => Ok(ObjectFragment {
                xml,
                concrete: ty.name.clone(),
            }),
            Err(err @ EncodeError::UnrecognizedProperties { .. }) if !ty.children.is_empty() => {
                let mut last = err;

                // Structurally identical siblings are settled by the
                // installed predicate, not by declaration order.
                if let Some(hint) = self.hints.get(&ty.name) {
                    if let Some(chosen) = hint(fields) {
                        tracing::trace!(parent = %ty.name, child = %chosen, "subtype hint selected");
                        let child = self.index.object(&chosen)?;
                        match self.resolve_concrete(child, fields) {
                            Ok(fragment) => return Ok(fragment),
                            Err(e) => last = e,
                        }
                    }
                }

                for child_name in &ty.children {
                    let child = self.index.object(child_name)?;
                    match self.resolve_concrete(child, fields) {
                        Ok(fragment) => {
                            tracing::trace!(declared = %ty.name, concrete = %fragment.concrete, "structural subtype match");
                            return Ok(fragment);
                        }
                        Err(e) => last = e,
                    }
                }
                Err(last)
            }
            Err(err) => Err(err),
        }
    }

    /// Encode `fields` against exactly `ty`: every declared property is
    /// emitted in declaration order, and every value key must be consumed.
    fn encode_exact(
        &self,
        ty: &ObjectType,
        fields: &IndexMap<String, SoapValue>,
    ) -> Result<String, EncodeError> {
        let properties = self.resolver.all_properties(ty)?;
        let mut unconsumed: HashSet<&str> = fields.keys().map(String::as_str).collect();
        let mut out = String::new();

        for property in properties.values() {
            match fields.get(&property.name) {
                Some(value) => {
                    unconsumed.remove(property.name.as_str());
                    out.push_str(&self.encode_property(ty, property, value)?);
                }
                None if property.is_optional => {}
                None => {
                    return Err(EncodeError::MissingRequiredProperty {
                        type_name: ty.name.clone(),
                        property: property.name.clone(),
                    });
                }
            }
        }

        if unconsumed.is_empty() {
            Ok(out)
        } else {
            let mut keys: Vec<String> = unconsumed.into_iter().map(str::to_owned).collect();
            keys.sort_unstable();
            Err(EncodeError::UnrecognizedProperties {
                type_name: ty.name.clone(),
                keys,
            })
        }
    }

    /// Encode one property slot: arrays repeat the element tag per entry,
    /// and an empty array emits nothing.
    fn encode_property(
        &self,
        owner: &ObjectType,
        property: &Property,
        value: &SoapValue,
    ) -> Result<String, EncodeError> {
        match (property.is_array, value) {
            (true, SoapValue::List(items)) => {
                let mut out = String::new();
                for item in items {
                    out.push_str(&self.encode_element(property, item)?);
                }
                Ok(out)
            }
            (true, other) => Err(EncodeError::ArrayShapeMismatch {
                type_name: owner.name.clone(),
                property: property.name.clone(),
                expected: "a sequence",
                actual: other.variant_name(),
            }),
            (false, SoapValue::List(_)) => Err(EncodeError::ArrayShapeMismatch {
                type_name: owner.name.clone(),
                property: property.name.clone(),
                expected: "a single value",
                actual: "list",
            }),
            (false, single) => self.encode_element(property, single),
        }
    }

    /// Encode `value` wrapped in an element named `tag`. When the value's
    /// resolved concrete type differs from the declared one, the tag
    /// carries `xsi:type` naming the concrete type, so the decoder can
    /// recover it without repeating the structural search.
    pub fn encode_tagged(
        &self,
        tag: &str,
        ty: &SoapType,
        value: &SoapValue,
    ) -> Result<String, EncodeError> {
        let mut buf = Vec::with_capacity(128);
        let mut writer = Writer::new(&mut buf);
        self.write_value(&mut writer, tag, ty, value)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Emit one `<property>...</property>` element.
    fn encode_element(
        &self,
        property: &Property,
        value: &SoapValue,
    ) -> Result<String, EncodeError> {
        let ty = self.index.resolve(&property.type_name)?;
        let mut buf = Vec::with_capacity(128);
        let mut writer = Writer::new(&mut buf);
        self.write_value(&mut writer, &property.name, ty, value)?;
        Ok(String::from_utf8(buf)?)
    }

    fn write_value<W: Write>(
        &self,
        writer: &mut Writer<W>,
        tag: &str,
        ty: &SoapType,
        value: &SoapValue,
    ) -> Result<(), EncodeError> {
        match ty {
            SoapType::Object(obj) if !value.is_null() => {
                let fields = value.as_object().ok_or_else(|| EncodeError::InvalidValue {
                    type_name: obj.name.clone(),
                    value: value.variant_name().to_owned(),
                })?;
                let fragment = self.resolve_concrete(obj, fields)?;
                write_composite(writer, tag, obj, &fragment)?;
            }
            SoapType::Object(_) => {
                writer.create_element(tag).write_empty()?;
            }
            SoapType::Primitive(p) => {
                write_scalar(writer, tag, self.primitive_text(p, value)?)?;
            }
            SoapType::Enum(e) => {
                write_scalar(writer, tag, self.enum_text(e, value)?)?;
            }
        }
        Ok(())
    }

    /// Validate a scalar against a primitive type and return its wire
    /// text, or `None` for null (which encodes to an empty element).
    fn primitive_text(
        &self,
        primitive: &Primitive,
        value: &SoapValue,
    ) -> Result<Option<String>, EncodeError> {
        if value.is_null() {
            return Ok(None);
        }
        let text = value
            .scalar_text()
            .ok_or_else(|| EncodeError::InvalidValue {
                type_name: primitive.name().to_owned(),
                value: value.variant_name().to_owned(),
            })?;
        let valid = match primitive {
            Primitive::String => true,
            Primitive::Boolean => text == "true" || text == "false",
            Primitive::Int => text.parse::<i64>().is_ok(),
            Primitive::Long | Primitive::Double => {
                text.parse::<f64>().is_ok_and(|n| !n.is_nan())
            }
        };
        if valid {
            Ok(Some(text))
        } else {
            Err(EncodeError::InvalidValue {
                type_name: primitive.name().to_owned(),
                value: text,
            })
        }
    }

    /// Validate a scalar against an enum type and return its wire text.
    fn enum_text(&self, e: &EnumType, value: &SoapValue) -> Result<Option<String>, EncodeError> {
        if value.is_null() {
            return Ok(None);
        }
        let text = value
            .scalar_text()
            .ok_or_else(|| EncodeError::InvalidValue {
                type_name: e.name.clone(),
                value: value.variant_name().to_owned(),
            })?;
        if e.is_member(&text) {
            Ok(Some(text))
        } else {
            Err(EncodeError::InvalidValue {
                type_name: e.name.clone(),
                value: text,
            })
        }
    }
}

/// Write `<tag>text</tag>`, or `<tag/>` for a null scalar.
fn write_scalar<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: Option<String>,
) -> Result<(), EncodeError> {
    match text {
        Some(text) => {
            writer
                .create_element(tag)
                .write_text_content(BytesText::new(&text))?;
        }
        None => {
            writer.create_element(tag).write_empty()?;
        }
    }
    Ok(())
}

/// Write a composite property element, attaching `xsi:type` when the
/// resolved concrete type differs from the declared one.
fn write_composite<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    declared: &ObjectType,
    fragment: &ObjectFragment,
) -> Result<(), EncodeError> {
    let element = writer.create_element(tag);
    let element = if fragment.concrete == declared.name {
        element
    } else {
        element.with_attribute(("xsi:type", fragment.concrete.as_str()))
    };
    if fragment.xml.is_empty() {
        element.write_empty()?;
    } else {
        element.write_inner_content(|w| {
            w.write_event(Event::Text(BytesText::from_escaped(fragment.xml.as_str())))
        })?;
    }
    Ok(())
}
