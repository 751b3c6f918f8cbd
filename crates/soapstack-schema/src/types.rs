//! Schema type descriptions: primitives, enumerations, and object types.
//!
//! Base/derived relationships between object types are stored as type
//! names and resolved through the shared [`TypeIndex`](crate::TypeIndex),
//! never as owned pointers, so the inheritance graph stays acyclic at the
//! ownership level while remaining traversable in both directions.

use indexmap::IndexMap;

/// The five scalar wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Arbitrary text.
    String,
    /// Exactly `true` or `false` on the wire.
    Boolean,
    /// Integer.
    Int,
    /// Wide integer.
    Long,
    /// Floating-point number.
    Double,
}

impl Primitive {
    /// All primitives, in registration order.
    pub const ALL: [Primitive; 5] = [
        Primitive::String,
        Primitive::Boolean,
        Primitive::Int,
        Primitive::Long,
        Primitive::Double,
    ];

    /// The type name this primitive is registered under.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
        }
    }

    /// Look a primitive up by its registered name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }
}

/// An enumeration type: a closed, ordered set of allowed string values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    /// Unique type name.
    pub name: String,
    /// Allowed values, in declaration order.
    pub values: Vec<String>,
}

impl EnumType {
    /// Create an enum type from its name and allowed values.
    pub fn new<N, I, V>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `value` is one of the allowed values.
    #[must_use]
    pub fn is_member(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// A named property of an object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property (element tag) name.
    pub name: String,
    /// Name of the property's type, resolved through the `TypeIndex`.
    pub type_name: String,
    /// Whether the property holds an ordered sequence of values.
    pub is_array: bool,
    /// Whether the property may be absent from a value.
    pub is_optional: bool,
}

impl Property {
    /// A required, scalar-shaped property.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_array: false,
            is_optional: false,
        }
    }

    /// Mark the property as holding a sequence of values.
    #[must_use]
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Mark the property as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }
}

/// A composite type with named properties, an optional base type, and the
/// list of types directly derived from it.
///
/// `children` is populated by the index builder from the `base`
/// declarations of other registered types; values supplied here are
/// discarded at build time so the base/child links always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    /// Unique type name.
    pub name: String,
    /// Direct properties, in declaration order.
    pub properties: IndexMap<String, Property>,
    /// Name of the base type, if any.
    pub base: Option<String>,
    /// Names of directly derived types, in registration order.
    pub children: Vec<String>,
}

impl ObjectType {
    /// Create an object type with no properties and no base.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: IndexMap::new(),
            base: None,
            children: Vec::new(),
        }
    }

    /// Set the base type name.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Add a direct property. Declaration order is emission order.
    #[must_use]
    pub fn property(mut self, property: Property) -> Self {
        self.properties.insert(property.name.clone(), property);
        self
    }
}

/// A schema type: one of the three closed shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum SoapType {
    /// A scalar wire type.
    Primitive(Primitive),
    /// An enumeration.
    Enum(EnumType),
    /// A composite object type.
    Object(ObjectType),
}

impl SoapType {
    /// The name this type is registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(p) => p.name(),
            Self::Enum(e) => &e.name,
            Self::Object(o) => &o.name,
        }
    }

    /// The object type, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Whether this is an object type.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }
}
