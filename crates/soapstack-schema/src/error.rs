//! Error types for type-graph construction and lookup.

/// Errors raised while building or querying a type graph.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A type name was not found in the index.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// A type was expected to be an object type but is a primitive or enum.
    #[error("type {0} is not an object type")]
    NotAnObjectType(String),

    /// Two types were registered under the same name.
    #[error("duplicate type name: {0}")]
    DuplicateType(String),

    /// An object type declares a base that was never registered.
    #[error("object type {ty} declares unknown base type {base}")]
    UnknownBaseType {
        /// The derived type.
        ty: String,
        /// The missing base type name.
        base: String,
    },

    /// Following the base chain from a type revisits that type.
    #[error("inheritance cycle through type {0}")]
    InheritanceCycle(String),
}

/// Convenience result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
