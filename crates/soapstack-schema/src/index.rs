//! The type index: the immutable name-to-type map a schema compiles into.
//!
//! A [`TypeIndex`] is built once per schema through [`TypeIndexBuilder`],
//! which validates the §3 invariants of the type graph (unique names,
//! resolvable bases, acyclic inheritance) and derives every object type's
//! `children` list from the `base` declarations of the other registered
//! types. After `build()` the index is read-only and safe to share.

use indexmap::IndexMap;

use crate::error::{SchemaError, SchemaResult};
use crate::types::{EnumType, ObjectType, Primitive, SoapType};

/// Immutable mapping from type name to [`SoapType`].
///
/// The five primitive types are always present under their canonical
/// names (`string`, `boolean`, `int`, `long`, `double`).
#[derive(Debug)]
pub struct TypeIndex {
    types: IndexMap<String, SoapType>,
}

impl TypeIndex {
    /// Start building a type index.
    #[must_use]
    pub fn builder() -> TypeIndexBuilder {
        TypeIndexBuilder::default()
    }

    /// Look a type up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SoapType> {
        self.types.get(name)
    }

    /// Look a type up by name, failing if absent.
    pub fn resolve(&self, name: &str) -> SchemaResult<&SoapType> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_owned()))
    }

    /// Look an object type up by name, failing if absent or not an object.
    pub fn object(&self, name: &str) -> SchemaResult<&ObjectType> {
        self.resolve(name)?
            .as_object()
            .ok_or_else(|| SchemaError::NotAnObjectType(name.to_owned()))
    }

    /// All transitive derived types of `name`, depth-first in registration
    /// order. Returns an empty list for unknown or non-object names.
    #[must_use]
    pub fn descendants(&self, name: &str) -> Vec<&ObjectType> {
        let mut out = Vec::new();
        if let Some(SoapType::Object(obj)) = self.get(name) {
            self.collect_descendants(obj, &mut out);
        }
        out
    }

    fn collect_descendants<'a>(&'a self, obj: &'a ObjectType, out: &mut Vec<&'a ObjectType>) {
        for child_name in &obj.children {
            if let Some(SoapType::Object(child)) = self.get(child_name) {
                out.push(child);
                self.collect_descendants(child, out);
            }
        }
    }

    /// Number of registered types, primitives included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the index holds no types. Never true in practice since the
    /// primitives are pre-registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Builder validating and wiring a [`TypeIndex`].
#[derive(Debug, Default)]
pub struct TypeIndexBuilder {
    pending: Vec<SoapType>,
}

impl TypeIndexBuilder {
    /// Register an enumeration type.
    #[must_use]
    pub fn enum_type(mut self, e: EnumType) -> Self {
        self.pending.push(SoapType::Enum(e));
        self
    }

    /// Register an object type. Its `children` list is recomputed from the
    /// base declarations of all registered types at build time.
    #[must_use]
    pub fn object(mut self, o: ObjectType) -> Self {
        self.pending.push(SoapType::Object(o));
        self
    }

    /// Validate the graph and produce the immutable index.
    pub fn build(self) -> SchemaResult<TypeIndex> {
        let mut types: IndexMap<String, SoapType> = IndexMap::new();
        for p in Primitive::ALL {
            types.insert(p.name().to_owned(), SoapType::Primitive(p));
        }

        for ty in self.pending {
            let name = ty.name().to_owned();
            if types.contains_key(&name) {
                return Err(SchemaError::DuplicateType(name));
            }
            if let SoapType::Object(obj) = &ty {
                if !obj.children.is_empty() {
                    // Re-derived below; stale lists must not survive.
                    let mut obj = obj.clone();
                    obj.children.clear();
                    types.insert(name, SoapType::Object(obj));
                    continue;
                }
            }
            types.insert(name, ty);
        }

        // Wire children from base declarations so both directions of the
        // link always agree.
        let derived: Vec<(String, String)> = types
            .values()
            .filter_map(|ty| match ty {
                SoapType::Object(obj) => obj
                    .base
                    .as_ref()
                    .map(|base| (base.clone(), obj.name.clone())),
                _ => None,
            })
            .collect();
        for (base, child) in derived {
            match types.get_mut(&base) {
                Some(SoapType::Object(parent)) => parent.children.push(child),
                Some(_) => return Err(SchemaError::NotAnObjectType(base)),
                None => {
                    return Err(SchemaError::UnknownBaseType { ty: child, base });
                }
            }
        }

        let index = TypeIndex { types };
        index.check_acyclic()?;
        Ok(index)
    }
}

impl TypeIndex {
    fn check_acyclic(&self) -> SchemaResult<()> {
        for ty in self.types.values() {
            let SoapType::Object(start) = ty else {
                continue;
            };
            let mut steps = 0usize;
            let mut current = start;
            while let Some(base) = &current.base {
                steps += 1;
                if steps > self.types.len() {
                    return Err(SchemaError::InheritanceCycle(start.name.clone()));
                }
                match self.get(base) {
                    Some(SoapType::Object(parent)) => current = parent,
                    _ => break, // unresolvable bases were rejected at wiring time
                }
            }
        }
        Ok(())
    }
}
