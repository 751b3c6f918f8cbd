//! Inheritance flattening with per-type memoization.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::SchemaResult;
use crate::index::TypeIndex;
use crate::types::{ObjectType, Property};

/// Computes an object type's full effective property set, merging the
/// properties inherited through its base chain underneath its own.
///
/// Results are memoized per type name. The cache lives as long as the
/// resolver and is never invalidated: the type graph is immutable after
/// construction, so entries cannot go stale. Entries are `Arc`-shared,
/// so repeated resolution of hot types is a clone of a pointer.
#[derive(Debug)]
pub struct PropertyResolver {
    index: Arc<TypeIndex>,
    cache: RwLock<HashMap<String, Arc<IndexMap<String, Property>>>>,
}

impl PropertyResolver {
    /// Create a resolver over a shared type index.
    #[must_use]
    pub fn new(index: Arc<TypeIndex>) -> Self {
        Self {
            index,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The index this resolver reads from.
    #[must_use]
    pub fn index(&self) -> &Arc<TypeIndex> {
        &self.index
    }

    /// The flattened property map of `ty`: base-chain properties first (root
    /// base outermost), with a derived type's same-named property shadowing
    /// the base's.
    pub fn all_properties(&self, ty: &ObjectType) -> SchemaResult<Arc<IndexMap<String, Property>>> {
        if let Some(hit) = self.cache.read().get(&ty.name) {
            return Ok(Arc::clone(hit));
        }

        let mut chain = vec![ty];
        let mut current = ty;
        while let Some(base) = &current.base {
            let parent = self.index.object(base)?;
            chain.push(parent);
            current = parent;
        }

        let mut merged: IndexMap<String, Property> = IndexMap::new();
        for level in chain.iter().rev() {
            for (name, property) in &level.properties {
                merged.insert(name.clone(), property.clone());
            }
        }

        let entry = Arc::new(merged);
        self.cache
            .write()
            .insert(ty.name.clone(), Arc::clone(&entry));
        Ok(entry)
    }
}
