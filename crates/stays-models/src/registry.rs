use std::collections::HashMap;

use crate::error::{RecordError, RecordResult};
use crate::models::{Amenity, City, Place, Review, State, User};
use crate::record::{from_fields, FieldMap, Model, Record};

/// Factory: construct a boxed record from a field-map.
pub type Factory = fn(&FieldMap) -> RecordResult<Box<dyn Record>>;

/// Fixed table from type-tag string to record constructor.
///
/// Built once at process start and consulted during reload to turn parsed
/// field-maps back into typed records. The table is treated as exhaustive:
/// a tag with no entry is an error, never silently skipped.
pub struct TypeRegistry {
    factories: HashMap<&'static str, Factory>,
}

fn factory<T>(fields: &FieldMap) -> RecordResult<Box<dyn Record>>
where
    T: Model + Send + Sync + std::fmt::Debug + 'static,
{
    Ok(Box::new(from_fields::<T>(fields)?))
}

impl TypeRegistry {
    /// Empty registry. Useful for tests that want a restricted type set.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry covering every constructible record type.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register::<User>();
        registry.register::<State>();
        registry.register::<City>();
        registry.register::<Amenity>();
        registry.register::<Place>();
        registry.register::<Review>();
        registry
    }

    /// Add a constructor for `T` under its type name.
    pub fn register<T>(&mut self)
    where
        T: Model + Send + Sync + std::fmt::Debug + 'static,
    {
        self.factories.insert(T::TYPE_NAME, factory::<T>);
    }

    /// Whether a constructor exists for the given tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Sorted list of registered type tags.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Construct a record from a field-map using the constructor for `tag`.
    ///
    /// Returns [`RecordError::UnknownType`] when the tag has no entry.
    pub fn construct(&self, tag: &str, fields: &FieldMap) -> RecordResult<Box<dyn Record>> {
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| RecordError::UnknownType(tag.to_string()))?;
        factory(fields)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
