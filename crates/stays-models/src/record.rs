use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{RecordError, RecordResult};
use crate::meta::RecordMeta;

/// Flat field representation of a record.
///
/// Used both as the serialization payload written to disk and as the
/// constructor input when records are hydrated during reload.
pub type FieldMap = serde_json::Map<String, Value>;

/// Reserved field-map key holding the record's type tag.
///
/// The tag always matches the `TypeName` half of the record's composite key.
pub const TYPE_TAG: &str = "__type__";

/// Static side of the record contract.
///
/// Every concrete record type implements `Model`: a compile-time type name
/// plus access to its [`RecordMeta`] block. The serde bounds give the store
/// its field-map codec for free.
pub trait Model: Serialize + DeserializeOwned {
    /// Type tag, also the `TypeName` half of the composite key.
    const TYPE_NAME: &'static str;

    /// Shared identity/timestamp block.
    fn meta(&self) -> &RecordMeta;

    /// Mutable access to the identity/timestamp block.
    fn meta_mut(&mut self) -> &mut RecordMeta;
}

/// Object-safe side of the record contract.
///
/// The store holds records as `Box<dyn Record>` and never inspects them
/// beyond what this trait exposes: enough to compute the composite key and
/// to round-trip through a field-map. Blanket-implemented for every
/// [`Model`] type.
pub trait Record: Send + Sync + std::fmt::Debug {
    /// The type tag of this record.
    fn type_name(&self) -> &'static str;

    /// The record's unique identifier.
    fn id(&self) -> &str;

    /// Composite key `TypeName.id`. Recomputed on every call, never cached.
    fn key(&self) -> String {
        format!("{}.{}", self.type_name(), self.id())
    }

    /// Creation timestamp.
    fn created_at(&self) -> DateTime<Utc>;

    /// Last-modification timestamp.
    fn updated_at(&self) -> DateTime<Utc>;

    /// Bump the last-modification timestamp to now.
    fn touch(&mut self);

    /// Convert to a flat field-map, including the [`TYPE_TAG`] field.
    fn to_fields(&self) -> RecordResult<FieldMap>;
}

impl<T: Model + Send + Sync + std::fmt::Debug> Record for T {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn id(&self) -> &str {
        &self.meta().id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.meta().created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.meta().updated_at
    }

    fn touch(&mut self) {
        self.meta_mut().touch();
    }

    fn to_fields(&self) -> RecordResult<FieldMap> {
        let value = serde_json::to_value(self).map_err(RecordError::Encode)?;
        let mut fields = match value {
            Value::Object(map) => map,
            _ => return Err(RecordError::NotAnObject),
        };
        fields.insert(TYPE_TAG.to_string(), Value::String(T::TYPE_NAME.to_string()));
        Ok(fields)
    }
}

/// Hydrate a record from a field-map.
///
/// Stored `id` and timestamps are reused verbatim. The [`TYPE_TAG`] field is
/// stripped before decoding; missing type-specific fields take their
/// defaults.
pub fn from_fields<T: Model>(fields: &FieldMap) -> RecordResult<T> {
    let mut fields = fields.clone();
    fields.remove(TYPE_TAG);
    serde_json::from_value(Value::Object(fields)).map_err(RecordError::Decode)
}
