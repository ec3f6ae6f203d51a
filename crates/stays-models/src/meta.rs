use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and timestamp block shared by every stored record.
///
/// `RecordMeta` is flattened into each concrete record type, so `id`,
/// `created_at` and `updated_at` appear as top-level fields in the
/// serialized field-map. When a record is hydrated from a field-map the
/// stored values are reused verbatim; nothing is regenerated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Unique identifier, assigned once at creation.
    pub id: String,
    /// Creation time (UTC, serialized as an ISO-8601 string).
    pub created_at: DateTime<Utc>,
    /// Last modification time (UTC, serialized as an ISO-8601 string).
    pub updated_at: DateTime<Utc>,
}

impl RecordMeta {
    /// Fresh metadata: new UUID, both timestamps set to now.
    pub fn generate() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at` to now. `id` and `created_at` never change.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
