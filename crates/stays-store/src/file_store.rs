use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::debug;

use stays_models::{FieldMap, Record, TypeRegistry, TYPE_TAG};

use crate::error::{StoreError, StoreResult};

/// Default store file name.
pub const DEFAULT_STORE_FILE: &str = "file.json";

/// In-process object store backed by a single flat JSON file.
///
/// Records live in memory, indexed by composite key `TypeName.id`.
/// [`save`](FileStore::save) writes the whole index to disk as one JSON
/// document; [`reload`](FileStore::reload) replaces the index with whatever
/// the file holds. Synchronous and single-threaded: no internal locking,
/// no background flush. Callers in threaded hosts serialize their own
/// access.
///
/// Construct one store per process (or per test, pointed at a temp path)
/// and pass it by reference to whoever needs it.
pub struct FileStore {
    /// Live index: composite key to record.
    objects: HashMap<String, Box<dyn Record>>,
    /// Target file, fixed at construction.
    path: PathBuf,
    /// Constructor table consulted during reload.
    registry: TypeRegistry,
}

impl FileStore {
    /// New empty store persisting to `path`, with the builtin type registry.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_registry(path, TypeRegistry::builtin())
    }

    /// New empty store with an explicit registry.
    pub fn with_registry(path: impl Into<PathBuf>, registry: TypeRegistry) -> Self {
        Self {
            objects: HashMap::new(),
            path: path.into(),
            registry,
        }
    }

    /// Path of the persisted file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The live mapping from composite key to record. No copy.
    pub fn all(&self) -> &HashMap<String, Box<dyn Record>> {
        &self.objects
    }

    /// Look up a record by composite key.
    pub fn get(&self, key: &str) -> Option<&dyn Record> {
        self.objects.get(key).map(|record| record.as_ref())
    }

    /// Number of records in the index.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Register a record under its composite key `TypeName.id`.
    ///
    /// Overwrites any existing entry at that key (last write wins). Touches
    /// nothing on disk. Returns the key the record was stored under.
    pub fn insert<R: Record + 'static>(&mut self, record: R) -> String {
        let key = record.key();
        self.objects.insert(key.clone(), Box::new(record));
        key
    }

    /// Serialize every record and replace the store file with the result.
    ///
    /// The document is written to a temp file in the target directory and
    /// renamed into place, so the previous contents survive a failed write.
    /// Keys are written in sorted order for stable output. I/O and encode
    /// errors propagate; nothing is retried.
    pub fn save(&self) -> StoreResult<()> {
        let mut keys: Vec<&String> = self.objects.keys().collect();
        keys.sort_unstable();

        let mut document = FieldMap::new();
        for key in keys {
            let fields = self.objects[key]
                .to_fields()
                .map_err(|source| StoreError::Record {
                    key: key.clone(),
                    source,
                })?;
            document.insert(key.clone(), Value::Object(fields));
        }

        let payload =
            serde_json::to_vec_pretty(&Value::Object(document)).map_err(StoreError::Encode)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&payload)?;
        tmp.persist(&self.path).map_err(|err| StoreError::Io(err.error))?;

        debug!(
            path = %self.path.display(),
            records = self.objects.len(),
            bytes = payload.len(),
            "saved store"
        );
        Ok(())
    }

    /// Replace the in-memory index with the contents of the store file.
    ///
    /// A missing file is a no-op. An existing file must parse as a single
    /// JSON object of key to field-map; a parse failure (an empty file
    /// included) surfaces as [`StoreError::Malformed`]. Every record is
    /// rebuilt through the registry before the index is touched, so any
    /// failure leaves prior state intact. On success the index becomes
    /// exactly what was parsed: a full replace, not a merge.
    pub fn reload(&mut self) -> StoreResult<()> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no store file, nothing to reload");
                return Ok(());
            }
            Err(err) => return Err(StoreError::Io(err)),
        };

        let document: FieldMap =
            serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        let mut objects = HashMap::with_capacity(document.len());
        for (key, value) in document {
            let fields = match value {
                Value::Object(fields) => fields,
                _ => {
                    return Err(StoreError::InvalidRecord {
                        key,
                        reason: "entry is not a JSON object".to_string(),
                    })
                }
            };
            let tag = fields
                .get(TYPE_TAG)
                .and_then(Value::as_str)
                .ok_or_else(|| StoreError::InvalidRecord {
                    key: key.clone(),
                    reason: format!("missing or non-string {TYPE_TAG} field"),
                })?;
            let record = self
                .registry
                .construct(tag, &fields)
                .map_err(|source| StoreError::Record {
                    key: key.clone(),
                    source,
                })?;
            objects.insert(key, record);
        }

        debug!(
            path = %self.path.display(),
            records = objects.len(),
            "reloaded store"
        );
        self.objects = objects;
        Ok(())
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_FILE)
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("records", &self.objects.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stays_models::{Amenity, Place, RecordError, State, User};
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> FileStore {
        FileStore::new(dir.path().join(DEFAULT_STORE_FILE))
    }

    // -----------------------------------------------------------------------
    // Index basics
    // -----------------------------------------------------------------------

    #[test]
    fn fresh_store_is_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
        assert_eq!(store.all().len(), 0);
    }

    #[test]
    fn insert_uses_composite_key() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        let user = User::new();
        let id = user.meta.id.clone();
        let key = store.insert(user);

        assert_eq!(key, format!("User.{id}"));
        assert_eq!(store.len(), 1);
        let record = store.get(&key).expect("record should be indexed");
        assert_eq!(record.id(), id);
        assert_eq!(record.type_name(), "User");
    }

    #[test]
    fn insert_overwrites_same_key() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        let mut amenity = Amenity::new();
        amenity.name = "wifi".to_string();
        let key = store.insert(amenity.clone());

        amenity.name = "parking".to_string();
        let key2 = store.insert(amenity);

        assert_eq!(key, key2);
        assert_eq!(store.len(), 1);
        let fields = store.get(&key).unwrap().to_fields().unwrap();
        assert_eq!(fields["name"], "parking");
    }

    #[test]
    fn insert_does_not_touch_disk() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        store.insert(User::new());
        assert!(!store.path().exists());
    }

    // -----------------------------------------------------------------------
    // Save
    // -----------------------------------------------------------------------

    #[test]
    fn save_writes_nonempty_file() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        store.insert(State::new());
        store.save().unwrap();

        let meta = fs::metadata(store.path()).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn save_leaves_no_temp_files_behind() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        store.insert(State::new());
        store.save().unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn save_replaces_previous_contents() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        let key = store.insert(User::new());
        store.save().unwrap();

        let mut replacement = store_in(&dir);
        replacement.insert(Amenity::new());
        replacement.save().unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(doc.get(&key).is_none());
        assert_eq!(doc.as_object().unwrap().len(), 1);
    }

    #[test]
    fn saved_document_maps_keys_to_tagged_field_maps() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        let mut place = Place::new();
        place.name = "Cabin by the lake".to_string();
        place.price_by_night = 80;
        let key = store.insert(place);
        store.save().unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &doc[&key];
        assert_eq!(entry[TYPE_TAG], "Place");
        assert_eq!(entry["name"], "Cabin by the lake");
        assert_eq!(entry["price_by_night"], 80);
        assert!(entry["id"].is_string());
        assert!(entry["created_at"].is_string());
        assert!(entry["updated_at"].is_string());
    }

    // -----------------------------------------------------------------------
    // Reload
    // -----------------------------------------------------------------------

    #[test]
    fn save_then_reload_round_trips() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        let mut user = User::new();
        user.email = "mona@example.org".to_string();
        user.first_name = "Mona".to_string();
        let user_key = store.insert(user);

        let mut place = Place::new();
        place.name = "Attic studio".to_string();
        place.max_guest = 2;
        place.latitude = 48.85;
        let place_key = store.insert(place);

        let before: HashMap<String, _> = store
            .all()
            .iter()
            .map(|(k, r)| (k.clone(), r.to_fields().unwrap()))
            .collect();

        store.save().unwrap();
        store.reload().unwrap();

        assert_eq!(store.len(), 2);
        for key in [&user_key, &place_key] {
            let reloaded = store.get(key).unwrap().to_fields().unwrap();
            assert_eq!(&reloaded, &before[key.as_str()]);
        }
    }

    #[test]
    fn second_store_sees_saved_records() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        let user = User::new();
        let id = user.meta.id.clone();
        let key = store.insert(user);
        store.save().unwrap();

        let mut other = store_in(&dir);
        other.reload().unwrap();

        assert_eq!(other.len(), 1);
        let record = other.get(&key).expect("saved record should reload");
        assert_eq!(record.id(), id);
    }

    #[test]
    fn reload_is_full_replace_not_merge() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        let kept = store.insert(State::new());
        store.save().unwrap();

        // Registered after save, so absent from the file.
        let dropped = store.insert(Amenity::new());
        store.reload().unwrap();

        assert!(store.get(&kept).is_some());
        assert!(store.get(&dropped).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reload_missing_file_is_noop() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let key = store.insert(User::new());

        store.reload().unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get(&key).is_some());
    }

    #[test]
    fn reload_empty_file_is_malformed() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        fs::write(store.path(), b"").unwrap();

        let err = store.reload().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn reload_garbage_file_is_malformed() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        fs::write(store.path(), b"{ not json").unwrap();

        let err = store.reload().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn reload_failure_preserves_in_memory_state() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let key = store.insert(User::new());

        fs::write(store.path(), b"not even close").unwrap();
        assert!(store.reload().is_err());

        assert_eq!(store.len(), 1);
        assert!(store.get(&key).is_some());
    }

    #[test]
    fn reload_unknown_tag_is_an_error() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let key = store.insert(User::new());

        let doc = format!(
            r#"{{"Spaceship.42": {{"{TYPE_TAG}": "Spaceship", "id": "42",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"}}}}"#
        );
        fs::write(store.path(), doc).unwrap();

        let err = store.reload().unwrap_err();
        assert!(matches!(
            err,
            StoreError::Record {
                source: RecordError::UnknownType(_),
                ..
            }
        ));
        // Prior state untouched.
        assert!(store.get(&key).is_some());
    }

    #[test]
    fn reload_rejects_entry_without_type_tag() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        fs::write(store.path(), r#"{"User.1": {"id": "1"}}"#).unwrap();
        let err = store.reload().unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }));
    }

    #[test]
    fn reload_rejects_non_object_entry() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        fs::write(store.path(), r#"{"User.1": 7}"#).unwrap();
        let err = store.reload().unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }));
    }

    #[test]
    fn restricted_registry_rejects_unregistered_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_STORE_FILE);

        let mut writer = FileStore::new(&path);
        writer.insert(User::new());
        writer.save().unwrap();

        let mut registry = TypeRegistry::new();
        registry.register::<State>();
        let mut reader = FileStore::with_registry(&path, registry);

        let err = reader.reload().unwrap_err();
        assert!(matches!(
            err,
            StoreError::Record {
                source: RecordError::UnknownType(_),
                ..
            }
        ));
    }

    // -----------------------------------------------------------------------
    // Timestamps survive the trip
    // -----------------------------------------------------------------------

    #[test]
    fn reload_reuses_stored_timestamps() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        let user = User::new();
        let created = user.meta.created_at;
        let updated = user.meta.updated_at;
        let key = store.insert(user);

        store.save().unwrap();
        store.reload().unwrap();

        let record = store.get(&key).unwrap();
        assert_eq!(record.created_at(), created);
        assert_eq!(record.updated_at(), updated);
    }
}
