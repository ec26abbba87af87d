//! JSON snapshot codec for one collection blob.
//!
//! Wire shape: a JSON array of field-named records under the collection key
//! (`schools`, `employees`, `students`). A stored `null` counts as absent.

use super::{StoreError, StoreResult};
use crate::blob::BlobStore;
use crate::config::SnapshotRecovery;
use crate::model::record::Record;
use log::{debug, warn};
use serde_json::error::Category;

/// Where a collection's startup contents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionOrigin {
    /// Decoded verbatim from the blob store (possibly empty).
    Snapshot,
    /// No snapshot was stored; seed data was used.
    Seeded,
    /// A snapshot was stored but malformed; seed data replaced it.
    Recovered,
}

impl CollectionOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Seeded => "seeded",
            Self::Recovered => "recovered",
        }
    }
}

/// Per-collection outcome of `RecordStore::open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub schools: CollectionOrigin,
    pub employees: CollectionOrigin,
    pub students: CollectionOrigin,
}

impl LoadReport {
    /// Report for a store built from in-memory collections.
    pub(crate) fn in_memory() -> Self {
        Self {
            schools: CollectionOrigin::Snapshot,
            employees: CollectionOrigin::Snapshot,
            students: CollectionOrigin::Snapshot,
        }
    }

    pub fn entries(&self) -> [(&'static str, CollectionOrigin); 3] {
        [
            ("schools", self.schools),
            ("employees", self.employees),
            ("students", self.students),
        ]
    }

    /// Collection keys whose malformed snapshot was replaced by seed data.
    pub fn recovered_keys(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter(|(_, origin)| *origin == CollectionOrigin::Recovered)
            .map(|(key, _)| key)
            .collect()
    }
}

pub(crate) fn load_collection<T, B>(
    blob: &B,
    recovery: SnapshotRecovery,
    seed: impl FnOnce() -> Vec<T>,
) -> StoreResult<(Vec<T>, CollectionOrigin)>
where
    T: Record,
    B: BlobStore,
{
    let key = T::COLLECTION;
    let Some(raw) = blob.get(key)? else {
        debug!("event=snapshot_load module=store status=absent key={key}");
        return Ok((seed(), CollectionOrigin::Seeded));
    };

    match serde_json::from_str::<Option<Vec<T>>>(&raw) {
        Ok(Some(records)) => {
            debug!(
                "event=snapshot_load module=store status=ok key={key} count={}",
                records.len()
            );
            Ok((records, CollectionOrigin::Snapshot))
        }
        Ok(None) => {
            debug!("event=snapshot_load module=store status=null key={key}");
            Ok((seed(), CollectionOrigin::Seeded))
        }
        Err(source) => match recovery {
            SnapshotRecovery::FallbackToSeed => {
                warn!(
                    "event=snapshot_load module=store status=recovered key={key} bytes={} {}",
                    raw.len(),
                    parse_error_summary(&source)
                );
                Ok((seed(), CollectionOrigin::Recovered))
            }
            SnapshotRecovery::Fail => {
                warn!(
                    "event=snapshot_load module=store status=error key={key} bytes={} {}",
                    raw.len(),
                    parse_error_summary(&source)
                );
                Err(StoreError::MalformedSnapshot { key, source })
            }
        },
    }
}

/// Error position and category only; serde messages can quote stored values.
fn parse_error_summary(source: &serde_json::Error) -> String {
    let category = match source.classify() {
        Category::Io => "io",
        Category::Syntax => "syntax",
        Category::Data => "data",
        Category::Eof => "eof",
    };
    format!(
        "error_kind={category} line={} column={}",
        source.line(),
        source.column()
    )
}

pub(crate) fn encode_collection<T: Record>(records: &[T]) -> StoreResult<(&'static str, String)> {
    let key = T::COLLECTION;
    let json =
        serde_json::to_string(records).map_err(|source| StoreError::Encode { key, source })?;
    Ok((key, json))
}

#[cfg(test)]
mod tests {
    use super::{encode_collection, load_collection, parse_error_summary, CollectionOrigin};
    use crate::blob::MemoryBlobStore;
    use crate::config::SnapshotRecovery;
    use crate::model::school::School;
    use crate::store::seed::seed_schools;
    use crate::store::StoreError;

    #[test]
    fn absent_key_uses_seed() {
        let blob = MemoryBlobStore::new();
        let (schools, origin) =
            load_collection::<School, _>(&blob, SnapshotRecovery::Fail, seed_schools).unwrap();
        assert_eq!(origin, CollectionOrigin::Seeded);
        assert_eq!(schools, seed_schools());
    }

    #[test]
    fn stored_null_counts_as_absent() {
        let blob = MemoryBlobStore::new().with_blob("schools", "null");
        let (schools, origin) =
            load_collection::<School, _>(&blob, SnapshotRecovery::Fail, seed_schools).unwrap();
        assert_eq!(origin, CollectionOrigin::Seeded);
        assert_eq!(schools.len(), 2);
    }

    #[test]
    fn stored_empty_array_is_used_verbatim() {
        let blob = MemoryBlobStore::new().with_blob("schools", "[]");
        let (schools, origin) =
            load_collection::<School, _>(&blob, SnapshotRecovery::Fail, seed_schools).unwrap();
        assert_eq!(origin, CollectionOrigin::Snapshot);
        assert!(schools.is_empty());
    }

    #[test]
    fn malformed_snapshot_follows_recovery_policy() {
        let blob = MemoryBlobStore::new().with_blob("schools", "{\"id\": 3");

        let (schools, origin) =
            load_collection::<School, _>(&blob, SnapshotRecovery::FallbackToSeed, seed_schools)
                .unwrap();
        assert_eq!(origin, CollectionOrigin::Recovered);
        assert_eq!(schools, seed_schools());

        let err = load_collection::<School, _>(&blob, SnapshotRecovery::Fail, seed_schools)
            .unwrap_err();
        assert!(matches!(err, StoreError::MalformedSnapshot { key: "schools", .. }));
    }

    #[test]
    fn parse_error_summary_omits_stored_values() {
        let source =
            serde_json::from_str::<Vec<School>>("[{\"id\": \"s1\", \"name\": 42}]").unwrap_err();
        let summary = parse_error_summary(&source);

        assert!(summary.starts_with("error_kind=data line=1 column="));
        assert!(!summary.contains("s1"));
        assert!(!summary.contains("42"));
    }

    #[test]
    fn encode_uses_collection_key() {
        let (key, json) = encode_collection(&seed_schools()[..1]).unwrap();
        assert_eq!(key, "schools");
        assert!(json.starts_with("[{\"id\":\"s1\""));
    }
}
