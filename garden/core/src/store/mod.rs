//! Entry Store
//!
//! Sole owner of the persisted garden: the ordered entry list and the flower
//! counter. Every mutation writes through to the key-value substrate before
//! returning, and the in-memory copy is only changed once the write has
//! succeeded.
//!
//! # Keys
//!
//! | Key | Value |
//! |-----|-------|
//! | `gardenJournalEntries` | JSON array of entries |
//! | `gardenFlowerCount` | JSON number |
//! | `draft-<mode>-textarea` | raw draft text |

pub mod kv;

use serde::{Deserialize, Serialize};

use crate::entry::{JournalEntry, WritingMode};
use crate::error::GardenError;
use kv::{KeyValueStore, StoreError};

/// Key holding the serialized entry list
pub const ENTRIES_KEY: &str = "gardenJournalEntries";

/// Key holding the serialized flower count
pub const FLOWER_COUNT_KEY: &str = "gardenFlowerCount";

/// Everything the journal persists
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenState {
    /// Entries in save order
    pub entries: Vec<JournalEntry>,
    /// Successful saves so far
    #[serde(rename = "flowerCount")]
    pub flower_count: u64,
}

/// Import payload: `flowerCount` may be missing or null
#[derive(Deserialize)]
struct ImportPayload {
    entries: Vec<JournalEntry>,
    #[serde(rename = "flowerCount", default)]
    flower_count: Option<u64>,
}

/// Persistent store for entries, the flower counter, and drafts
pub struct EntryStore {
    kv: Box<dyn KeyValueStore>,
    state: GardenState,
}

impl EntryStore {
    /// Open a store over `kv`, loading whatever it already holds
    pub fn open(kv: impl KeyValueStore + 'static) -> Self {
        let mut store = Self {
            kv: Box::new(kv),
            state: GardenState::default(),
        };
        store.state = store.load();
        store
    }

    /// Read the persisted garden, falling back to empty on any failure
    ///
    /// Entries and counter fall back independently: a corrupt counter does
    /// not discard good entries.
    #[must_use]
    pub fn load(&self) -> GardenState {
        let entries = self.read_json::<Vec<JournalEntry>>(ENTRIES_KEY).unwrap_or_default();
        let flower_count = self.read_json::<u64>(FLOWER_COUNT_KEY).unwrap_or_default();

        tracing::debug!(
            entries = entries.len(),
            flower_count,
            "Loaded garden from storage"
        );

        GardenState {
            entries,
            flower_count,
        }
    }

    /// Current in-memory garden
    #[must_use]
    pub fn state(&self) -> &GardenState {
        &self.state
    }

    /// Saved entries in save order
    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.state.entries
    }

    /// Current flower count
    #[must_use]
    pub fn flower_count(&self) -> u64 {
        self.state.flower_count
    }

    /// Append an entry and rewrite the full persisted list
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::StorageUnavailable`] if the list could not be
    /// written; the entry is then not kept in memory either.
    pub fn append_entry(&mut self, entry: JournalEntry) -> Result<(), GardenError> {
        self.state.entries.push(entry);
        if let Err(e) = write_json(self.kv.as_mut(), ENTRIES_KEY, &self.state.entries) {
            self.state.entries.pop();
            return Err(e.into());
        }
        Ok(())
    }

    /// Bump the flower counter by one and persist it
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::StorageUnavailable`] if the counter could not be
    /// written; the in-memory counter is left unchanged.
    pub fn increment_flower_count(&mut self) -> Result<u64, GardenError> {
        let next = self.state.flower_count + 1;
        write_json(self.kv.as_mut(), FLOWER_COUNT_KEY, &next)?;
        self.state.flower_count = next;
        Ok(next)
    }

    /// Record a saved entry: append it and grow one flower
    ///
    /// Either both keys change or neither does. If the counter cannot be
    /// written, the entry list is rewritten without the new entry.
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::StorageUnavailable`] if either write failed.
    pub fn record_save(&mut self, entry: JournalEntry) -> Result<u64, GardenError> {
        self.append_entry(entry)?;
        match self.increment_flower_count() {
            Ok(count) => Ok(count),
            Err(e) => {
                self.state.entries.pop();
                if let Err(restore) = write_json(self.kv.as_mut(), ENTRIES_KEY, &self.state.entries)
                {
                    tracing::error!(error = %restore, "Failed to roll back entry list after counter write failure");
                }
                Err(e)
            }
        }
    }

    /// Canonical export payload, two-space indented
    #[must_use]
    pub fn serialize_all(&self) -> Vec<u8> {
        serde_json::to_vec_pretty(&self.state).unwrap_or_default()
    }

    /// Replace the whole garden with an imported payload
    ///
    /// A missing or null `flowerCount` is taken to be the number of imported
    /// entries. A present count is accepted as-is, even if it disagrees with
    /// the entry list.
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::MalformedImport`] if `data` is not an object with
    /// an `entries` array of valid entries, and
    /// [`GardenError::StorageUnavailable`] if the new state could not be
    /// persisted. The store is unchanged in both cases.
    pub fn replace_all(&mut self, data: &[u8]) -> Result<(), GardenError> {
        let payload: ImportPayload = serde_json::from_slice(data)
            .map_err(|e| GardenError::MalformedImport(e.to_string()))?;

        let flower_count = payload
            .flower_count
            .unwrap_or(payload.entries.len() as u64);
        let incoming = GardenState {
            entries: payload.entries,
            flower_count,
        };

        if let Err(e) = persist(self.kv.as_mut(), &incoming) {
            tracing::warn!(error = %e, "Import could not be persisted, restoring previous garden");
            if let Err(restore) = persist(self.kv.as_mut(), &self.state) {
                tracing::error!(error = %restore, "Failed to restore previous garden after import failure");
            }
            return Err(e.into());
        }

        tracing::info!(
            entries = incoming.entries.len(),
            flower_count = incoming.flower_count,
            "Replaced garden from import"
        );
        self.state = incoming;
        Ok(())
    }

    /// Autosaved draft for a mode, if any
    #[must_use]
    pub fn load_draft(&self, mode: WritingMode) -> Option<String> {
        match self.kv.get(&mode.draft_key()) {
            Ok(draft) => draft.filter(|d| !d.is_empty()),
            Err(e) => {
                tracing::warn!(mode = %mode, error = %e, "Could not read draft");
                None
            }
        }
    }

    /// Persist a draft for a mode
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::StorageUnavailable`] if the draft could not be written.
    pub fn save_draft(&mut self, mode: WritingMode, text: &str) -> Result<(), GardenError> {
        self.kv.set(&mode.draft_key(), text)?;
        Ok(())
    }

    /// Forget a mode's draft
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::StorageUnavailable`] if the draft could not be removed.
    pub fn clear_draft(&mut self, mode: WritingMode) -> Result<(), GardenError> {
        self.kv.remove(&mode.draft_key())?;
        Ok(())
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.kv.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Storage unreadable, starting empty");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored value is not valid, starting empty");
                None
            }
        }
    }
}

fn persist(kv: &mut dyn KeyValueStore, state: &GardenState) -> Result<(), StoreError> {
    write_json(kv, ENTRIES_KEY, &state.entries)?;
    write_json(kv, FLOWER_COUNT_KEY, &state.flower_count)
}

fn write_json<T: Serialize + ?Sized>(
    kv: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    // Serializing plain data into a String cannot fail
    let raw = serde_json::to_string(value).unwrap_or_default();
    kv.set(key, &raw)
}

impl std::fmt::Debug for EntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStore")
            .field("entries", &self.state.entries.len())
            .field("flower_count", &self.state.flower_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntryId, WritingMode};
    use chrono::{TimeZone, Utc};
    use kv::MemoryStore;
    use pretty_assertions::assert_eq;

    fn entry(id: u64, content: &str) -> JournalEntry {
        JournalEntry {
            id: EntryId(id),
            created_at: Utc.timestamp_millis_opt(id as i64).unwrap(),
            mode: WritingMode::Free,
            content: content.to_string(),
            prompt: None,
        }
    }

    #[test]
    fn test_load_empty() {
        let store = EntryStore::open(MemoryStore::new());
        assert_eq!(store.state(), &GardenState::default());
    }

    #[test]
    fn test_load_corrupt_falls_back_independently() {
        let kv = MemoryStore::with_values([(ENTRIES_KEY, "not json"), (FLOWER_COUNT_KEY, "4")]);
        let store = EntryStore::open(kv);
        assert!(store.entries().is_empty());
        assert_eq!(store.flower_count(), 4);

        let kv = MemoryStore::with_values([(ENTRIES_KEY, "[]"), (FLOWER_COUNT_KEY, "-1")]);
        let store = EntryStore::open(kv);
        assert_eq!(store.flower_count(), 0);
    }

    #[test]
    fn test_append_and_increment_persist() {
        let mut store = EntryStore::open(MemoryStore::new());
        store.append_entry(entry(1, "one")).unwrap();
        assert_eq!(store.increment_flower_count().unwrap(), 1);

        let reloaded = store.load();
        assert_eq!(reloaded.entries.len(), 1);
        assert_eq!(reloaded.flower_count, 1);
        assert_eq!(&reloaded, store.state());
    }

    #[test]
    fn test_failed_append_rolls_back() {
        let mut kv = MemoryStore::new();
        kv.set_read_only(true);
        let mut store = EntryStore::open(kv);

        let err = store.append_entry(entry(1, "one")).unwrap_err();
        assert!(matches!(err, GardenError::StorageUnavailable(_)));
        assert!(store.entries().is_empty());

        assert!(store.increment_flower_count().is_err());
        assert_eq!(store.flower_count(), 0);
    }

    #[test]
    fn test_record_save_counter_failure_rolls_back_entry() {
        let (kv, failing) = kv::FlakyKeyStore::new(FLOWER_COUNT_KEY);
        let mut store = EntryStore::open(kv);

        let result = store.record_save(entry(1, "Today was good."));
        assert!(matches!(result, Err(GardenError::StorageUnavailable(_))));
        assert!(store.entries().is_empty());
        assert_eq!(store.flower_count(), 0);
        assert_eq!(store.load(), GardenState::default());

        failing.store(false, std::sync::atomic::Ordering::SeqCst);
        assert_eq!(store.record_save(entry(2, "Today was good.")).unwrap(), 1);
        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.load().entries.len(), 1);
        assert_eq!(store.load().flower_count, 1);
    }

    #[test]
    fn test_serialize_is_two_space_indented() {
        let mut store = EntryStore::open(MemoryStore::new());
        store.append_entry(entry(1, "one")).unwrap();
        store.increment_flower_count().unwrap();

        let text = String::from_utf8(store.serialize_all()).unwrap();
        assert!(text.starts_with("{\n  \"entries\": ["));
        assert!(text.contains("\"flowerCount\": 1"));
    }

    #[test]
    fn test_round_trip_through_replace_all() {
        let mut source = EntryStore::open(MemoryStore::new());
        source.append_entry(entry(1, "one")).unwrap();
        source.append_entry(entry(2, "two")).unwrap();
        source.increment_flower_count().unwrap();
        source.increment_flower_count().unwrap();

        let mut target = EntryStore::open(MemoryStore::new());
        target.replace_all(&source.serialize_all()).unwrap();
        assert_eq!(target.state(), source.state());
        assert_eq!(target.load(), *source.state());
    }

    #[test]
    fn test_replace_all_missing_entries_is_malformed() {
        let mut store = EntryStore::open(MemoryStore::new());
        store.append_entry(entry(1, "keep me")).unwrap();
        let before = store.state().clone();

        let err = store.replace_all(br#"{"flowerCount": 3}"#).unwrap_err();
        assert!(matches!(err, GardenError::MalformedImport(_)));
        assert_eq!(store.state(), &before);
        assert_eq!(store.load(), before);
    }

    #[test]
    fn test_replace_all_rejects_bad_shapes() {
        let mut store = EntryStore::open(MemoryStore::new());
        for payload in [
            &b"[]"[..],
            b"not json",
            br#"{"entries": {}}"#,
            br#"{"entries": [], "flowerCount": "three"}"#,
            br#"{"entries": [{"id": 1}]}"#,
        ] {
            assert!(
                matches!(store.replace_all(payload), Err(GardenError::MalformedImport(_))),
                "payload should be rejected: {}",
                String::from_utf8_lossy(payload)
            );
        }
    }

    #[test]
    fn test_replace_all_count_defaults_and_mismatch() {
        let mut store = EntryStore::open(MemoryStore::new());
        let entries = serde_json::to_string(&vec![entry(1, "a"), entry(2, "b")]).unwrap();

        store
            .replace_all(format!(r#"{{"entries": {entries}}}"#).as_bytes())
            .unwrap();
        assert_eq!(store.flower_count(), 2);

        store
            .replace_all(format!(r#"{{"entries": {entries}, "flowerCount": null}}"#).as_bytes())
            .unwrap();
        assert_eq!(store.flower_count(), 2);

        store
            .replace_all(format!(r#"{{"entries": {entries}, "flowerCount": 40}}"#).as_bytes())
            .unwrap();
        assert_eq!(store.flower_count(), 40);
        assert_eq!(store.entries().len(), 2);
    }

    #[test]
    fn test_replace_all_write_failure_leaves_state() {
        let mut kv = MemoryStore::new();
        kv.set_read_only(true);
        let mut store = EntryStore::open(kv);

        let err = store.replace_all(br#"{"entries": []  , "flowerCount": 9}"#).unwrap_err();
        assert!(matches!(err, GardenError::StorageUnavailable(_)));
        assert_eq!(store.flower_count(), 0);
    }

    #[test]
    fn test_drafts() {
        let mut store = EntryStore::open(MemoryStore::new());
        assert_eq!(store.load_draft(WritingMode::Penny), None);
        store.save_draft(WritingMode::Penny, "half a thought").unwrap();
        assert_eq!(
            store.load_draft(WritingMode::Penny).as_deref(),
            Some("half a thought")
        );
        store.clear_draft(WritingMode::Penny).unwrap();
        assert_eq!(store.load_draft(WritingMode::Penny), None);
    }
}
