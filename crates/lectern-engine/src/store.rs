//! Settings store interface
//!
//! Preference persistence is an external collaborator; the engine only
//! sees get/set over an opaque blob, and treats both as potentially
//! failing. Reads always produce a usable snapshot — last-known-good, or
//! the documented defaults when the backing data is absent or corrupt —
//! never a partially-merged record.

use lectern_css::ReaderSettings;

/// Persistence failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("settings backend unavailable")]
    Unavailable,
    #[error("failed to encode settings: {0}")]
    Encode(serde_json::Error),
}

/// Read/write access to the persisted preference snapshot
pub trait SettingsStore {
    /// Last-known-good snapshot; documented defaults on any read failure.
    fn get(&self) -> ReaderSettings;

    /// Persist a snapshot. A successful return does not guarantee the
    /// write is durable yet; the engine never assumes it is.
    fn set(&mut self, settings: &ReaderSettings) -> Result<(), StoreError>;
}

/// In-memory store keeping the snapshot as a JSON blob, the same shape
/// an external persistent store would hold. Write failure is injectable
/// for exercising degraded paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Option<String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing blob (e.g. a previously persisted record)
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
            fail_writes: false,
        }
    }

    /// Make subsequent writes fail
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// The raw stored blob, if any
    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self) -> ReaderSettings {
        let Some(blob) = &self.blob else {
            return ReaderSettings::default();
        };
        match serde_json::from_str(blob) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(%err, "corrupt settings blob, using defaults");
                ReaderSettings::default()
            }
        }
    }

    fn set(&mut self, settings: &ReaderSettings) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable);
        }
        let blob = serde_json::to_string(settings).map_err(StoreError::Encode)?;
        self.blob = Some(blob);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_every_field() {
        let mut store = MemoryStore::new();
        let mut settings = ReaderSettings::default();
        settings.font_size = 19;
        settings.line_height = 1.8;
        settings.dark_mode = true;
        settings.font_family = "Georgia, serif".to_string();

        store.set(&settings).unwrap();
        assert_eq!(store.get(), settings);
    }

    #[test]
    fn test_empty_store_yields_defaults() {
        let store = MemoryStore::new();
        assert_eq!(store.get(), ReaderSettings::default());
    }

    #[test]
    fn test_corrupt_blob_yields_full_defaults() {
        let store = MemoryStore::with_blob("{not json");
        assert_eq!(store.get(), ReaderSettings::default());

        // wrong-typed field: the record is rejected whole, never merged
        let store = MemoryStore::with_blob(r#"{"fontSize": "huge", "darkMode": true}"#);
        assert_eq!(store.get(), ReaderSettings::default());
    }

    #[test]
    fn test_partial_blob_fills_missing_fields_with_defaults() {
        let store = MemoryStore::with_blob(r#"{"fontSize": 21}"#);
        let settings = store.get();
        assert_eq!(settings.font_size, 21);
        assert_eq!(settings.max_width, 800);
    }

    #[test]
    fn test_failed_write_leaves_previous_snapshot() {
        let mut store = MemoryStore::new();
        let mut settings = ReaderSettings::default();
        settings.font_size = 21;
        store.set(&settings).unwrap();

        store.set_fail_writes(true);
        settings.font_size = 30;
        assert!(matches!(
            store.set(&settings),
            Err(StoreError::Unavailable)
        ));
        assert_eq!(store.get().font_size, 21);
    }
}
