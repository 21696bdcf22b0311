//! Static model catalog
//!
//! The selectable backends exposed to clients: pure data, no logic. The
//! catalog is advisory; any hub model id can be requested directly.

use serde::{Deserialize, Serialize};

/// One selectable model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Hub model identifier
    pub id: String,
    /// Human-readable display name
    pub name: String,
}

/// Enumerated list of selectable backends
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    entries: Vec<CatalogEntry>,
}

impl ModelCatalog {
    /// Built-in catalog
    pub fn builtin() -> Self {
        let entries = [
            ("microsoft/speecht5_tts", "Microsoft SpeechT5 (Recommended)"),
            ("facebook/mms-tts-eng", "Facebook MMS (English)"),
            ("drewThomasson/fineTunedTTSModels", "David Attenborough (XTTS - Slow on CPU)"),
            ("espnet/kan-bayashi_ljspeech_vits", "LJSpeech VITS"),
        ]
        .into_iter()
        .map(|(id, name)| CatalogEntry {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect();

        Self { entries }
    }

    /// All entries, in display order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Whether an id appears in the catalog
    pub fn contains(&self, model_id: &str) -> bool {
        self.entries.iter().any(|e| e.id == model_id)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
