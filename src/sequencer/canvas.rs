use std::collections::BTreeMap;

use crate::{
    foundation::core::VisualId,
    foundation::error::{DeckError, DeckResult},
};

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// Registry of persistent visual objects keyed by stable names.
///
/// Registered objects are exempt from wholesale content-replacement
/// operations and must be transformed or removed explicitly by the author.
/// Key collisions are configuration errors; the registry never silently
/// overwrites.
pub struct CanvasRegistry {
    entries: BTreeMap<String, VisualId>,
}

impl CanvasRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key; fails on empty or duplicate keys.
    pub fn insert(&mut self, key: impl Into<String>, id: VisualId) -> DeckResult<()> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(DeckError::registry("canvas key must be non-empty"));
        }
        if self.entries.contains_key(&key) {
            return Err(DeckError::registry(format!(
                "duplicate canvas key '{key}'"
            )));
        }
        self.entries.insert(key, id);
        Ok(())
    }

    /// Deregister a key; fails when absent.
    pub fn remove(&mut self, key: &str) -> DeckResult<VisualId> {
        self.entries
            .remove(key)
            .ok_or_else(|| DeckError::registry(format!("unknown canvas key '{key}'")))
    }

    /// Look up the handle registered under `key`; fails when absent.
    pub fn lookup(&self, key: &str) -> DeckResult<VisualId> {
        self.entries
            .get(key)
            .copied()
            .ok_or_else(|| DeckError::registry(format!("unknown canvas key '{key}'")))
    }

    /// Replace the handle behind an existing key; fails when absent.
    pub fn replace(&mut self, key: &str, id: VisualId) -> DeckResult<VisualId> {
        match self.entries.get_mut(key) {
            Some(slot) => Ok(std::mem::replace(slot, id)),
            None => Err(DeckError::registry(format!("unknown canvas key '{key}'"))),
        }
    }

    /// True when `id` is registered under any key.
    pub fn contains_id(&self, id: VisualId) -> bool {
        self.entries.values().any(|v| *v == id)
    }

    /// Registered keys in stable (sorted) order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Key/handle pairs in stable (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, VisualId)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
