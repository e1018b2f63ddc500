//! Script history
//!
//! An ordered, newest-first list of generated scripts persisted as one JSON
//! array under [`HISTORY_KEY`]. Every mutation rewrites the whole array.
//! Unreadable stored data is treated as an empty history.

use crate::error::{Result, ReelscriptError};
use crate::storage::{BlobStore, HistoryItem};

/// Key the serialized history lives under
pub const HISTORY_KEY: &str = "script_history";

/// Persisted history of generated scripts
pub struct HistoryStore<S: BlobStore> {
    store: S,
    items: Vec<HistoryItem>,
}

impl<S: BlobStore> HistoryStore<S> {
    /// Open the history kept in `store` and load it
    ///
    /// # Errors
    ///
    /// Returns `ReelscriptError::Storage` if the backend cannot be read.
    /// Malformed data is not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelscript::history::HistoryStore;
    /// use reelscript::storage::{HistoryItem, MemoryBlobStore};
    ///
    /// # fn main() -> reelscript::error::Result<()> {
    /// let mut history = HistoryStore::open(MemoryBlobStore::new())?;
    /// history.append(HistoryItem::new("Storytelling", "coffee", "Once..."))?;
    /// assert_eq!(history.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(store: S) -> Result<Self> {
        let mut history = Self {
            store,
            items: Vec::new(),
        };
        history.load()?;
        Ok(history)
    }

    /// Reload the sequence from the backend, replacing the in-memory copy
    pub fn load(&mut self) -> Result<&[HistoryItem]> {
        self.items = match self.store.get(HISTORY_KEY)? {
            None => Vec::new(),
            Some(bytes) => match decode(&bytes) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!("Discarding unreadable history: {}", e);
                    Vec::new()
                }
            },
        };
        tracing::debug!("Loaded {} history items", self.items.len());
        Ok(&self.items)
    }

    /// Insert `item` at the front and persist
    ///
    /// The in-memory sequence only changes once the write has succeeded.
    pub fn append(&mut self, item: HistoryItem) -> Result<()> {
        tracing::debug!(id = %item.id, "Appending history item");
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.push(item);
        items.extend(self.items.iter().cloned());
        self.persist(&items)?;
        self.items = items;
        Ok(())
    }

    /// Remove the item whose id equals `id` and persist
    ///
    /// Returns `false` when no item matches; nothing is written in that case.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if !self.items.iter().any(|item| item.id == id) {
            tracing::debug!(id = %id, "No history item to delete");
            return Ok(false);
        }

        let items: Vec<HistoryItem> = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        self.persist(&items)?;
        self.items = items;
        tracing::debug!(id = %id, "Deleted history item");
        Ok(true)
    }

    /// Empty the history and remove the stored key
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(HISTORY_KEY)?;
        self.items.clear();
        tracing::info!("History cleared");
        Ok(())
    }

    /// Items, newest first
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Find an item by full id or unique id prefix
    ///
    /// # Errors
    ///
    /// Returns `ReelscriptError::History` if the prefix matches more than one item
    pub fn get(&self, id: &str) -> Result<Option<&HistoryItem>> {
        if let Some(item) = self.items.iter().find(|item| item.id == id) {
            return Ok(Some(item));
        }
        if id.is_empty() {
            return Ok(None);
        }

        let mut matches = self.items.iter().filter(|item| item.id.starts_with(id));
        match (matches.next(), matches.next()) {
            (Some(item), None) => Ok(Some(item)),
            (None, _) => Ok(None),
            (Some(_), Some(_)) => Err(ReelscriptError::History(format!(
                "History id prefix '{}' is ambiguous",
                id
            ))
            .into()),
        }
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Access the underlying backend
    pub fn backend(&self) -> &S {
        &self.store
    }

    fn persist(&self, items: &[HistoryItem]) -> Result<()> {
        let bytes = serde_json::to_vec(items)
            .map_err(|e| ReelscriptError::Storage(format!("Serialization failed: {}", e)))?;
        self.store.put(HISTORY_KEY, &bytes)
    }
}

fn decode(bytes: &[u8]) -> std::result::Result<Vec<HistoryItem>, ReelscriptError> {
    serde_json::from_slice(bytes).map_err(|e| ReelscriptError::Persistence(e.to_string()))
}
