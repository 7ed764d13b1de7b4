//! Saved searches
//!
//! Saved searches are kept in their persisted JSON shape. Turning one back
//! into a [`Query`] goes through [`restore_query`], which overlays the stored
//! fields on the default query one field at a time: fields the entry lacks
//! (older shapes) or cannot express (malformed values) keep their defaults,
//! and date bounds stored as ISO strings are parsed back into dates.
//! Unknown fields written by newer versions are carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::query::Query;
use super::repository_trait::SavedQueryRepository;
use crate::error::Result;

/// A named query snapshot in its persisted shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub name: String,
    pub query: Value,
}

impl SavedQuery {
    /// Snapshot a query under a name
    pub fn new(name: impl Into<String>, query: &Query) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            query: serde_json::to_value(query)?,
        })
    }

    /// Rehydrate the stored query
    pub fn apply(&self) -> Query {
        restore_query(&self.query)
    }
}

/// Rebuild a query from its persisted shape, defaulting what is missing or
/// malformed
pub fn restore_query(stored: &Value) -> Query {
    let defaults = Query::default();
    let Some(stored) = stored.as_object() else {
        warn!("Saved query is not an object; using defaults");
        return defaults;
    };
    let Ok(Value::Object(mut merged)) = serde_json::to_value(&defaults) else {
        return defaults;
    };

    for (field, value) in stored {
        if !merged.contains_key(field) {
            continue;
        }
        // Each field is checked on its own; the rest come from defaults
        let single = Value::Object(Map::from_iter([(field.clone(), value.clone())]));
        let checked = serde_json::from_value::<Query>(single)
            .and_then(|partial| serde_json::to_value(&partial));
        match checked {
            Ok(Value::Object(mut normalized)) => {
                if let Some(normalized) = normalized.remove(field) {
                    merged.insert(field.clone(), normalized);
                }
            }
            _ => warn!(field = %field, value = %value, "Discarding malformed saved query field"),
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or(defaults)
}

/// Turn one raw persisted entry into a saved search
///
/// Entries that are not objects cannot be named or applied and are dropped.
fn repair_entry(position: usize, raw: Value) -> Option<SavedQuery> {
    let Value::Object(mut fields) = raw else {
        warn!(position, "Dropping saved search entry that is not an object");
        return None;
    };

    let name = match fields.remove("name") {
        Some(Value::String(name)) => name,
        _ => {
            warn!(position, "Saved search entry has no name");
            format!("Saved search {}", position + 1)
        }
    };
    let query = match fields.remove("query") {
        Some(query @ Value::Object(_)) => query,
        _ => {
            warn!(position, name = %name, "Saved search entry has no query; using defaults");
            Value::Object(Map::new())
        }
    };

    Some(SavedQuery { name, query })
}

/// Ordered collection of saved searches backed by a repository
///
/// Names are not unique. Every mutation rewrites the whole persisted
/// sequence, so concurrent writers resolve as last-writer-wins.
pub struct SavedQueryStore<R: SavedQueryRepository> {
    repository: R,
    entries: Vec<SavedQuery>,
}

impl<R: SavedQueryRepository> SavedQueryStore<R> {
    /// Load and repair every persisted entry
    pub fn open(repository: R) -> Result<Self> {
        let raw = repository.load_raw()?;
        let total = raw.len();
        let entries: Vec<SavedQuery> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(position, entry)| repair_entry(position, entry))
            .collect();

        debug!(loaded = entries.len(), dropped = total - entries.len(), "Saved search store opened");
        Ok(Self {
            repository,
            entries,
        })
    }

    /// Get the underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Append a snapshot of `query` under `name`
    pub fn save(&mut self, name: impl Into<String>, query: &Query) -> Result<()> {
        let saved = SavedQuery::new(name, query)?;
        info!(name = %saved.name, position = self.entries.len(), "Saving search");
        self.entries.push(saved);
        self.persist()
    }

    pub fn list(&self) -> &[SavedQuery] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&SavedQuery> {
        self.entries.get(index)
    }

    /// Most recently saved entry with this name
    pub fn find_latest(&self, name: &str) -> Option<&SavedQuery> {
        self.entries.iter().rev().find(|saved| saved.name == name)
    }

    /// Rehydrate a saved search into a live query
    pub fn apply(&self, saved: &SavedQuery) -> Query {
        saved.apply()
    }

    /// Remove the entry at `index`; out of range is a no-op
    pub fn delete(&mut self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            debug!(index, len = self.entries.len(), "Delete index out of range; nothing to do");
            return Ok(());
        }

        let removed = self.entries.remove(index);
        info!(name = %removed.name, index, "Deleted saved search");
        self.persist()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&mut self) -> Result<()> {
        let raw = self
            .entries
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.repository.store_raw(raw)
    }
}
