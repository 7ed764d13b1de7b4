//! Repository trait for saved search persistence
//!
//! The repository moves the whole persisted sequence at once; there are no
//! partial updates. Entries cross this boundary as raw JSON so that shape
//! repair happens in one place, in the saved search store.

use serde_json::Value;

use crate::error::Result;

/// Durable storage for the saved search sequence
pub trait SavedQueryRepository: Send + Sync {
    /// Read every persisted entry, in order
    ///
    /// A store that does not exist yet reads as empty.
    fn load_raw(&self) -> Result<Vec<Value>>;

    /// Replace the persisted sequence
    fn store_raw(&mut self, entries: Vec<Value>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify trait is object-safe
    fn _assert_object_safe(_: &dyn SavedQueryRepository) {}
}
