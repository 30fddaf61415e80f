//! Whole-document persistence trait.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::result::AppResult;

/// A keyed table persisted as one document.
pub type Document<V> = HashMap<String, V>;

/// Durable backend for a keyed table that is always read and written whole.
///
/// `save` replaces the stored document with the given table. There is no
/// incremental write; owners call it after every mutation while holding
/// their own lock, so a backend never sees concurrent saves for one table.
#[async_trait]
pub trait DocumentStore<V>: Send + Sync + std::fmt::Debug + 'static
where
    V: Send + Sync + 'static,
{
    /// Load the stored table. A document that does not exist yet is empty.
    async fn load(&self) -> AppResult<Document<V>>;

    /// Replace the stored table.
    async fn save(&self, document: &Document<V>) -> AppResult<()>;

    /// Human-readable location used in log lines.
    fn location(&self) -> String;
}
