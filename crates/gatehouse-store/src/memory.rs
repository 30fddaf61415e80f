//! In-memory document backend.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::document::{Document, DocumentStore};

/// Keeps the "persisted" document in process memory.
///
/// Used by tests in place of [`JsonFileStore`](crate::JsonFileStore).
/// Writes can be made to fail to exercise persistence-failure paths.
#[derive(Debug)]
pub struct MemoryStore<V> {
    document: RwLock<Document<V>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl<V> MemoryStore<V> {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self {
            document: RwLock::new(Document::new()),
            fail_writes: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent save fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl<V: Clone> MemoryStore<V> {
    /// Copy of the last saved document.
    pub async fn snapshot(&self) -> Document<V> {
        self.document.read().await.clone()
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> DocumentStore<V> for MemoryStore<V>
where
    V: Clone + std::fmt::Debug + Send + Sync + 'static,
{
    async fn load(&self) -> AppResult<Document<V>> {
        Ok(self.document.read().await.clone())
    }

    async fn save(&self, document: &Document<V>) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::storage("Simulated write failure"));
        }
        *self.document.write().await = document.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
