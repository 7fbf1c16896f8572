//! Mock remote store.

use crate::error::{BookingError, Result};
use crate::providers::store::{
    RealtimeStore, SubtreeSnapshot, SubtreeWatch, subtree_value, write_subtree,
};
use async_stream::stream;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

struct Watcher {
    path: String,
    sender: mpsc::UnboundedSender<SubtreeSnapshot>,
}

/// In-memory mock of the remote real-time store.
///
/// Keeps a JSON tree behind a mutex and notifies every watcher with its
/// own full subtree after each write, mirroring the remote store's
/// value-listener semantics. Generated push ids are zero-padded so their
/// lexicographic order is insertion order, like real push ids.
///
/// Tests can inject write failures and inspect how many write operations
/// were issued.
#[derive(Clone)]
pub struct MockRealtimeStore {
    tree: Arc<Mutex<Value>>,
    watchers: Arc<Mutex<Vec<Watcher>>>,
    next_id: Arc<AtomicU64>,
    fail_writes: Arc<AtomicBool>,
    write_count: Arc<AtomicU64>,
}

impl MockRealtimeStore {
    /// Create an empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Arc::new(Mutex::new(Value::Null)),
            watchers: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            fail_writes: Arc::new(AtomicBool::new(false)),
            write_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Make every subsequent write operation fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of write operations issued (including failed ones).
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Inspect the value at `path` (test helper).
    #[must_use]
    pub fn value_at(&self, path: &str) -> Option<Value> {
        let tree = self.tree.lock().unwrap_or_else(PoisonError::into_inner);
        subtree_value(&tree, path)
    }

    fn check_write(&self) -> Result<()> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BookingError::store("injected write failure"));
        }
        Ok(())
    }

    fn write(&self, path: &str, value: Option<Value>) {
        {
            let mut tree = self.tree.lock().unwrap_or_else(PoisonError::into_inner);
            write_subtree(&mut tree, path, value);
        }
        self.notify_watchers();
    }

    fn notify_watchers(&self) {
        let mut watchers = self.watchers.lock().unwrap_or_else(PoisonError::into_inner);
        watchers.retain(|watcher| {
            let snapshot = self.value_at(&watcher.path);
            watcher.sender.send(snapshot).is_ok()
        });
    }
}

impl Default for MockRealtimeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeStore for MockRealtimeStore {
    fn get(&self, path: &str) -> impl Future<Output = Result<Option<Value>>> + Send {
        let store = self.clone();
        let path = path.to_string();
        async move { Ok(store.value_at(&path)) }
    }

    fn push(&self, path: &str, value: &Value) -> impl Future<Output = Result<String>> + Send {
        let store = self.clone();
        let path = path.to_string();
        let value = value.clone();
        async move {
            store.check_write()?;
            let id = format!("-M{:06}", store.next_id.fetch_add(1, Ordering::SeqCst));
            store.write(&format!("{path}/{id}"), Some(value));
            Ok(id)
        }
    }

    fn set(&self, path: &str, value: &Value) -> impl Future<Output = Result<()>> + Send {
        let store = self.clone();
        let path = path.to_string();
        let value = value.clone();
        async move {
            store.check_write()?;
            store.write(&path, Some(value));
            Ok(())
        }
    }

    fn remove(&self, path: &str) -> impl Future<Output = Result<()>> + Send {
        let store = self.clone();
        let path = path.to_string();
        async move {
            store.check_write()?;
            store.write(&path, None);
            Ok(())
        }
    }

    fn watch(&self, path: &str) -> impl Future<Output = Result<SubtreeWatch>> + Send {
        let store = self.clone();
        let path = path.to_string();
        async move {
            let (sender, mut receiver) = mpsc::unbounded_channel();

            // Value listeners fire immediately with the current contents
            let initial = store.value_at(&path);
            let _ = sender.send(initial);

            store
                .watchers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Watcher { path, sender });

            let snapshots = stream! {
                while let Some(snapshot) = receiver.recv().await {
                    yield snapshot;
                }
            };
            Ok(SubtreeWatch::new(snapshots))
        }
    }
}
