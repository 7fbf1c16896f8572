//! Remote store trait and subscription plumbing.

use crate::error::Result;
use futures::stream::{Stream, StreamExt};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// Full current contents of a watched subtree.
///
/// `None` when the subtree is absent (empty collections are not stored).
pub type SubtreeSnapshot = Option<Value>;

/// Remote real-time store boundary.
///
/// A path-addressable, JSON-valued store: slash-separated paths address
/// subtrees, point writes replace them, and a subscription delivers the
/// full current subtree on every change.
pub trait RealtimeStore: Send + Sync {
    /// Read the value at `path`.
    ///
    /// Absent paths yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::BookingError::Store`] when the request fails.
    fn get(&self, path: &str) -> impl Future<Output = Result<Option<Value>>> + Send;

    /// Append `value` under `path` with a store-generated id.
    ///
    /// Returns the generated id; generated ids sort chronologically.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::BookingError::Store`] when the write fails.
    fn push(&self, path: &str, value: &Value) -> impl Future<Output = Result<String>> + Send;

    /// Replace the value at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::BookingError::Store`] when the write fails.
    fn set(&self, path: &str, value: &Value) -> impl Future<Output = Result<()>> + Send;

    /// Delete the value at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::BookingError::Store`] when the delete fails.
    fn remove(&self, path: &str) -> impl Future<Output = Result<()>> + Send;

    /// Open a standing subscription to the subtree at `path`.
    ///
    /// The watch yields the current contents immediately and again after
    /// every change. Cancelling the returned handle (or dropping the
    /// watch) detaches the listener.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::BookingError::Subscription`] when the
    /// subscription cannot be opened.
    fn watch(&self, path: &str) -> impl Future<Output = Result<SubtreeWatch>> + Send;
}

/// Handle for detaching a subtree subscription.
///
/// `unsubscribe` is idempotent and safe to call from any task; the first
/// call wins and later calls are no-ops.
#[derive(Debug, Clone)]
pub struct WatchHandle {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl WatchHandle {
    /// Create a fresh, not-yet-cancelled handle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Detach the subscription. Idempotent.
    pub fn unsubscribe(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    /// `true` once `unsubscribe` has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once the handle is cancelled.
    pub async fn cancelled(&self) {
        // Register interest before checking the flag so an unsubscribe
        // between the check and the await is not missed.
        let notified = self.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

impl Default for WatchHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// A standing subtree subscription.
///
/// Wraps the store-specific snapshot stream with a cancellation handle.
/// Dropping the watch unsubscribes.
pub struct SubtreeWatch {
    snapshots: Pin<Box<dyn Stream<Item = SubtreeSnapshot> + Send>>,
    handle: WatchHandle,
}

impl SubtreeWatch {
    /// Wrap a snapshot stream with a fresh handle.
    pub fn new(snapshots: impl Stream<Item = SubtreeSnapshot> + Send + 'static) -> Self {
        Self {
            snapshots: Box::pin(snapshots),
            handle: WatchHandle::new(),
        }
    }

    /// A handle that detaches this subscription.
    #[must_use]
    pub fn handle(&self) -> WatchHandle {
        self.handle.clone()
    }

    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the subscription is cancelled or the underlying
    /// stream ends.
    pub async fn next(&mut self) -> Option<SubtreeSnapshot> {
        if self.handle.is_cancelled() {
            return None;
        }
        let handle = self.handle.clone();
        tokio::select! {
            () = handle.cancelled() => None,
            snapshot = self.snapshots.next() => snapshot,
        }
    }
}

impl Drop for SubtreeWatch {
    fn drop(&mut self) {
        self.handle.unsubscribe();
    }
}

impl std::fmt::Debug for SubtreeWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubtreeWatch")
            .field("cancelled", &self.handle.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Read the value at a slash-separated path inside a JSON tree.
///
/// Empty segments are ignored, so `"a//b"` and `"/a/b"` address the same
/// subtree. Explicit JSON `null` counts as absent.
#[must_use]
pub fn subtree_value(root: &Value, path: &str) -> Option<Value> {
    let mut current = root;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current = current.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current.clone())
    }
}

/// Write (or with `None`, delete) the value at a slash-separated path.
///
/// Intermediate objects are created as needed; writing at the root path
/// replaces the whole tree.
pub fn write_subtree(root: &mut Value, path: &str, value: Option<Value>) {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let Some((last, parents)) = segments.split_last() else {
        *root = value.unwrap_or(Value::Null);
        return;
    };

    let mut current = root;
    for segment in parents {
        if !matches!(current, Value::Object(_)) {
            *current = Value::Object(serde_json::Map::new());
        }
        current = match current {
            Value::Object(map) => map.entry((*segment).to_string()).or_insert(Value::Null),
            // Just replaced with an object above
            _ => return,
        };
    }

    if !matches!(current, Value::Object(_)) {
        *current = Value::Object(serde_json::Map::new());
    }
    if let Value::Object(map) = current {
        match value {
            Some(value) => {
                map.insert((*last).to_string(), value);
            },
            None => {
                map.remove(*last);
            },
        }
    }
}
