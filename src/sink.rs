// ABOUTME: Concurrency-safe result sink shared by collecting nodes.
// ABOUTME: The only engine contract on a sink: it serializes its own mutations.

use std::sync::{Arc, Mutex};

/// An append-only accumulator safe for concurrent writers.
///
/// The engine never touches the sink itself; callers construct one, hand
/// clones to the nodes that collect into it, and read it back after the
/// traversal returns. `collect_results` calls from sibling and cousin nodes
/// may race in time, so every mutation happens under the internal mutex.
pub struct ResultSink<T> {
    inner: Arc<Mutex<Vec<T>>>,
}

impl<T> ResultSink<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append one value.
    pub fn push(&self, value: T) {
        self.inner.lock().unwrap().push(value);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    /// Drain all accumulated values, leaving the sink empty.
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.inner.lock().unwrap())
    }
}

impl<T: Clone> ResultSink<T> {
    /// Copy of the accumulated values in insertion order.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.lock().unwrap().clone()
    }
}

impl<T> Clone for ResultSink<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for ResultSink<T> {
    fn default() -> Self {
        Self::new()
    }
}
