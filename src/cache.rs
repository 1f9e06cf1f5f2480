use parking_lot::Mutex;
use std::collections::HashMap;

use crate::path::result::ReadingPath;

/// Strategy-keyed store for generated paths. Builder inputs are immutable
/// after construction, so a strategy's path never changes; the fixed
/// strategy set keeps the cache naturally bounded.
#[derive(Default, Debug)]
pub(crate) struct PathCache {
    inner: Mutex<HashMap<String, ReadingPath>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<ReadingPath> {
        let guard = self.inner.lock();
        match guard.get(key) {
            Some(path) => {
                tracing::debug!(key = %key, "Path cache hit");
                Some(path.clone())
            }
            None => {
                tracing::debug!(key = %key, "Path cache miss");
                None
            }
        }
    }

    pub fn insert(&self, key: &str, path: ReadingPath) {
        self.inner.lock().insert(key.to_string(), path);
    }
}
