use std::collections::HashMap;

use super::types::PageRow;

/// In-memory page rows keyed by request path, owned by a [`super::PageLoader`].
#[derive(Debug, Default, Clone)]
pub struct PageCache {
    entries: HashMap<String, PageRow>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&PageRow> {
        self.entries.get(path)
    }

    pub fn insert(&mut self, path: impl Into<String>, row: PageRow) {
        self.entries.insert(path.into(), row);
    }

    /// Drop one path. Returns whether it was cached.
    pub fn invalidate(&mut self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
