//! Keyed memoization for derived view values.

use sha2::{Digest, Sha256};

/// Holds one derived value and the key it was computed from.
/// The value is recomputed only when the key changes.
#[derive(Debug)]
pub struct Memo<K, V> {
    key: Option<K>,
    value: Option<V>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { key: None, value: None }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        if self.key.as_ref() != Some(&key) {
            self.key = Some(key);
            self.value = None;
        }
        self.value.get_or_insert_with(compute)
    }

    pub fn get(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Value only if it was computed for `key`.
    pub fn get_for(&self, key: &K) -> Option<&V> {
        if self.key.as_ref() == Some(key) { self.value.as_ref() } else { None }
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.value = None;
    }
}

/// Hash content for change detection (SHA-256, collision-resistant)
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:064x}", hasher.finalize())
}
