//! Document metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which the page count is stored.
pub const PAGE_COUNT_KEY: &str = "page_count";

/// Key holding the document title.
pub const TITLE_KEY: &str = "title";

/// Ordered mapping of metadata keys to JSON values.
///
/// Keys keep their insertion order so the JSON dump lists them the way the
/// extractor produced them, with `page_count` last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    /// Create an empty metadata map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The title, if the key exists and holds a string.
    pub fn title(&self) -> Option<&str> {
        self.get(TITLE_KEY).and_then(Value::as_str)
    }

    /// The injected page count.
    pub fn page_count(&self) -> Option<u64> {
        self.get(PAGE_COUNT_KEY).and_then(Value::as_u64)
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
