//! Session cache of raw query responses.
//!
//! # Design
//! Entries map a request's canonical key to the raw JSON the server returned,
//! before any document decoding, so a later call may decode the same payload
//! with a different decoder. Entries never expire. The cache is a plain value
//! with no locking; hosts that share it across tasks fold results back in with
//! [`merge_caches`].

use std::collections::HashMap;

use serde_json::Value;

use crate::request::Request;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cache {
    entries: HashMap<String, Value>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, request: &Request) -> Option<&Value> {
        self.entries.get(&request.cache_key())
    }

    pub fn insert(&mut self, request: &Request, raw: Value) {
        self.entries.insert(request.cache_key(), raw);
    }

    pub fn contains(&self, request: &Request) -> bool {
        self.entries.contains_key(&request.cache_key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// `b` plus every entry of `a` whose key `b` lacks. `b` wins on collisions.
pub fn merge_caches(a: &Cache, b: &Cache) -> Cache {
    let mut merged = b.clone();
    for (key, value) in &a.entries {
        merged
            .entries
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
    merged
}
