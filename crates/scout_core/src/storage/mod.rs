//! Key-value persistence for tracker and scoreboard state.
//!
//! The system boundary is a string key-value store; every persisted record is
//! a JSON string under a well-known key. Writes are fire-and-forget: a failed
//! write is logged and lost, never surfaced to the mutation path.

pub mod error;
pub mod file;
pub mod keys;

pub use error::StorageError;
pub use file::FileStore;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub const STORE_VERSION: u32 = 1;

/// String key-value storage with get/set/remove semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// Volatile in-memory store, used in tests and as a stand-in when no durable
/// backing is wanted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Cloneable handle to one underlying store, so the tracker and the
/// scoreboard can share a single backing file within the one UI thread.
#[derive(Clone)]
pub struct SharedStore {
    inner: Rc<RefCell<Box<dyn KeyValueStore>>>,
}

impl SharedStore {
    pub fn new(inner: Box<dyn KeyValueStore>) -> Self {
        Self { inner: Rc::new(RefCell::new(inner)) }
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.inner.borrow_mut().set(key, value);
    }

    fn remove(&mut self, key: &str) {
        self.inner.borrow_mut().remove(key);
    }
}
