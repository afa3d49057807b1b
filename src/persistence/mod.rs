//! Key-value persistence
//!
//! Everything the wheel remembers (names, settings, winner history) is a
//! JSON document under a fixed key. The browser build stores these in
//! LocalStorage; native builds and tests use an in-memory map.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage is not available")]
    Unavailable,

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("corrupt data under key `{key}`: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode data for key `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Synchronous string key-value storage
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Read and decode a JSON document. `Ok(None)` when the key is absent.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get_item(key)? {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode and write a JSON document
pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set_item(key, &json)
}

/// In-memory store. Clones share the same underlying map, mirroring how
/// every LocalStorage handle sees the same origin storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    /// Open the origin's LocalStorage
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error(err: wasm_bindgen::JsValue) -> StoreError {
    StoreError::Backend(format!("{:?}", err))
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

/// LocalStorage when the browser allows it, otherwise an in-memory map
/// that lasts for the page session
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub enum BrowserStore {
    Local(LocalStore),
    Memory(MemoryStore),
}

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    pub fn open() -> Self {
        match LocalStore::open() {
            Ok(local) => BrowserStore::Local(local),
            Err(e) => {
                log::warn!("{} - nothing will be saved this session", e);
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            BrowserStore::Local(s) => s.get_item(key),
            BrowserStore::Memory(s) => s.get_item(key),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            BrowserStore::Local(s) => s.set_item(key, value),
            BrowserStore::Memory(s) => s.set_item(key, value),
        }
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        match self {
            BrowserStore::Local(s) => s.remove_item(key),
            BrowserStore::Memory(s) => s.remove_item(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_clones_share_items() {
        let mut a = MemoryStore::new();
        let b = a.clone();
        a.set_item("k", "v").unwrap();
        assert_eq!(b.get_item("k").unwrap().as_deref(), Some("v"));
        a.remove_item("k").unwrap();
        assert!(b.is_empty());
    }

    #[test]
    fn test_json_roundtrip_and_absent_key() {
        let mut store = MemoryStore::new();
        let missing: Option<Vec<String>> = load_json(&store, "names").unwrap();
        assert!(missing.is_none());

        save_json(&mut store, "names", &["a", "b"]).unwrap();
        let names: Option<Vec<String>> = load_json(&store, "names").unwrap();
        assert_eq!(names, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_corrupt_json_is_reported() {
        let mut store = MemoryStore::new();
        store.set_item("names", "[not json").unwrap();
        let err = load_json::<Vec<String>, _>(&store, "names").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "names"));
        assert!(err.to_string().contains("names"));
    }
}
