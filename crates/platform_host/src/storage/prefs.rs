//! Lightweight preference storage contracts and adapters.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for small string values keyed by name (JSON documents or raw tokens).
pub trait PrefsStore {
    /// Loads the raw string stored under `key`.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>>;

    /// Stores `raw` under `key`, replacing any previous value.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>>;

    /// Deletes `key`. Deleting a missing key succeeds.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that remembers nothing, for targets without durable storage.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store. Clones share the same map.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Returns a snapshot of the stored raw value for assertions.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.raw(key)) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), raw.to_string());
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a JSON preference through any [`PrefsStore`].
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub async fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_pref(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| format!("corrupt preference `{key}`: {e}"))
}

/// Serializes and saves a JSON preference through any [`PrefsStore`].
///
/// # Errors
///
/// Returns an error when serialization or the store save fails.
pub async fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_pref(key, &raw).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct ThemePref {
        dark_mode: bool,
    }

    #[test]
    fn typed_helpers_store_json_documents() {
        let store = MemoryPrefsStore::default();
        let store_obj: &dyn PrefsStore = &store;
        block_on(save_pref_with(
            store_obj,
            "focusdeck.desktop.theme.v1",
            &ThemePref { dark_mode: true },
        ))
        .expect("save theme");

        assert_eq!(
            store.raw("focusdeck.desktop.theme.v1").as_deref(),
            Some("{\"dark_mode\":true}")
        );
        let loaded: Option<ThemePref> =
            block_on(load_pref_with(store_obj, "focusdeck.desktop.theme.v1")).expect("load");
        assert_eq!(loaded, Some(ThemePref { dark_mode: true }));
    }

    #[test]
    fn corrupt_json_is_reported_with_key() {
        let store = MemoryPrefsStore::default();
        block_on(store.save_pref("layout", "{not json")).expect("save raw");
        let err = block_on(load_pref_with::<_, ThemePref>(&store, "layout"))
            .expect_err("corrupt payload");
        assert!(err.starts_with("corrupt preference `layout`"));
    }

    #[test]
    fn clones_share_entries_and_delete_is_idempotent() {
        let store = MemoryPrefsStore::default();
        let alias = store.clone();
        block_on(store.save_pref("k", "v")).expect("save");
        assert_eq!(alias.len(), 1);
        block_on(alias.delete_pref("k")).expect("delete");
        block_on(alias.delete_pref("k")).expect("delete again");
        assert!(store.is_empty());
    }

    #[test]
    fn noop_store_never_remembers() {
        let store = NoopPrefsStore;
        block_on(store.save_pref("k", "{}")).expect("save");
        assert_eq!(block_on(store.load_pref("k")).expect("load"), None);
    }
}
