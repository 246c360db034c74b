//! `localStorage`-backed preference and token store.
//!
//! Reads and writes are synchronous at the browser boundary; the [`PrefsStore`] impl wraps
//! them in ready futures.

use platform_host::{PrefsStore, PrefsStoreFuture, ACCESS_TOKEN_KEY};

#[derive(Debug, Clone, Copy, Default)]
/// Browser store backed by `window.localStorage`.
pub struct WebPrefsStore;

impl WebPrefsStore {
    /// Reads a raw value.
    pub fn load_raw(self, key: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = web_sys::window()?.local_storage().ok().flatten()?;
            storage.get_item(key).ok().flatten()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            None
        }
    }

    /// Writes a raw value.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the write fails.
    pub fn save_raw(self, key: &str, raw: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .ok_or_else(|| "localStorage unavailable".to_string())?;
            storage
                .set_item(key, raw)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw);
            Ok(())
        }
    }

    /// Removes a value.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the delete fails.
    pub fn delete_raw(self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .ok_or_else(|| "localStorage unavailable".to_string())?;
            storage
                .remove_item(key)
                .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }

    /// Returns the stored bearer token, if any.
    pub fn access_token(self) -> Option<String> {
        self.load_raw(ACCESS_TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
    }
}

impl PrefsStore for WebPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        let store = *self;
        Box::pin(async move { Ok(store.load_raw(key)) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.save_raw(key, raw) })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.delete_raw(key) })
    }
}
