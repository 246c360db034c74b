//! Session token records and their durable storage keys.

use serde::{Deserialize, Serialize};

use crate::PrefsStore;

/// Storage key for the opaque access token.
pub const ACCESS_TOKEN_KEY: &str = "focusdeck_access_token";
/// Storage key for the opaque refresh token.
pub const REFRESH_TOKEN_KEY: &str = "focusdeck_refresh_token";

/// Access/refresh token pair issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived bearer token.
    pub access_token: String,
    /// Long-lived token exchanged for a new pair.
    pub refresh_token: String,
}

/// Login form payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Loads the persisted token pair.
///
/// A missing access token means there is no session. A missing refresh token is stored as an
/// empty string so refresh fails cleanly.
///
/// # Errors
///
/// Returns an error when the store fails.
pub async fn load_session_tokens<S: PrefsStore + ?Sized>(
    store: &S,
) -> Result<Option<TokenPair>, String> {
    let Some(access_token) = store.load_pref(ACCESS_TOKEN_KEY).await? else {
        return Ok(None);
    };
    if access_token.trim().is_empty() {
        return Ok(None);
    }
    let refresh_token = store
        .load_pref(REFRESH_TOKEN_KEY)
        .await?
        .unwrap_or_default();
    Ok(Some(TokenPair {
        access_token,
        refresh_token,
    }))
}

/// Persists both tokens verbatim under their fixed keys.
///
/// # Errors
///
/// Returns an error when the store fails.
pub async fn save_session_tokens<S: PrefsStore + ?Sized>(
    store: &S,
    tokens: &TokenPair,
) -> Result<(), String> {
    store.save_pref(ACCESS_TOKEN_KEY, &tokens.access_token).await?;
    store
        .save_pref(REFRESH_TOKEN_KEY, &tokens.refresh_token)
        .await
}

/// Removes both tokens.
///
/// # Errors
///
/// Returns an error when the store fails.
pub async fn clear_session_tokens<S: PrefsStore + ?Sized>(store: &S) -> Result<(), String> {
    store.delete_pref(ACCESS_TOKEN_KEY).await?;
    store.delete_pref(REFRESH_TOKEN_KEY).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::MemoryPrefsStore;

    fn pair() -> TokenPair {
        TokenPair {
            access_token: "acc-1".to_string(),
            refresh_token: "ref-1".to_string(),
        }
    }

    #[test]
    fn tokens_are_stored_verbatim_under_fixed_keys() {
        let store = MemoryPrefsStore::default();
        block_on(save_session_tokens(&store, &pair())).expect("save");
        assert_eq!(store.raw(ACCESS_TOKEN_KEY).as_deref(), Some("acc-1"));
        assert_eq!(store.raw(REFRESH_TOKEN_KEY).as_deref(), Some("ref-1"));
        assert_eq!(block_on(load_session_tokens(&store)).expect("load"), Some(pair()));
    }

    #[test]
    fn blank_access_token_means_no_session() {
        let store = MemoryPrefsStore::default();
        block_on(store.save_pref(ACCESS_TOKEN_KEY, "  ")).expect("save");
        assert_eq!(block_on(load_session_tokens(&store)).expect("load"), None);
    }

    #[test]
    fn clear_removes_both_tokens() {
        let store = MemoryPrefsStore::default();
        block_on(save_session_tokens(&store, &pair())).expect("save");
        block_on(clear_session_tokens(&store)).expect("clear");
        assert!(store.is_empty());
    }
}
