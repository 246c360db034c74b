//! Auth service contract plus in-memory and no-op adapters.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    future::Future,
    pin::Pin,
    rc::Rc,
};

use crate::{outage::Outage, Credentials, TokenPair};

/// Object-safe boxed future used by [`AuthService`].
pub type AuthFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// External authentication collaborator.
pub trait AuthService {
    /// Returns whether `access_token` is currently valid. `Err` means the check itself failed.
    fn validate<'a>(&'a self, access_token: &'a str) -> AuthFuture<'a, Result<bool, String>>;

    /// Exchanges a refresh token for a new token pair.
    fn refresh<'a>(&'a self, refresh_token: &'a str) -> AuthFuture<'a, Result<TokenPair, String>>;

    /// Signs in with credentials and returns a fresh token pair.
    fn sign_in<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> AuthFuture<'a, Result<TokenPair, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Auth service that rejects everything.
pub struct NoopAuthService;

impl AuthService for NoopAuthService {
    fn validate<'a>(&'a self, _access_token: &'a str) -> AuthFuture<'a, Result<bool, String>> {
        Box::pin(async { Ok(false) })
    }

    fn refresh<'a>(
        &'a self,
        _refresh_token: &'a str,
    ) -> AuthFuture<'a, Result<TokenPair, String>> {
        Box::pin(async { Err("authentication is not available on this host".to_string()) })
    }

    fn sign_in<'a>(
        &'a self,
        _credentials: &'a Credentials,
    ) -> AuthFuture<'a, Result<TokenPair, String>> {
        Box::pin(async { Err("authentication is not available on this host".to_string()) })
    }
}

#[derive(Debug, Default)]
struct MemoryAuthState {
    accounts: HashMap<String, String>,
    live_access: HashSet<String>,
    live_refresh: HashSet<String>,
    issued: u64,
}

impl MemoryAuthState {
    fn issue(&mut self) -> TokenPair {
        self.issued += 1;
        let pair = TokenPair {
            access_token: format!("access-{}", self.issued),
            refresh_token: format!("refresh-{}", self.issued),
        };
        self.live_access.insert(pair.access_token.clone());
        self.live_refresh.insert(pair.refresh_token.clone());
        pair
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory auth service with registered accounts and revocable tokens.
pub struct MemoryAuthService {
    inner: Rc<RefCell<MemoryAuthState>>,
    outage: Outage,
}

impl MemoryAuthService {
    /// Registers an account.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.inner
            .borrow_mut()
            .accounts
            .insert(email.to_string(), password.to_string());
        self
    }

    /// Issues a live token pair without a sign-in round trip.
    pub fn issue_tokens(&self) -> TokenPair {
        self.inner.borrow_mut().issue()
    }

    /// Expires an access token while keeping its refresh token usable.
    pub fn expire_access(&self, access_token: &str) {
        self.inner.borrow_mut().live_access.remove(access_token);
    }

    /// Makes every call fail with `reason` until cleared with `None`.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        self.outage.set(reason);
    }
}

impl AuthService for MemoryAuthService {
    fn validate<'a>(&'a self, access_token: &'a str) -> AuthFuture<'a, Result<bool, String>> {
        Box::pin(async move {
            self.outage.check()?;
            Ok(self.inner.borrow().live_access.contains(access_token))
        })
    }

    fn refresh<'a>(&'a self, refresh_token: &'a str) -> AuthFuture<'a, Result<TokenPair, String>> {
        Box::pin(async move {
            self.outage.check()?;
            let mut state = self.inner.borrow_mut();
            if !state.live_refresh.remove(refresh_token) {
                return Err("refresh token rejected".to_string());
            }
            Ok(state.issue())
        })
    }

    fn sign_in<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> AuthFuture<'a, Result<TokenPair, String>> {
        Box::pin(async move {
            self.outage.check()?;
            let mut state = self.inner.borrow_mut();
            match state.accounts.get(&credentials.email) {
                Some(password) if *password == credentials.password => Ok(state.issue()),
                _ => Err("invalid email or password".to_string()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn refresh_rotates_tokens_once() {
        let auth = MemoryAuthService::default();
        let first = auth.issue_tokens();
        auth.expire_access(&first.access_token);

        assert_eq!(block_on(auth.validate(&first.access_token)), Ok(false));
        let second = block_on(auth.refresh(&first.refresh_token)).expect("refresh");
        assert_eq!(block_on(auth.validate(&second.access_token)), Ok(true));
        assert!(block_on(auth.refresh(&first.refresh_token)).is_err());
    }

    #[test]
    fn sign_in_checks_password() {
        let auth = MemoryAuthService::default().with_account("harry@hogwarts.edu", "nimbus");
        let good = Credentials {
            email: "harry@hogwarts.edu".to_string(),
            password: "nimbus".to_string(),
        };
        let bad = Credentials {
            password: "firebolt".to_string(),
            ..good.clone()
        };
        assert!(block_on(auth.sign_in(&good)).is_ok());
        assert_eq!(
            block_on(auth.sign_in(&bad)),
            Err("invalid email or password".to_string())
        );
    }

    #[test]
    fn outage_fails_validation_instead_of_rejecting_token() {
        let auth = MemoryAuthService::default();
        let pair = auth.issue_tokens();
        auth.set_unavailable(Some("503"));
        assert_eq!(block_on(auth.validate(&pair.access_token)), Err("503".to_string()));
    }
}
