//! Route guard state machine in front of the desktop shell.
//!
//! The gate never talks to the network itself. It emits [`AuthEffect`] requests, and the
//! caller feeds completions back through `validation_finished` / `refresh_finished`. Every
//! wait carries a deadline, and `tick` past it fails closed with a redirect to login.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use platform_host::{deadline_after, is_past_deadline, TokenPair};

use crate::error::ShellError;

/// Route of the login view.
pub const LOGIN_ROUTE: &str = "/login";
/// Routes rendered without a session.
pub const PUBLIC_ROUTES: [&str; 2] = ["/login", "/register"];

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where the gate stands for the route currently requested.
pub enum AuthPhase {
    /// No session. `pending_route` is rendered after a successful login.
    Unauthenticated { pending_route: Option<String> },
    /// Waiting for the auth service to validate the stored access token.
    Validating { route: String, deadline_ms: u64 },
    /// Access token rejected; exchanging the refresh token.
    Refreshing { route: String, deadline_ms: u64 },
    /// Session confirmed; guarded routes render directly.
    Authenticated,
}

impl AuthPhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated { .. } => "unauthenticated",
            Self::Validating { .. } => "validating",
            Self::Refreshing { .. } => "refreshing",
            Self::Authenticated => "authenticated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Requests the gate hands to its caller. Completions come back as method calls on [`AuthGate`].
pub enum AuthEffect {
    ValidateToken { access_token: String },
    RefreshToken { refresh_token: String },
    PersistTokens(TokenPair),
    ClearTokens,
    /// Replace the current location.
    Redirect(String),
    /// Render `route` in place.
    Render(String),
    /// Call [`AuthGate::tick`] at `at_ms`.
    ScheduleTick { at_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Decides whether a route renders, waits on a token check, or redirects to login.
///
/// Holds the current token pair and the last failure so the login view can explain why the user
/// landed there.
pub struct AuthGate {
    phase: AuthPhase,
    tokens: Option<TokenPair>,
    check_timeout_ms: u64,
    last_failure: Option<ShellError>,
}

impl AuthGate {
    pub fn new(check_timeout_ms: u64) -> Self {
        Self {
            phase: AuthPhase::Unauthenticated {
                pending_route: None,
            },
            tokens: None,
            check_timeout_ms,
            last_failure: None,
        }
    }

    pub fn phase(&self) -> &AuthPhase {
        &self.phase
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }

    /// Why the last session check ended on the login page.
    pub fn last_failure(&self) -> Option<&ShellError> {
        self.last_failure.as_ref()
    }

    /// Handles navigation to `route` with the tokens currently in storage.
    pub fn navigate(
        &mut self,
        route: &str,
        stored: Option<TokenPair>,
        now_ms: u64,
    ) -> Vec<AuthEffect> {
        if is_public_route(route) || self.is_authenticated() {
            return vec![AuthEffect::Render(route.to_string())];
        }
        if let AuthPhase::Validating { route: pending, .. }
        | AuthPhase::Refreshing { route: pending, .. } = &mut self.phase
        {
            *pending = route.to_string();
            return Vec::new();
        }

        let Some(tokens) = stored else {
            self.phase = AuthPhase::Unauthenticated {
                pending_route: Some(route.to_string()),
            };
            return vec![AuthEffect::Redirect(login_url(route))];
        };

        let deadline_ms = deadline_after(now_ms, self.check_timeout_ms);
        let access_token = tokens.access_token.clone();
        self.tokens = Some(tokens);
        self.phase = AuthPhase::Validating {
            route: route.to_string(),
            deadline_ms,
        };
        vec![
            AuthEffect::ValidateToken { access_token },
            AuthEffect::ScheduleTick { at_ms: deadline_ms },
        ]
    }

    /// `Ok(false)` means the token was rejected, `Err` that the check itself failed.
    pub fn validation_finished(
        &mut self,
        result: Result<bool, String>,
        now_ms: u64,
    ) -> Vec<AuthEffect> {
        let AuthPhase::Validating { route, .. } = &self.phase else {
            return Vec::new();
        };
        let route = route.clone();
        match result {
            Ok(true) => {
                self.phase = AuthPhase::Authenticated;
                self.last_failure = None;
                vec![AuthEffect::Render(route)]
            }
            rejected => {
                let refresh_token = self
                    .tokens
                    .as_ref()
                    .map(|tokens| tokens.refresh_token.clone())
                    .filter(|token| !token.trim().is_empty());
                match refresh_token {
                    Some(refresh_token) => {
                        let deadline_ms = deadline_after(now_ms, self.check_timeout_ms);
                        self.phase = AuthPhase::Refreshing { route, deadline_ms };
                        vec![
                            AuthEffect::RefreshToken { refresh_token },
                            AuthEffect::ScheduleTick { at_ms: deadline_ms },
                        ]
                    }
                    None => {
                        let reason = match rejected {
                            Err(reason) => reason,
                            _ => "access token rejected".to_string(),
                        };
                        self.fail(route, reason)
                    }
                }
            }
        }
    }

    pub fn refresh_finished(&mut self, result: Result<TokenPair, String>) -> Vec<AuthEffect> {
        let AuthPhase::Refreshing { route, .. } = &self.phase else {
            return Vec::new();
        };
        let route = route.clone();
        match result {
            Ok(tokens) => {
                self.tokens = Some(tokens.clone());
                self.phase = AuthPhase::Authenticated;
                self.last_failure = None;
                vec![AuthEffect::PersistTokens(tokens), AuthEffect::Render(route)]
            }
            Err(reason) => self.fail(route, format!("refresh failed: {reason}")),
        }
    }

    /// Enters the session and renders the route that triggered the login, or `fallback_route`.
    pub fn login_succeeded(&mut self, tokens: TokenPair, fallback_route: &str) -> Vec<AuthEffect> {
        let route = match &self.phase {
            AuthPhase::Unauthenticated {
                pending_route: Some(route),
            } => route.clone(),
            _ => fallback_route.to_string(),
        };
        self.tokens = Some(tokens.clone());
        self.phase = AuthPhase::Authenticated;
        self.last_failure = None;
        vec![AuthEffect::PersistTokens(tokens), AuthEffect::Render(route)]
    }

    pub fn sign_out(&mut self) -> Vec<AuthEffect> {
        self.tokens = None;
        self.phase = AuthPhase::Unauthenticated {
            pending_route: None,
        };
        vec![
            AuthEffect::ClearTokens,
            AuthEffect::Redirect(LOGIN_ROUTE.to_string()),
        ]
    }

    /// Fails a check that outlived its deadline.
    pub fn tick(&mut self, now_ms: u64) -> Vec<AuthEffect> {
        match &self.phase {
            AuthPhase::Validating { route, deadline_ms }
            | AuthPhase::Refreshing { route, deadline_ms }
                if is_past_deadline(now_ms, *deadline_ms) =>
            {
                let route = route.clone();
                self.fail(route, "session check timed out".to_string())
            }
            // Early timer: re-arm for the same deadline.
            AuthPhase::Validating { deadline_ms, .. } | AuthPhase::Refreshing { deadline_ms, .. } => {
                vec![AuthEffect::ScheduleTick {
                    at_ms: *deadline_ms,
                }]
            }
            _ => Vec::new(),
        }
    }

    fn fail(&mut self, route: String, reason: String) -> Vec<AuthEffect> {
        self.tokens = None;
        self.last_failure = Some(ShellError::AuthFailure(reason));
        let url = login_url(&route);
        self.phase = AuthPhase::Unauthenticated {
            pending_route: Some(route),
        };
        vec![AuthEffect::ClearTokens, AuthEffect::Redirect(url)]
    }
}

pub fn is_public_route(route: &str) -> bool {
    let path = route.split(['?', '#']).next().unwrap_or(route);
    PUBLIC_ROUTES.contains(&path)
}

/// Characters `encodeURIComponent` leaves as-is, besides ASCII alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `/login?redirectUrl=<route>` with the route component-encoded.
pub fn login_url(route: &str) -> String {
    format!(
        "{LOGIN_ROUTE}?redirectUrl={}",
        utf8_percent_encode(route, URI_COMPONENT)
    )
}

/// Accepts a decoded `redirectUrl` value only when it stays on this origin.
pub fn redirect_target(redirect_url: &str) -> Option<String> {
    (redirect_url.starts_with('/') && !redirect_url.starts_with("//"))
        .then(|| redirect_url.to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tokens(refresh: &str) -> TokenPair {
        TokenPair {
            access_token: "access-1".to_string(),
            refresh_token: refresh.to_string(),
        }
    }

    #[test]
    fn no_token_redirects_with_encoded_route() {
        let mut gate = AuthGate::new(1_000);
        let effects = gate.navigate("/desktop?open=email", None, 0);
        assert_eq!(
            effects,
            vec![AuthEffect::Redirect(
                "/login?redirectUrl=%2Fdesktop%3Fopen%3Demail".to_string()
            )]
        );
        assert_eq!(gate.phase().as_str(), "unauthenticated");
    }

    #[test]
    fn public_routes_never_redirect() {
        let mut gate = AuthGate::new(1_000);
        assert_eq!(
            gate.navigate("/login?redirectUrl=%2F", None, 0),
            vec![AuthEffect::Render("/login?redirectUrl=%2F".to_string())]
        );
        assert_eq!(
            gate.navigate("/register", None, 0),
            vec![AuthEffect::Render("/register".to_string())]
        );
    }

    #[test]
    fn valid_token_renders_requested_route_once() {
        let mut gate = AuthGate::new(1_000);
        let effects = gate.navigate("/", Some(tokens("refresh-1")), 10);
        assert_eq!(
            effects,
            vec![
                AuthEffect::ValidateToken {
                    access_token: "access-1".to_string()
                },
                AuthEffect::ScheduleTick { at_ms: 1_010 },
            ]
        );
        assert_eq!(
            gate.validation_finished(Ok(true), 20),
            vec![AuthEffect::Render("/".to_string())]
        );
        assert!(gate.is_authenticated());
        assert!(gate.tick(5_000).is_empty());
    }

    #[test]
    fn rejected_token_refreshes_then_renders() {
        let mut gate = AuthGate::new(1_000);
        gate.navigate("/", Some(tokens("refresh-1")), 0);
        let effects = gate.validation_finished(Ok(false), 5);
        assert_eq!(
            effects[0],
            AuthEffect::RefreshToken {
                refresh_token: "refresh-1".to_string()
            }
        );
        assert_eq!(gate.tick(6), vec![AuthEffect::ScheduleTick { at_ms: 1_005 }]);

        let fresh = TokenPair {
            access_token: "access-2".to_string(),
            refresh_token: "refresh-2".to_string(),
        };
        assert_eq!(
            gate.refresh_finished(Ok(fresh.clone())),
            vec![
                AuthEffect::PersistTokens(fresh),
                AuthEffect::Render("/".to_string())
            ]
        );
    }

    #[test]
    fn unrefreshable_token_goes_to_login_without_looping() {
        let mut gate = AuthGate::new(1_000);
        gate.navigate("/", Some(tokens("")), 0);
        let effects = gate.validation_finished(Err("HTTP 500".to_string()), 5);
        assert_eq!(
            effects,
            vec![
                AuthEffect::ClearTokens,
                AuthEffect::Redirect("/login?redirectUrl=%2F".to_string())
            ]
        );
        assert_eq!(
            gate.last_failure(),
            Some(&ShellError::AuthFailure("HTTP 500".to_string()))
        );
        assert!(gate.validation_finished(Ok(true), 6).is_empty());
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn stalled_check_times_out_to_login() {
        let mut gate = AuthGate::new(1_000);
        gate.navigate("/", Some(tokens("refresh-1")), 0);
        assert_eq!(gate.tick(999), vec![AuthEffect::ScheduleTick { at_ms: 1_000 }]);
        assert_eq!(gate.phase().as_str(), "validating");
        let effects = gate.tick(1_000);
        assert_eq!(effects[0], AuthEffect::ClearTokens);
        assert_eq!(gate.phase().as_str(), "unauthenticated");
    }

    #[test]
    fn login_renders_originally_requested_route() {
        let mut gate = AuthGate::new(1_000);
        gate.navigate("/desktop", None, 0);
        let effects = gate.login_succeeded(tokens("refresh-1"), "/");
        assert_eq!(
            effects,
            vec![
                AuthEffect::PersistTokens(tokens("refresh-1")),
                AuthEffect::Render("/desktop".to_string())
            ]
        );
        assert_eq!(
            gate.navigate("/desktop", None, 10),
            vec![AuthEffect::Render("/desktop".to_string())]
        );
    }

    #[test]
    fn sign_out_clears_session() {
        let mut gate = AuthGate::new(1_000);
        gate.login_succeeded(tokens("r"), "/");
        assert_eq!(
            gate.sign_out(),
            vec![
                AuthEffect::ClearTokens,
                AuthEffect::Redirect("/login".to_string())
            ]
        );
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn login_url_encodes_like_encode_uri_component() {
        assert_eq!(
            login_url("/notes?q=a b&tag=(x)!"),
            "/login?redirectUrl=%2Fnotes%3Fq%3Da%20b%26tag%3D(x)!"
        );
        assert_eq!(login_url("/caf\u{e9}"), "/login?redirectUrl=%2Fcaf%C3%A9");
    }

    #[test]
    fn redirect_target_rejects_offsite_urls() {
        assert_eq!(
            redirect_target("/desktop?open=email"),
            Some("/desktop?open=email".to_string())
        );
        assert_eq!(redirect_target("https://evil.test"), None);
        assert_eq!(redirect_target("//evil.test"), None);
        assert_eq!(redirect_target(""), None);
    }
}
