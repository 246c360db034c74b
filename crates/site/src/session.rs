//! Auth-gate wiring: runs [`AuthEffect`] values against the host services and the router.

use std::time::Duration;

use desktop_runtime::{AuthEffect, AuthGate, ShellTimeouts};
use leptos::*;
use leptos_router::{use_navigate, NavigateOptions};
use platform_host::{
    clear_session_tokens, load_session_tokens, save_session_tokens, unix_time_ms_now,
    HostServices,
};

#[derive(Clone, Copy)]
pub struct SessionContext {
    pub host: StoredValue<HostServices>,
    pub gate: RwSignal<AuthGate>,
    navigate: Callback<String>,
}

/// Provides the session context. Must run inside the `<Router>`.
pub fn provide_session(host: HostServices) -> SessionContext {
    let navigate_to = use_navigate();
    let navigate = Callback::new(move |url: String| {
        navigate_to(
            &url,
            NavigateOptions {
                replace: true,
                ..Default::default()
            },
        )
    });
    let session = SessionContext {
        host: store_value(host),
        gate: create_rw_signal(AuthGate::new(ShellTimeouts::default().auth_check_ms)),
        navigate,
    };
    provide_context(session);
    session
}

/// Returns the session context.
///
/// # Panics
///
/// Panics if called outside `SiteApp`.
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext not provided")
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .unwrap_or_default()
}

fn route_path(route: &str) -> &str {
    route.split(['?', '#']).next().unwrap_or(route)
}

impl SessionContext {
    /// Consults the gate for `route` with whatever tokens are in storage.
    pub fn navigate(self, route: String) {
        let host = self.host.get_value();
        spawn_local(async move {
            let stored = match load_session_tokens(host.prefs.as_ref()).await {
                Ok(stored) => stored,
                Err(err) => {
                    logging::warn!("session token load failed: {err}");
                    None
                }
            };
            let effects = self
                .gate
                .try_update(|gate| gate.navigate(&route, stored, unix_time_ms_now()))
                .unwrap_or_default();
            self.run(effects);
        });
    }

    pub fn sign_out(self) {
        let effects = self.gate.try_update(AuthGate::sign_out).unwrap_or_default();
        self.run(effects);
    }

    /// Applies a successful sign-in and leaves the login view.
    pub fn signed_in(self, tokens: platform_host::TokenPair, fallback_route: &str) {
        let effects = self
            .gate
            .try_update(|gate| gate.login_succeeded(tokens, fallback_route))
            .unwrap_or_default();
        self.run(effects);
    }

    fn run(self, effects: Vec<AuthEffect>) {
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(self, effect: AuthEffect) {
        let host = self.host.get_value();
        match effect {
            AuthEffect::ValidateToken { access_token } => spawn_local(async move {
                let result = host.auth.validate(&access_token).await;
                let effects = self
                    .gate
                    .try_update(|gate| gate.validation_finished(result, unix_time_ms_now()))
                    .unwrap_or_default();
                self.run(effects);
            }),
            AuthEffect::RefreshToken { refresh_token } => spawn_local(async move {
                let result = host.auth.refresh(&refresh_token).await;
                let effects = self
                    .gate
                    .try_update(|gate| gate.refresh_finished(result))
                    .unwrap_or_default();
                self.run(effects);
            }),
            AuthEffect::PersistTokens(tokens) => spawn_local(async move {
                if let Err(err) = save_session_tokens(host.prefs.as_ref(), &tokens).await {
                    logging::warn!("session token save failed: {err}");
                }
            }),
            AuthEffect::ClearTokens => spawn_local(async move {
                if let Err(err) = clear_session_tokens(host.prefs.as_ref()).await {
                    logging::warn!("session token clear failed: {err}");
                }
            }),
            AuthEffect::Redirect(url) => self.navigate.call(url),
            AuthEffect::Render(route) => {
                if route_path(&route) != current_path() {
                    self.navigate.call(route);
                }
            }
            AuthEffect::ScheduleTick { at_ms } => {
                let delay = Duration::from_millis(at_ms.saturating_sub(unix_time_ms_now()));
                set_timeout(
                    move || {
                        let effects = self
                            .gate
                            .try_update(|gate| gate.tick(unix_time_ms_now()))
                            .unwrap_or_default();
                        self.run(effects);
                    },
                    delay,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn route_path_drops_query_and_fragment() {
        assert_eq!(route_path("/desk?open=notes#top"), "/desk");
        assert_eq!(route_path("/"), "/");
    }
}
