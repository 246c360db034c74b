use desktop_runtime::{redirect_target, DesktopProvider, DesktopShell, ShellError};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use platform_host::Credentials;
use platform_host_web::build_host_services;

use crate::session::{provide_session, use_session};

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="FocusDeck" />
        <Meta name="description" content="A browser-hosted study desktop." />

        <Router>
            <SessionScope>
                <main class="site-root">
                    <Routes>
                        <Route path="/login" view=LoginView />
                        <Route path="/register" view=RegisterView />
                        <Route path="" view=GuardedDesktop />
                        <Route path="/*any" view=GuardedDesktop />
                    </Routes>
                </main>
            </SessionScope>
        </Router>
    }
}

#[component]
fn SessionScope(children: Children) -> impl IntoView {
    provide_session(build_host_services());
    children().into_view()
}

/// Renders the desktop once the auth gate has accepted the session.
#[component]
fn GuardedDesktop() -> impl IntoView {
    let session = use_session();
    let location = use_location();
    create_effect(move |_| {
        let path = location.pathname.get();
        let search = location.search.get_untracked();
        let route = if search.is_empty() {
            path
        } else {
            format!("{path}?{}", search.trim_start_matches('?'))
        };
        session.navigate(route);
    });

    view! {
        <Show
            when=move || session.gate.with(|gate| gate.is_authenticated())
            fallback=move || {
                view! {
                    <p class="auth-pending" data-state=move || session.gate.with(|g| g.phase().as_str())>
                        "Checking session..."
                    </p>
                }
            }
        >
            <DesktopEntry />
        </Show>
    }
}

#[component]
pub fn DesktopEntry() -> impl IntoView {
    let session = use_session();

    view! {
        <DesktopProvider host_services=session.host.get_value()>
            <DesktopShell />
        </DesktopProvider>
        <button type="button" class="session-sign-out" on:click=move |_| session.sign_out()>
            "Sign out"
        </button>
    }
}

fn failure_text(error: Option<&ShellError>) -> Option<String> {
    match error? {
        ShellError::AuthFailure(reason) => Some(format!("Please sign in again ({reason}).")),
        other => Some(other.to_string()),
    }
}

#[component]
fn LoginView() -> impl IntoView {
    let session = use_session();
    let query = use_query_map();
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);
    let busy = create_rw_signal(false);
    let notice = Signal::derive(move || session.gate.with(|gate| failure_text(gate.last_failure())));

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let credentials = Credentials {
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        let fallback = query
            .with_untracked(|params| params.get("redirectUrl").and_then(|url| redirect_target(url)))
            .unwrap_or_else(|| "/".to_string());
        busy.set(true);
        error.set(None);
        let host = session.host.get_value();
        spawn_local(async move {
            match host.auth.sign_in(&credentials).await {
                Ok(tokens) => session.signed_in(tokens, &fallback),
                Err(reason) => error.set(Some(reason)),
            }
            busy.set(false);
        });
    };

    view! {
        <section class="auth-view login-view">
            <h1>"Sign in"</h1>
            <Show when=move || notice.get().is_some() fallback=|| ()>
                <p class="auth-notice" role="status">{move || notice.get().unwrap_or_default()}</p>
            </Show>
            <form on:submit=on_submit>
                <label>
                    "Email"
                    <input
                        type="email"
                        name="email"
                        autocomplete="username"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        name="password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                <Show when=move || error.get().is_some() fallback=|| ()>
                    <p class="auth-error" role="alert">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <button type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
            <A href="/register">"Create an account"</A>
        </section>
    }
}

#[component]
fn RegisterView() -> impl IntoView {
    let session = use_session();
    let signed_in = move || session.gate.with(|gate| gate.is_authenticated());

    view! {
        <section class="auth-view register-view">
            <h1>"Create an account"</h1>
            <p>"Registration is handled by your FocusDeck administrator."</p>
            <Show when=signed_in fallback=|| view! { <A href="/login">"Back to sign in"</A> }>
                <A href="/">"Back to the desktop"</A>
            </Show>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn auth_failures_read_as_sign_in_prompt() {
        assert_eq!(failure_text(None), None);
        assert_eq!(
            failure_text(Some(&ShellError::AuthFailure("session check timed out".to_string()))),
            Some("Please sign in again (session check timed out).".to_string())
        );
    }
}
