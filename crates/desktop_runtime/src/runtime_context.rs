//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived [`DesktopStore`], mirrors it into Leptos signals for views,
//! runs boot hydration, and installs the effect executor. UI composition stays in
//! [`crate::components`].
#![allow(clippy::clone_on_copy)]

use leptos::*;
use platform_host::{unix_time_ms_now, HostServices};

use crate::{
    effect_executor::{self, TaskRegistry},
    error::ShellError,
    model::{DesktopState, InteractionState},
    persistence,
    reducer::{DesktopAction, RuntimeEffect},
    store::DesktopStore,
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects.
    pub host: StoredValue<HostServices>,
    /// Authoritative store; the signals below mirror it.
    pub store: StoredValue<DesktopStore>,
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Reactive pointer/drag/resize interaction state signal.
    pub interaction: RwSignal<InteractionState>,
    /// Queue of runtime effects emitted by the reducer and processed by the shell.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// In-flight cancellable host calls.
    pub tasks: StoredValue<TaskRegistry>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }
}

fn install_boot_hydration(runtime: DesktopRuntimeContext) {
    let host = runtime.host.get_value();
    spawn_local(async move {
        if let Some(snapshot) = persistence::load_boot_snapshot(host.prefs.as_ref()).await {
            runtime.dispatch_action(DesktopAction::HydrateSnapshot { snapshot });
        }
        if let Some(theme) = persistence::load_theme(host.prefs.as_ref()).await {
            runtime.dispatch_action(DesktopAction::HydrateTheme { theme });
        }
        runtime.dispatch_action(DesktopAction::BootHydrationComplete);
    });
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and boots persisted state.
pub fn DesktopProvider(
    /// Host bundle assembled by the entry layer.
    host_services: HostServices,
    children: Children,
) -> impl IntoView {
    let desktop_store = DesktopStore::default();
    let state = create_rw_signal(desktop_store.state());
    let interaction = create_rw_signal(InteractionState::default());
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());

    let subscription = desktop_store.subscribe(move |desktop| state.set(desktop.clone()));
    on_cleanup(move || subscription.unsubscribe());

    let store = store_value(desktop_store);
    let dispatch = Callback::new(move |action: DesktopAction| {
        let desktop_store = store.get_value();
        match desktop_store.dispatch(action, unix_time_ms_now()) {
            Ok(new_effects) => {
                let ui = desktop_store.interaction();
                if ui != interaction.get_untracked() {
                    interaction.set(ui);
                }
                if !new_effects.is_empty() {
                    effects.update(|queue| queue.extend(new_effects));
                }
            }
            Err(err @ ShellError::StaleAppEvent(_)) => logging::debug_warn!("{err}"),
            Err(err) => logging::warn!("desktop reducer error: {err}"),
        }
    });

    let runtime = DesktopRuntimeContext {
        host: store_value(host_services),
        store,
        state,
        interaction,
        effects,
        tasks: store_value(TaskRegistry::default()),
        dispatch,
    };

    provide_context(runtime.clone());

    effect_executor::install(runtime);
    install_boot_hydration(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
