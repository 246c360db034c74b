//! Desktop shell runtime: window manager, taskbar, start menu, auth gate and the app session
//! bridge that hosts the built-in apps.
//!
//! State changes flow through [`reduce_desktop`]; side effects leave the reducer as
//! [`RuntimeEffect`] values and are executed by the provider installed with
//! [`DesktopProvider`].

pub mod app_runtime;
pub mod apps;
pub mod auth_gate;
pub mod components;
pub mod dom;
mod effect_executor;
pub mod error;
pub mod model;
pub mod persistence;
pub mod reducer;
mod runtime_context;
pub mod start_menu;
pub mod store;
pub mod taskbar;
pub mod window_manager;

pub use auth_gate::{is_public_route, login_url, redirect_target, AuthEffect, AuthGate, AuthPhase};
pub use components::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, DesktopShell};
pub use error::ShellError;
pub use model::*;
pub use persistence::{load_boot_snapshot, load_theme, persist_layout_snapshot, persist_theme};
pub use reducer::{reduce_desktop, DesktopAction, RuntimeEffect};
pub use start_menu::StartMenuPhase;
pub use store::{DesktopStore, Subscription};
