//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! Services talk to the FocusDeck HTTP API through `window.fetch`, or, with the `demo-host`
//! feature, to seeded in-memory stores. Tokens and shell preferences live in `localStorage`.
//!
//! Transport glue lives in `bridge`, which routes to a wasm implementation or a non-wasm
//! fallback that fails every request.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and the host service bundle factory.
pub mod adapters;
mod bridge;
pub mod demo;
pub mod http;
pub mod storage;

pub use adapters::{build_host_services, host_strategy_name, selected_host_strategy};
pub use demo::{demo_host_services, DemoAssistantService, DemoAuthService};
pub use http::{
    HttpAssistantService, HttpAuthService, HttpConsentService, HttpDecksService,
    HttpMailboxService, HttpNotesService,
};
pub use storage::local_prefs::WebPrefsStore;
