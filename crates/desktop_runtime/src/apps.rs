//! App registry backed by the build-time manifest catalog.

use desktop_app_contract::{AppRegistration, ApplicationId};

use crate::{error::ShellError, model::WindowRect};

/// One catalog row generated from an `app.manifest.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub app_id: &'static str,
    pub display_name: &'static str,
    pub icon: &'static str,
    pub single_instance: bool,
    pub show_in_launcher: bool,
    pub default_rect: WindowRect,
}

include!(concat!(env!("OUT_DIR"), "/app_catalog_generated.rs"));

impl CatalogEntry {
    pub fn application_id(&self) -> ApplicationId {
        ApplicationId::trusted(self.app_id)
    }

    pub fn registration(&self) -> AppRegistration {
        AppRegistration {
            app_id: self.application_id(),
            display_name: self.display_name.to_string(),
            icon: self.icon.to_string(),
            single_instance: self.single_instance,
            show_in_launcher: self.show_in_launcher,
        }
    }
}

pub fn app_registry() -> &'static [CatalogEntry] {
    APP_CATALOG
}

pub fn launcher_apps() -> Vec<CatalogEntry> {
    app_registry()
        .iter()
        .copied()
        .filter(|entry| entry.show_in_launcher)
        .collect()
}

/// Looks up display name, icon and default geometry for `app_id`.
///
/// # Errors
///
/// Returns [`ShellError::UnknownApp`] when the id is not in the catalog.
pub fn resolve(app_id: &str) -> Result<&'static CatalogEntry, ShellError> {
    app_registry()
        .iter()
        .find(|entry| entry.app_id == app_id)
        .ok_or_else(|| ShellError::UnknownApp(app_id.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn catalog_lists_every_app_sorted_by_id() {
        let ids: Vec<_> = app_registry().iter().map(|entry| entry.app_id).collect();
        assert_eq!(
            ids,
            vec!["email", "flashcards", "jarvis", "notes", "whiteboard"]
        );
        assert!(app_registry().iter().all(|entry| entry.single_instance));
        assert_eq!(launcher_apps().len(), 5);
    }

    #[test]
    fn resolve_returns_manifest_geometry() {
        let notes = resolve("notes").expect("notes registered");
        assert_eq!(notes.display_name, "Notes");
        assert_eq!(
            notes.default_rect,
            WindowRect {
                x: 80,
                y: 60,
                w: 760,
                h: 520
            }
        );
        assert_eq!(notes.registration().app_id.as_str(), "notes");
    }

    #[test]
    fn resolve_unknown_app_fails() {
        assert_eq!(
            resolve("calculator"),
            Err(ShellError::UnknownApp("calculator".to_string()))
        );
    }
}
