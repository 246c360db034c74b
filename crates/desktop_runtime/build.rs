use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct WindowDefaults {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

#[derive(Debug, Clone, Deserialize)]
struct AppManifest {
    schema_version: u32,
    app_id: String,
    display_name: String,
    icon: String,
    single_instance: bool,
    show_in_launcher: bool,
    window_defaults: WindowDefaults,
}

fn is_kebab_slug(raw: &str) -> bool {
    let starts_lower = raw.bytes().next().is_some_and(|b| b.is_ascii_lowercase());
    starts_lower
        && raw.len() <= 32
        && !raw.ends_with('-')
        && !raw.contains("--")
        && raw
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn app_manifest_paths(apps_root: &Path) -> Vec<PathBuf> {
    let entries = fs::read_dir(apps_root)
        .unwrap_or_else(|err| panic!("failed to list {}: {err}", apps_root.display()));
    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path().join("app.manifest.toml"))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();
    paths
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let apps_root = crate_root.join("..").join("apps");
    println!("cargo:rerun-if-changed={}", apps_root.display());

    let mut manifests = Vec::<AppManifest>::new();
    for path in app_manifest_paths(&apps_root) {
        println!("cargo:rerun-if-changed={}", path.display());
        let raw = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
        let manifest: AppManifest = toml::from_str(&raw)
            .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
        if manifest.schema_version != 1 {
            panic!(
                "manifest schema mismatch in {}: expected 1 found {}",
                path.display(),
                manifest.schema_version
            );
        }
        if !is_kebab_slug(&manifest.app_id) {
            panic!(
                "invalid app_id `{}` in {}",
                manifest.app_id,
                path.display()
            );
        }
        if manifests.iter().any(|m| m.app_id == manifest.app_id) {
            panic!("duplicate app_id `{}`", manifest.app_id);
        }
        manifests.push(manifest);
    }

    manifests.sort_by(|a, b| a.app_id.cmp(&b.app_id));
    let mut generated = String::from(
        "/// Build-time generated app catalog, sorted by app id.\n\
pub const APP_CATALOG: &[CatalogEntry] = &[\n",
    );
    for m in &manifests {
        generated.push_str(&format!(
            "    CatalogEntry {{ app_id: {:?}, display_name: {:?}, icon: {:?}, single_instance: {}, show_in_launcher: {}, default_rect: WindowRect {{ x: {}, y: {}, w: {}, h: {} }} }},\n",
            m.app_id,
            m.display_name,
            m.icon,
            m.single_instance,
            m.show_in_launcher,
            m.window_defaults.x,
            m.window_defaults.y,
            m.window_defaults.width,
            m.window_defaults.height,
        ));
    }
    generated.push_str("];\n");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("app_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
