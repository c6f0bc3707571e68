//! Bundled default component documents.
//!
//! Each component ships a `config.yaml` under `src/components/<name>/`,
//! embedded into the binary so defaults never require network or install
//! paths at runtime. User overrides layer on top (see [`crate::loader`]).

use include_dir::{Dir, include_dir};

use crate::error::{Error, Result};

static COMPONENTS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/components");

/// Return the bundled `config.yaml` bytes for a component.
pub fn get(component: &str) -> Result<&'static [u8]> {
    COMPONENTS_DIR
        .get_file(format!("{component}/config.yaml"))
        .map(|file| file.contents())
        .ok_or_else(|| Error::NotFound(format!("component '{component}'")))
}

/// Whether a component ships a bundled document.
pub fn contains(component: &str) -> bool {
    COMPONENTS_DIR
        .get_file(format!("{component}/config.yaml"))
        .is_some()
}

/// All component names with a bundled document, sorted.
pub fn components() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = COMPONENTS_DIR
        .dirs()
        .filter(|dir| dir.get_file(dir.path().join("config.yaml")).is_some())
        .filter_map(|dir| dir.path().file_name())
        .filter_map(|name| name.to_str())
        .collect();
    names.sort_unstable();
    names
}
