//! Component configuration loading with user overlay support.
//!
//! A component resolves as its bundled document overlaid by an optional
//! user override from the overlay directory. Users customize a component
//! by copying the bundled default there (`create_override`) and editing
//! the copy; the bundled document itself is never touched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::bundle;
use crate::error::{Error, Result};
use crate::merge;
use crate::paths;
use crate::schema::ComponentConfig;

pub struct Loader {
    overlay_dir: PathBuf,
}

impl Loader {
    /// Loader rooted at the default overlay directory
    /// (`$XDG_CONFIG_HOME/dotforge`).
    pub fn new() -> Self {
        Self {
            overlay_dir: paths::overlay_dir(),
        }
    }

    pub fn with_overlay_dir(overlay_dir: impl Into<PathBuf>) -> Self {
        Self {
            overlay_dir: overlay_dir.into(),
        }
    }

    pub fn overlay_dir(&self) -> &Path {
        &self.overlay_dir
    }

    /// Path where a component's user override lives.
    pub fn override_path(&self, component: &str) -> PathBuf {
        self.overlay_dir.join(format!("{component}.yaml"))
    }

    /// Whether the user has an override document for a component.
    pub fn has_override(&self, component: &str) -> bool {
        self.override_path(component).exists()
    }

    /// Load a component's resolved configuration.
    ///
    /// Without a user override this returns the parsed bundled document
    /// directly; with one, the override is merged over the base.
    pub fn load(&self, component: &str) -> Result<ComponentConfig> {
        let base_bytes = bundle::get(component)?;
        let base: ComponentConfig = serde_yaml::from_slice(base_bytes)
            .map_err(|err| Error::parse(format!("bundled config for '{component}'"), err))?;

        let override_path = self.override_path(component);
        let override_bytes = match fs::read(&override_path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(base),
            Err(err) => return Err(Error::io("read", override_path, err)),
        };

        let overlay: ComponentConfig = serde_yaml::from_slice(&override_bytes)
            .map_err(|err| Error::parse(override_path.display(), err))?;

        Ok(merge::merge_configs(&base, &overlay))
    }

    /// Materialize a copy of the bundled document at the override path for
    /// the user to edit.
    pub fn create_override(&self, component: &str) -> Result<PathBuf> {
        let bytes = bundle::get(component)?;

        fs::create_dir_all(&self.overlay_dir)
            .map_err(|err| Error::io("create", self.overlay_dir.clone(), err))?;

        let path = self.override_path(component);
        fs::write(&path, bytes).map_err(|err| Error::io("write", path.clone(), err))?;
        Ok(path)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_unknown_component() {
        let temp = TempDir::new().unwrap();
        let loader = Loader::with_overlay_dir(temp.path());

        let err = loader.load("no-such-component").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_load_without_override_returns_base() {
        let temp = TempDir::new().unwrap();
        let loader = Loader::with_overlay_dir(temp.path());

        let config = loader.load("shell").unwrap();
        assert_eq!(config.name, "shell");
        assert_eq!(config.env["EDITOR"], "nvim");
    }

    #[test]
    fn test_load_merges_user_override() {
        let temp = TempDir::new().unwrap();
        let loader = Loader::with_overlay_dir(temp.path());

        fs::write(
            loader.override_path("shell"),
            "env:\n  EDITOR: emacs\n  VISUAL: emacs\n",
        )
        .unwrap();

        let config = loader.load("shell").unwrap();
        assert_eq!(config.env["EDITOR"], "emacs");
        assert_eq!(config.env["VISUAL"], "emacs");
        // Base-only keys survive the union.
        assert_eq!(config.env["PAGER"], "less -R");
        // Scalars not set in the override keep the base value.
        assert_eq!(config.name, "shell");
    }

    #[test]
    fn test_load_rejects_malformed_override() {
        let temp = TempDir::new().unwrap();
        let loader = Loader::with_overlay_dir(temp.path());

        fs::write(loader.override_path("shell"), "env: [not, a, map]\n").unwrap();

        let err = loader.load("shell").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_create_override_copies_bundled_document() {
        let temp = TempDir::new().unwrap();
        let overlay = temp.path().join("overlay");
        let loader = Loader::with_overlay_dir(&overlay);

        assert!(!loader.has_override("git"));
        let path = loader.create_override("git").unwrap();
        assert!(loader.has_override("git"));

        let written = fs::read(path).unwrap();
        assert_eq!(written.as_slice(), bundle::get("git").unwrap());
    }

    #[test]
    fn test_create_override_for_unknown_component() {
        let temp = TempDir::new().unwrap();
        let loader = Loader::with_overlay_dir(temp.path());

        assert!(loader.create_override("no-such-component").is_err());
    }
}
