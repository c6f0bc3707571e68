//! Rendered file generation.
//!
//! `files` directives render through the format writer registry into the
//! generated-files root, namespaced by component and target basename.
//! Symlink reconciliation then points the declared target at the generated
//! file, so regenerating never touches the target path itself.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paths;
use crate::schema::{FileSpec, SyncFileSpec, SyncMode};
use crate::writers;

/// One rendered file and where it belongs.
#[derive(Debug)]
pub struct GeneratedFile {
    /// Expanded target path the generated file should be linked at.
    pub target: PathBuf,
    /// Location of the rendered content under the generated root.
    pub generated: PathBuf,
    pub format: String,
    pub content: Vec<u8>,
    /// "written", "unchanged", or "preview" (dry-run).
    pub action: &'static str,
}

pub const ACTION_WRITTEN: &str = "written";
pub const ACTION_UNCHANGED: &str = "unchanged";
pub const ACTION_PREVIEW: &str = "preview";

pub struct Generator {
    component: String,
    out_root: PathBuf,
    dry_run: bool,
}

impl Generator {
    /// Generator writing under the default generated root
    /// (`$XDG_DATA_HOME/dotforge/generated`).
    pub fn new(component: &str, dry_run: bool) -> Self {
        Self::with_root(component, paths::generated_root(), dry_run)
    }

    pub fn with_root(component: &str, out_root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            component: component.to_string(),
            out_root: out_root.into(),
            dry_run,
        }
    }

    /// Where a target's rendered content lives:
    /// `<root>/<component>/<target basename>`.
    pub fn generated_path(&self, target: &Path) -> PathBuf {
        let name = target.file_name().unwrap_or_else(|| OsStr::new("config"));
        self.out_root.join(&self.component).join(name)
    }

    /// Render one directive without touching the filesystem.
    pub fn render(&self, spec: &FileSpec) -> Result<GeneratedFile> {
        let content = writers::write(&spec.format, &spec.values)?;
        let target = paths::expand(&spec.target);
        let generated = self.generated_path(&target);

        Ok(GeneratedFile {
            target,
            generated,
            format: spec.format.clone(),
            content,
            action: ACTION_PREVIEW,
        })
    }

    /// Render one directive and write it under the generated root.
    ///
    /// Regenerating with unchanged inputs is a byte-for-byte no-op; the
    /// existing file is left untouched and reported as unchanged.
    pub fn generate(&self, spec: &FileSpec) -> Result<GeneratedFile> {
        let mut file = self.render(spec)?;

        if fs::read(&file.generated).is_ok_and(|current| current == file.content) {
            file.action = ACTION_UNCHANGED;
            return Ok(file);
        }

        if self.dry_run {
            return Ok(file);
        }

        if let Some(parent) = file.generated.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| Error::io("create", parent.to_path_buf(), err))?;
        }
        fs::write(&file.generated, &file.content)
            .map_err(|err| Error::io("write", file.generated.clone(), err))?;

        file.action = ACTION_WRITTEN;
        Ok(file)
    }

    /// Symlink directives pointing each declared target at its generated
    /// file, for the synchronizer to reconcile. Sources are relative to
    /// [`Self::component_dir`].
    pub fn link_directives(&self, files: &[GeneratedFile]) -> Vec<SyncFileSpec> {
        files
            .iter()
            .map(|file| SyncFileSpec {
                source: file
                    .generated
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                target: file.target.to_string_lossy().into_owned(),
                mode: SyncMode::Symlink,
                merge: None,
            })
            .collect()
    }

    /// Directory holding this component's generated files.
    pub fn component_dir(&self) -> PathBuf {
        self.out_root.join(&self.component)
    }
}
