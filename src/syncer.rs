//! File synchronization.
//!
//! Reconciles a component's `sync_files` directives against the
//! filesystem. Each directive is processed independently: one failure is
//! recorded and the rest of the batch still runs. Re-running a sync with
//! no external changes reports every directive as unchanged, which is what
//! makes interrupted or repeated runs safe without any locking.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::merge;
use crate::paths;
use crate::schema::{MergeSpec, SyncFileSpec, SyncMode};

pub const ACTION_CREATED: &str = "created";
pub const ACTION_UPDATED: &str = "updated";
pub const ACTION_UNCHANGED: &str = "unchanged";

pub const STATUS_SYNCED: &str = "synced";
pub const STATUS_MISSING: &str = "missing";
pub const STATUS_NOT_SYMLINK: &str = "not_symlink";
pub const STATUS_WRONG_TARGET: &str = "wrong_target";

/// Outcome of a sync or status run.
#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub synced: Vec<SyncedFile>,
    pub skipped: Vec<SyncedFile>,
    pub errors: Vec<SyncFailure>,
    pub dry_run: bool,
}

impl SyncReport {
    fn new(dry_run: bool) -> Self {
        Self {
            synced: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
            dry_run,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// One reconciled directive.
#[derive(Debug, Serialize)]
pub struct SyncedFile {
    pub source: String,
    pub target: PathBuf,
    pub mode: SyncMode,
    pub action: &'static str,
}

/// One failed directive.
#[derive(Debug, Serialize)]
pub struct SyncFailure {
    pub source: String,
    pub target: PathBuf,
    pub error: String,
}

pub struct Syncer {
    component_dir: PathBuf,
    dry_run: bool,
}

impl Syncer {
    /// Syncer resolving directive sources relative to `component_dir`.
    pub fn new(component_dir: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            component_dir: component_dir.into(),
            dry_run,
        }
    }

    /// Reconcile every directive, collecting per-directive failures.
    pub fn sync(&self, specs: &[SyncFileSpec]) -> SyncReport {
        let mut report = SyncReport::new(self.dry_run);

        for spec in specs {
            let source = self.component_dir.join(&spec.source);
            let target = paths::expand(&spec.target);

            let outcome = match spec.mode {
                SyncMode::Symlink => self.sync_symlink(&source, &target),
                SyncMode::Copy => self.sync_copy(&source, &target),
                SyncMode::Merge => self.sync_merge(&source, &target, spec.merge.as_ref()),
            };

            match outcome {
                Ok(ACTION_UNCHANGED) => report.skipped.push(SyncedFile {
                    source: spec.source.clone(),
                    target,
                    mode: spec.mode,
                    action: ACTION_UNCHANGED,
                }),
                Ok(action) => report.synced.push(SyncedFile {
                    source: spec.source.clone(),
                    target,
                    mode: spec.mode,
                    action,
                }),
                Err(err) => {
                    tracing::error!(source = %spec.source, target = %target.display(), error = %err, "sync failed");
                    report.errors.push(SyncFailure {
                        source: spec.source.clone(),
                        target,
                        error: err.to_string(),
                    });
                }
            }
        }

        report
    }

    /// Read-only mirror of [`Self::sync`]'s classification.
    ///
    /// Symlink directives report `synced`/`missing`/`not_symlink`/
    /// `wrong_target`; copy and merge directives only check that the target
    /// exists (content drift is a job for `sync --dry-run`).
    pub fn status(&self, specs: &[SyncFileSpec]) -> SyncReport {
        let mut report = SyncReport::new(false);

        for spec in specs {
            let source = self.component_dir.join(&spec.source);
            let target = paths::expand(&spec.target);
            let state = check_status(&source, &target, spec.mode);

            let entry = SyncedFile {
                source: spec.source.clone(),
                target,
                mode: spec.mode,
                action: state,
            };
            if state == STATUS_SYNCED {
                report.synced.push(entry);
            } else {
                report.skipped.push(entry);
            }
        }

        report
    }

    fn sync_symlink(&self, source: &Path, target: &Path) -> Result<&'static str> {
        if fs::metadata(source).is_err() {
            return Err(Error::NotFound(source.display().to_string()));
        }

        enum Plan {
            Create,
            Relink,
            BackupAside,
        }

        let plan = match fs::symlink_metadata(target) {
            Err(_) => Plan::Create,
            Ok(meta) if meta.file_type().is_symlink() => {
                let current = fs::read_link(target)
                    .map_err(|err| Error::io("read link", target.to_path_buf(), err))?;
                if current == source {
                    return Ok(ACTION_UNCHANGED);
                }
                Plan::Relink
            }
            // A regular file or directory is moved aside, never destroyed.
            Ok(_) => Plan::BackupAside,
        };

        if self.dry_run {
            return Ok(match plan {
                Plan::Create => ACTION_CREATED,
                _ => ACTION_UPDATED,
            });
        }

        let action = match plan {
            Plan::Create => ACTION_CREATED,
            Plan::Relink => {
                fs::remove_file(target)
                    .map_err(|err| Error::io("remove", target.to_path_buf(), err))?;
                ACTION_UPDATED
            }
            Plan::BackupAside => {
                let backup = backup_path(target);
                fs::rename(target, &backup)
                    .map_err(|err| Error::io("back up", target.to_path_buf(), err))?;
                ACTION_UPDATED
            }
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| Error::io("create", parent.to_path_buf(), err))?;
        }

        make_symlink(source, target)?;
        Ok(action)
    }

    fn sync_copy(&self, source: &Path, target: &Path) -> Result<&'static str> {
        let meta = fs::metadata(source)
            .map_err(|_| Error::NotFound(source.display().to_string()))?;

        if meta.is_dir() {
            self.copy_dir(source, target)
        } else {
            self.copy_file(source, target)
        }
    }

    fn copy_file(&self, source: &Path, target: &Path) -> Result<&'static str> {
        let data =
            fs::read(source).map_err(|err| Error::io("read", source.to_path_buf(), err))?;

        if fs::read(target).is_ok_and(|existing| existing == data) {
            return Ok(ACTION_UNCHANGED);
        }

        let action = if target.exists() {
            ACTION_UPDATED
        } else {
            ACTION_CREATED
        };

        if self.dry_run {
            return Ok(action);
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| Error::io("create", parent.to_path_buf(), err))?;
        }
        fs::write(target, data).map_err(|err| Error::io("write", target.to_path_buf(), err))?;

        Ok(action)
    }

    /// Copy a directory file-by-file. Extraneous files already present at
    /// the target are left alone; the sync is deliberately non-exhaustive.
    fn copy_dir(&self, source: &Path, target: &Path) -> Result<&'static str> {
        let existed = target.exists();
        let mut changed = false;

        if !existed && !self.dry_run {
            fs::create_dir_all(target)
                .map_err(|err| Error::io("create", target.to_path_buf(), err))?;
        }

        for entry in WalkDir::new(source) {
            let entry =
                entry.map_err(|err| Error::io("walk", source.to_path_buf(), err.into()))?;
            if entry.file_type().is_dir() {
                continue;
            }

            let rel = entry
                .path()
                .strip_prefix(source)
                .unwrap_or(entry.path());
            if self.copy_file(entry.path(), &target.join(rel))? != ACTION_UNCHANGED {
                changed = true;
            }
        }

        if !existed {
            Ok(ACTION_CREATED)
        } else if changed {
            Ok(ACTION_UPDATED)
        } else {
            Ok(ACTION_UNCHANGED)
        }
    }

    /// Merge the source document with the user's local file into a real
    /// target file. Comparison against the current target is structural;
    /// key order never forces a rewrite.
    fn sync_merge(
        &self,
        source: &Path,
        target: &Path,
        spec: Option<&MergeSpec>,
    ) -> Result<&'static str> {
        let source_data =
            fs::read(source).map_err(|_| Error::NotFound(source.display().to_string()))?;
        let base = parse_object(&source_data, source)?;

        let user_path = spec
            .and_then(|m| m.user_file.as_deref())
            .map(paths::expand)
            .unwrap_or_else(|| default_user_file(target));

        let user = match fs::read(&user_path) {
            Ok(data) => parse_object(&data, &user_path)?,
            Err(_) => serde_json::Map::new(),
        };

        let strategy = spec.map(|m| m.strategy).unwrap_or_default();
        let preserve: &[String] = spec.map(|m| m.preserve.as_slice()).unwrap_or(&[]);

        let merged = merge::merge_values(&base, &user, strategy, preserve);

        if let Ok(existing) = fs::read(target)
            && let Ok(existing_value) = serde_json::from_slice::<Value>(&existing)
            && existing_value == Value::Object(merged.clone())
        {
            return Ok(ACTION_UNCHANGED);
        }

        let target_meta = fs::symlink_metadata(target);
        let action = if target_meta.is_ok() {
            ACTION_UPDATED
        } else {
            ACTION_CREATED
        };

        if self.dry_run {
            return Ok(action);
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| Error::io("create", parent.to_path_buf(), err))?;
        }

        // Merge output is a synthesis of two sources, so the target must be
        // a real file; replace any symlink sitting there.
        if target_meta.is_ok_and(|meta| meta.file_type().is_symlink()) {
            fs::remove_file(target)
                .map_err(|err| Error::io("remove", target.to_path_buf(), err))?;
        }

        let bytes = serde_json::to_vec_pretty(&Value::Object(merged)).map_err(|err| {
            Error::Merge {
                path: target.to_path_buf(),
                reason: err.to_string(),
            }
        })?;
        fs::write(target, bytes).map_err(|err| Error::io("write", target.to_path_buf(), err))?;

        Ok(action)
    }
}

fn check_status(source: &Path, target: &Path, mode: SyncMode) -> &'static str {
    match mode {
        SyncMode::Symlink => match fs::symlink_metadata(target) {
            Err(_) => STATUS_MISSING,
            Ok(meta) if !meta.file_type().is_symlink() => STATUS_NOT_SYMLINK,
            Ok(_) => match fs::read_link(target) {
                Ok(dest) if dest == source => STATUS_SYNCED,
                _ => STATUS_WRONG_TARGET,
            },
        },
        SyncMode::Copy | SyncMode::Merge => {
            if target.exists() {
                STATUS_SYNCED
            } else {
                STATUS_MISSING
            }
        }
    }
}

fn parse_object(data: &[u8], path: &Path) -> Result<serde_json::Map<String, Value>> {
    let value: Value = serde_json::from_slice(data).map_err(|err| Error::Merge {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::Merge {
            path: path.to_path_buf(),
            reason: "expected a JSON object at the top level".to_string(),
        }),
    }
}

fn default_user_file(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(".local");
    PathBuf::from(name)
}

fn backup_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(".backup");
    PathBuf::from(name)
}

fn make_symlink(source: &Path, target: &Path) -> Result<()> {
    #[cfg(unix)]
    std::os::unix::fs::symlink(source, target)
        .map_err(|err| Error::io("link", target.to_path_buf(), err))?;

    #[cfg(windows)]
    {
        if source.is_dir() {
            std::os::windows::fs::symlink_dir(source, target)
                .map_err(|err| Error::io("link", target.to_path_buf(), err))?;
        } else {
            std::os::windows::fs::symlink_file(source, target)
                .map_err(|err| Error::io("link", target.to_path_buf(), err))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn spec(source: &str, target: &Path, mode: SyncMode) -> SyncFileSpec {
        SyncFileSpec {
            source: source.to_string(),
            target: target.to_string_lossy().into_owned(),
            mode,
            merge: None,
        }
    }

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let component_dir = temp.path().join("dotfiles");
        let home = temp.path().join("home");
        fs::create_dir_all(&component_dir).unwrap();
        fs::create_dir_all(&home).unwrap();
        (temp, component_dir, home)
    }

    // =========================================================================
    // SYMLINK MODE
    // =========================================================================

    #[test]
    #[cfg(unix)]
    fn test_symlink_first_install() {
        let (_temp, dotfiles, home) = setup();
        fs::write(dotfiles.join("inputrc"), "set editing-mode vi\n").unwrap();
        let target = home.join(".inputrc");

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.sync(&[spec("inputrc", &target, SyncMode::Symlink)]);

        assert!(report.is_clean());
        assert_eq!(report.synced.len(), 1);
        assert_eq!(report.synced[0].action, ACTION_CREATED);
        assert!(target.is_symlink());
        assert_eq!(fs::read_link(&target).unwrap(), dotfiles.join("inputrc"));
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_is_idempotent() {
        let (_temp, dotfiles, home) = setup();
        fs::write(dotfiles.join("inputrc"), "x").unwrap();
        let target = home.join(".inputrc");
        let directives = [spec("inputrc", &target, SyncMode::Symlink)];

        let syncer = Syncer::new(&dotfiles, false);
        syncer.sync(&directives);
        let second = syncer.sync(&directives);

        assert_eq!(second.synced.len(), 0);
        assert_eq!(second.skipped.len(), 1);
        assert_eq!(second.skipped[0].action, ACTION_UNCHANGED);
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_backs_up_existing_file() {
        let (_temp, dotfiles, home) = setup();
        fs::write(dotfiles.join("inputrc"), "managed").unwrap();
        let target = home.join(".inputrc");
        fs::write(&target, "precious user content").unwrap();

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.sync(&[spec("inputrc", &target, SyncMode::Symlink)]);

        assert_eq!(report.synced[0].action, ACTION_UPDATED);
        assert!(target.is_symlink());
        let backup = home.join(".inputrc.backup");
        assert_eq!(fs::read_to_string(backup).unwrap(), "precious user content");
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_replaces_wrong_target() {
        let (_temp, dotfiles, home) = setup();
        fs::write(dotfiles.join("a"), "a").unwrap();
        fs::write(dotfiles.join("b"), "b").unwrap();
        let target = home.join(".link");
        std::os::unix::fs::symlink(dotfiles.join("a"), &target).unwrap();

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.sync(&[spec("b", &target, SyncMode::Symlink)]);

        assert_eq!(report.synced[0].action, ACTION_UPDATED);
        assert_eq!(fs::read_link(&target).unwrap(), dotfiles.join("b"));
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_missing_source_is_collected() {
        let (_temp, dotfiles, home) = setup();
        fs::write(dotfiles.join("present"), "x").unwrap();
        let good = home.join(".present");
        let bad = home.join(".absent");

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.sync(&[
            spec("absent", &bad, SyncMode::Symlink),
            spec("present", &good, SyncMode::Symlink),
        ]);

        // The bad directive doesn't stop the good one.
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].error.contains("not found"));
        assert_eq!(report.synced.len(), 1);
        assert!(good.is_symlink());
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_dry_run_touches_nothing() {
        let (_temp, dotfiles, home) = setup();
        fs::write(dotfiles.join("inputrc"), "x").unwrap();
        let target = home.join(".inputrc");

        let syncer = Syncer::new(&dotfiles, true);
        let report = syncer.sync(&[spec("inputrc", &target, SyncMode::Symlink)]);

        assert!(report.dry_run);
        assert_eq!(report.synced[0].action, ACTION_CREATED);
        assert!(!target.exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_creates_parent_directories() {
        let (_temp, dotfiles, home) = setup();
        fs::write(dotfiles.join("config"), "x").unwrap();
        let target = home.join("deep/nested/config");

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.sync(&[spec("config", &target, SyncMode::Symlink)]);

        assert!(report.is_clean());
        assert!(target.is_symlink());
    }

    // =========================================================================
    // COPY MODE
    // =========================================================================

    #[test]
    fn test_copy_file_then_unchanged() {
        let (_temp, dotfiles, home) = setup();
        fs::write(dotfiles.join("gitignore"), "*.log\n").unwrap();
        let target = home.join(".config/git/ignore");
        let directives = [spec("gitignore", &target, SyncMode::Copy)];

        let syncer = Syncer::new(&dotfiles, false);
        let first = syncer.sync(&directives);
        assert_eq!(first.synced[0].action, ACTION_CREATED);
        assert_eq!(fs::read_to_string(&target).unwrap(), "*.log\n");

        let second = syncer.sync(&directives);
        assert_eq!(second.skipped[0].action, ACTION_UNCHANGED);
    }

    #[test]
    fn test_copy_updates_stale_target() {
        let (_temp, dotfiles, home) = setup();
        fs::write(dotfiles.join("rc"), "new").unwrap();
        let target = home.join(".rc");
        fs::write(&target, "old").unwrap();

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.sync(&[spec("rc", &target, SyncMode::Copy)]);

        assert_eq!(report.synced[0].action, ACTION_UPDATED);
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_copy_directory_recurses_and_keeps_extraneous_files() {
        let (_temp, dotfiles, home) = setup();
        let hooks = dotfiles.join("hooks");
        fs::create_dir_all(hooks.join("sub")).unwrap();
        fs::write(hooks.join("pre-commit"), "#!/bin/sh\n").unwrap();
        fs::write(hooks.join("sub/post-merge"), "#!/bin/sh\n").unwrap();

        let target = home.join("hooks");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("user-hook"), "mine").unwrap();

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.sync(&[spec("hooks", &target, SyncMode::Copy)]);

        assert!(report.is_clean());
        assert!(target.join("pre-commit").exists());
        assert!(target.join("sub/post-merge").exists());
        // Non-exhaustive sync: the user's extra file survives.
        assert_eq!(fs::read_to_string(target.join("user-hook")).unwrap(), "mine");
    }

    #[test]
    fn test_copy_directory_is_idempotent() {
        let (_temp, dotfiles, home) = setup();
        let src = dotfiles.join("profile.d");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("10-path.sh"), "export PATH\n").unwrap();
        let target = home.join("profile.d");
        let directives = [spec("profile.d", &target, SyncMode::Copy)];

        let syncer = Syncer::new(&dotfiles, false);
        assert_eq!(syncer.sync(&directives).synced[0].action, ACTION_CREATED);
        assert_eq!(syncer.sync(&directives).skipped[0].action, ACTION_UNCHANGED);
    }

    #[test]
    fn test_copy_dry_run_reports_without_writing() {
        let (_temp, dotfiles, home) = setup();
        fs::write(dotfiles.join("rc"), "x").unwrap();
        let target = home.join(".rc");

        let syncer = Syncer::new(&dotfiles, true);
        let report = syncer.sync(&[spec("rc", &target, SyncMode::Copy)]);

        assert_eq!(report.synced[0].action, ACTION_CREATED);
        assert!(!target.exists());
    }

    // =========================================================================
    // MERGE MODE
    // =========================================================================

    fn write_json(path: &Path, value: serde_json::Value) {
        fs::write(path, serde_json::to_vec_pretty(&value).unwrap()).unwrap();
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn test_merge_with_user_override() {
        let (_temp, dotfiles, home) = setup();
        write_json(&dotfiles.join("settings.json"), json!({"a": 1, "b": {"x": 1}}));
        let target = home.join("settings.json");
        write_json(&default_user_file(&target), json!({"b": {"y": 2}, "a": 9}));

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.sync(&[spec("settings.json", &target, SyncMode::Merge)]);

        assert!(report.is_clean());
        assert_eq!(report.synced[0].action, ACTION_CREATED);
        assert_eq!(read_json(&target), json!({"a": 9, "b": {"x": 1, "y": 2}}));
    }

    #[test]
    fn test_merge_without_user_file_writes_base() {
        let (_temp, dotfiles, home) = setup();
        write_json(&dotfiles.join("settings.json"), json!({"theme": "dark"}));
        let target = home.join("settings.json");

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.sync(&[spec("settings.json", &target, SyncMode::Merge)]);

        assert!(report.is_clean());
        assert_eq!(read_json(&target), json!({"theme": "dark"}));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let (_temp, dotfiles, home) = setup();
        write_json(&dotfiles.join("s.json"), json!({"a": 1, "b": {"x": 1}}));
        let target = home.join("s.json");
        write_json(&default_user_file(&target), json!({"b": {"y": 2}}));
        let directives = [spec("s.json", &target, SyncMode::Merge)];

        let syncer = Syncer::new(&dotfiles, false);
        assert_eq!(syncer.sync(&directives).synced[0].action, ACTION_CREATED);
        assert_eq!(syncer.sync(&directives).skipped[0].action, ACTION_UNCHANGED);
    }

    #[test]
    fn test_merge_is_idempotent_under_reordered_keys() {
        let (_temp, dotfiles, home) = setup();
        write_json(&dotfiles.join("s.json"), json!({"a": 1, "b": 2}));
        let target = home.join("s.json");
        // Same content, different key order: structurally equal, no rewrite.
        fs::write(&target, "{\"b\": 2, \"a\": 1}").unwrap();

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.sync(&[spec("s.json", &target, SyncMode::Merge)]);

        assert_eq!(report.skipped[0].action, ACTION_UNCHANGED);
        assert_eq!(fs::read_to_string(&target).unwrap(), "{\"b\": 2, \"a\": 1}");
    }

    #[test]
    fn test_merge_respects_preserve_keys_and_custom_user_file() {
        let (_temp, dotfiles, home) = setup();
        write_json(&dotfiles.join("s.json"), json!({"theme": "dark"}));
        let user_file = home.join("local.json");
        write_json(&user_file, json!({"zoom": 2}));
        let target = home.join("s.json");

        let mut directive = spec("s.json", &target, SyncMode::Merge);
        directive.merge = Some(MergeSpec {
            user_file: Some(user_file.to_string_lossy().into_owned()),
            strategy: Default::default(),
            preserve: vec!["zoom".to_string()],
        });

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.sync(&[directive]);

        assert!(report.is_clean());
        assert_eq!(read_json(&target), json!({"theme": "dark", "zoom": 2}));
    }

    #[test]
    #[cfg(unix)]
    fn test_merge_replaces_symlink_with_real_file() {
        let (_temp, dotfiles, home) = setup();
        write_json(&dotfiles.join("s.json"), json!({"a": 1}));
        let target = home.join("s.json");
        std::os::unix::fs::symlink(dotfiles.join("s.json"), &target).unwrap();
        write_json(&default_user_file(&target), json!({"b": 2}));

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.sync(&[spec("s.json", &target, SyncMode::Merge)]);

        assert!(report.is_clean());
        assert!(!target.is_symlink());
        assert_eq!(read_json(&target), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_merge_malformed_user_file_is_an_error() {
        let (_temp, dotfiles, home) = setup();
        write_json(&dotfiles.join("s.json"), json!({"a": 1}));
        let target = home.join("s.json");
        fs::write(default_user_file(&target), "{ not json").unwrap();

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.sync(&[spec("s.json", &target, SyncMode::Merge)]);

        assert_eq!(report.errors.len(), 1);
        assert!(!target.exists());
    }

    #[test]
    fn test_merge_dry_run_matches_real_classification() {
        let (_temp, dotfiles, home) = setup();
        write_json(&dotfiles.join("s.json"), json!({"a": 1}));
        let target = home.join("s.json");
        fs::write(default_user_file(&target), "{ not json").unwrap();

        let dry = Syncer::new(&dotfiles, true);
        let report = dry.sync(&[spec("s.json", &target, SyncMode::Merge)]);

        // The malformed user file is reported even without a write path.
        assert_eq!(report.errors.len(), 1);
    }

    // =========================================================================
    // STATUS
    // =========================================================================

    #[test]
    #[cfg(unix)]
    fn test_status_classifications() {
        let (_temp, dotfiles, home) = setup();
        fs::write(dotfiles.join("a"), "a").unwrap();
        fs::write(dotfiles.join("b"), "b").unwrap();
        fs::write(dotfiles.join("c"), "c").unwrap();

        let linked = home.join(".a");
        std::os::unix::fs::symlink(dotfiles.join("a"), &linked).unwrap();
        let plain = home.join(".b");
        fs::write(&plain, "not a link").unwrap();
        let wrong = home.join(".c");
        std::os::unix::fs::symlink(dotfiles.join("a"), &wrong).unwrap();
        let missing = home.join(".d");

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.status(&[
            spec("a", &linked, SyncMode::Symlink),
            spec("b", &plain, SyncMode::Symlink),
            spec("c", &wrong, SyncMode::Symlink),
            spec("a", &missing, SyncMode::Symlink),
        ]);

        assert_eq!(report.synced.len(), 1);
        assert_eq!(report.synced[0].action, STATUS_SYNCED);

        let states: Vec<&str> = report.skipped.iter().map(|e| e.action).collect();
        assert_eq!(states, vec![STATUS_NOT_SYMLINK, STATUS_WRONG_TARGET, STATUS_MISSING]);
    }

    #[test]
    fn test_status_copy_checks_existence_only() {
        let (_temp, dotfiles, home) = setup();
        fs::write(dotfiles.join("rc"), "new content").unwrap();
        let target = home.join(".rc");
        fs::write(&target, "stale content").unwrap();

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.status(&[spec("rc", &target, SyncMode::Copy)]);

        // Present counts as synced even when stale.
        assert_eq!(report.synced.len(), 1);
    }

    #[test]
    fn test_status_does_not_mutate() {
        let (_temp, dotfiles, home) = setup();
        fs::write(dotfiles.join("rc"), "x").unwrap();
        let target = home.join(".rc");

        let syncer = Syncer::new(&dotfiles, false);
        let report = syncer.status(&[spec("rc", &target, SyncMode::Copy)]);

        assert_eq!(report.skipped[0].action, STATUS_MISSING);
        assert!(!target.exists());
    }
}
