//! Target path expression expansion.
//!
//! Directive targets may reference environment variables (`${VAR}`,
//! `${VAR:-default}`) and the home directory (`~/`). Expansion is a single
//! textual pass; nested references are not resolved.

use std::path::PathBuf;

/// Expand a target path expression into a concrete path.
///
/// An unset or empty variable falls back to its `:-` default when one is
/// given; without a default the reference is left in place. Variables
/// expand before the tilde pass, so a default like `~/x` still resolves.
pub fn expand(input: &str) -> PathBuf {
    let env_expanded =
        shellexpand::env_with_context_no_errors(input, |var| match std::env::var(var) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        });
    let expanded = shellexpand::tilde_with_context(env_expanded.as_ref(), home_dir);
    PathBuf::from(expanded.as_ref())
}

fn home_dir() -> Option<String> {
    dirs::home_dir().map(|p| p.to_string_lossy().into_owned())
}

/// The user override directory: `$XDG_CONFIG_HOME/dotforge`, falling back
/// to `~/.config/dotforge`.
pub fn overlay_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("dotforge")
}

/// Root for rendered file output: `$XDG_DATA_HOME/dotforge/generated`,
/// falling back to `~/.local/share/dotforge/generated`.
pub fn generated_root() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share")
        .join("dotforge")
        .join("generated")
}

/// Default dotfiles root holding per-component sync sources.
pub fn dotfiles_root() -> PathBuf {
    match std::env::var("DOTFORGE_ROOT") {
        Ok(root) if !root.is_empty() => expand(&root),
        _ => dirs::home_dir().unwrap_or_default().join(".dotfiles"),
    }
}

fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    match std::env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir().unwrap_or_default().join(fallback),
    }
}
