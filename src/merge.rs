//! Base/override merging.
//!
//! Two merges live here: the typed document merge used by the loader, and
//! the generic value-tree merge used by merge-mode sync. The typed merge
//! applies a distinct rule per field class:
//!
//! - scalar strings coalesce (override wins when non-empty)
//! - maps union key-wise (override wins per key)
//! - non-keyed lists are replaced wholesale by a non-empty override
//! - keyed lists merge by identity (files by target, sync_files by source,
//!   install tools by name)
//!
//! Using the wrong rule on any field class silently loses either user
//! customization or bundled defaults, so the classes are kept explicit.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::schema::{ComponentConfig, InstallSpec, MergeStrategy};

/// Merge a user override document over a base document.
///
/// Pure: identical inputs always produce a structurally identical result.
pub fn merge_configs(base: &ComponentConfig, overlay: &ComponentConfig) -> ComponentConfig {
    ComponentConfig {
        name: coalesce(&overlay.name, &base.name),
        description: coalesce(&overlay.description, &base.description),
        version: coalesce(&overlay.version, &base.version),
        env: merge_maps(&base.env, &overlay.env),
        aliases: merge_maps(&base.aliases, &overlay.aliases),
        shell_functions: merge_maps(&base.shell_functions, &overlay.shell_functions),
        paths: replace_if_set(&base.paths, &overlay.paths),
        wrappers: replace_if_set(&base.wrappers, &overlay.wrappers),
        files: merge_keyed(&base.files, &overlay.files, |f| f.target.as_str()),
        sync_files: merge_keyed(&base.sync_files, &overlay.sync_files, |f| f.source.as_str()),
        install: InstallSpec {
            tools: merge_keyed(&base.install.tools, &overlay.install.tools, |t| {
                t.name.as_str()
            }),
        },
    }
}

/// First non-empty string wins.
fn coalesce(overlay: &str, base: &str) -> String {
    if overlay.is_empty() { base } else { overlay }.to_string()
}

/// Key-wise union; overlay values take precedence.
fn merge_maps(
    base: &BTreeMap<String, String>,
    overlay: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut result = base.clone();
    for (key, value) in overlay {
        result.insert(key.clone(), value.clone());
    }
    result
}

/// Non-keyed lists have no entry identity to merge on: a non-empty overlay
/// list replaces the base list wholesale.
fn replace_if_set<T: Clone>(base: &[T], overlay: &[T]) -> Vec<T> {
    if overlay.is_empty() { base } else { overlay }.to_vec()
}

/// Merge two lists by entry identity. Overlay entries replace base entries
/// with the same key; unmatched entries from both sides survive. Base order
/// is preserved and overlay-only entries append in overlay order, so the
/// result is deterministic.
fn merge_keyed<T: Clone>(base: &[T], overlay: &[T], key: impl Fn(&T) -> &str) -> Vec<T> {
    let mut order: Vec<String> = Vec::new();
    let mut by_key: HashMap<String, T> = HashMap::new();

    for entry in base.iter().chain(overlay.iter()) {
        let k = key(entry).to_string();
        if !by_key.contains_key(&k) {
            order.push(k.clone());
        }
        by_key.insert(k, entry.clone());
    }

    order.into_iter().filter_map(|k| by_key.remove(&k)).collect()
}

/// Generic value-tree merge used by merge-mode sync.
///
/// User values override base values. With the deep strategy, keys whose
/// value is an object on both sides are merged recursively. Keys listed in
/// `preserve` are always taken from the user tree, at every nesting level.
pub fn merge_values(
    base: &Map<String, Value>,
    user: &Map<String, Value>,
    strategy: MergeStrategy,
    preserve: &[String],
) -> Map<String, Value> {
    let mut result = base.clone();

    for (key, value) in user {
        let merged = match (result.get(key), value) {
            (Some(Value::Object(base_obj)), Value::Object(user_obj))
                if strategy == MergeStrategy::Deep =>
            {
                Value::Object(merge_values(base_obj, user_obj, strategy, preserve))
            }
            _ => value.clone(),
        };
        result.insert(key.clone(), merged);
    }

    for key in preserve {
        if let Some(value) = user.get(key) {
            result.insert(key.clone(), value.clone());
        }
    }

    result
}
