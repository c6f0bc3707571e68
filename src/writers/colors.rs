//! Named terminal color schemes.
//!
//! Colors are stored as hex strings (`#RRGGBB`) and converted to the
//! consuming format's own representation at render time.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// A 16-color terminal palette plus UI colors.
pub struct ColorScheme {
    pub background: &'static str,
    pub foreground: &'static str,
    pub bold: &'static str,
    pub cursor: &'static str,
    pub cursor_text: &'static str,
    pub selection: &'static str,
    pub selected_text: &'static str,
    /// Ansi colors 0-15 (standard terminal palette).
    pub ansi: [&'static str; 16],
}

/// Look up a predefined scheme by name.
pub fn scheme(name: &str) -> Option<&'static ColorScheme> {
    SCHEMES.get(name)
}

/// Names of all predefined schemes, sorted.
pub fn scheme_names() -> Vec<&'static str> {
    SCHEMES.keys().copied().collect()
}

static SCHEMES: LazyLock<BTreeMap<&'static str, ColorScheme>> = LazyLock::new(|| {
    BTreeMap::from([
        (
            "catppuccin-mocha",
            ColorScheme {
                background: "#1e1e2e",
                foreground: "#cdd6f4",
                bold: "#cdd6f4",
                cursor: "#f38ba8",
                cursor_text: "#1e1e2e",
                selection: "#3a3c53",
                selected_text: "#cdd6f4",
                ansi: [
                    "#45475a", "#f38ba8", "#a6e3a1", "#f9e2af", "#89b4fa", "#f5c2e7", "#94e2d5",
                    "#bac2de", "#585b70", "#f38ba8", "#a6e3a1", "#f9e2af", "#89b4fa", "#f5c2e7",
                    "#94e2d5", "#cdd6f4",
                ],
            },
        ),
        (
            "catppuccin-latte",
            ColorScheme {
                background: "#eff1f5",
                foreground: "#4c4f69",
                bold: "#4c4f69",
                cursor: "#d20f39",
                cursor_text: "#eff1f5",
                selection: "#acb0be",
                selected_text: "#4c4f69",
                ansi: [
                    "#5c5f77", "#d20f39", "#40a02b", "#df8e1d", "#1e66f5", "#ea76cb", "#179299",
                    "#acb0be", "#6c6f85", "#d20f39", "#40a02b", "#df8e1d", "#1e66f5", "#ea76cb",
                    "#179299", "#4c4f69",
                ],
            },
        ),
        (
            "catppuccin-frappe",
            ColorScheme {
                background: "#303446",
                foreground: "#c6d0f5",
                bold: "#c6d0f5",
                cursor: "#ea999c",
                cursor_text: "#303446",
                selection: "#51576d",
                selected_text: "#c6d0f5",
                ansi: [
                    "#51576d", "#e78284", "#a6d189", "#e5c890", "#8caaee", "#f4b8e4", "#81c8be",
                    "#b5bfe2", "#626880", "#e78284", "#a6d189", "#e5c890", "#8caaee", "#f4b8e4",
                    "#81c8be", "#c6d0f5",
                ],
            },
        ),
        (
            "catppuccin-macchiato",
            ColorScheme {
                background: "#24273a",
                foreground: "#cad3f5",
                bold: "#cad3f5",
                cursor: "#ee99a0",
                cursor_text: "#24273a",
                selection: "#494d64",
                selected_text: "#cad3f5",
                ansi: [
                    "#494d64", "#ed8796", "#a6da95", "#eed49f", "#8aadf4", "#f5bde6", "#8bd5ca",
                    "#b8c0e0", "#5b6078", "#ed8796", "#a6da95", "#eed49f", "#8aadf4", "#f5bde6",
                    "#8bd5ca", "#cad3f5",
                ],
            },
        ),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_lookup() {
        assert!(scheme("catppuccin-mocha").is_some());
        assert!(scheme("solarized-dark").is_none());
    }

    #[test]
    fn test_all_scheme_colors_are_hex() {
        for name in scheme_names() {
            let cs = scheme(name).unwrap();
            let mut all = vec![
                cs.background,
                cs.foreground,
                cs.bold,
                cs.cursor,
                cs.cursor_text,
                cs.selection,
                cs.selected_text,
            ];
            all.extend(cs.ansi);
            for color in all {
                assert_eq!(color.len(), 7, "{name}: {color}");
                assert!(color.starts_with('#'), "{name}: {color}");
            }
        }
    }
}
