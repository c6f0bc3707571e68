//! iTerm2 dynamic-profile writer.
//!
//! Translates the declarative `profile`/`font`/`terminal`/`cursor`/...
//! sections into the JSON shape iTerm2 expects for dynamic profiles,
//! including hex-to-component color conversion and the numeric encodings
//! iTerm2 uses for cursor and option-key modes. Sections are optional;
//! a present section fills in documented defaults for its omitted keys.

use serde_json::{Map, Value, json};

use super::{ConfigWriter, colors, sorted, to_pretty_bytes, value_kind};
use crate::error::{Error, Result};

pub struct ITerm2Writer;

impl ConfigWriter for ITerm2Writer {
    fn format(&self) -> &'static str {
        "iterm2"
    }

    fn write(&self, values: &Map<String, Value>) -> Result<Vec<u8>> {
        let mut profile = Map::new();

        if let Some(p) = section(values, "profile")? {
            apply_identity(&mut profile, p)?;
        }
        if let Some(f) = section(values, "font")? {
            apply_font(&mut profile, f)?;
        }
        if let Some(t) = section(values, "terminal")? {
            apply_terminal(&mut profile, t)?;
        }
        if let Some(c) = section(values, "cursor")? {
            apply_cursor(&mut profile, c)?;
        }
        if let Some(i) = section(values, "input")? {
            apply_input(&mut profile, i)?;
        }
        if let Some(m) = section(values, "mouse")? {
            apply_mouse(&mut profile, m)?;
        }
        if let Some(b) = section(values, "behavior")? {
            apply_behavior(&mut profile, b)?;
        }
        if let Some(c) = section(values, "colors")? {
            apply_colors(&mut profile, c)?;
        }
        if let Some(maps) = values.get("keyboard_maps") {
            apply_keyboard_maps(&mut profile, maps)?;
        }
        if let Some(tags) = values.get("tags") {
            apply_tags(&mut profile, tags)?;
        }

        // iTerm2 expects the profile wrapped in a Profiles array.
        let output = json!({ "Profiles": [Value::Object(profile)] });
        to_pretty_bytes(&sorted(&output))
    }
}

fn apply_identity(profile: &mut Map<String, Value>, p: &Map<String, Value>) -> Result<()> {
    if let Some(name) = str_field(p, "profile", "name")? {
        profile.insert("Name".into(), json!(name));
    }
    if let Some(guid) = str_field(p, "profile", "guid")? {
        profile.insert("Guid".into(), json!(guid));
    }
    if let Some(parent) = str_field(p, "profile", "parent")? {
        profile.insert("Dynamic Profile Parent Name".into(), json!(parent));
    }
    if let Some(desc) = str_field(p, "profile", "description")? {
        profile.insert("Description".into(), json!(desc));
    }
    Ok(())
}

fn apply_font(profile: &mut Map<String, Value>, f: &Map<String, Value>) -> Result<()> {
    let family = str_field(f, "font", "family")?.unwrap_or("Menlo");
    let size = int_field(f, "font", "size")?.unwrap_or(14);

    let font_spec = format!("{family} {size}");
    profile.insert("Normal Font".into(), json!(font_spec));
    profile.insert("Non Ascii Font".into(), json!(font_spec));
    profile.insert("Use Non-ASCII Font".into(), json!(false));

    let anti_aliased = bool_field(f, "font", "anti_aliased")?.unwrap_or(true);
    profile.insert("ASCII Anti Aliased".into(), json!(anti_aliased));
    profile.insert("Non-ASCII Anti Aliased".into(), json!(anti_aliased));

    match num_field(f, "font", "horizontal_spacing")? {
        Some(h) => profile.insert("Horizontal Spacing".into(), json!(h)),
        None => profile.insert("Horizontal Spacing".into(), json!(1)),
    };
    match num_field(f, "font", "vertical_spacing")? {
        Some(v) => profile.insert("Vertical Spacing".into(), json!(v)),
        None => profile.insert("Vertical Spacing".into(), json!(1.1)),
    };

    let use_bold = bool_field(f, "font", "use_bold")?.unwrap_or(true);
    profile.insert("Use Bold Font".into(), json!(use_bold));
    let use_bright_bold = bool_field(f, "font", "use_bright_bold")?.unwrap_or(true);
    profile.insert("Use Bright Bold".into(), json!(use_bright_bold));
    let use_italic = bool_field(f, "font", "use_italic")?.unwrap_or(true);
    profile.insert("Use Italic Font".into(), json!(use_italic));

    Ok(())
}

fn apply_terminal(profile: &mut Map<String, Value>, t: &Map<String, Value>) -> Result<()> {
    let term_type = str_field(t, "terminal", "type")?.unwrap_or("xterm-256color");
    profile.insert("Terminal Type".into(), json!(term_type));

    // UTF-8
    profile.insert("Character Encoding".into(), json!(4));

    let scrollback = int_field(t, "terminal", "scrollback_lines")?.unwrap_or(50_000);
    profile.insert("Scrollback Lines".into(), json!(scrollback));

    let unlimited = bool_field(t, "terminal", "unlimited_scrollback")?.unwrap_or(false);
    profile.insert("Unlimited Scrollback".into(), json!(unlimited));

    profile.insert("Scrollback With Status Bar".into(), json!(true));
    Ok(())
}

fn apply_cursor(profile: &mut Map<String, Value>, c: &Map<String, Value>) -> Result<()> {
    let cursor_type = match str_field(c, "cursor", "type")? {
        Some(name) => cursor_type_code(name)?,
        None => 0, // block
    };
    profile.insert("Cursor Type".into(), json!(cursor_type));

    let blinking = bool_field(c, "cursor", "blinking")?.unwrap_or(false);
    profile.insert("Blinking Cursor".into(), json!(blinking));

    let boost = int_field(c, "cursor", "boost")?.unwrap_or(0);
    profile.insert("Cursor Boost".into(), json!(boost));

    profile.insert("Minimum Contrast".into(), json!(0));
    Ok(())
}

fn cursor_type_code(name: &str) -> Result<i64> {
    match name.to_lowercase().as_str() {
        "block" => Ok(0),
        "underline" => Ok(1),
        "bar" | "ibeam" | "vertical" => Ok(2),
        other => Err(Error::InvalidValues {
            key: "cursor.type".to_string(),
            reason: format!("unknown cursor type '{other}'"),
        }),
    }
}

fn apply_input(profile: &mut Map<String, Value>, i: &Map<String, Value>) -> Result<()> {
    let option = match str_field(i, "input", "option_key_sends")? {
        Some(mode) => option_key_code(mode, "input.option_key_sends")?,
        None => 2, // meta
    };
    profile.insert("Option Key Sends".into(), json!(option));

    let right_option = match str_field(i, "input", "right_option_key_sends")? {
        Some(mode) => option_key_code(mode, "input.right_option_key_sends")?,
        None => 0, // normal
    };
    profile.insert("Right Option Key Sends".into(), json!(right_option));
    Ok(())
}

fn option_key_code(mode: &str, key: &str) -> Result<i64> {
    match mode.to_lowercase().as_str() {
        "normal" => Ok(0),
        "esc" | "esc+" => Ok(1),
        "meta" => Ok(2),
        other => Err(Error::InvalidValues {
            key: key.to_string(),
            reason: format!("unknown option key mode '{other}'"),
        }),
    }
}

fn apply_mouse(profile: &mut Map<String, Value>, m: &Map<String, Value>) -> Result<()> {
    let reporting = bool_field(m, "mouse", "reporting")?.unwrap_or(true);
    profile.insert("Mouse Reporting".into(), json!(reporting));

    let allow_wheel = bool_field(m, "mouse", "allow_wheel")?.unwrap_or(true);
    profile.insert("Mouse Reporting Allow Mouse Wheel".into(), json!(allow_wheel));
    Ok(())
}

fn apply_behavior(profile: &mut Map<String, Value>, b: &Map<String, Value>) -> Result<()> {
    let custom_dir = match str_field(b, "behavior", "working_directory")? {
        Some(mode) => working_dir_code(mode)?,
        None => "Recycle",
    };
    profile.insert("Custom Directory".into(), json!(custom_dir));
    profile.insert("Working Directory".into(), json!(""));

    let close_on_end = bool_field(b, "behavior", "close_on_end")?.unwrap_or(true);
    profile.insert("Close Sessions On End".into(), json!(close_on_end));

    profile.insert("Prompt Before Closing 2".into(), json!(0));
    profile.insert("Send Code When Idle".into(), json!(false));
    profile.insert("Idle Code".into(), json!(0));

    let silence_bell = bool_field(b, "behavior", "silence_bell")?.unwrap_or(false);
    profile.insert("Silence Bell".into(), json!(silence_bell));

    let flash_tab = bool_field(b, "behavior", "flash_tab")?.unwrap_or(true);
    profile.insert("Flash Tab".into(), json!(flash_tab));

    profile.insert("BM Growl".into(), json!(true));
    Ok(())
}

fn working_dir_code(mode: &str) -> Result<&'static str> {
    match mode.to_lowercase().as_str() {
        "recycle" => Ok("Recycle"),
        "home" => Ok("Home"),
        "custom" => Ok("Yes"),
        other => Err(Error::InvalidValues {
            key: "behavior.working_directory".to_string(),
            reason: format!("unknown working directory mode '{other}'"),
        }),
    }
}

fn apply_colors(profile: &mut Map<String, Value>, c: &Map<String, Value>) -> Result<()> {
    if let Some(name) = str_field(c, "colors", "scheme")? {
        let scheme = colors::scheme(name).ok_or_else(|| Error::InvalidValues {
            key: "colors.scheme".to_string(),
            reason: format!(
                "unknown scheme '{name}' (available: {})",
                colors::scheme_names().join(", ")
            ),
        })?;

        profile.insert("Background Color".into(), hex_color(scheme.background, "colors.scheme")?);
        profile.insert("Foreground Color".into(), hex_color(scheme.foreground, "colors.scheme")?);
        profile.insert("Bold Color".into(), hex_color(scheme.bold, "colors.scheme")?);
        profile.insert("Cursor Color".into(), hex_color(scheme.cursor, "colors.scheme")?);
        profile.insert("Cursor Text Color".into(), hex_color(scheme.cursor_text, "colors.scheme")?);
        profile.insert("Selection Color".into(), hex_color(scheme.selection, "colors.scheme")?);
        profile.insert(
            "Selected Text Color".into(),
            hex_color(scheme.selected_text, "colors.scheme")?,
        );
        for (i, hex) in scheme.ansi.iter().enumerate() {
            profile.insert(format!("Ansi {i} Color"), hex_color(hex, "colors.scheme")?);
        }
    }

    // Inline colors override the scheme.
    let inline = [
        ("background", "Background Color"),
        ("foreground", "Foreground Color"),
        ("bold", "Bold Color"),
        ("cursor", "Cursor Color"),
        ("cursor_text", "Cursor Text Color"),
        ("selection", "Selection Color"),
        ("selected_text", "Selected Text Color"),
    ];
    for (key, profile_key) in inline {
        if let Some(hex) = str_field(c, "colors", key)? {
            profile.insert(profile_key.into(), hex_color(hex, &format!("colors.{key}"))?);
        }
    }

    if let Some(ansi) = c.get("ansi") {
        let items = ansi.as_array().ok_or_else(|| Error::InvalidValues {
            key: "colors.ansi".to_string(),
            reason: format!("expected an array, got {}", value_kind(ansi)),
        })?;
        if items.len() != 16 {
            return Err(Error::InvalidValues {
                key: "colors.ansi".to_string(),
                reason: format!("expected 16 colors, got {}", items.len()),
            });
        }
        for (i, item) in items.iter().enumerate() {
            let key = format!("colors.ansi[{i}]");
            let hex = item.as_str().ok_or_else(|| Error::InvalidValues {
                key: key.clone(),
                reason: format!("expected a string, got {}", value_kind(item)),
            })?;
            profile.insert(format!("Ansi {i} Color"), hex_color(hex, &key)?);
        }
    }

    Ok(())
}

/// Convert `#RRGGBB` to iTerm2's normalized sRGB component dict.
fn hex_color(hex: &str, key: &str) -> Result<Value> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidValues {
            key: key.to_string(),
            reason: format!("'{hex}' is not a #RRGGBB color"),
        });
    }

    let channel = |range: std::ops::Range<usize>| -> f64 {
        i64::from_str_radix(&digits[range], 16).unwrap_or(0) as f64 / 255.0
    };

    Ok(json!({
        "Red Component": channel(0..2),
        "Green Component": channel(2..4),
        "Blue Component": channel(4..6),
        "Color Space": "sRGB",
    }))
}

fn apply_keyboard_maps(profile: &mut Map<String, Value>, maps: &Value) -> Result<()> {
    let entries = maps.as_array().ok_or_else(|| Error::InvalidValues {
        key: "keyboard_maps".to_string(),
        reason: format!("expected an array, got {}", value_kind(maps)),
    })?;

    let mut keymap = Map::new();
    for (i, item) in entries.iter().enumerate() {
        let map = item.as_object().ok_or_else(|| Error::InvalidValues {
            key: format!("keyboard_maps[{i}]"),
            reason: format!("expected an object, got {}", value_kind(item)),
        })?;
        let key = str_field(map, &format!("keyboard_maps[{i}]"), "key")?.ok_or_else(|| {
            Error::InvalidValues {
                key: format!("keyboard_maps[{i}].key"),
                reason: "missing".to_string(),
            }
        })?;

        let mut entry = Map::new();
        if let Some(action) = int_field(map, &format!("keyboard_maps[{i}]"), "action")? {
            entry.insert("Action".into(), json!(action));
        }
        if let Some(text) = str_field(map, &format!("keyboard_maps[{i}]"), "text")? {
            entry.insert("Text".into(), json!(text));
        }
        keymap.insert(key.to_string(), Value::Object(entry));
    }

    if !keymap.is_empty() {
        profile.insert("Keyboard Map".into(), Value::Object(keymap));
    }
    Ok(())
}

fn apply_tags(profile: &mut Map<String, Value>, tags: &Value) -> Result<()> {
    let items = tags.as_array().ok_or_else(|| Error::InvalidValues {
        key: "tags".to_string(),
        reason: format!("expected an array, got {}", value_kind(tags)),
    })?;

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let tag = item.as_str().ok_or_else(|| Error::InvalidValues {
            key: format!("tags[{i}]"),
            reason: format!("expected a string, got {}", value_kind(item)),
        })?;
        out.push(json!(tag));
    }

    if !out.is_empty() {
        profile.insert("Tags".into(), Value::Array(out));
    }
    Ok(())
}

// Typed field access with key-path errors.

fn section<'a>(values: &'a Map<String, Value>, key: &str) -> Result<Option<&'a Map<String, Value>>> {
    match values.get(key) {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(Error::InvalidValues {
            key: key.to_string(),
            reason: format!("expected an object, got {}", value_kind(other)),
        }),
    }
}

fn str_field<'a>(section: &'a Map<String, Value>, path: &str, key: &str) -> Result<Option<&'a str>> {
    match section.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(field_error(path, key, "a string", other)),
    }
}

fn bool_field(section: &Map<String, Value>, path: &str, key: &str) -> Result<Option<bool>> {
    match section.get(key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(field_error(path, key, "a boolean", other)),
    }
}

fn int_field(section: &Map<String, Value>, path: &str, key: &str) -> Result<Option<i64>> {
    match section.get(key) {
        None => Ok(None),
        Some(Value::Number(n)) if n.as_i64().is_some() => Ok(n.as_i64()),
        Some(other) => Err(field_error(path, key, "an integer", other)),
    }
}

fn num_field(section: &Map<String, Value>, path: &str, key: &str) -> Result<Option<f64>> {
    match section.get(key) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(field_error(path, key, "a number", other)),
    }
}

fn field_error(path: &str, key: &str, expected: &str, got: &Value) -> Error {
    Error::InvalidValues {
        key: format!("{path}.{key}"),
        reason: format!("expected {expected}, got {}", value_kind(got)),
    }
}
