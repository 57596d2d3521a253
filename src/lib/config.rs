//! Layout descriptor loading.
//!
//! Each form kind ships with an embedded TOML descriptor (`layouts/leave.toml`,
//! `layouts/clearance.toml`) holding the coordinates measured on the current template. A user
//! descriptor can override any part of it without recompiling: the user document is merged
//! onto the defaults key by key (tables merge recursively, every other value, including
//! checkbox arrays, replaces the default wholesale), and the result is built into a
//! [`FormLayout`].
//!
//! # Descriptor structure
//!
//! - `[page]`: `width`, `height` of the template page
//! - `[text]`: default `size` for text and `mark_size` for check marks
//! - `[names]`: `last`, `first`, `middle` slots with `x`, `y`, `min_x`, `max_x`
//! - `[fields]`: one `{ x, y, size? }` entry per single-line field
//! - `[[checkbox.<catalog>]]`: ordered boxes with `label`, `x`, `y` and optional
//!   `detail_x`/`detail_y` where accompanying text goes
//! - `[paragraphs]`: `{ x, y, max_chars?, line_pitch?, size? }` per multi-line field
//! - `[lists]`: `{ x, y, pitch?, max_rows?, size? }` per row list
//! - `[balance]`: `vacation` and `sick` columns, each with `earned`, `deducted`, `after`
//!   as `[x, y]` pairs
//!
//! A single user file may carry overrides for both forms under `[leave]` and `[clearance]`
//! tables; a file with neither table applies as a whole to whichever form is being filled.
//!
//! ```toml
//! [leave.fields]
//! salary = { x = 472.0, y = 810.0 }
//!
//! [clearance.lists]
//! items = { x = 70.0, y = 520.0, max_rows = 8 }
//! ```

use crate::checkbox::{CheckboxCatalog, CheckboxRule};
use crate::layout::{
    BalanceColumnSlots, BalanceTableSlots, FieldCoordinate, FormKind, FormLayout, ListSlot,
    NameSlot, NameSlots, ParagraphSlot,
};
use crate::paragraph::{DEFAULT_LINE_PITCH, DEFAULT_MAX_CHARS};
use crate::FormError;
use lazy_static::lazy_static;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use toml::Value;

/// File name looked up in the working directory and the user configuration directory.
pub const LAYOUT_FILE_NAME: &str = "formstamprc.toml";

const DEFAULT_LIST_PITCH: f32 = 12.0;
const DEFAULT_LIST_ROWS: usize = 10;

const LEAVE_LAYOUT: &str = include_str!("../../layouts/leave.toml");
const CLEARANCE_LAYOUT: &str = include_str!("../../layouts/clearance.toml");

lazy_static! {
    static ref LEAVE_DEFAULTS: Option<Value> = toml::from_str(LEAVE_LAYOUT).ok();
    static ref CLEARANCE_DEFAULTS: Option<Value> = toml::from_str(CLEARANCE_LAYOUT).ok();
}

/// Where the layout descriptor should be loaded from.
#[derive(Debug, Clone)]
pub enum LayoutSource<'a> {
    /// Built-in coordinates only
    Default,
    /// User descriptor on disk, merged onto the defaults
    File(&'a str),
    /// User descriptor already in memory, merged onto the defaults
    Embedded(&'a str),
}

/// The embedded descriptor text for `kind`.
pub fn default_layout_toml(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Leave => LEAVE_LAYOUT,
        FormKind::Clearance => CLEARANCE_LAYOUT,
    }
}

fn default_value(kind: FormKind) -> Result<&'static Value, FormError> {
    let cached = match kind {
        FormKind::Leave => LEAVE_DEFAULTS.as_ref(),
        FormKind::Clearance => CLEARANCE_DEFAULTS.as_ref(),
    };
    cached.ok_or_else(|| {
        FormError::layout_error(format!("built-in {} layout failed to parse", kind))
    })
}

/// The built-in layout for `kind`.
pub fn default_layout(kind: FormKind) -> Result<FormLayout, FormError> {
    build_layout(kind, default_value(kind)?)
}

/// Parses a user descriptor and merges it onto the defaults for `kind`.
pub fn parse_layout_string(kind: FormKind, layout_str: &str) -> Result<FormLayout, FormError> {
    let user: Value = toml::from_str(layout_str)
        .map_err(|e| FormError::layout_error(format!("invalid layout TOML: {}", e)))?;

    let mut merged = default_value(kind)?.clone();
    if let Some(overrides) = overrides_for(kind, &user) {
        merge_values(&mut merged, overrides);
    }
    build_layout(kind, &merged)
}

/// Loads the layout for `kind` from `source`.
///
/// A descriptor file that cannot be read or parsed is reported with a warning and the built-in
/// layout is used instead; an embedded descriptor must be valid.
pub fn load_layout_from_source(
    kind: FormKind,
    source: LayoutSource,
) -> Result<FormLayout, FormError> {
    match source {
        LayoutSource::Default => default_layout(kind),
        LayoutSource::File(path) => {
            let layout_str = match fs::read_to_string(Path::new(path)) {
                Ok(s) => s,
                Err(e) => {
                    warn!("cannot read layout file {}: {}, using built-in layout", path, e);
                    return default_layout(kind);
                }
            };
            match parse_layout_string(kind, &layout_str) {
                Ok(layout) => {
                    debug!("loaded {} layout overrides from {}", kind, path);
                    Ok(layout)
                }
                Err(e) => {
                    warn!("ignoring layout file {}: {}", path, e);
                    default_layout(kind)
                }
            }
        }
        LayoutSource::Embedded(content) => parse_layout_string(kind, content),
    }
}

/// First existing descriptor among `./formstamprc.toml` and
/// `<config dir>/formstamp/formstamprc.toml`.
pub fn find_layout_file() -> Option<PathBuf> {
    let local = PathBuf::from(LAYOUT_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    let user = dirs::config_dir()?.join("formstamp").join(LAYOUT_FILE_NAME);
    user.exists().then_some(user)
}

/// The part of a user document that applies to `kind`.
fn overrides_for<'v>(kind: FormKind, user: &'v Value) -> Option<&'v Value> {
    let scoped = [FormKind::Leave, FormKind::Clearance]
        .iter()
        .any(|k| user.get(k.name()).map(Value::is_table).unwrap_or(false));
    if scoped {
        user.get(kind.name())
    } else {
        Some(user)
    }
}

/// Merges `overlay` into `base`: tables recursively, everything else replaced.
fn merge_values(base: &mut Value, overlay: &Value) {
    if let (Some(base_table), Some(overlay_table)) = (base.as_table_mut(), overlay.as_table()) {
        for (key, value) in overlay_table {
            let nested = value.is_table() && base_table.get(key).is_some_and(Value::is_table);
            if !nested {
                base_table.insert(key.clone(), value.clone());
            } else if let Some(existing) = base_table.get_mut(key) {
                merge_values(existing, value);
            }
        }
        return;
    }
    *base = overlay.clone();
}

/// Reads a number that may be written as an integer or a float.
fn number(value: Option<&Value>) -> Option<f32> {
    let value = value?;
    value
        .as_float()
        .or_else(|| value.as_integer().map(|i| i as f64))
        .map(|f| f as f32)
}

fn count(value: Option<&Value>) -> Option<usize> {
    value
        .and_then(Value::as_integer)
        .filter(|n| *n > 0)
        .map(|n| n as usize)
}

fn point(entry: &Value, what: &str) -> Result<(f32, f32), FormError> {
    match (number(entry.get("x")), number(entry.get("y"))) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(FormError::layout_error(format!(
            "{} needs numeric x and y",
            what
        ))),
    }
}

fn pair(value: Option<&Value>, what: &str) -> Result<(f32, f32), FormError> {
    let items = value.and_then(Value::as_array);
    match items.map(|a| a.as_slice()) {
        Some([x, y]) => match (number(Some(x)), number(Some(y))) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(FormError::layout_error(format!("{} must hold two numbers", what))),
        },
        _ => Err(FormError::layout_error(format!("{} must be an [x, y] pair", what))),
    }
}

fn parse_name_slot(names: Option<&Value>, part: &str, page_width: f32) -> Result<NameSlot, FormError> {
    let entry = names
        .and_then(|n| n.get(part))
        .ok_or_else(|| FormError::layout_error(format!("names.{} is missing", part)))?;
    let (x, y) = point(entry, &format!("names.{}", part))?;
    Ok(NameSlot {
        x,
        y,
        min_x: number(entry.get("min_x")).unwrap_or(x),
        max_x: number(entry.get("max_x")).unwrap_or(page_width),
    })
}

fn parse_fields(value: Option<&Value>) -> Result<BTreeMap<String, FieldCoordinate>, FormError> {
    let mut fields = BTreeMap::new();
    if let Some(table) = value.and_then(Value::as_table) {
        for (name, entry) in table {
            let (x, y) = point(entry, &format!("fields.{}", name))?;
            fields.insert(
                name.clone(),
                FieldCoordinate {
                    name: name.clone(),
                    x,
                    y,
                    size: number(entry.get("size")),
                },
            );
        }
    }
    Ok(fields)
}

fn parse_catalogs(value: Option<&Value>) -> Result<BTreeMap<String, CheckboxCatalog>, FormError> {
    let mut catalogs = BTreeMap::new();
    if let Some(table) = value.and_then(Value::as_table) {
        for (name, entries) in table {
            let entries = entries.as_array().ok_or_else(|| {
                FormError::layout_error(format!("checkbox.{} must be an array of boxes", name))
            })?;
            let mut rules = Vec::with_capacity(entries.len());
            for (index, entry) in entries.iter().enumerate() {
                let what = format!("checkbox.{}[{}]", name, index);
                let label = entry
                    .get("label")
                    .and_then(Value::as_str)
                    .ok_or_else(|| FormError::layout_error(format!("{} needs a label", what)))?;
                let (x, y) = point(entry, &what)?;
                let detail = match (number(entry.get("detail_x")), number(entry.get("detail_y"))) {
                    (Some(dx), Some(dy)) => Some((dx, dy)),
                    _ => None,
                };
                rules.push(CheckboxRule {
                    label: label.to_string(),
                    x,
                    y,
                    detail,
                });
            }
            catalogs.insert(name.clone(), CheckboxCatalog::new(rules));
        }
    }
    Ok(catalogs)
}

fn parse_paragraphs(value: Option<&Value>) -> Result<BTreeMap<String, ParagraphSlot>, FormError> {
    let mut paragraphs = BTreeMap::new();
    if let Some(table) = value.and_then(Value::as_table) {
        for (name, entry) in table {
            let (x, y) = point(entry, &format!("paragraphs.{}", name))?;
            paragraphs.insert(
                name.clone(),
                ParagraphSlot {
                    x,
                    y,
                    max_chars: count(entry.get("max_chars")).unwrap_or(DEFAULT_MAX_CHARS),
                    line_pitch: number(entry.get("line_pitch")).unwrap_or(DEFAULT_LINE_PITCH),
                    size: number(entry.get("size")),
                },
            );
        }
    }
    Ok(paragraphs)
}

fn parse_lists(value: Option<&Value>) -> Result<BTreeMap<String, ListSlot>, FormError> {
    let mut lists = BTreeMap::new();
    if let Some(table) = value.and_then(Value::as_table) {
        for (name, entry) in table {
            let (x, y) = point(entry, &format!("lists.{}", name))?;
            lists.insert(
                name.clone(),
                ListSlot {
                    x,
                    y,
                    pitch: number(entry.get("pitch")).unwrap_or(DEFAULT_LIST_PITCH),
                    max_rows: count(entry.get("max_rows")).unwrap_or(DEFAULT_LIST_ROWS),
                    size: number(entry.get("size")),
                },
            );
        }
    }
    Ok(lists)
}

fn parse_balance_column(
    balance: &Value,
    column: &str,
) -> Result<BalanceColumnSlots, FormError> {
    let slots = balance
        .get(column)
        .ok_or_else(|| FormError::layout_error(format!("balance.{} is missing", column)))?;
    Ok(BalanceColumnSlots {
        earned: pair(slots.get("earned"), &format!("balance.{}.earned", column))?,
        deducted: pair(slots.get("deducted"), &format!("balance.{}.deducted", column))?,
        after: pair(slots.get("after"), &format!("balance.{}.after", column))?,
    })
}

fn parse_balance(value: Option<&Value>) -> Result<Option<BalanceTableSlots>, FormError> {
    let Some(balance) = value else {
        return Ok(None);
    };
    Ok(Some(BalanceTableSlots {
        size: number(balance.get("size")),
        vacation: parse_balance_column(balance, "vacation")?,
        sick: parse_balance_column(balance, "sick")?,
    }))
}

/// Builds a layout from a merged descriptor document.
fn build_layout(kind: FormKind, config: &Value) -> Result<FormLayout, FormError> {
    let page = config.get("page");
    let page_width = number(page.and_then(|p| p.get("width"))).unwrap_or(612.0);
    let page_height = number(page.and_then(|p| p.get("height"))).unwrap_or(936.0);
    let text = config.get("text");

    let names = config.get("names");
    Ok(FormLayout {
        kind,
        page_width,
        page_height,
        text_size: number(text.and_then(|t| t.get("size"))).unwrap_or(9.0),
        mark_size: number(text.and_then(|t| t.get("mark_size"))).unwrap_or(10.0),
        names: NameSlots {
            last: parse_name_slot(names, "last", page_width)?,
            first: parse_name_slot(names, "first", page_width)?,
            middle: parse_name_slot(names, "middle", page_width)?,
        },
        fields: parse_fields(config.get("fields"))?,
        catalogs: parse_catalogs(config.get("checkbox"))?,
        paragraphs: parse_paragraphs(config.get("paragraphs"))?,
        lists: parse_lists(config.get("lists"))?,
        balance: parse_balance(config.get("balance"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layouts_build() {
        let leave = default_layout(FormKind::Leave).unwrap();
        assert_eq!(leave.kind, FormKind::Leave);
        assert_eq!(leave.page_height, 936.0);
        assert_eq!(leave.names.last.max_x, 330.0);
        assert!(leave.balance.is_some());
        let leave_types = leave.catalog("leave_type").unwrap();
        assert_eq!(leave_types.rules()[0].label, "Vacation Leave");
        assert_eq!(leave_types.rules().last().unwrap().detail, Some((62.0, 518.0)));

        let clearance = default_layout(FormKind::Clearance).unwrap();
        assert!(clearance.balance.is_none());
        assert_eq!(clearance.list("items").unwrap().max_rows, 12);
        assert_eq!(clearance.paragraph("purpose").unwrap().max_chars, 80);
    }

    #[test]
    fn test_default_paragraphs_stay_on_the_page() {
        for kind in [FormKind::Leave, FormKind::Clearance] {
            let layout = default_layout(kind).unwrap();
            for (name, paragraph) in &layout.paragraphs {
                let size = paragraph.size.unwrap_or(layout.text_size);
                let line = crate::names::estimate_width(&"M".repeat(paragraph.max_chars), size);
                assert!(
                    paragraph.x + line <= layout.page_width,
                    "{} paragraph '{}' runs to {}",
                    kind,
                    name,
                    paragraph.x + line
                );
            }
        }
    }

    #[test]
    fn test_number_accepts_integers() {
        let value: Value = toml::from_str("a = 12\nb = 12.5\nc = \"12\"").unwrap();
        assert_eq!(number(value.get("a")), Some(12.0));
        assert_eq!(number(value.get("b")), Some(12.5));
        assert_eq!(number(value.get("c")), None);
        assert_eq!(number(None), None);
    }

    #[test]
    fn test_override_merges_single_key() {
        let layout = parse_layout_string(
            FormKind::Leave,
            r#"
            [fields]
            salary = { x = 480, y = 800 }
            "#,
        )
        .unwrap();
        let salary = layout.field("salary").unwrap();
        assert_eq!((salary.x, salary.y), (480.0, 800.0));
        // untouched entries keep their defaults
        assert_eq!(layout.field("rank").unwrap().x, 262.0);
        assert_eq!(layout.names.first.x, 342.0);
    }

    #[test]
    fn test_scoped_overrides_apply_to_their_form_only() {
        let content = r#"
            [leave.text]
            size = 8

            [clearance.lists]
            items = { x = 72, y = 500, max_rows = 4 }
        "#;
        let leave = parse_layout_string(FormKind::Leave, content).unwrap();
        assert_eq!(leave.text_size, 8.0);
        assert!(leave.lists.is_empty());

        let clearance = parse_layout_string(FormKind::Clearance, content).unwrap();
        assert_eq!(clearance.text_size, 9.0);
        let items = clearance.list("items").unwrap();
        assert_eq!((items.max_rows, items.pitch), (4, DEFAULT_LIST_PITCH));
    }

    #[test]
    fn test_checkbox_array_replaces_default() {
        let layout = parse_layout_string(
            FormKind::Clearance,
            r#"
            [[checkbox.clearance_type]]
            label = "Retirement"
            x = 10
            y = 20
            "#,
        )
        .unwrap();
        assert_eq!(layout.catalog("clearance_type").unwrap().rules().len(), 1);
    }

    #[test]
    fn test_malformed_entries_are_layout_errors() {
        let err = parse_layout_string(FormKind::Leave, "[fields]\nbadge = { x = 1 }").unwrap_err();
        assert!(matches!(err, FormError::LayoutError { .. }));

        let err = parse_layout_string(
            FormKind::Leave,
            "[balance]\nvacation = { earned = [1], deducted = [1, 2], after = [1, 2] }",
        )
        .unwrap_err();
        assert!(matches!(err, FormError::LayoutError { .. }));

        let err = parse_layout_string(FormKind::Leave, "not = [valid").unwrap_err();
        assert!(matches!(err, FormError::LayoutError { .. }));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let layout =
            load_layout_from_source(FormKind::Leave, LayoutSource::File("no/such/layout.toml"))
                .unwrap();
        assert_eq!(layout.text_size, 9.0);
    }

    #[test]
    fn test_embedded_source_must_be_valid() {
        let err = load_layout_from_source(FormKind::Clearance, LayoutSource::Embedded("[[[")).unwrap_err();
        assert!(matches!(err, FormError::LayoutError { .. }));
    }

    #[test]
    fn test_default_layout_toml_round_trips() {
        for kind in [FormKind::Leave, FormKind::Clearance] {
            let text = default_layout_toml(kind);
            let layout = parse_layout_string(kind, text).unwrap();
            assert_eq!(layout.all_points(), default_layout(kind).unwrap().all_points());
        }
    }
}
