//! Layout descriptors for the fixed-coordinate form templates.
//!
//! A [`FormLayout`] is the in-memory form of one `layouts/*.toml` descriptor. It maps every
//! semantic field of a template (a name part, a date, an officer's name, a checkbox) to the
//! point where its value is drawn. Coordinates are PDF points with the origin at the bottom-left
//! corner of the page and are only meaningful for the template version they were measured on;
//! nothing here is derived from the template's own content.
//!
//! Layouts are built by [`crate::config`], which merges user overrides onto the embedded
//! defaults, so every lookup on a built layout is total: a missing entry means the template
//! simply has no such field and the caller skips the draw.

use crate::checkbox::CheckboxCatalog;
use std::collections::BTreeMap;
use std::fmt;

/// The two templates this crate knows how to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Leave,
    Clearance,
}

impl FormKind {
    /// Short lowercase name used for layout tables and CLI values.
    pub fn name(&self) -> &'static str {
        match self {
            FormKind::Leave => "leave",
            FormKind::Clearance => "clearance",
        }
    }

    pub fn parse(value: &str) -> Option<FormKind> {
        match value.trim().to_lowercase().as_str() {
            "leave" => Some(FormKind::Leave),
            "clearance" => Some(FormKind::Clearance),
            _ => None,
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed point where one text value is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCoordinate {
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// Font size override; `None` uses the layout's text size.
    pub size: Option<f32>,
}

/// Placement window for one of the three name parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameSlot {
    pub x: f32,
    pub y: f32,
    pub min_x: f32,
    pub max_x: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameSlots {
    pub last: NameSlot,
    pub first: NameSlot,
    pub middle: NameSlot,
}

/// Anchor and wrapping parameters for a multi-line text field.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphSlot {
    pub x: f32,
    pub y: f32,
    pub max_chars: usize,
    pub line_pitch: f32,
    pub size: Option<f32>,
}

/// A block of fixed-pitch rows, one entry per row.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSlot {
    pub x: f32,
    pub y: f32,
    pub pitch: f32,
    pub max_rows: usize,
    pub size: Option<f32>,
}

/// The three row positions of one balance-table column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceColumnSlots {
    pub earned: (f32, f32),
    pub deducted: (f32, f32),
    pub after: (f32, f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceTableSlots {
    pub size: Option<f32>,
    pub vacation: BalanceColumnSlots,
    pub sick: BalanceColumnSlots,
}

/// Complete coordinate table for one template.
#[derive(Debug, Clone)]
pub struct FormLayout {
    pub kind: FormKind,
    pub page_width: f32,
    pub page_height: f32,
    pub text_size: f32,
    pub mark_size: f32,
    pub names: NameSlots,
    pub fields: BTreeMap<String, FieldCoordinate>,
    pub catalogs: BTreeMap<String, CheckboxCatalog>,
    pub paragraphs: BTreeMap<String, ParagraphSlot>,
    pub lists: BTreeMap<String, ListSlot>,
    pub balance: Option<BalanceTableSlots>,
}

impl FormLayout {
    pub fn field(&self, name: &str) -> Option<&FieldCoordinate> {
        self.fields.get(name)
    }

    pub fn catalog(&self, name: &str) -> Option<&CheckboxCatalog> {
        self.catalogs.get(name)
    }

    pub fn paragraph(&self, name: &str) -> Option<&ParagraphSlot> {
        self.paragraphs.get(name)
    }

    pub fn list(&self, name: &str) -> Option<&ListSlot> {
        self.lists.get(name)
    }

    /// Font size for a field, falling back to the layout default.
    pub fn size_of(&self, field: &FieldCoordinate) -> f32 {
        field.size.unwrap_or(self.text_size)
    }

    /// Every named point in the layout, in a stable order. Used for calibration sheets.
    pub fn all_points(&self) -> Vec<(String, f32, f32)> {
        let mut points = Vec::new();
        for (label, slot) in [
            ("names.last", &self.names.last),
            ("names.first", &self.names.first),
            ("names.middle", &self.names.middle),
        ] {
            points.push((label.to_string(), slot.x, slot.y));
        }
        for field in self.fields.values() {
            points.push((format!("fields.{}", field.name), field.x, field.y));
        }
        for (name, catalog) in &self.catalogs {
            for rule in catalog.rules() {
                points.push((format!("{}: {}", name, rule.label), rule.x, rule.y));
            }
        }
        for (name, slot) in &self.paragraphs {
            points.push((format!("paragraphs.{}", name), slot.x, slot.y));
        }
        for (name, slot) in &self.lists {
            points.push((format!("lists.{}", name), slot.x, slot.y));
        }
        if let Some(balance) = &self.balance {
            for (column, slots) in [("vacation", &balance.vacation), ("sick", &balance.sick)] {
                points.push((format!("balance.{}.earned", column), slots.earned.0, slots.earned.1));
                points.push((
                    format!("balance.{}.deducted", column),
                    slots.deducted.0,
                    slots.deducted.1,
                ));
                points.push((format!("balance.{}.after", column), slots.after.0, slots.after.1));
            }
        }
        points
    }
}
