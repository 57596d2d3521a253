//! Drawing primitives shared by the form assemblers.
//!
//! [`FormWriter`] couples a [`Stamp`] with the layout it is drawn against and the diagnostic
//! sink of the current render. Every method resolves a semantic slot name to coordinates and
//! draws, silently skipping blank values; slots the layout does not define are reported at
//! debug level and skipped as well.

use crate::balance::BalanceFigures;
use crate::checkbox::{CheckboxRule, Selection};
use crate::diagnostics::Diagnostics;
use crate::layout::{BalanceColumnSlots, FormLayout};
use crate::names::{self, NameField};
use crate::paragraph::layout_paragraph;
use crate::pdf::Stamp;
use crate::record::PersonName;
use crate::FormError;
use log::Level;

/// Font size of the labels printed on calibration sheets.
const CALIBRATION_SIZE: f32 = 5.0;

pub struct FormWriter<'a> {
    stamp: Stamp,
    layout: &'a FormLayout,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> FormWriter<'a> {
    pub fn new(
        template: &[u8],
        layout: &'a FormLayout,
        diagnostics: &'a dyn Diagnostics,
    ) -> Result<Self, FormError> {
        Ok(FormWriter {
            stamp: Stamp::open(template)?,
            layout,
            diagnostics,
        })
    }

    pub fn layout(&self) -> &'a FormLayout {
        self.layout
    }

    fn note(&self, message: String) {
        self.diagnostics.event(Level::Debug, &message);
    }

    /// Draws a single-line field at its layout coordinate.
    pub fn field(&mut self, name: &str, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let layout = self.layout;
        match layout.field(name) {
            Some(coordinate) => {
                self.stamp
                    .draw_text(text, coordinate.x, coordinate.y, layout.size_of(coordinate));
            }
            None => self.note(format!("layout has no '{}' field, value skipped", name)),
        }
    }

    /// Places the three name parts with the shared-size solver.
    pub fn names(&mut self, name: &PersonName) {
        let slots = &self.layout.names;
        let placed = names::solve(vec![
            NameField::new(&name.last, &slots.last),
            NameField::new(&name.first, &slots.first),
            NameField::new(&name.middle, &slots.middle),
        ]);
        if let Some(first) = placed.first() {
            self.note(format!("names drawn at {}pt", first.size));
        }
        for name in placed {
            self.stamp.draw_text(&name.text, name.x, name.y, name.size);
        }
    }

    pub fn mark(&mut self, rule: &CheckboxRule) {
        self.stamp.draw_mark(rule.x, rule.y, self.layout.mark_size);
    }

    /// Fuzzy selection in `catalog`, marking the chosen box. Returns the selection so the caller
    /// can write accompanying text.
    pub fn select(&mut self, catalog: &str, input: &str) -> Selection<'a> {
        let layout = self.layout;
        let Some(rules) = layout.catalog(catalog) else {
            if !input.trim().is_empty() {
                self.note(format!("layout has no '{}' checkboxes, mark skipped", catalog));
            }
            return Selection::Unmatched;
        };
        let selection = rules.select(input);
        match selection {
            Selection::Matched(rule) => self.mark(rule),
            Selection::Fallback(rule) => {
                self.note(format!(
                    "{} '{}' matched no box, marking '{}'",
                    catalog,
                    input.trim(),
                    rule.label
                ));
                self.mark(rule);
            }
            Selection::Unmatched if !input.trim().is_empty() => {
                self.note(format!("{} '{}' matched no box", catalog, input.trim()))
            }
            Selection::Unmatched => {}
        }
        selection
    }

    /// Exact-label lookup in `catalog`, marking the box when found.
    pub fn mark_entry(&mut self, catalog: &str, label: &str) -> Option<&'a CheckboxRule> {
        let layout = self.layout;
        let rule = layout.catalog(catalog).and_then(|c| c.entry(label));
        match rule {
            Some(rule) => self.mark(rule),
            None => self.note(format!("layout has no '{}' box in '{}'", label, catalog)),
        }
        rule
    }

    /// Writes `text` at a checkbox's detail point, when it has one.
    pub fn detail(&mut self, rule: &CheckboxRule, text: &str) {
        match rule.detail {
            Some((x, y)) => {
                self.stamp.draw_text(text, x, y, self.layout.text_size);
            }
            None if !text.trim().is_empty() => {
                self.note(format!("'{}' box has no detail point, text skipped", rule.label))
            }
            None => {}
        }
    }

    /// Wraps `text` into the named paragraph slot. `anchor` moves the first line elsewhere while
    /// keeping the slot's wrapping parameters.
    pub fn paragraph(&mut self, slot: &str, text: &str, anchor: Option<(f32, f32)>) {
        if text.trim().is_empty() {
            return;
        }
        let layout = self.layout;
        let Some(paragraph) = layout.paragraph(slot) else {
            self.note(format!("layout has no '{}' paragraph, text skipped", slot));
            return;
        };
        let (x, y) = anchor.unwrap_or((paragraph.x, paragraph.y));
        let size = paragraph.size.unwrap_or(layout.text_size);
        let lines = layout_paragraph(text, x, y, paragraph.max_chars, paragraph.line_pitch);
        self.note(format!("{} wrapped into {} lines", slot, lines.len()));
        for line in lines {
            self.stamp.draw_text(&line.text, line.x, line.y, size);
        }
    }

    /// Draws one row per entry down the named list slot. When the rows exceed the slot, the
    /// last visible row summarizes how many were left out.
    pub fn list(&mut self, slot: &str, rows: &[String]) {
        let rows: Vec<&str> = rows
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .collect();
        if rows.is_empty() {
            return;
        }
        let layout = self.layout;
        let Some(list) = layout.list(slot) else {
            self.note(format!("layout has no '{}' list, {} rows skipped", slot, rows.len()));
            return;
        };
        let size = list.size.unwrap_or(layout.text_size);

        let mut visible: Vec<String> = rows.iter().map(|r| r.to_string()).collect();
        if visible.len() > list.max_rows {
            let shown = list.max_rows.saturating_sub(1);
            let hidden = visible.len() - shown;
            visible.truncate(shown);
            visible.push(format!("... and {} more", hidden));
            self.note(format!("{} truncated, {} rows folded", slot, hidden));
        }
        for (index, row) in visible.iter().enumerate() {
            self.stamp
                .draw_text(row, list.x, list.y - index as f32 * list.pitch, size);
        }
    }

    /// Fills both columns of the balance table.
    pub fn balance(&mut self, figures: &BalanceFigures) {
        let layout = self.layout;
        let Some(table) = &layout.balance else {
            self.note("layout has no balance table".to_string());
            return;
        };
        let size = table.size.unwrap_or(layout.text_size);
        for (slots, column) in [(&table.vacation, &figures.vacation), (&table.sick, &figures.sick)] {
            let cells = column.formatted();
            for ((x, y), text) in column_points(slots).into_iter().zip(cells.iter()) {
                self.stamp.draw_text(text, x, y, size);
            }
        }
    }

    pub fn draw_count(&self) -> usize {
        self.stamp.draws().len()
    }

    pub fn finish(self) -> Result<Vec<u8>, FormError> {
        self.note(format!("serializing {} draws", self.stamp.draws().len()));
        self.stamp.finish()
    }
}

fn column_points(slots: &BalanceColumnSlots) -> [(f32, f32); 3] {
    [slots.earned, slots.deducted, slots.after]
}

/// Stamps the name of every layout point at its own coordinate, for checking a layout against
/// a template by eye.
pub fn calibration_sheet(template: &[u8], layout: &FormLayout) -> Result<Vec<u8>, FormError> {
    let mut stamp = Stamp::open(template)?;
    for (label, x, y) in layout.all_points() {
        stamp.draw_text(&format!("+ {}", label), x, y, CALIBRATION_SIZE);
    }
    stamp.finish()
}
