//! Name-layout solver.
//!
//! The last, first and middle names sit side by side in one row of the template, each with its
//! own placement window. The solver picks one font size shared by all three so that every name
//! fits its `[x, max_x]` window, then nudges positions apart where neighbouring names would
//! still collide at that size.
//!
//! Widths are estimated with a constant-ratio monospace approximation
//! (`chars * 0.6 * size`) rather than real glyph metrics. Placement is best effort: a name that
//! cannot fit at the 7pt floor is drawn at 7pt and allowed to overflow, and overlap that
//! survives the resolution passes is accepted. The solver never fails.

use crate::layout::NameSlot;
use std::cmp::Ordering;

pub const DEFAULT_FONT_SIZE: f32 = 10.0;
pub const MIN_FONT_SIZE: f32 = 7.0;
pub const FONT_SIZE_STEP: f32 = 0.5;
pub const GLYPH_WIDTH_RATIO: f32 = 0.6;
pub const OVERLAP_PADDING: f32 = 2.0;
pub const MAX_RESOLUTION_PASSES: usize = 5;

/// A name part with its placement window.
#[derive(Debug, Clone, PartialEq)]
pub struct NameField {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub min_x: f32,
    pub max_x: f32,
}

impl NameField {
    pub fn new(text: &str, slot: &NameSlot) -> Self {
        NameField {
            text: text.trim().to_string(),
            x: slot.x,
            y: slot.y,
            min_x: slot.min_x,
            max_x: slot.max_x,
        }
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn overflows(&self, size: f32) -> bool {
        estimate_width(&self.text, size) > self.max_x - self.x
    }
}

/// Final draw position for one non-empty name.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedName {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Estimated rendered width of `text` at `size` points.
pub fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * GLYPH_WIDTH_RATIO * size
}

/// Largest size between the floor and the default at which every non-empty name fits.
pub fn fit_font_size(fields: &[NameField]) -> f32 {
    let mut size = DEFAULT_FONT_SIZE;
    while size > MIN_FONT_SIZE
        && fields
            .iter()
            .any(|field| !field.is_empty() && field.overflows(size))
    {
        size -= FONT_SIZE_STEP;
    }
    size.max(MIN_FONT_SIZE)
}

/// Shifts fields apart so adjacent names do not overlap at `size`.
///
/// Fields are taken left to right by start position. When the earlier field runs into the
/// later one, the later field moves right by the overlap plus padding, clamped so its text
/// still ends by `max_x`. If that clamped move would not clear the overlap, the later field
/// stays put and the earlier field moves left by the same amount instead, never before its
/// `min_x`. Returns whether any overlap is left.
pub fn resolve_overlaps(fields: &mut [NameField], size: f32) -> bool {
    let mut order: Vec<usize> = (0..fields.len())
        .filter(|&i| !fields[i].is_empty())
        .collect();

    for _ in 0..MAX_RESOLUTION_PASSES {
        order.sort_by(|&a, &b| {
            fields[a]
                .x
                .partial_cmp(&fields[b].x)
                .unwrap_or(Ordering::Equal)
        });

        let mut moved = false;
        for pair in order.windows(2) {
            let (earlier, later) = (pair[0], pair[1]);
            let overlap = overlap_between(&fields[earlier], &fields[later], size);
            if overlap <= 0.0 {
                continue;
            }
            let shift = overlap + OVERLAP_PADDING;

            let later_field = &fields[later];
            let right_limit =
                (later_field.max_x - estimate_width(&later_field.text, size)).max(later_field.x);
            let candidate = (later_field.x + shift).min(right_limit);
            let earlier_end = fields[earlier].x + estimate_width(&fields[earlier].text, size);

            if earlier_end <= candidate {
                fields[later].x = candidate;
                moved = true;
            } else {
                let earlier_field = &mut fields[earlier];
                let new_x = (earlier_field.x - shift)
                    .max(earlier_field.min_x)
                    .min(earlier_field.x);
                if new_x < earlier_field.x {
                    earlier_field.x = new_x;
                    moved = true;
                }
            }
        }

        if !moved {
            break;
        }
    }

    order.windows(2).any(|pair| {
        let (a, b) = if fields[pair[0]].x <= fields[pair[1]].x {
            (pair[0], pair[1])
        } else {
            (pair[1], pair[0])
        };
        overlap_between(&fields[a], &fields[b], size) > 0.0
    })
}

fn overlap_between(earlier: &NameField, later: &NameField, size: f32) -> f32 {
    earlier.x + estimate_width(&earlier.text, size) - later.x
}

/// Runs the full solver: font-size search, then overlap resolution.
///
/// Blank names are dropped from the result so they never produce a draw call.
pub fn solve(mut fields: Vec<NameField>) -> Vec<PlacedName> {
    let size = fit_font_size(&fields);
    if resolve_overlaps(&mut fields, size) {
        log::debug!("name fields still overlap at {}pt after resolution", size);
    }
    fields
        .into_iter()
        .filter(|field| !field.is_empty())
        .map(|field| PlacedName {
            text: field.text,
            x: field.x,
            y: field.y,
            size,
        })
        .collect()
}
