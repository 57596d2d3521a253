//! Pre-flight checks on a record before it is stamped.
//!
//! Rendering never rejects a record for missing or odd values; it degrades quietly. These
//! checks surface what would degrade, as human-readable warnings, so an operator can fix the
//! record first. Only a record that is not a JSON object is an error.

use crate::checkbox::Selection;
use crate::dates;
use crate::layout::{FormKind, FormLayout, NameSlot};
use crate::names::{estimate_width, MIN_FONT_SIZE};
use crate::record::{
    self, ClearanceRecord, Fields, LeaveRecord, PersonName, RenderOptions,
};
use crate::FormError;
use serde_json::Value;

/// Collects warnings for `value` as a record of `kind` drawn against `layout`.
pub fn validate_record(
    kind: FormKind,
    value: &Value,
    layout: &FormLayout,
) -> Result<Vec<String>, FormError> {
    let fields = Fields::new(value)?;
    let options = RenderOptions::default();
    let mut warnings = Vec::new();

    for (label, aliases) in [
        ("filing date", record::DATE_FILED),
        ("start date", record::START_DATE),
        ("end date", record::END_DATE),
        ("effective date", record::EFFECTIVE_DATE),
    ] {
        let raw = fields.text(aliases);
        if !raw.is_empty() && dates::parse_date(&raw).is_none() {
            warnings.push(format!("{} '{}' is not a recognized date, printed as is", label, raw));
        }
    }

    match kind {
        FormKind::Leave => {
            let leave = LeaveRecord::from_value(value, &options)?;
            check_names(&leave.name, layout, &mut warnings);
            check_category(layout, "leave_type", "leave type", &leave.leave_type, &mut warnings);
            for (label, aliases) in [
                ("number of days", record::NUM_DAYS),
                ("balance before", record::BALANCE_BEFORE),
                ("balance after", record::BALANCE_AFTER),
                ("vacation balance", record::VACATION_BALANCE),
                ("sick balance", record::SICK_BALANCE),
            ] {
                if fields.has(aliases) && fields.number(aliases).is_none() {
                    warnings.push(format!(
                        "{} '{}' is not a number, treated as missing",
                        label,
                        fields.text(aliases)
                    ));
                }
            }
            if leave.num_days.is_none() {
                warnings.push("number of days is missing and cannot be derived from dates".into());
            }
        }
        FormKind::Clearance => {
            let clearance = ClearanceRecord::from_value(value, &options)?;
            check_names(&clearance.name, layout, &mut warnings);
            check_category(
                layout,
                "clearance_type",
                "clearance type",
                &clearance.clearance_type,
                &mut warnings,
            );
            if let Some(list) = layout.list("items") {
                if clearance.items.len() > list.max_rows {
                    warnings.push(format!(
                        "{} items listed, only {} rows fit; the rest are summarized",
                        clearance.items.len(),
                        list.max_rows
                    ));
                }
            }
        }
    }
    Ok(warnings)
}

fn check_names(name: &PersonName, layout: &FormLayout, warnings: &mut Vec<String>) {
    for (part, text) in [("last", &name.last), ("first", &name.first)] {
        if text.is_empty() {
            warnings.push(format!("{} name is missing", part));
        }
    }
    let slots = &layout.names;
    for (part, text, slot) in [
        ("last", &name.last, &slots.last),
        ("first", &name.first, &slots.first),
        ("middle", &name.middle, &slots.middle),
    ] {
        if overflows_at_floor(text, slot) {
            warnings.push(format!(
                "{} name '{}' does not fit its box even at {}pt",
                part, text, MIN_FONT_SIZE
            ));
        }
    }
}

fn overflows_at_floor(text: &str, slot: &NameSlot) -> bool {
    !text.is_empty() && estimate_width(text, MIN_FONT_SIZE) > slot.max_x - slot.x
}

fn check_category(
    layout: &FormLayout,
    catalog: &str,
    label: &str,
    input: &str,
    warnings: &mut Vec<String>,
) {
    let Some(rules) = layout.catalog(catalog) else {
        return;
    };
    if input.trim().is_empty() {
        warnings.push(format!("{} is missing, no box will be marked", label));
        return;
    }
    match rules.select(input) {
        Selection::Matched(_) => {}
        Selection::Fallback(rule) => warnings.push(format!(
            "{} '{}' is not on the form, '{}' will be marked",
            label, input, rule.label
        )),
        Selection::Unmatched => warnings.push(format!(
            "{} '{}' is not on the form, no box will be marked",
            label, input
        )),
    }
}
