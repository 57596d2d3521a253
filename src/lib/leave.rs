//! Leave application form.

use crate::balance::{self, BalanceInputs, LeaveCategory};
use crate::checkbox::Selection;
use crate::diagnostics::Diagnostics;
use crate::layout::FormLayout;
use crate::record::{display_days, LeaveRecord};
use crate::render::FormWriter;
use crate::FormError;
use log::Level;

/// Draws `record` onto the leave template in the form's fixed order and returns the stamped
/// document.
pub fn render_leave(
    template: &[u8],
    record: &LeaveRecord,
    layout: &FormLayout,
    diagnostics: &dyn Diagnostics,
) -> Result<Vec<u8>, FormError> {
    let mut writer = FormWriter::new(template, layout, diagnostics)?;

    writer.field("office", &record.office);
    writer.names(&record.name);
    writer.field("date_filed", &record.date_filed);
    writer.field("rank", &record.rank);
    writer.field("salary", &record.salary);

    if let Selection::Fallback(others) = writer.select("leave_type", &record.leave_type) {
        writer.detail(others, &record.leave_type);
    }

    let location_anchor = record
        .location_kind
        .and_then(|kind| writer.mark_entry("vacation_location", kind.label()))
        .and_then(|rule| rule.detail);
    writer.paragraph("location", &record.location, location_anchor);

    let illness_anchor = record
        .illness_kind
        .and_then(|kind| writer.mark_entry("illness", kind.label()))
        .and_then(|rule| rule.detail);
    writer.paragraph("illness_details", &record.illness_details, illness_anchor);

    if let Some(days) = record.num_days {
        writer.field("working_days", &display_days(days));
    }
    writer.field("inclusive_dates", &record.inclusive_dates);

    // "Requested" is a substring of "Not Requested", so this box is picked by exact label.
    match record.commutation_requested {
        Some(true) => {
            writer.mark_entry("commutation", "Requested");
        }
        Some(false) => {
            writer.mark_entry("commutation", "Not Requested");
        }
        None => {}
    }

    writer.field("as_of_date", &record.date_filed);

    let category = LeaveCategory::from_leave_type(&record.leave_type);
    let figures = balance::compute(&BalanceInputs {
        category,
        num_days: record.num_days.unwrap_or(0.0),
        balance_before: record.balance_before,
        balance_after: record.balance_after,
        vacation_before: record.vacation_balance,
        sick_before: record.sick_balance,
    });
    diagnostics.event(
        Level::Debug,
        &format!("balance table in {:?} mode", category),
    );
    writer.balance(&figures);

    writer.field("certifying_officer", &record.certifying_officer);
    writer.field("recommending_officer", &record.recommending_officer);
    writer.field("approving_officer", &record.approving_officer);
    writer.field("footer", &record.footer);

    writer.finish()
}
