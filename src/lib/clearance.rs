//! Clearance form.

use crate::checkbox::Selection;
use crate::diagnostics::Diagnostics;
use crate::layout::FormLayout;
use crate::record::ClearanceRecord;
use crate::render::FormWriter;
use crate::FormError;

/// Draws `record` onto the clearance template in the form's fixed order and returns the
/// stamped document.
pub fn render_clearance(
    template: &[u8],
    record: &ClearanceRecord,
    layout: &FormLayout,
    diagnostics: &dyn Diagnostics,
) -> Result<Vec<u8>, FormError> {
    let mut writer = FormWriter::new(template, layout, diagnostics)?;

    writer.names(&record.name);
    writer.field("rank", &record.rank);
    writer.field("station", &record.station);
    writer.field("designation", &record.designation);
    writer.field("date_filed", &record.date_filed);
    writer.field("effective_date", &record.effective_date);

    if let Selection::Fallback(others) = writer.select("clearance_type", &record.clearance_type) {
        writer.detail(others, &record.clearance_type);
    }

    writer.paragraph("purpose", &record.purpose, None);

    let rows: Vec<String> = record.items.iter().map(|item| item.display()).collect();
    writer.list("items", &rows);

    writer.field("supply_officer", &record.supply_officer);
    writer.field("finance_officer", &record.finance_officer);
    writer.field("approving_officer", &record.approving_officer);
    writer.field("footer", &record.footer);

    writer.finish()
}
