//! Normalization of loosely-typed records into canonical form records.
//!
//! Records come straight from the console's database rows and form state, so the same value
//! may be spelled `illness_details` in one place and `illnessDetails` in another, numbers may
//! arrive as strings, and most fields are optional. Everything is resolved here, once, at the
//! boundary: the renderers only ever see [`LeaveRecord`] and [`ClearanceRecord`] with plain
//! strings (empty when absent) and typed numbers.

use crate::dates;
use crate::FormError;
use serde_json::{Map, Value};

/// Caller-supplied rendering options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Yearly (batch) generation: the generation date becomes the filing date.
    pub is_yearly: bool,
    /// ISO-8601 date or timestamp of the generation run.
    pub generation_date: Option<String>,
    pub admin_username: String,
    /// Stamp a "Generated by" line in the footer slot. Off by default.
    pub include_footer: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonName {
    pub last: String,
    pub first: String,
    pub middle: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    WithinPhilippines,
    Abroad,
}

impl LocationKind {
    /// Catalog label of the matching checkbox.
    pub fn label(&self) -> &'static str {
        match self {
            LocationKind::WithinPhilippines => "Within the Philippines",
            LocationKind::Abroad => "Abroad",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase().replace(['_', '-'], " ");
        if value.contains("abroad") || value.contains("overseas") {
            Some(LocationKind::Abroad)
        } else if value.contains("philippines") || value == "local" || value == "within" {
            Some(LocationKind::WithinPhilippines)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllnessKind {
    InHospital,
    OutPatient,
}

impl IllnessKind {
    pub fn label(&self) -> &'static str {
        match self {
            IllnessKind::InHospital => "In Hospital",
            IllnessKind::OutPatient => "Out Patient",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase().replace(['_', '-', ' '], "");
        if value.contains("hospital") {
            Some(IllnessKind::InHospital)
        } else if value.contains("outpatient") {
            Some(IllnessKind::OutPatient)
        } else {
            None
        }
    }
}

/// Canonical leave application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaveRecord {
    pub name: PersonName,
    pub office: String,
    pub rank: String,
    pub salary: String,
    pub leave_type: String,
    pub date_filed: String,
    pub location_kind: Option<LocationKind>,
    pub location: String,
    pub illness_kind: Option<IllnessKind>,
    pub illness_details: String,
    pub num_days: Option<f64>,
    pub inclusive_dates: String,
    pub commutation_requested: Option<bool>,
    pub balance_before: Option<f64>,
    pub balance_after: Option<f64>,
    pub vacation_balance: f64,
    pub sick_balance: f64,
    pub certifying_officer: String,
    pub recommending_officer: String,
    pub approving_officer: String,
    pub footer: String,
}

/// One accountable inventory item listed on a clearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryLine {
    pub name: String,
    pub barcode: String,
    pub status: String,
}

impl InventoryLine {
    /// Row text as printed on the form, e.g. `SCBA Set (BFP-00123) - Returned`.
    pub fn display(&self) -> String {
        let mut row = self.name.clone();
        if !self.barcode.is_empty() {
            if row.is_empty() {
                row = self.barcode.clone();
            } else {
                row = format!("{} ({})", row, self.barcode);
            }
        }
        if !self.status.is_empty() && !row.is_empty() {
            row = format!("{} - {}", row, self.status);
        }
        row
    }
}

/// Canonical clearance request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClearanceRecord {
    pub name: PersonName,
    pub rank: String,
    pub station: String,
    pub designation: String,
    pub clearance_type: String,
    pub date_filed: String,
    pub effective_date: String,
    pub purpose: String,
    pub items: Vec<InventoryLine>,
    pub supply_officer: String,
    pub finance_officer: String,
    pub approving_officer: String,
    pub footer: String,
}

/// Read-only view over a JSON object that resolves aliased keys.
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(value: &'a Value) -> Result<Self, FormError> {
        match value.as_object() {
            Some(map) => Ok(Fields { map }),
            None => Err(FormError::record_error(format!(
                "record must be a JSON object, got {}",
                json_kind(value)
            ))),
        }
    }

    /// First alias holding a non-blank value, as trimmed text.
    pub(crate) fn text(&self, aliases: &[&str]) -> String {
        aliases
            .iter()
            .filter_map(|key| self.map.get(*key))
            .map(value_text)
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }

    /// First alias holding a number or a numeric string.
    pub(crate) fn number(&self, aliases: &[&str]) -> Option<f64> {
        aliases
            .iter()
            .filter_map(|key| self.map.get(*key))
            .find_map(value_number)
    }

    /// Whether any alias is present with a non-blank value.
    pub(crate) fn has(&self, aliases: &[&str]) -> bool {
        !self.text(aliases).is_empty()
    }

    pub(crate) fn flag(&self, aliases: &[&str]) -> Option<bool> {
        aliases
            .iter()
            .filter_map(|key| self.map.get(*key))
            .find_map(|value| match value {
                Value::Bool(b) => Some(*b),
                Value::String(s) => parse_flag(s),
                Value::Number(n) => n.as_i64().map(|n| n != 0),
                _ => None,
            })
    }

    pub(crate) fn array(&self, aliases: &[&str]) -> Option<&'a Vec<Value>> {
        aliases
            .iter()
            .filter_map(|key| self.map.get(*key))
            .find_map(|value| value.as_array())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        _ => String::new(),
    }
}

fn value_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}

fn is_non_finite(text: &str) -> bool {
    text.replace(',', "")
        .parse::<f64>()
        .is_ok_and(|f| !f.is_finite())
}

fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim().to_lowercase().replace(['_', '-'], " ");
    match value.as_str() {
        "true" | "yes" | "y" | "1" | "requested" => Some(true),
        "false" | "no" | "n" | "0" | "not requested" | "none" => Some(false),
        _ => None,
    }
}

/// Drops a `"Prefix: "` qualifier, keeping only the value after the first `": "`.
pub fn strip_location_prefix(location: &str) -> String {
    match location.split_once(": ") {
        Some((_, rest)) => rest.trim().to_string(),
        None => location.trim().to_string(),
    }
}

/// Whole numbers print without decimals; fractions keep up to two places.
pub fn display_days(days: f64) -> String {
    if days.fract() == 0.0 {
        format!("{}", days as i64)
    } else {
        let text = format!("{:.2}", days);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Money with thousands separators and two decimals: `32,870.00`.
pub fn display_amount(value: f64) -> String {
    let text = format!("{:.2}", value.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

const LAST_NAME: &[&str] = &["last_name", "lastName", "lastname", "surname"];
const FIRST_NAME: &[&str] = &["first_name", "firstName", "firstname", "given_name"];
const MIDDLE_NAME: &[&str] = &["middle_name", "middleName", "middlename"];
const FULL_NAME: &[&str] = &["full_name", "fullName", "employee_name", "employeeName", "name"];
pub(crate) const DATE_FILED: &[&str] = &[
    "date_filed",
    "dateFiled",
    "filing_date",
    "filingDate",
    "date_of_filing",
    "created_at",
    "createdAt",
];
pub(crate) const START_DATE: &[&str] = &["start_date", "startDate", "date_from", "dateFrom"];
pub(crate) const END_DATE: &[&str] = &["end_date", "endDate", "date_to", "dateTo"];
pub(crate) const SALARY: &[&str] = &["salary", "monthly_salary", "monthlySalary"];
pub(crate) const NUM_DAYS: &[&str] = &["num_days", "numDays", "number_of_days", "numberOfDays", "days"];
pub(crate) const BALANCE_BEFORE: &[&str] = &["balance_before", "balanceBefore"];
pub(crate) const BALANCE_AFTER: &[&str] = &["balance_after", "balanceAfter"];
pub(crate) const VACATION_BALANCE: &[&str] = &[
    "vacation_balance_before",
    "vacationBalanceBefore",
    "vacation_balance",
    "vacationBalance",
];
pub(crate) const SICK_BALANCE: &[&str] = &[
    "sick_balance_before",
    "sickBalanceBefore",
    "sick_balance",
    "sickBalance",
];
pub(crate) const EFFECTIVE_DATE: &[&str] = &[
    "effective_date",
    "effectiveDate",
    "effectivity_date",
    "effectivityDate",
];
pub(crate) const LEAVE_TYPE: &[&str] = &["leave_type", "leaveType", "type"];
pub(crate) const CLEARANCE_TYPE: &[&str] = &["clearance_type", "clearanceType", "type"];
const RANK: &[&str] = &["rank", "position"];

fn person_name(fields: &Fields) -> PersonName {
    let mut name = PersonName {
        last: fields.text(LAST_NAME),
        first: fields.text(FIRST_NAME),
        middle: fields.text(MIDDLE_NAME),
    };
    if name.last.is_empty() && name.first.is_empty() {
        let full = fields.text(FULL_NAME);
        if !full.is_empty() {
            let split = split_full_name(&full);
            name.last = split.last;
            name.first = split.first;
            if name.middle.is_empty() {
                name.middle = split.middle;
            }
        }
    }
    name
}

/// Splits `"LAST, FIRST MIDDLE"` or `"FIRST MIDDLE LAST"`.
pub fn split_full_name(full: &str) -> PersonName {
    if let Some((last, rest)) = full.split_once(',') {
        let mut parts: Vec<&str> = rest.split_whitespace().collect();
        let middle = if parts.len() > 1 {
            parts.pop().unwrap_or_default().to_string()
        } else {
            String::new()
        };
        return PersonName {
            last: last.trim().to_string(),
            first: parts.join(" "),
            middle,
        };
    }

    let parts: Vec<&str> = full.split_whitespace().collect();
    match parts.len() {
        0 => PersonName::default(),
        1 => PersonName {
            first: parts[0].to_string(),
            ..PersonName::default()
        },
        2 => PersonName {
            first: parts[0].to_string(),
            last: parts[1].to_string(),
            middle: String::new(),
        },
        n => PersonName {
            first: parts[0].to_string(),
            middle: parts[1..n - 1].join(" "),
            last: parts[n - 1].to_string(),
        },
    }
}

/// The filing date shown on the form.
fn filing_date(fields: &Fields, options: &RenderOptions) -> String {
    if options.is_yearly {
        if let Some(generation) = options
            .generation_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            return dates::display_date(generation);
        }
    }
    dates::display_date(&fields.text(DATE_FILED))
}

fn footer_line(options: &RenderOptions, filing_date: &str) -> String {
    let admin = options.admin_username.trim();
    if !options.include_footer || admin.is_empty() {
        return String::new();
    }
    let date = options
        .generation_date
        .as_deref()
        .map(dates::display_date)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| filing_date.to_string());
    if date.is_empty() {
        format!("Generated by {}", admin)
    } else {
        format!("Generated by {} on {}", admin, date)
    }
}

impl LeaveRecord {
    pub fn from_value(value: &Value, options: &RenderOptions) -> Result<Self, FormError> {
        let fields = Fields::new(value)?;

        let start = fields.text(START_DATE);
        let end = fields.text(END_DATE);
        let num_days = fields
            .number(NUM_DAYS)
            .or_else(|| dates::inclusive_days(&start, &end));
        let mut inclusive_dates = fields.text(&["inclusive_dates", "inclusiveDates"]);
        if inclusive_dates.is_empty() {
            inclusive_dates = dates::display_range(&start, &end);
        }

        let raw_location = fields.text(&["location", "vacation_location", "vacationLocation"]);
        let location_kind = LocationKind::parse(&fields.text(&[
            "vacation_location_type",
            "vacationLocationType",
            "location_type",
            "locationType",
        ]))
        .or_else(|| {
            raw_location
                .split_once(": ")
                .and_then(|(prefix, _)| LocationKind::parse(prefix))
        });

        let illness_kind = IllnessKind::parse(&fields.text(&[
            "illness_type",
            "illnessType",
            "sick_leave_type",
            "sickLeaveType",
        ]));

        let salary_text = fields.text(SALARY);
        let salary = match fields.number(SALARY) {
            Some(amount) => display_amount(amount),
            None if is_non_finite(&salary_text) => String::new(),
            None => salary_text,
        };

        let date_filed = filing_date(&fields, options);
        let footer = footer_line(options, &date_filed);

        Ok(LeaveRecord {
            name: person_name(&fields),
            office: fields.text(&["office", "station", "department", "unit"]),
            rank: fields.text(RANK),
            salary,
            leave_type: fields.text(LEAVE_TYPE),
            date_filed,
            location_kind,
            location: strip_location_prefix(&raw_location),
            illness_kind,
            illness_details: fields.text(&[
                "illness_details",
                "illnessDetails",
                "illness",
                "sick_details",
            ]),
            num_days,
            inclusive_dates,
            commutation_requested: fields.flag(&[
                "commutation",
                "commutation_requested",
                "commutationRequested",
            ]),
            balance_before: fields.number(BALANCE_BEFORE),
            balance_after: fields.number(BALANCE_AFTER),
            vacation_balance: fields.number(VACATION_BALANCE).unwrap_or(0.0),
            sick_balance: fields.number(SICK_BALANCE).unwrap_or(0.0),
            certifying_officer: fields.text(&[
                "certifying_officer",
                "certifyingOfficer",
                "hr_officer",
                "hrOfficer",
            ]),
            recommending_officer: fields.text(&[
                "recommending_officer",
                "recommendingOfficer",
                "immediate_supervisor",
                "immediateSupervisor",
            ]),
            approving_officer: fields.text(&[
                "approving_officer",
                "approvingOfficer",
                "approving_official",
                "approvingOfficial",
            ]),
            footer,
        })
    }
}

impl ClearanceRecord {
    pub fn from_value(value: &Value, options: &RenderOptions) -> Result<Self, FormError> {
        let fields = Fields::new(value)?;

        let items = fields
            .array(&["items", "inventory", "inventory_items", "inventoryItems", "accountable_items"])
            .map(|items| items.iter().filter_map(inventory_line).collect())
            .unwrap_or_default();

        let date_filed = filing_date(&fields, options);
        let footer = footer_line(options, &date_filed);

        Ok(ClearanceRecord {
            name: person_name(&fields),
            rank: fields.text(RANK),
            station: fields.text(&["station", "unit", "office", "assignment"]),
            designation: fields.text(&["designation", "position_title", "positionTitle"]),
            clearance_type: fields.text(CLEARANCE_TYPE),
            date_filed,
            effective_date: dates::display_date(&fields.text(EFFECTIVE_DATE)),
            purpose: fields.text(&["purpose", "remarks", "reason"]),
            items,
            supply_officer: fields.text(&["supply_officer", "supplyOfficer"]),
            finance_officer: fields.text(&[
                "finance_officer",
                "financeOfficer",
                "accountant",
            ]),
            approving_officer: fields.text(&[
                "approving_officer",
                "approvingOfficer",
                "station_commander",
                "stationCommander",
            ]),
            footer,
        })
    }
}

fn inventory_line(value: &Value) -> Option<InventoryLine> {
    if let Some(text) = value.as_str() {
        let text = text.trim();
        return (!text.is_empty()).then(|| InventoryLine {
            name: text.to_string(),
            ..InventoryLine::default()
        });
    }
    let fields = Fields::new(value).ok()?;
    let line = InventoryLine {
        name: fields.text(&["name", "item_name", "itemName", "equipment_name", "description"]),
        barcode: fields.text(&["barcode", "serial_number", "serialNumber", "code"]),
        status: fields.text(&["status", "condition"]),
    };
    if line.name.is_empty() && line.barcode.is_empty() {
        None
    } else {
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dual_naming_conventions() {
        let snake = json!({"illness_details": "fever", "last_name": "Reyes"});
        let camel = json!({"illnessDetails": "fever", "lastName": "Reyes"});
        let options = RenderOptions::default();
        let a = LeaveRecord::from_value(&snake, &options).unwrap();
        let b = LeaveRecord::from_value(&camel, &options).unwrap();
        assert_eq!(a.illness_details, "fever");
        assert_eq!(a, b);
    }

    #[test]
    fn test_blank_alias_falls_through_to_next() {
        let value = json!({"illness_details": "  ", "illnessDetails": "cough"});
        let record = LeaveRecord::from_value(&value, &RenderOptions::default()).unwrap();
        assert_eq!(record.illness_details, "cough");
    }

    #[test]
    fn test_non_object_record_is_an_error() {
        let err = LeaveRecord::from_value(&json!([1, 2]), &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, FormError::RecordError { .. }));
    }

    #[test]
    fn test_numbers_from_strings_and_numbers() {
        let value = json!({
            "numDays": "2.5",
            "vacation_balance": 15,
            "sickBalance": "10.25",
            "rank": 3,
        });
        let record = LeaveRecord::from_value(&value, &RenderOptions::default()).unwrap();
        assert_eq!(record.num_days, Some(2.5));
        assert_eq!(record.vacation_balance, 15.0);
        assert_eq!(record.sick_balance, 10.25);
        assert_eq!(record.rank, "3");
    }

    #[test]
    fn test_non_finite_numbers_count_as_missing() {
        let value = json!({
            "vacation_balance": "NaN",
            "num_days": "inf",
            "salary": "-infinity",
        });
        let record = LeaveRecord::from_value(&value, &RenderOptions::default()).unwrap();
        assert_eq!(record.num_days, None);
        assert_eq!(record.vacation_balance, 0.0);
        assert_eq!(record.salary, "");
    }

    #[test]
    fn test_days_and_range_from_dates() {
        let value = json!({"start_date": "2024-03-05", "end_date": "2024-03-07"});
        let record = LeaveRecord::from_value(&value, &RenderOptions::default()).unwrap();
        assert_eq!(record.num_days, Some(3.0));
        assert_eq!(record.inclusive_dates, "March 5-7, 2024");
    }

    #[test]
    fn test_vacation_abroad_location() {
        let value = json!({
            "vacationLocationType": "abroad",
            "location": "Philippines: CEBU",
        });
        let record = LeaveRecord::from_value(&value, &RenderOptions::default()).unwrap();
        assert_eq!(record.location_kind, Some(LocationKind::Abroad));
        assert_eq!(record.location, "CEBU");
    }

    #[test]
    fn test_location_kind_inferred_from_prefix() {
        let value = json!({"location": "Abroad: Singapore"});
        let record = LeaveRecord::from_value(&value, &RenderOptions::default()).unwrap();
        assert_eq!(record.location_kind, Some(LocationKind::Abroad));
        assert_eq!(record.location, "Singapore");
    }

    #[test]
    fn test_illness_kind_variants() {
        for (raw, expected) in [
            ("in_hospital", IllnessKind::InHospital),
            ("In Hospital", IllnessKind::InHospital),
            ("out_patient", IllnessKind::OutPatient),
            ("Outpatient", IllnessKind::OutPatient),
        ] {
            assert_eq!(IllnessKind::parse(raw), Some(expected), "{}", raw);
        }
        assert_eq!(IllnessKind::parse("unknown"), None);
    }

    #[test]
    fn test_filing_date_uses_generation_date_when_yearly() {
        let value = json!({"date_filed": "2024-01-10"});
        let yearly = RenderOptions {
            is_yearly: true,
            generation_date: Some("2024-12-31T00:00:00Z".to_string()),
            ..RenderOptions::default()
        };
        let record = LeaveRecord::from_value(&value, &yearly).unwrap();
        assert_eq!(record.date_filed, "December 31, 2024");

        let regular = RenderOptions {
            generation_date: Some("2024-12-31".to_string()),
            ..RenderOptions::default()
        };
        let record = LeaveRecord::from_value(&value, &regular).unwrap();
        assert_eq!(record.date_filed, "January 10, 2024");
    }

    #[test]
    fn test_footer_only_when_enabled() {
        let value = json!({"date_filed": "2024-01-10"});
        let mut options = RenderOptions {
            admin_username: "admin01".to_string(),
            ..RenderOptions::default()
        };
        let record = LeaveRecord::from_value(&value, &options).unwrap();
        assert!(record.footer.is_empty());

        options.include_footer = true;
        let record = LeaveRecord::from_value(&value, &options).unwrap();
        assert_eq!(record.footer, "Generated by admin01 on January 10, 2024");
    }

    #[test]
    fn test_split_full_name() {
        let name = split_full_name("DELA CRUZ, JUAN MIGUEL SANTOS");
        assert_eq!(name.last, "DELA CRUZ");
        assert_eq!(name.first, "JUAN MIGUEL");
        assert_eq!(name.middle, "SANTOS");

        let name = split_full_name("Maria Reyes");
        assert_eq!((name.first.as_str(), name.last.as_str()), ("Maria", "Reyes"));

        let name = split_full_name("Ana Luz Bautista");
        assert_eq!(name.middle, "Luz");
    }

    #[test]
    fn test_full_name_fallback() {
        let value = json!({"fullName": "Santos, Pedro Garcia"});
        let record = LeaveRecord::from_value(&value, &RenderOptions::default()).unwrap();
        assert_eq!(record.name.last, "Santos");
        assert_eq!(record.name.first, "Pedro");
        assert_eq!(record.name.middle, "Garcia");
    }

    #[test]
    fn test_commutation_flag() {
        let options = RenderOptions::default();
        let requested = LeaveRecord::from_value(&json!({"commutation": "Requested"}), &options);
        assert_eq!(requested.unwrap().commutation_requested, Some(true));
        let not = LeaveRecord::from_value(&json!({"commutation_requested": false}), &options);
        assert_eq!(not.unwrap().commutation_requested, Some(false));
        let absent = LeaveRecord::from_value(&json!({}), &options);
        assert_eq!(absent.unwrap().commutation_requested, None);
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(display_days(3.0), "3");
        assert_eq!(display_days(2.5), "2.5");
        assert_eq!(display_amount(32870.0), "32,870.00");
        assert_eq!(display_amount(950.5), "950.50");
        assert_eq!(display_amount(1234567.891), "1,234,567.89");
    }

    #[test]
    fn test_clearance_items() {
        let value = json!({
            "clearanceType": "Retirement",
            "items": [
                {"item_name": "SCBA Set", "barcode": "BFP-00123", "status": "Returned"},
                {"name": "", "barcode": ""},
                "Fire Axe",
            ],
            "effective_date": "2024-06-30",
        });
        let record = ClearanceRecord::from_value(&value, &RenderOptions::default()).unwrap();
        assert_eq!(record.items.len(), 2);
        assert_eq!(record.items[0].display(), "SCBA Set (BFP-00123) - Returned");
        assert_eq!(record.items[1].display(), "Fire Axe");
        assert_eq!(record.effective_date, "June 30, 2024");
    }
}
