//! The formstamp library fills the fire station's fixed-layout PDF forms: the personnel leave
//! application and the property clearance.
//!
//! A fill takes the blank template's bytes, a loosely-typed JSON record as the console stores
//! it, and a few render options. It draws every value at the coordinates measured for that
//! template and returns the stamped PDF as bytes. Missing values are skipped, overlong values
//! are drawn anyway; only an unusable template, a record that is not a JSON object, or a
//! serialization failure is an error.
//!
//! Basic usage:
//! ```rust
//! use formstamp::RenderOptions;
//! use serde_json::json;
//! use std::error::Error;
//!
//! fn example() -> Result<(), Box<dyn Error>> {
//!     let template = std::fs::read("templates/leave_form.pdf")?;
//!     let record = json!({
//!         "lastName": "REYES",
//!         "firstName": "ANA",
//!         "leaveType": "Sick Leave",
//!         "illnessType": "out_patient",
//!         "illnessDetails": "migraine",
//!         "numDays": 1,
//!     });
//!     let pdf = formstamp::fill_leave_form(&template, &record, &RenderOptions::default())?;
//!     std::fs::write("leave-reyes.pdf", pdf)?;
//!     Ok(())
//! }
//! ```
//!
//! Coordinates come from layout descriptors embedded in the crate. When a template is
//! re-issued, the coordinates can be corrected from a `formstamprc.toml` without rebuilding:
//! ```toml
//! [leave.fields]
//! salary = { x = 472.0, y = 810.0 }
//! ```
//!
//! ## Fill pipeline
//! ```text
//! +-------------+     +----------------+     +-----------------+
//! | JSON record | --> | Normalization  | --> | Canonical       |
//! | (aliases,   |     | (names, dates, |     | LeaveRecord /   |
//! |  strings)   |     |  sub-types)    |     | ClearanceRecord |
//! +-------------+     +----------------+     +-----------------+
//!                                                     |
//! +-------------+     +----------------+     +-----------------+
//! | Stamped PDF | <-- | Overlay stream | <-- | Fixed draw      |
//! | bytes       |     | + Helvetica    |     | sequence over   |
//! |             |     |   resource     |     | the layout      |
//! +-------------+     +----------------+     +-----------------+
//! ```

pub mod balance;
pub mod checkbox;
pub mod clearance;
pub mod config;
pub mod dates;
pub mod diagnostics;
pub mod layout;
pub mod leave;
pub mod names;
pub mod paragraph;
pub mod pdf;
pub mod record;
pub mod render;
pub mod template;
pub mod validation;

pub use diagnostics::{CollectedDiagnostics, Diagnostics, LogDiagnostics};
pub use layout::{FormKind, FormLayout};
pub use record::{ClearanceRecord, LeaveRecord, RenderOptions};

use config::LayoutSource;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Errors that can occur while filling a form.
#[derive(Debug)]
pub enum FormError {
    /// The template could not be obtained or is not a usable PDF
    TemplateError {
        message: String,
        source_name: Option<String>,
        suggestion: String,
    },
    /// The record cannot be interpreted at all
    RecordError { message: String, suggestion: String },
    /// A layout descriptor is malformed
    LayoutError { message: String, suggestion: String },
    /// Drawing or serializing the stamped document failed
    PdfError {
        message: String,
        path: Option<String>,
        suggestion: Option<String>,
    },
    /// Reading or writing a file failed
    IoError {
        message: String,
        path: String,
        suggestion: String,
    },
}

impl Error for FormError {}
impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormError::TemplateError {
                message,
                source_name,
                suggestion,
            } => {
                write!(f, "❌ Template Error: {}", message)?;
                if let Some(source) = source_name {
                    write!(f, "\n📁 Source: {}", source)?;
                }
                write!(f, "\n💡 Suggestion: {}", suggestion)?;
                Ok(())
            }
            FormError::RecordError {
                message,
                suggestion,
            } => {
                write!(f, "❌ Record Error: {}", message)?;
                write!(f, "\n💡 Suggestion: {}", suggestion)?;
                Ok(())
            }
            FormError::LayoutError {
                message,
                suggestion,
            } => {
                write!(f, "❌ Layout Error: {}", message)?;
                write!(f, "\n💡 Suggestion: {}", suggestion)?;
                Ok(())
            }
            FormError::PdfError {
                message,
                path,
                suggestion,
            } => {
                write!(f, "❌ PDF Error: {}", message)?;
                if let Some(p) = path {
                    write!(f, "\n📁 Path: {}", p)?;
                }
                if let Some(hint) = suggestion {
                    write!(f, "\n💡 Suggestion: {}", hint)?;
                }
                Ok(())
            }
            FormError::IoError {
                message,
                path,
                suggestion,
            } => {
                write!(f, "❌ File Error: {}", message)?;
                write!(f, "\n📁 Path: {}", path)?;
                write!(f, "\n💡 Suggestion: {}", suggestion)?;
                Ok(())
            }
        }
    }
}

impl FormError {
    pub fn template_error(message: impl Into<String>) -> Self {
        FormError::TemplateError {
            message: message.into(),
            source_name: None,
            suggestion: "Check that the template is the blank one-page form PDF".to_string(),
        }
    }

    pub fn record_error(message: impl Into<String>) -> Self {
        FormError::RecordError {
            message: message.into(),
            suggestion: "Pass the record as a JSON object of field names to values".to_string(),
        }
    }

    pub fn layout_error(message: impl Into<String>) -> Self {
        FormError::LayoutError {
            message: message.into(),
            suggestion: "Compare the layout file with --get-default-layout output".to_string(),
        }
    }

    pub fn pdf_error(message: impl Into<String>) -> Self {
        FormError::PdfError {
            message: message.into(),
            path: None,
            suggestion: Some(
                "The template may use PDF features this tool cannot edit; try re-saving it"
                    .to_string(),
            ),
        }
    }

    /// Variant name, as reported to diagnostic sinks.
    pub fn kind(&self) -> &'static str {
        match self {
            FormError::TemplateError { .. } => "TemplateError",
            FormError::RecordError { .. } => "RecordError",
            FormError::LayoutError { .. } => "LayoutError",
            FormError::PdfError { .. } => "PdfError",
            FormError::IoError { .. } => "IoError",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FormError::TemplateError { message, .. }
            | FormError::RecordError { message, .. }
            | FormError::LayoutError { message, .. }
            | FormError::PdfError { message, .. }
            | FormError::IoError { message, .. } => message,
        }
    }
}

/// Fills `template` with `record` using the given layout, reporting through `diagnostics`.
///
/// Any failure is reported to the sink before it is returned.
pub fn fill_with_layout(
    kind: FormKind,
    template: &[u8],
    record: &Value,
    options: &RenderOptions,
    layout: &FormLayout,
    diagnostics: &dyn Diagnostics,
) -> Result<Vec<u8>, FormError> {
    let result = match kind {
        FormKind::Leave => LeaveRecord::from_value(record, options)
            .and_then(|canonical| leave::render_leave(template, &canonical, layout, diagnostics)),
        FormKind::Clearance => {
            ClearanceRecord::from_value(record, options).and_then(|canonical| {
                clearance::render_clearance(template, &canonical, layout, diagnostics)
            })
        }
    };
    result.map_err(|e| {
        diagnostics.failure(&e);
        e
    })
}

/// Fills a form of `kind` with the built-in layout, logging through `log`.
pub fn fill_form(
    kind: FormKind,
    template: &[u8],
    record: &Value,
    options: &RenderOptions,
) -> Result<Vec<u8>, FormError> {
    fill_into_bytes(kind, template, record, options, LayoutSource::Default)
}

/// Fills the leave application template.
pub fn fill_leave_form(
    template: &[u8],
    record: &Value,
    options: &RenderOptions,
) -> Result<Vec<u8>, FormError> {
    fill_form(FormKind::Leave, template, record, options)
}

/// Fills the clearance template.
pub fn fill_clearance_form(
    template: &[u8],
    record: &Value,
    options: &RenderOptions,
) -> Result<Vec<u8>, FormError> {
    fill_form(FormKind::Clearance, template, record, options)
}

/// Fills a form of `kind` with the layout from `layout` and returns the PDF bytes.
///
/// # Example
/// ```rust
/// use formstamp::config::LayoutSource;
/// use formstamp::{FormKind, RenderOptions};
/// use serde_json::json;
///
/// fn example(template: &[u8]) -> Result<Vec<u8>, formstamp::FormError> {
///     const OVERRIDES: &str = r#"
///         [fields]
///         station = { x = 302.0, y = 764.0 }
///     "#;
///     let record = json!({"full_name": "DELA CRUZ, JUAN SANTOS", "clearance_type": "Transfer"});
///     formstamp::fill_into_bytes(
///         FormKind::Clearance,
///         template,
///         &record,
///         &RenderOptions::default(),
///         LayoutSource::Embedded(OVERRIDES),
///     )
/// }
/// ```
pub fn fill_into_bytes(
    kind: FormKind,
    template: &[u8],
    record: &Value,
    options: &RenderOptions,
    layout: LayoutSource,
) -> Result<Vec<u8>, FormError> {
    let layout = config::load_layout_from_source(kind, layout)?;
    fill_with_layout(kind, template, record, options, &layout, &LogDiagnostics)
}

/// Fills a form and writes the result to `path`.
pub fn fill_into_file(
    kind: FormKind,
    template: &[u8],
    record: &Value,
    options: &RenderOptions,
    path: &str,
    layout: LayoutSource,
) -> Result<(), FormError> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(FormError::IoError {
                message: "Output directory does not exist".to_string(),
                path: parent.display().to_string(),
                suggestion: format!("Create the directory first: mkdir -p {}", parent.display()),
            });
        }
    }

    let bytes = fill_into_bytes(kind, template, record, options, layout)?;
    std::fs::write(path, bytes).map_err(|e| FormError::IoError {
        message: format!("Failed to write output: {}", e),
        path: path.to_string(),
        suggestion: if e.kind() == std::io::ErrorKind::PermissionDenied {
            "Check that you have write permissions for this location".to_string()
        } else {
            "Try a different output path or check available disk space".to_string()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{blank_template, read_stamped_text, CHECK_MARK};
    use log::Level;
    use serde_json::json;

    fn template() -> Vec<u8> {
        blank_template(612.0, 936.0).unwrap()
    }

    #[test]
    fn test_fill_is_idempotent() {
        let record = json!({
            "lastName": "REYES",
            "firstName": "ANA",
            "leaveType": "Vacation Leave",
            "vacationLocationType": "within_philippines",
            "location": "Philippines: Baguio City",
            "start_date": "2024-03-05",
            "end_date": "2024-03-07",
            "vacation_balance": 15,
        });
        let options = RenderOptions {
            is_yearly: true,
            generation_date: Some("2024-12-31".to_string()),
            admin_username: "admin".to_string(),
            include_footer: true,
        };
        let template = template();
        let first = fill_leave_form(&template, &record, &options).unwrap();
        let second = fill_leave_form(&template, &record, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sick_leave_passes_vacation_through() {
        let record = json!({
            "leave_type": "Sick Leave",
            "num_days": 3,
            "balance_before": 10.5,
            "balance_after": 7.5,
            "vacation_balance": 12.25,
            "sick_balance": 10.5,
        });
        let output = fill_leave_form(&template(), &record, &RenderOptions::default()).unwrap();
        let drawn = read_stamped_text(&output).unwrap();
        let cell = |x: f32, y: f32| {
            drawn
                .iter()
                .find(|d| d.x == x && d.y == y)
                .map(|d| d.text.clone())
                .unwrap()
        };
        assert_eq!(cell(176.0, 350.0), "12.25");
        assert_eq!(cell(176.0, 334.0), "0.00");
        assert_eq!(cell(176.0, 318.0), "12.25");
        assert_eq!(cell(250.0, 350.0), "10.50");
        assert_eq!(cell(250.0, 334.0), "3.00");
        assert_eq!(cell(250.0, 318.0), "7.50");
    }

    #[test]
    fn test_unknown_leave_type_marks_others() {
        let record = json!({"leaveType": "Bereavement"});
        let output = fill_leave_form(&template(), &record, &RenderOptions::default()).unwrap();
        let drawn = read_stamped_text(&output).unwrap();
        assert!(drawn
            .iter()
            .any(|d| d.text == CHECK_MARK && d.x == 48.0 && d.y == 532.0));
    }

    #[test]
    fn test_vacation_abroad_strips_location_prefix() {
        let record = json!({
            "leaveType": "Vacation Leave",
            "vacationLocationType": "abroad",
            "location": "Philippines: CEBU",
        });
        let output = fill_leave_form(&template(), &record, &RenderOptions::default()).unwrap();
        let drawn = read_stamped_text(&output).unwrap();
        assert!(drawn
            .iter()
            .any(|d| d.text == CHECK_MARK && d.x == 330.0 && d.y == 712.0));
        assert!(drawn.iter().any(|d| d.text == "CEBU"));
        assert!(!drawn.iter().any(|d| d.text.contains("Philippines")));
    }

    #[test]
    fn test_failures_reach_the_sink() {
        let layout = config::default_layout(FormKind::Leave).unwrap();
        let sink = CollectedDiagnostics::new();
        let err = fill_with_layout(
            FormKind::Leave,
            b"%PDF-1.4 truncated",
            &json!({}),
            &RenderOptions::default(),
            &layout,
            &sink,
        )
        .unwrap_err();
        assert!(matches!(err, FormError::TemplateError { .. }));
        let errors = sink.messages_at(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("[TemplateError]"));
    }

    #[test]
    fn test_non_object_record() {
        let result = fill_clearance_form(&template(), &json!(null), &RenderOptions::default());
        assert!(matches!(result, Err(FormError::RecordError { .. })));
    }

    #[test]
    fn test_invalid_output_path() {
        let result = fill_into_file(
            FormKind::Clearance,
            &template(),
            &json!({}),
            &RenderOptions::default(),
            "/nonexistent/directory/output.pdf",
            LayoutSource::Default,
        );
        assert!(matches!(result, Err(FormError::IoError { .. })));
    }

    #[test]
    fn test_error_display_format() {
        let err = FormError::layout_error("names.last is missing");
        let text = err.to_string();
        assert!(text.starts_with("❌ Layout Error: names.last is missing"));
        assert!(text.contains("💡 Suggestion:"));
        assert_eq!(err.kind(), "LayoutError");
    }
}
