use formstamp::names::MIN_FONT_SIZE;
use formstamp::pdf::{blank_template, read_stamped_text, DrawnText, CHECK_MARK};
use formstamp::{fill_clearance_form, fill_leave_form, RenderOptions};
use lopdf::Document;
use serde_json::{json, Value};

fn template() -> Vec<u8> {
    blank_template(612.0, 936.0).unwrap()
}

fn stamp_leave(record: Value, options: &RenderOptions) -> Vec<DrawnText> {
    let output = fill_leave_form(&template(), &record, options).unwrap();
    read_stamped_text(&output).unwrap()
}

#[test]
fn test_output_is_a_single_page_pdf() {
    let output = fill_leave_form(
        &template(),
        &json!({"lastName": "REYES"}),
        &RenderOptions::default(),
    )
    .unwrap();
    assert!(output.starts_with(b"%PDF-"));
    let doc = Document::load_mem(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_blank_officers_leave_signature_region_empty() {
    let drawn = stamp_leave(
        json!({
            "lastName": "REYES",
            "firstName": "ANA",
            "leaveType": "Vacation Leave",
            "certifying_officer": "",
            "recommending_officer": "   ",
        }),
        &RenderOptions::default(),
    );
    assert!(!drawn.iter().any(|d| d.y == 268.0 || d.y == 118.0));
}

#[test]
fn test_officers_are_stamped_when_present() {
    let drawn = stamp_leave(
        json!({
            "certifying_officer": "SFO1 Bautista",
            "approving_officer": "SUPT Villanueva",
        }),
        &RenderOptions::default(),
    );
    let certifying = drawn.iter().find(|d| d.text == "SFO1 Bautista").unwrap();
    assert_eq!((certifying.x, certifying.y), (96.0, 268.0));
    let approving = drawn.iter().find(|d| d.text == "SUPT Villanueva").unwrap();
    assert_eq!((approving.x, approving.y), (236.0, 118.0));
}

#[test]
fn test_long_illness_details_wrap_down_the_column() {
    let details = "patient admitted for observation after smoke inhalation during the \
                   warehouse fire response, with follow-up pulmonary tests scheduled and \
                   a recommended rest period before returning to active duty on the line";
    let drawn = stamp_leave(
        json!({
            "leaveType": "Sick Leave",
            "illnessType": "in_hospital",
            "illnessDetails": details,
        }),
        &RenderOptions::default(),
    );
    let lines: Vec<&DrawnText> = drawn.iter().filter(|d| d.x == 448.0).collect();
    assert!(lines.len() >= 3, "{:?}", lines);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line.y, 682.0 - 15.0 * i as f32);
        assert!(line.text.chars().count() <= 29, "{}", line.text);
        assert_eq!(line.size, 8.0);
    }
    let rejoined: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(
        rejoined.join(" "),
        details.split_whitespace().collect::<Vec<_>>().join(" ")
    );
}

#[test]
fn test_long_last_name_shrinks_within_its_box() {
    let short = stamp_leave(
        json!({"lastName": "CRUZ", "firstName": "ANA"}),
        &RenderOptions::default(),
    );
    let long = stamp_leave(
        json!({"lastName": "VILLAFRANCA-DE LOS SANTOS", "firstName": "ANA"}),
        &RenderOptions::default(),
    );
    let short_last = short.iter().find(|d| d.text == "CRUZ").unwrap();
    let long_last = long
        .iter()
        .find(|d| d.text == "VILLAFRANCA-DE LOS SANTOS")
        .unwrap();
    assert!(long_last.size < short_last.size);
    assert!(long_last.size >= MIN_FONT_SIZE);
    assert!(long_last.x >= 205.0);
}

#[test]
fn test_yearly_generation_replaces_filing_date() {
    let options = RenderOptions {
        is_yearly: true,
        generation_date: Some("2024-12-31T08:00:00Z".to_string()),
        admin_username: "admin".to_string(),
        include_footer: true,
    };
    let drawn = stamp_leave(json!({"date_filed": "2024-03-01"}), &options);
    let filed = drawn.iter().find(|d| d.x == 108.0 && d.y == 812.0).unwrap();
    let footer = drawn.iter().find(|d| d.y == 30.0).unwrap();
    assert_eq!(filed.text, "December 31, 2024");
    assert_eq!(footer.text, "Generated by admin on December 31, 2024");
    assert!(!drawn.iter().any(|d| d.text == "March 1, 2024"));
}

#[test]
fn test_non_finite_numbers_are_left_blank() {
    let drawn = stamp_leave(
        json!({
            "lastName": "REYES",
            "leaveType": "Vacation Leave",
            "vacation_balance": "NaN",
            "num_days": "inf",
            "salary": "nan",
        }),
        &RenderOptions::default(),
    );
    for d in &drawn {
        let lower = d.text.to_lowercase();
        assert!(!lower.contains("nan") && !lower.contains("inf"), "{:?}", d);
    }
    assert!(drawn.iter().any(|d| d.text == "REYES"));
}

#[test]
fn test_footer_is_off_by_default() {
    let options = RenderOptions {
        admin_username: "admin".to_string(),
        ..RenderOptions::default()
    };
    let drawn = stamp_leave(json!({"lastName": "REYES"}), &options);
    assert!(!drawn.iter().any(|d| d.text.starts_with("Generated by")));
}

#[test]
fn test_clearance_inventory_rows() {
    let items: Vec<Value> = (1..=15)
        .map(|i| json!({"name": format!("Hose Nozzle {}", i), "status": "Returned"}))
        .collect();
    let output = fill_clearance_form(
        &template(),
        &json!({
            "lastName": "DELA CRUZ",
            "firstName": "JUAN",
            "clearanceType": "Resignation",
            "items": items,
        }),
        &RenderOptions::default(),
    )
    .unwrap();
    let drawn = read_stamped_text(&output).unwrap();
    let rows: Vec<&DrawnText> = drawn.iter().filter(|d| d.x == 70.0 && d.y <= 520.0).collect();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0].text, "Hose Nozzle 1 - Returned");
    assert_eq!(rows[0].y, 520.0);
    assert_eq!(rows[11].y, 520.0 - 14.0 * 11.0);
    assert_eq!(rows[11].text, "... and 4 more");
    assert_eq!(drawn.iter().filter(|d| d.text == CHECK_MARK).count(), 1);
}

#[test]
fn test_stamping_preserves_existing_page_content() {
    let template = template();
    let before = Document::load_mem(&template).unwrap();
    let page_id = *before.get_pages().values().next().unwrap();
    let original_streams = before.get_page_contents(page_id).len();

    let output = fill_leave_form(
        &template,
        &json!({"lastName": "REYES"}),
        &RenderOptions::default(),
    )
    .unwrap();
    let after = Document::load_mem(&output).unwrap();
    let page_id = *after.get_pages().values().next().unwrap();
    assert!(after.get_page_contents(page_id).len() > original_streams);
}
