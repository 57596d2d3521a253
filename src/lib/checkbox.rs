//! Checkbox selection against an ordered catalog of labels.
//!
//! Templates list their categories (leave types, clearance reasons, ...) as a column of boxes.
//! Records name the category in free text, so selection is fuzzy: after trimming and
//! lowercasing both sides, a rule matches when either string contains the other. Rules are
//! evaluated in catalog order and the first match wins, which makes the order of the catalog
//! the tie-break between overlapping labels ("Sick Leave" vs "Leave"). Inputs that match
//! nothing fall back to the catalog's "Others" entry when it has one.

/// One box on the template.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxRule {
    pub label: String,
    pub x: f32,
    pub y: f32,
    /// Where accompanying free text for this box is written, if the template has room for it.
    pub detail: Option<(f32, f32)>,
}

impl CheckboxRule {
    fn normalized_label(&self) -> String {
        normalize(&self.label)
    }

    /// Fuzzy predicate: either side contains the other.
    pub fn matches(&self, input: &str) -> bool {
        let label = self.normalized_label();
        let input = normalize(input);
        if label.is_empty() || input.is_empty() {
            return false;
        }
        label.contains(&input) || input.contains(&label)
    }

    pub fn is_fallback(&self) -> bool {
        self.normalized_label() == FALLBACK_LABEL
    }
}

const FALLBACK_LABEL: &str = "others";

/// Outcome of a catalog lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'a> {
    /// A rule matched the input directly.
    Matched(&'a CheckboxRule),
    /// Nothing matched; the catalog's "Others" entry was chosen.
    Fallback(&'a CheckboxRule),
    /// Nothing matched and there is no fallback, or the input was blank.
    Unmatched,
}

impl<'a> Selection<'a> {
    pub fn rule(&self) -> Option<&'a CheckboxRule> {
        match self {
            Selection::Matched(rule) | Selection::Fallback(rule) => Some(rule),
            Selection::Unmatched => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckboxCatalog {
    rules: Vec<CheckboxRule>,
}

impl CheckboxCatalog {
    pub fn new(rules: Vec<CheckboxRule>) -> Self {
        CheckboxCatalog { rules }
    }

    pub fn rules(&self) -> &[CheckboxRule] {
        &self.rules
    }

    /// Picks the box for a free-text category.
    ///
    /// A blank input selects nothing: the empty string is a substring of every label, so
    /// letting it through would always tick the first box.
    pub fn select(&self, input: &str) -> Selection<'_> {
        if input.trim().is_empty() {
            return Selection::Unmatched;
        }
        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(input)) {
            return Selection::Matched(rule);
        }
        match self.rules.iter().find(|rule| rule.is_fallback()) {
            Some(rule) => Selection::Fallback(rule),
            None => Selection::Unmatched,
        }
    }

    /// Exact, case-insensitive lookup for inputs that were already normalized to a label.
    pub fn entry(&self, label: &str) -> Option<&CheckboxRule> {
        let wanted = normalize(label);
        self.rules
            .iter()
            .find(|rule| rule.normalized_label() == wanted)
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
