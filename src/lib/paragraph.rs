//! Multi-line text fields.
//!
//! Free-text values such as illness details or a clearance purpose are wrapped greedily on
//! word boundaries to a maximum character count, then drawn one line per fixed step down the
//! page from a base point. There is no line limit; text long enough will run past the bottom of
//! its box, which is how the paper form behaves too.

pub const DEFAULT_MAX_CHARS: usize = 60;
pub const DEFAULT_LINE_PITCH: f32 = 15.0;

/// One positioned line of a wrapped paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Packs whitespace-separated words into lines of at most `max_chars` characters.
///
/// A word longer than the limit gets a line of its own and is not broken.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wraps `text` and positions line `i` at `(x, y - i * line_pitch)`.
pub fn layout_paragraph(
    text: &str,
    x: f32,
    y: f32,
    max_chars: usize,
    line_pitch: f32,
) -> Vec<ParagraphLine> {
    wrap_words(text, max_chars)
        .into_iter()
        .enumerate()
        .map(|(index, line)| ParagraphLine {
            text: line,
            x,
            y: y - index as f32 * line_pitch,
        })
        .collect()
}
