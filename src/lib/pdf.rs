//! PDF stamping on top of a fixed template.
//!
//! A [`Stamp`] wraps one loaded template document. Text and check marks are queued with their
//! final coordinates, and [`Stamp::finish`] writes them as a single content stream appended to
//! the template's first page, using the standard Helvetica font registered under a private
//! resource name. The template's own content is wrapped in `q`/`Q` so any graphics state it
//! leaves behind cannot shift the stamped text.
//!
//! Nothing in the output depends on the clock or on hash ordering: stamping the same template
//! with the same draws yields the same bytes.

use crate::FormError;
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Font resource name used for every stamped string.
pub const FONT_RESOURCE: &str = "FStampHelv";

/// Glyph drawn into a selected checkbox.
pub const CHECK_MARK: &str = "X";

const MAX_INHERITANCE_DEPTH: usize = 16;

/// One string placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnText {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Accumulates draws for one template page and serializes the stamped document.
pub struct Stamp {
    document: Document,
    page_id: ObjectId,
    draws: Vec<DrawnText>,
}

impl Stamp {
    /// Loads the template and selects its first page.
    pub fn open(template: &[u8]) -> Result<Self, FormError> {
        let document = Document::load_mem(template).map_err(|e| {
            FormError::template_error(format!("template is not a readable PDF: {}", e))
        })?;
        let page_id = first_page(&document)?;
        debug!("template loaded, stamping page object {:?}", page_id);
        Ok(Stamp {
            document,
            page_id,
            draws: Vec::new(),
        })
    }

    /// Queues `text` at `(x, y)`. Blank strings are skipped; returns whether a draw was queued.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.draws.push(DrawnText {
            text: text.to_string(),
            x,
            y,
            size,
        });
        true
    }

    pub fn draw_mark(&mut self, x: f32, y: f32, size: f32) {
        self.draw_text(CHECK_MARK, x, y, size);
    }

    pub fn draws(&self) -> &[DrawnText] {
        &self.draws
    }

    /// Writes the queued draws into the page and serializes the document.
    pub fn finish(mut self) -> Result<Vec<u8>, FormError> {
        if !self.draws.is_empty() {
            let font_id = self.document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica",
                "Encoding" => "WinAnsiEncoding",
            });
            install_font(&mut self.document, self.page_id, font_id)?;
            append_overlay(&mut self.document, self.page_id, &self.draws)?;
            debug!("appended {} draws to the template page", self.draws.len());
        }

        let mut output = Vec::new();
        self.document
            .save_to(&mut output)
            .map_err(|e| FormError::pdf_error(format!("failed to serialize document: {}", e)))?;
        Ok(output)
    }
}

fn first_page(document: &Document) -> Result<ObjectId, FormError> {
    document
        .get_pages()
        .values()
        .next()
        .copied()
        .ok_or_else(|| FormError::template_error("template has no pages"))
}

/// Resources in effect for the page, following the `Parent` chain for inherited entries.
fn resolved_resources(document: &Document, page_id: ObjectId) -> Result<Dictionary, FormError> {
    let mut node = document
        .get_dictionary(page_id)
        .map_err(|e| FormError::pdf_error(format!("page dictionary unreadable: {}", e)))?;

    for _ in 0..MAX_INHERITANCE_DEPTH {
        match node.get(b"Resources") {
            Ok(Object::Reference(id)) => {
                return Ok(document
                    .get_dictionary(*id)
                    .map(|d| d.clone())
                    .unwrap_or_else(|_| Dictionary::new()));
            }
            Ok(Object::Dictionary(dict)) => return Ok(dict.clone()),
            _ => {}
        }
        match node.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => {
                node = document.get_dictionary(parent).map_err(|e| {
                    FormError::pdf_error(format!("page tree parent unreadable: {}", e))
                })?
            }
            Err(_) => break,
        }
    }
    Ok(Dictionary::new())
}

/// Registers the stamp font on the page, copying inherited resources inline.
fn install_font(
    document: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
) -> Result<(), FormError> {
    let mut resources = resolved_resources(document, page_id)?;
    let mut fonts = match resources.get(b"Font") {
        Ok(Object::Reference(id)) => document
            .get_dictionary(*id)
            .map(|d| d.clone())
            .unwrap_or_else(|_| Dictionary::new()),
        Ok(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    };
    fonts.set(FONT_RESOURCE, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let page = document
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| FormError::pdf_error(format!("page dictionary unwritable: {}", e)))?;
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Appends the overlay stream, wrapping existing page content in a save/restore pair.
fn append_overlay(
    document: &mut Document,
    page_id: ObjectId,
    draws: &[DrawnText],
) -> Result<(), FormError> {
    let existing: Vec<Object> = match document
        .get_dictionary(page_id)
        .map_err(|e| FormError::pdf_error(format!("page dictionary unreadable: {}", e)))?
        .get(b"Contents")
    {
        Ok(Object::Reference(id)) => match document.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    let wraps_existing = !existing.is_empty();

    let overlay = overlay_content(draws, wraps_existing)
        .encode()
        .map_err(|e| FormError::pdf_error(format!("failed to encode overlay content: {}", e)))?;
    let overlay_id = document.add_object(Stream::new(dictionary! {}, overlay));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    if wraps_existing {
        let prefix_id = document.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
        contents.push(Object::Reference(prefix_id));
        contents.extend(existing);
    }
    contents.push(Object::Reference(overlay_id));

    let page = document
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| FormError::pdf_error(format!("page dictionary unwritable: {}", e)))?;
    page.set("Contents", Object::Array(contents));
    Ok(())
}

fn overlay_content(draws: &[DrawnText], wraps_existing: bool) -> Content {
    let mut operations = Vec::with_capacity(draws.len() * 5 + 4);
    if wraps_existing {
        operations.push(Operation::new("Q", vec![]));
    }
    operations.push(Operation::new("q", vec![]));
    operations.push(Operation::new("g", vec![Object::Integer(0)]));
    for draw in draws {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
                Object::Real(draw.size),
            ],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(draw.x), Object::Real(draw.y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(
                encode_win_ansi(&draw.text),
                StringFormat::Literal,
            )],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    operations.push(Operation::new("Q", vec![]));
    Content { operations }
}

/// Encodes text for a WinAnsi-encoded standard font. Latin-1 characters map to their own
/// byte, the common typographic punctuation maps to its WinAnsi slot, ASCII whitespace controls
/// become a space, anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\t' | '\n' | '\r' | '\u{0b}' | '\u{0c}' => b' ',
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2026}' => 0x85,
            _ => b'?',
        })
        .collect()
}

/// Inverse of [`encode_win_ansi`] for the characters it produces.
pub fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80 => '\u{20ac}',
            0x85 => '\u{2026}',
            0x91 => '\u{2018}',
            0x92 => '\u{2019}',
            0x93 => '\u{201c}',
            0x94 => '\u{201d}',
            0x95 => '\u{2022}',
            0x96 => '\u{2013}',
            0x97 => '\u{2014}',
            other => other as char,
        })
        .collect()
}

/// Reads back the strings stamped onto the first page of a document produced by [`Stamp`].
///
/// Only text drawn with the stamp font in the page's last content stream is returned, so the
/// template's own text never shows up.
pub fn read_stamped_text(pdf: &[u8]) -> Result<Vec<DrawnText>, FormError> {
    let document = Document::load_mem(pdf)
        .map_err(|e| FormError::pdf_error(format!("document is not a readable PDF: {}", e)))?;
    let page_id = first_page(&document)?;
    let page = document
        .get_dictionary(page_id)
        .map_err(|e| FormError::pdf_error(format!("page dictionary unreadable: {}", e)))?;

    let last_stream = match page.get(b"Contents") {
        Ok(Object::Array(items)) => items.last().and_then(|o| o.as_reference().ok()),
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };
    let Some(stream_id) = last_stream else {
        return Ok(Vec::new());
    };
    let stream = document
        .get_object(stream_id)
        .and_then(Object::as_stream)
        .map_err(|e| FormError::pdf_error(format!("content stream unreadable: {}", e)))?;
    let bytes = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    let content = Content::decode(&bytes)
        .map_err(|e| FormError::pdf_error(format!("content stream undecodable: {}", e)))?;

    let mut drawn = Vec::new();
    let mut font_is_stamp = false;
    let mut size = 0.0;
    let (mut x, mut y) = (0.0, 0.0);
    for operation in content.operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "BT" => {
                x = 0.0;
                y = 0.0;
            }
            "Tf" if operands.len() == 2 => {
                font_is_stamp =
                    matches!(&operands[0], Object::Name(name) if name == FONT_RESOURCE.as_bytes());
                size = operands[1].as_float().unwrap_or(0.0);
            }
            "Td" if operands.len() == 2 => {
                x += operands[0].as_float().unwrap_or(0.0);
                y += operands[1].as_float().unwrap_or(0.0);
            }
            "Tj" if font_is_stamp => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    drawn.push(DrawnText {
                        text: decode_win_ansi(bytes),
                        x,
                        y,
                        size,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(drawn)
}

/// A single empty page of the given size, for calibration sheets and tests.
pub fn blank_template(width: f32, height: f32) -> Result<Vec<u8>, FormError> {
    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();
    let page_id = document.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), Object::Real(width), Object::Real(height)],
        "Resources" => dictionary! {},
    });
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    let mut output = Vec::new();
    document
        .save_to(&mut output)
        .map_err(|e| FormError::pdf_error(format!("failed to serialize blank page: {}", e)))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_template_loads() {
        let bytes = blank_template(612.0, 936.0).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let stamp = Stamp::open(&bytes).unwrap();
        assert!(stamp.draws().is_empty());
    }

    #[test]
    fn test_open_rejects_garbage() {
        let err = Stamp::open(b"not a pdf").err().unwrap();
        assert!(matches!(err, FormError::TemplateError { .. }));
    }

    #[test]
    fn test_blank_strings_are_not_drawn() {
        let bytes = blank_template(612.0, 792.0).unwrap();
        let mut stamp = Stamp::open(&bytes).unwrap();
        assert!(!stamp.draw_text("   ", 10.0, 10.0, 9.0));
        assert!(stamp.draw_text("  RANK ", 10.0, 10.0, 9.0));
        assert_eq!(stamp.draws()[0].text, "RANK");
    }

    #[test]
    fn test_stamped_text_round_trips() {
        let bytes = blank_template(612.0, 792.0).unwrap();
        let mut stamp = Stamp::open(&bytes).unwrap();
        stamp.draw_text("Peñafrancia (Naga)", 100.5, 700.0, 9.0);
        stamp.draw_mark(48.0, 600.0, 10.0);
        let output = stamp.finish().unwrap();

        let drawn = read_stamped_text(&output).unwrap();
        assert_eq!(drawn.len(), 2);
        assert_eq!(drawn[0].text, "Peñafrancia (Naga)");
        assert_eq!((drawn[0].x, drawn[0].y, drawn[0].size), (100.5, 700.0, 9.0));
        assert_eq!(drawn[1].text, CHECK_MARK);
    }

    #[test]
    fn test_finish_without_draws_keeps_page_untouched() {
        let bytes = blank_template(612.0, 792.0).unwrap();
        let output = Stamp::open(&bytes).unwrap().finish().unwrap();
        assert!(read_stamped_text(&output).unwrap().is_empty());
    }

    #[test]
    fn test_existing_content_is_wrapped() {
        let bytes = blank_template(612.0, 792.0).unwrap();
        let mut first = Stamp::open(&bytes).unwrap();
        first.draw_text("first pass", 10.0, 10.0, 9.0);
        let once = first.finish().unwrap();

        let mut second = Stamp::open(&once).unwrap();
        second.draw_text("second pass", 20.0, 20.0, 9.0);
        let twice = second.finish().unwrap();

        let document = Document::load_mem(&twice).unwrap();
        let page_id = *document.get_pages().get(&1).unwrap();
        let contents = document
            .get_dictionary(page_id)
            .unwrap()
            .get(b"Contents")
            .unwrap()
            .as_array()
            .unwrap()
            .clone();
        // prefix q, original overlay, new overlay
        assert_eq!(contents.len(), 3);
        let drawn = read_stamped_text(&twice).unwrap();
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].text, "second pass");
    }

    #[test]
    fn test_indirect_contents_array_is_spliced() {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let drawing_id = document.add_object(Stream::new(
            dictionary! {},
            b"0 0 m 100 100 l S\n".to_vec(),
        ));
        let array_id = document.add_object(Object::Array(vec![drawing_id.into()]));
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! {},
            "Contents" => array_id,
        });
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        let mut template = Vec::new();
        document.save_to(&mut template).unwrap();

        let mut stamp = Stamp::open(&template).unwrap();
        stamp.draw_text("REYES", 218.0, 842.0, 10.0);
        let output = stamp.finish().unwrap();

        let stamped = Document::load_mem(&output).unwrap();
        let page_id = *stamped.get_pages().get(&1).unwrap();
        let contents = stamped
            .get_dictionary(page_id)
            .unwrap()
            .get(b"Contents")
            .unwrap()
            .as_array()
            .unwrap()
            .clone();
        assert_eq!(contents.len(), 3);
        for item in &contents {
            let id = item.as_reference().unwrap();
            assert!(stamped.get_object(id).unwrap().as_stream().is_ok());
        }
        let template_stream = stamped
            .get_object(contents[1].as_reference().unwrap())
            .unwrap()
            .as_stream()
            .unwrap();
        assert_eq!(template_stream.content, b"0 0 m 100 100 l S\n".to_vec());
        assert_eq!(read_stamped_text(&output).unwrap()[0].text, "REYES");
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Ñ–x"), vec![0xd1, 0x96, b'x']);
        assert_eq!(encode_win_ansi("漢"), vec![b'?']);
        assert_eq!(encode_win_ansi("Brgy.\tSan Jose\r\n"), b"Brgy. San Jose  ".to_vec());
        assert_eq!(decode_win_ansi(&encode_win_ansi("“Cruz” €5")), "“Cruz” €5");
    }
}
