//! Positioned text and ruling collection from a PDF page content stream.
//!
//! A deliberately small interpreter: it tracks the text line matrix as a
//! point, which is exact for the translation-only positioning report
//! generators emit, and approximates glyph advances from the font size.
//! Vertical graphic lines are harvested alongside the text so the table
//! detector can use ruled cell boundaries when the page has them.

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

/// A run of shown text with its layout position, in PDF user-space points.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
}

/// A vertical graphic line, a candidate table column boundary.
#[derive(Debug, Clone, Copy)]
pub struct VerticalRuling {
    pub x: f32,
    pub y0: f32,
    pub y1: f32,
}

/// Everything the table detector needs from one page.
#[derive(Debug, Default)]
pub struct PageContent {
    pub spans: Vec<TextSpan>,
    pub rulings: Vec<VerticalRuling>,
}

// Average glyph advance as a fraction of the font size, used when a show
// operator is not followed by an explicit reposition.
const GLYPH_ADVANCE_FACTOR: f32 = 0.5;
// A path segment is vertical when its X endpoints agree within this.
const RULING_EPSILON: f32 = 0.5;
// Shorter segments are decoration, not cell boundaries.
const MIN_RULING_LENGTH: f32 = 8.0;

/// Decode and interpret the content stream(s) of one page.
pub fn collect_page_content(doc: &Document, page_id: ObjectId) -> lopdf::Result<PageContent> {
    let data = doc.get_page_content(page_id)?;
    let content = Content::decode(&data)?;
    Ok(interpret(&content))
}

/// Walk the operator list, tracking the text position and open path point.
pub(crate) fn interpret(content: &Content) -> PageContent {
    let mut out = PageContent::default();

    // Text state: line origin plus the cursor within the line.
    let mut line_x = 0.0_f32;
    let mut line_y = 0.0_f32;
    let mut cursor_x = 0.0_f32;
    let mut font_size = 0.0_f32;
    let mut leading = 0.0_f32;
    // Path state for the ruling harvest.
    let mut current_point: Option<(f32, f32)> = None;

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                line_x = 0.0;
                line_y = 0.0;
                cursor_x = 0.0;
            }
            "Tf" => {
                if let Some(size) = num(op.operands.get(1)) {
                    font_size = size;
                }
            }
            "TL" => {
                if let Some(l) = num(op.operands.first()) {
                    leading = l;
                }
            }
            "Tm" => {
                // Only the translation part positions the line; shear and
                // rotation never occur in the annexes this handles.
                if let (Some(e), Some(f)) = (num(op.operands.get(4)), num(op.operands.get(5))) {
                    line_x = e;
                    line_y = f;
                    cursor_x = e;
                }
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (num(op.operands.first()), num(op.operands.get(1))) {
                    if op.operator == "TD" {
                        leading = -ty;
                    }
                    line_x += tx;
                    line_y += ty;
                    cursor_x = line_x;
                }
            }
            "T*" => {
                line_y -= leading;
                cursor_x = line_x;
            }
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    push_span(&mut out.spans, bytes, &mut cursor_x, line_y, font_size);
                }
            }
            "'" => {
                line_y -= leading;
                cursor_x = line_x;
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    push_span(&mut out.spans, bytes, &mut cursor_x, line_y, font_size);
                }
            }
            "\"" => {
                line_y -= leading;
                cursor_x = line_x;
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    push_span(&mut out.spans, bytes, &mut cursor_x, line_y, font_size);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => {
                                push_span(&mut out.spans, bytes, &mut cursor_x, line_y, font_size);
                            }
                            // Positive adjustments tighten spacing, negative
                            // widen it; units are thousandths of the font size.
                            Object::Integer(n) => {
                                cursor_x -= *n as f32 / 1000.0 * font_size;
                            }
                            Object::Real(n) => {
                                cursor_x -= *n / 1000.0 * font_size;
                            }
                            _ => {}
                        }
                    }
                }
            }
            "m" => {
                if let (Some(x), Some(y)) = (num(op.operands.first()), num(op.operands.get(1))) {
                    current_point = Some((x, y));
                }
            }
            "l" => {
                if let (Some(x), Some(y)) = (num(op.operands.first()), num(op.operands.get(1))) {
                    if let Some((px, py)) = current_point {
                        if (x - px).abs() <= RULING_EPSILON && (y - py).abs() >= MIN_RULING_LENGTH {
                            out.rulings.push(VerticalRuling {
                                x,
                                y0: py.min(y),
                                y1: py.max(y),
                            });
                        }
                    }
                    current_point = Some((x, y));
                }
            }
            "re" => {
                // A grid drawn as stroked cell rectangles contributes both
                // side edges as rulings.
                if let (Some(x), Some(y), Some(w), Some(h)) = (
                    num(op.operands.first()),
                    num(op.operands.get(1)),
                    num(op.operands.get(2)),
                    num(op.operands.get(3)),
                ) {
                    if h.abs() >= MIN_RULING_LENGTH {
                        let (y0, y1) = (y.min(y + h), y.max(y + h));
                        out.rulings.push(VerticalRuling { x, y0, y1 });
                        out.rulings.push(VerticalRuling { x: x + w, y0, y1 });
                    }
                }
            }
            _ => {}
        }
    }

    out
}

fn push_span(spans: &mut Vec<TextSpan>, bytes: &[u8], cursor_x: &mut f32, y: f32, font_size: f32) {
    let text = decode_pdf_string(bytes);
    if text.is_empty() {
        return;
    }
    let width = text.chars().count() as f32 * font_size * GLYPH_ADVANCE_FACTOR;
    spans.push(TextSpan {
        text,
        x: *cursor_x,
        y,
        width,
        font_size,
    });
    *cursor_x += width;
}

/// Decode a PDF string object's bytes.
///
/// UTF-16BE with BOM, then UTF-8, then a Latin-1 fallback that covers the
/// WinAnsi range these annexes use. CID-keyed composite fonts are not
/// handled.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn num(obj: Option<&Object>) -> Option<f32> {
    match obj? {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
