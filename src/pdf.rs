//! First-page layout construction using lopdf
//!
//! This is the rendering collaborator for the heuristic engine: it
//! interprets the first page's content stream, decodes the text with
//! font-encoding awareness, and groups positioned spans into the line-level
//! layout tree that [`crate::layout::extract_lines`] consumes.
//!
//! Only the first page is ever loaded into spans; titles and abstracts do
//! not survive past it.

use crate::layout::{BBox, LayoutNode};
use crate::MetaError;
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use std::path::Path;

/// A positioned run of decoded text from one show-text operator
#[derive(Debug, Clone)]
struct Span {
    text: String,
    x: f32,
    y: f32,
    font_size: f32,
}

/// Build the first-page layout tree from a PDF file
pub fn first_page_layout<P: AsRef<Path>>(path: P) -> Result<LayoutNode, MetaError> {
    let doc = Document::load(path)?;
    layout_from_doc(&doc)
}

/// Build the first-page layout tree from a PDF in memory
pub fn first_page_layout_mem(buffer: &[u8]) -> Result<LayoutNode, MetaError> {
    let doc = Document::load_mem(buffer)?;
    layout_from_doc(&doc)
}

fn layout_from_doc(doc: &Document) -> Result<LayoutNode, MetaError> {
    if doc.is_encrypted() {
        return Err(MetaError::ExtractionNotAllowed);
    }
    let pages = doc.get_pages();
    let (_, &first_page_id) = pages
        .iter()
        .next()
        .ok_or_else(|| MetaError::Parse("document has no pages".to_string()))?;

    let spans = extract_page_spans(doc, first_page_id)?;
    Ok(LayoutNode::Page(group_spans_into_lines(spans)))
}

/// Multiply two 2D transformation matrices `[a, b, c, d, e, f]`
fn multiply_matrices(m1: &[f32; 6], m2: &[f32; 6]) -> [f32; 6] {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

/// Effective font size after the text matrix scales (rotated or scaled text)
fn effective_font_size(base_size: f32, text_matrix: &[f32; 6]) -> f32 {
    let scale_x = (text_matrix[0].powi(2) + text_matrix[1].powi(2)).sqrt();
    let scale_y = (text_matrix[2].powi(2) + text_matrix[3].powi(2)).sqrt();
    base_size * scale_x.max(scale_y)
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Walk the page's content operations and emit a span per show-text operator
fn extract_page_spans(doc: &Document, page_id: ObjectId) -> Result<Vec<Span>, MetaError> {
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    let content_data = doc
        .get_page_content(page_id)
        .map_err(|e| MetaError::Parse(e.to_string()))?;
    let content = Content::decode(&content_data).map_err(|e| MetaError::Parse(e.to_string()))?;

    let mut spans = Vec::new();

    let mut ctm = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut ctm_stack: Vec<[f32; 6]> = Vec::new();
    let mut text_matrix = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut line_matrix = [1.0f32, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mut current_font = String::new();
    let mut current_font_size: f32 = 12.0;
    let mut in_text_block = false;

    let mut emit = |text: String, text_matrix: &[f32; 6], ctm: &[f32; 6], size: f32| {
        if text.trim().is_empty() {
            return;
        }
        let rendered = effective_font_size(size, text_matrix);
        let combined = multiply_matrices(text_matrix, ctm);
        spans.push(Span {
            text,
            x: combined[4],
            y: combined[5],
            font_size: rendered,
        });
    };

    for op in &content.operations {
        match op.operator.as_str() {
            "q" => ctm_stack.push(ctm),
            "Q" => {
                if let Some(saved) = ctm_stack.pop() {
                    ctm = saved;
                }
            }
            "cm" => {
                if op.operands.len() >= 6 {
                    let m = [
                        get_number(&op.operands[0]).unwrap_or(1.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                        get_number(&op.operands[3]).unwrap_or(1.0),
                        get_number(&op.operands[4]).unwrap_or(0.0),
                        get_number(&op.operands[5]).unwrap_or(0.0),
                    ];
                    ctm = multiply_matrices(&m, &ctm);
                }
            }
            "BT" => {
                in_text_block = true;
                text_matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
                line_matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
            }
            "ET" => in_text_block = false,
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Ok(name) = op.operands[0].as_name() {
                        current_font = String::from_utf8_lossy(name).to_string();
                    }
                    if let Some(size) = get_number(&op.operands[1]) {
                        current_font_size = size;
                    }
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    line_matrix[4] += get_number(&op.operands[0]).unwrap_or(0.0);
                    line_matrix[5] += get_number(&op.operands[1]).unwrap_or(0.0);
                    text_matrix = line_matrix;
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    for (i, operand) in op.operands.iter().take(6).enumerate() {
                        text_matrix[i] =
                            get_number(operand).unwrap_or(if i == 0 || i == 3 { 1.0 } else { 0.0 });
                    }
                    line_matrix = text_matrix;
                }
            }
            "T*" => {
                // Approximate line height
                line_matrix[5] -= current_font_size * 1.2;
                text_matrix = line_matrix;
            }
            "Tj" => {
                if in_text_block && !op.operands.is_empty() {
                    if let Some(text) =
                        decode_text_operand(&op.operands[0], doc, &fonts, &current_font)
                    {
                        emit(text, &text_matrix, &ctm, current_font_size);
                    }
                }
            }
            "TJ" => {
                if in_text_block && !op.operands.is_empty() {
                    if let Ok(array) = op.operands[0].as_array() {
                        let mut combined = String::new();
                        for item in array {
                            if let Some(text) =
                                decode_text_operand(item, doc, &fonts, &current_font)
                            {
                                combined.push_str(&text);
                            }
                        }
                        emit(combined, &text_matrix, &ctm, current_font_size);
                    }
                }
            }
            "'" => {
                line_matrix[5] -= current_font_size * 1.2;
                text_matrix = line_matrix;
                if !op.operands.is_empty() {
                    if let Some(text) =
                        decode_text_operand(&op.operands[0], doc, &fonts, &current_font)
                    {
                        emit(text, &text_matrix, &ctm, current_font_size);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Decode a text operand through the font's encoding, falling back to
/// UTF-16BE and then Latin-1
fn decode_text_operand(
    obj: &Object,
    doc: &Document,
    fonts: &std::collections::BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    current_font: &str,
) -> Option<String> {
    if let Object::String(bytes, _) = obj {
        if let Some(font_dict) = fonts.get(current_font.as_bytes()) {
            if let Ok(encoding) = font_dict.get_font_encoding(doc) {
                if let Ok(text) = Document::decode_text(&encoding, bytes) {
                    return Some(text);
                }
            }
        }

        if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
            let utf16: Vec<u16> = bytes[2..]
                .chunks_exact(2)
                .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                .collect();
            return Some(String::from_utf16_lossy(&utf16));
        }

        Some(bytes.iter().map(|&b| b as char).collect())
    } else {
        None
    }
}

const LINE_Y_TOLERANCE: f32 = 3.0;

/// Estimated horizontal advance of a span. Glyph widths are not decoded;
/// half an em per glyph is close enough for the width thresholds the
/// heuristics rank on.
fn estimated_advance(span: &Span) -> f32 {
    span.text.chars().count() as f32 * span.font_size * 0.5
}

/// Group spans into rendered lines, preserving content-stream order.
///
/// Stream order is usually reading order; only consecutive spans at the same
/// baseline (within tolerance) are merged, then ordered left to right.
fn group_spans_into_lines(spans: Vec<Span>) -> Vec<LayoutNode> {
    let mut grouped: Vec<Vec<Span>> = Vec::new();

    for span in spans {
        let same_baseline = grouped
            .last()
            .and_then(|g| g.first())
            .map_or(false, |first| (first.y - span.y).abs() < LINE_Y_TOLERANCE);
        if same_baseline {
            grouped.last_mut().unwrap().push(span);
        } else {
            grouped.push(vec![span]);
        }
    }

    grouped
        .into_iter()
        .map(|mut group| {
            group.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
            let x0 = group.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);
            let x1 = group
                .iter()
                .map(|s| s.x + estimated_advance(s))
                .fold(f32::NEG_INFINITY, f32::max);
            let y0 = group.iter().map(|s| s.y).fold(f32::INFINITY, f32::min);
            let ascent = group
                .iter()
                .map(|s| s.y + s.font_size)
                .fold(f32::NEG_INFINITY, f32::max);
            let text = group
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            LayoutNode::Line {
                text,
                bbox: BBox::new(x0, y0, x1, ascent),
            }
        })
        .collect()
}
