//! Layout tree and first-page line extraction
//!
//! The PDF collaborator (or a test fixture) supplies a nested layout tree of
//! containers and rendered text lines. `extract_lines` flattens the first
//! page of that tree into an ordered sequence of [`TextLine`] records and
//! derives the geometry the resolvers rank on.
//!
//! The sequence order is exactly the depth-first pre-order of the tree. On
//! multi-column pages that is *not* strict top-to-bottom reading order, which
//! is why the abstract resolver needs several fallback strategies.

/// Bounding box in page coordinates (origin at bottom-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A node of the layout tree produced by PDF rendering
#[derive(Debug, Clone)]
pub enum LayoutNode {
    /// A page container; only the first page encountered is extracted
    Page(Vec<LayoutNode>),
    /// An intermediate container (text box, figure, cell)
    Group(Vec<LayoutNode>),
    /// A single rendered line of text with its bounding box
    Line { text: String, bbox: BBox },
}

/// A rendered line with derived geometry, immutable after extraction
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Position in the page's reading-order sequence
    pub index: usize,
    /// Line content, trailing whitespace stripped
    pub text: String,
    pub bbox: BBox,
    /// `x1 - x0`, rounded to 3 decimals
    pub width: f32,
    /// `y1 - y0`, rounded to 3 decimals
    pub height: f32,
    /// Vertical gap to the previous line: `prev.y0 - cur.y1`, rounded to
    /// 2 decimals. `-1` for the first line of the page. Negative values
    /// indicate overlap, typically a column change.
    pub upper_space: f32,
}

const FIRST_LINE_SENTINEL: f32 = -1.0;

fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

/// Flatten the first page of a layout tree into ordered line records.
///
/// The walk is pre-order and iterative (an explicit stack) so deeply nested
/// trees cannot overflow the call stack. Leaf `Line` nodes are emitted in
/// traversal order; geometry that depends on the previous record
/// (`upper_space`) is filled in by a second left-to-right pass.
pub fn extract_lines(root: &LayoutNode) -> Vec<TextLine> {
    let page = first_page(root).unwrap_or(root);

    let mut lines = Vec::new();
    let mut stack: Vec<&LayoutNode> = vec![page];
    while let Some(node) = stack.pop() {
        match node {
            LayoutNode::Line { text, bbox } => {
                lines.push((text.trim_end().to_string(), *bbox));
            }
            LayoutNode::Group(children) | LayoutNode::Page(children) => {
                // Reverse push keeps pre-order left-to-right
                for child in children.iter().rev() {
                    stack.push(child);
                }
            }
        }
    }

    let mut records = Vec::with_capacity(lines.len());
    let mut last_bbox: Option<BBox> = None;
    for (index, (text, bbox)) in lines.into_iter().enumerate() {
        let upper_space = match last_bbox {
            Some(prev) => round2(prev.y0 - bbox.y1),
            None => FIRST_LINE_SENTINEL,
        };
        last_bbox = Some(bbox);
        let record = TextLine {
            index,
            text,
            bbox,
            width: round3(bbox.width()),
            height: round3(bbox.height()),
            upper_space,
        };
        log::debug!(
            "line {}: h={} w={} us={} {:?}",
            record.index,
            record.height,
            record.width,
            record.upper_space,
            record.text
        );
        records.push(record);
    }
    records
}

/// Find the first `Page` node in pre-order, if any. A tree without an
/// explicit page wrapper is treated as a single page.
fn first_page(root: &LayoutNode) -> Option<&LayoutNode> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match node {
            LayoutNode::Page(_) => return Some(node),
            LayoutNode::Group(children) => {
                for child in children.iter().rev() {
                    stack.push(child);
                }
            }
            LayoutNode::Line { .. } => {}
        }
    }
    None
}
