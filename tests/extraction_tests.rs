//! Integration tests for title and abstract extraction

use paper_meta::{
    extract_meta, extract_meta_mem, resolve_from_layout, BBox, ExtractConfig, LayoutNode,
    MetaError, PaperMeta,
};
use std::io::Write;

// Helper to create a positioned line node
fn line(text: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> LayoutNode {
    LayoutNode::Line {
        text: text.to_string(),
        bbox: BBox::new(x0, y0, x1, y1),
    }
}

fn resolve(nodes: Vec<LayoutNode>) -> Result<PaperMeta, MetaError> {
    resolve_from_layout(&LayoutNode::Page(nodes), &ExtractConfig::default())
}

// ============================================================================
// Scenario fixtures: the four abstract strategies
// ============================================================================

#[test]
fn test_single_column_with_explicit_label() {
    let meta = resolve(vec![
        line("A Study of Widgets", 100.0, 700.0, 260.0, 716.0),
        line("John Smith1, Jane Doe2", 100.0, 670.0, 240.0, 682.0),
        line("Abstract", 100.0, 640.0, 150.0, 652.0),
        line("This paper studies widgets.", 100.0, 620.0, 300.0, 632.0),
        line("1 Introduction", 100.0, 590.0, 200.0, 602.0),
        line("Widgets have a long history", 100.0, 570.0, 300.0, 582.0),
    ])
    .unwrap();
    assert_eq!(meta.title, "A Study of Widgets");
    assert_eq!(meta.abstract_text, "This paper studies widgets.");
}

#[test]
fn test_hyphen_wrapped_title_continuation() {
    let meta = resolve(vec![
        line("Deep Learning for Resource-", 100.0, 700.0, 300.0, 716.0),
        line("Constrained Devices", 100.0, 683.0, 190.0, 695.0),
        line("Abstract", 100.0, 640.0, 150.0, 652.0),
        line("This paper studies constrained devices.", 100.0, 620.0, 300.0, 632.0),
        line("1 Introduction", 100.0, 590.0, 200.0, 602.0),
    ])
    .unwrap();
    // 700 - 695 = 5pt gap, inside the 6pt connecting window
    assert_eq!(meta.title, "Deep Learning for Resource- Constrained Devices");
    assert_eq!(meta.abstract_text, "This paper studies constrained devices.");
}

#[test]
fn test_vertical_abstract_label() {
    let mut nodes = vec![line(
        "Vertical Label Extraction in the Wild",
        100.0,
        700.0,
        320.0,
        716.0,
    )];
    // "abstract" spelled one rotated letter per line down the margin
    for (i, c) in "abstract".chars().enumerate() {
        let y0 = 660.0 - i as f32 * 12.0;
        nodes.push(line(&c.to_string(), 40.0, y0, 48.0, y0 + 10.0));
    }
    // Steep negative gap: the sequence jumps from the rotated label back up
    // into the body column
    nodes.push(line("We study rotated labels.", 100.0, 650.0, 300.0, 662.0));
    nodes.push(line("They are tricky.", 100.0, 630.0, 280.0, 642.0));
    nodes.push(line("1 Introduction", 100.0, 600.0, 200.0, 612.0));

    let meta = resolve(nodes).unwrap();
    assert_eq!(meta.title, "Vertical Label Extraction in the Wild");
    assert_eq!(
        meta.abstract_text,
        "We study rotated labels. They are tricky."
    );
}

#[test]
fn test_implicit_abstract_without_label() {
    let meta = resolve(vec![
        line("An Unlabeled Paper Title Here", 100.0, 700.0, 300.0, 716.0),
        line("John Smith and Jane Doe", 100.0, 670.0, 190.0, 680.0),
        line("We built a thing and measured it", 100.0, 642.0, 300.0, 652.0),
        line("against the usual baselines and it", 100.0, 630.0, 300.0, 640.0),
        line("performed adequately in all cases", 100.0, 618.0, 300.0, 628.0),
        line("within the margin of error", 100.0, 606.0, 280.0, 616.0),
        line("1 Introduction", 100.0, 580.0, 190.0, 592.0),
        line("Much prior work exists", 100.0, 560.0, 300.0, 570.0),
    ])
    .unwrap();
    assert_eq!(meta.title, "An Unlabeled Paper Title Here");
    // The opening line has a different gap above it and is recovered
    // retroactively when the first exact typography match fires
    assert_eq!(
        meta.abstract_text,
        "We built a thing and measured it against the usual baselines and it \
         performed adequately in all cases within the margin of error"
    );
}

// ============================================================================
// Strategy order and normalization properties
// ============================================================================

#[test]
fn test_explicit_label_wins_over_two_column_pattern() {
    let meta = resolve(vec![
        line("A Paper With Both Patterns", 100.0, 700.0, 300.0, 716.0),
        line("Abstract", 100.0, 660.0, 150.0, 672.0),
        line("Explicit body line", 100.0, 640.0, 280.0, 650.0),
        line("1 Introduction", 100.0, 610.0, 200.0, 622.0),
        // Second column: "Abstract" jammed against "1 Introduction"
        line("Abstract", 400.0, 660.0, 450.0, 672.0),
        line("1", 400.0, 640.0, 408.0, 650.0),
        line("Introduction", 400.0, 628.0, 470.0, 638.0),
        line("Wrong strategy text", 400.0, 616.0, 500.0, 626.0),
    ])
    .unwrap();
    assert_eq!(meta.abstract_text, "Explicit body line");
}

#[test]
fn test_abstract_never_keeps_label_or_leading_punctuation() {
    for label in ["Abstract.", "ABSTRACT:", "Abstract\u{2014}", "Abstract -"] {
        let meta = resolve(vec![
            line("A Study of Widgets in General", 100.0, 700.0, 300.0, 716.0),
            line(label, 100.0, 640.0, 160.0, 652.0),
            line("This paper studies widgets", 100.0, 620.0, 300.0, 632.0),
            line("1 Introduction", 100.0, 590.0, 200.0, 602.0),
        ])
        .unwrap();
        assert_eq!(meta.abstract_text, "This paper studies widgets", "label {:?}", label);
    }
}

#[test]
fn test_title_capped_at_three_assembled_lines() {
    let nodes = vec![
        line("Part one of the title", 100.0, 700.0, 250.0, 716.0),
        line("part two of the title", 100.0, 677.0, 250.0, 693.0),
        line("part three of the title", 100.0, 654.0, 250.0, 670.0),
        line("part four of the title", 100.0, 631.0, 250.0, 647.0),
        line("Abstract", 100.0, 600.0, 150.0, 612.0),
        line("Body of the abstract here", 100.0, 580.0, 300.0, 592.0),
        line("1 Introduction", 100.0, 550.0, 200.0, 562.0),
    ];
    let meta = resolve(nodes).unwrap();
    assert_eq!(
        meta.title,
        "Part one of the title part two of the title part three of the title"
    );
}

#[test]
fn test_idempotent_over_same_layout() {
    let nodes = || {
        vec![
            line("A Study of Widgets", 100.0, 700.0, 260.0, 716.0),
            line("Abstract", 100.0, 640.0, 150.0, 652.0),
            line("This paper studies widgets.", 100.0, 620.0, 300.0, 632.0),
            line("1 Introduction", 100.0, 590.0, 200.0, 602.0),
        ]
    };
    let first = resolve(nodes()).unwrap();
    let second = resolve(nodes()).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Failure boundaries
// ============================================================================

#[test]
fn test_page_of_narrow_fragments_fails_cleanly() {
    let result = resolve(vec![
        line("1", 100.0, 700.0, 108.0, 712.0),
        line("ii", 100.0, 680.0, 112.0, 692.0),
        line("42", 300.0, 40.0, 314.0, 52.0),
    ]);
    assert!(matches!(result, Err(MetaError::NoTitleCandidate)));
}

#[test]
fn test_garbage_file_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"this is not a pdf at all").unwrap();
    let result = extract_meta(file.path());
    assert!(result.is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(extract_meta("/no/such/file.pdf").is_err());
}

// ============================================================================
// End-to-end over a synthetic PDF
// ============================================================================

#[test]
fn test_end_to_end_synthetic_pdf() {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream, StringFormat};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let page_lines: [(&str, f32, f32); 6] = [
        ("A Study of Widgets", 20.0, 700.0),
        ("John Smith1, Jane Doe2", 10.0, 670.0),
        ("Abstract", 12.0, 640.0),
        ("This paper studies widgets.", 10.0, 620.0),
        ("1 Introduction", 12.0, 590.0),
        ("Widgets have a long history", 10.0, 570.0),
    ];
    let mut operations = Vec::new();
    for (text, size, y) in page_lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(b"F1".to_vec()), Object::Real(size)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(100.0), Object::Real(y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(
                text.as_bytes().to_vec(),
                StringFormat::Literal,
            )],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();

    let meta = extract_meta_mem(&buffer).unwrap();
    assert_eq!(meta.title, "A Study of Widgets");
    assert_eq!(meta.abstract_text, "This paper studies widgets.");
}
