//! End-to-end rendering tests driven through the produced package.
//!
//! Every assertion reads the real output: the package is unzipped and
//! `word/document.xml` re-parsed, so these tests exercise the whole chain
//! from paper records to the serialized container.

use papergen_core::{McqOption, Paper, PaperHeader, PaperStyle, Question, RichTextNode};
use papergen_docx::{AssetStore, DocxRenderer};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

// ========================================================================
// Helpers
// ========================================================================

/// A renderer whose asset store resolves nothing.
fn renderer() -> DocxRenderer {
    DocxRenderer::new(AssetStore::new("no-such-asset-dir"))
}

fn part(package: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(package.to_vec())).expect("valid zip");
    let mut file = archive.by_name(name).expect("part exists");
    let mut content = String::new();
    file.read_to_string(&mut content).expect("UTF-8 part");
    content
}

fn has_part(package: &[u8], name: &str) -> bool {
    let mut archive = zip::ZipArchive::new(Cursor::new(package.to_vec())).expect("valid zip");
    let exists = archive.by_name(name).is_ok();
    exists
}

/// Text of each paragraph in `word/document.xml`, in document order.
/// Table cell paragraphs are included.
fn paragraph_texts(document_xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(document_xml);
    let mut texts = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
            Event::End(e) if e.name().as_ref() == b"w:p" => {
                texts.push(std::mem::take(&mut current));
            }
            Event::Text(e) if in_text => {
                current.push_str(&e.unescape().expect("decodable text"));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    texts
}

fn full_text(document_xml: &str) -> String {
    paragraph_texts(document_xml)
        .into_iter()
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn rendered_text(paper: &Paper) -> String {
    let package = renderer().render_paper(paper).expect("paper renders");
    full_text(&part(&package, "word/document.xml"))
}

/// A minimal editor document holding one paragraph of plain text.
fn tree_paragraph(text: &str) -> RichTextNode {
    serde_json::from_value(serde_json::json!({
        "type": "doc",
        "content": [
            {"type": "paragraph", "content": [{"type": "text", "text": text}]}
        ]
    }))
    .expect("valid editor tree")
}

fn text_question(text: &str) -> Question {
    Question::Text {
        id: String::new(),
        section: String::new(),
        marks: 0.0,
        content: tree_paragraph(text),
    }
}

fn text_question_in(section: &str, text: &str) -> Question {
    Question::Text {
        id: String::new(),
        section: section.to_string(),
        marks: 0.0,
        content: tree_paragraph(text),
    }
}

fn option(label: &str, text: &str, is_correct: bool) -> McqOption {
    McqOption {
        label: label.to_string(),
        text: text.to_string(),
        is_correct,
    }
}

fn mcq_question(stem: &str, options: Vec<McqOption>) -> Question {
    Question::Mcq {
        id: String::new(),
        section: String::new(),
        marks: 0.0,
        stem: tree_paragraph(stem),
        options,
    }
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([200, 40, 40, 255]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

// ========================================================================
// Core package properties
// ========================================================================

#[test]
fn test_empty_paper_produces_valid_package() {
    let package = renderer()
        .render_paper(&Paper::default())
        .expect("empty paper renders");
    assert!(!package.is_empty());

    let document = part(&package, "word/document.xml");
    assert!(document.contains("<w:sectPr>"));
    assert!(has_part(&package, "word/styles.xml"));
    assert!(has_part(&package, "word/numbering.xml"));
    assert!(has_part(&package, "[Content_Types].xml"));
}

#[test]
fn test_margins_applied_to_section() {
    let paper = Paper {
        style: PaperStyle {
            margin_top: 1.5,
            margin_bottom: 1.5,
            margin_left: 2.0,
            margin_right: 2.0,
            ..PaperStyle::default()
        },
        ..Paper::default()
    };
    let package = renderer().render_paper(&paper).expect("paper renders");
    let document = part(&package, "word/document.xml");
    assert!(document.contains(r#"w:top="2160""#));
    assert!(document.contains(r#"w:left="2880""#));
}

#[test]
fn test_header_and_footer_text_applied() {
    let paper = Paper {
        style: PaperStyle {
            header_text: "CONFIDENTIAL".to_string(),
            footer_text: "Page footer".to_string(),
            ..PaperStyle::default()
        },
        ..Paper::default()
    };
    let package = renderer().render_paper(&paper).expect("paper renders");
    assert!(part(&package, "word/header1.xml").contains("CONFIDENTIAL"));
    assert!(part(&package, "word/footer1.xml").contains("Page footer"));

    let document = part(&package, "word/document.xml");
    assert!(document.contains("<w:headerReference"));
    assert!(document.contains("<w:footerReference"));
}

// ========================================================================
// Header block
// ========================================================================

#[test]
fn test_header_fields_appear_verbatim() {
    let paper = Paper {
        header: PaperHeader {
            institution: "Springfield High".to_string(),
            title: "Science Midterm".to_string(),
            subject: "Biology".to_string(),
            date: "2026-03-01".to_string(),
            duration: "2 hours".to_string(),
            total_marks: 100.0,
        },
        ..Paper::default()
    };
    let text = rendered_text(&paper);
    assert!(text.contains("Springfield High"));
    assert!(text.contains("Science Midterm"));
    assert!(text.contains("Subject: Biology"));
    assert!(text.contains("Date: 2026-03-01"));
    assert!(text.contains("Duration: 2 hours"));
    // Whole-number marks display without a decimal point.
    assert!(text.contains("Total Marks: 100"));
    assert!(!text.contains("100.0"));
}

#[test]
fn test_detail_row_joins_present_fields_only() {
    let paper = Paper {
        header: PaperHeader {
            subject: "Physics".to_string(),
            duration: "90 min".to_string(),
            ..PaperHeader::default()
        },
        ..Paper::default()
    };
    let text = rendered_text(&paper);
    assert!(text.contains("Subject: Physics   |   Duration: 90 min"));
    assert!(!text.contains("Date:"));
    assert!(!text.contains("Total Marks:"));
}

#[test]
fn test_missing_logo_is_skipped_silently() {
    let paper = Paper {
        style: PaperStyle {
            logo_filename: Some("gone.png".to_string()),
            ..PaperStyle::default()
        },
        ..Paper::default()
    };
    let package = renderer().render_paper(&paper).expect("paper renders");
    assert!(!part(&package, "word/document.xml").contains("<w:drawing"));
}

#[test]
fn test_logo_embeds_when_present() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("logo.png"), png_bytes()).expect("write logo");

    let renderer = DocxRenderer::new(AssetStore::new(dir.path()));
    let paper = Paper {
        style: PaperStyle {
            logo_filename: Some("logo.png".to_string()),
            ..PaperStyle::default()
        },
        ..Paper::default()
    };
    let package = renderer.render_paper(&paper).expect("paper renders");
    assert!(part(&package, "word/document.xml").contains("<w:drawing"));
    assert!(has_part(&package, "word/media/image1.png"));
    assert!(part(&package, "[Content_Types].xml").contains("image/png"));
}

// ========================================================================
// Question rendering
// ========================================================================

#[test]
fn test_numbering_is_continuous_across_question_kinds() {
    let paper = Paper {
        questions: vec![
            text_question("First question."),
            mcq_question("Pick one.", vec![option("A", "yes", true)]),
            Question::Image {
                id: String::new(),
                section: String::new(),
                marks: 0.0,
                filename: "missing.png".to_string(),
                caption: String::new(),
            },
            text_question("Last question."),
        ],
        ..Paper::default()
    };
    let text = rendered_text(&paper);
    for prefix in ["Q1.", "Q2.", "Q3.", "Q4."] {
        assert!(text.contains(prefix), "missing {prefix} in: {text}");
    }
    assert!(!text.contains("Q5."));
}

#[test]
fn test_section_heading_emitted_once_per_contiguous_run() {
    let paper = Paper {
        questions: vec![
            text_question_in("Section A", "one"),
            text_question_in("Section A", "two"),
            // An unlabeled question does not reset the running section.
            text_question("interlude"),
            text_question_in("Section A", "three"),
            text_question_in("Section B", "four"),
        ],
        ..Paper::default()
    };
    let package = renderer().render_paper(&paper).expect("paper renders");
    let paragraphs = paragraph_texts(&part(&package, "word/document.xml"));
    let count_of = |label: &str| paragraphs.iter().filter(|text| *text == label).count();
    assert_eq!(count_of("Section A"), 1);
    assert_eq!(count_of("Section B"), 1);
}

#[test]
fn test_marks_labels_rendered_per_question() {
    let questions = [
        (0.0, None),
        (1.0, Some("[1 mark]")),
        (5.0, Some("[5 marks]")),
        (2.5, Some("[2.5 marks]")),
    ];
    for (marks, expected) in questions {
        let paper = Paper {
            questions: vec![Question::Text {
                id: String::new(),
                section: String::new(),
                marks,
                content: tree_paragraph("Explain."),
            }],
            ..Paper::default()
        };
        let text = rendered_text(&paper);
        match expected {
            Some(label) => assert!(text.contains(label), "expected {label} in: {text}"),
            None => assert!(!text.contains("mark"), "unexpected label in: {text}"),
        }
    }
}

#[test]
fn test_mcq_options_render_without_revealing_answers() {
    let paper = Paper {
        questions: vec![mcq_question(
            "Capital of France?",
            vec![
                option("A", "London", false),
                option("B", "Paris", true),
                option("C", "Berlin", false),
                option("D", "Rome", false),
            ],
        )],
        ..Paper::default()
    };
    let text = rendered_text(&paper);
    assert!(text.contains("Capital of France?"));
    assert!(text.contains("    (A) London"));
    assert!(text.contains("    (D) Rome"));

    let lowered = text.to_lowercase();
    assert!(!lowered.contains("is_correct"));
    assert!(!lowered.contains("correct answer"));
}

#[test]
fn test_image_question_missing_file_keeps_caption() {
    let paper = Paper {
        questions: vec![Question::Image {
            id: String::new(),
            section: String::new(),
            marks: 0.0,
            filename: "missing.png".to_string(),
            caption: "A diagram".to_string(),
        }],
        ..Paper::default()
    };
    let package = renderer().render_paper(&paper).expect("paper renders");
    let document = part(&package, "word/document.xml");
    assert!(!document.contains("<w:drawing"));
    assert!(full_text(&document).contains("A diagram"));
}

#[test]
fn test_image_question_embeds_existing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("fig.png"), png_bytes()).expect("write image");

    let renderer = DocxRenderer::new(AssetStore::new(dir.path()));
    let paper = Paper {
        questions: vec![Question::Image {
            id: String::new(),
            section: String::new(),
            marks: 0.0,
            filename: "fig.png".to_string(),
            caption: "Fig 1".to_string(),
        }],
        ..Paper::default()
    };
    let package = renderer.render_paper(&paper).expect("paper renders");
    let document = part(&package, "word/document.xml");
    assert!(document.contains("<w:drawing"));
    assert!(full_text(&document).contains("Fig 1"));
    assert!(has_part(&package, "word/media/image1.png"));
}

// ========================================================================
// Rich-text tree compilation
// ========================================================================

#[test]
fn test_text_marks_map_to_run_formatting() {
    let content: RichTextNode = serde_json::from_value(serde_json::json!({
        "type": "doc",
        "content": [{"type": "paragraph", "content": [
            {"type": "text", "text": "stressed", "marks": [
                {"type": "bold"}, {"type": "italic"}, {"type": "underline"}
            ]}
        ]}]
    }))
    .expect("valid editor tree");
    let paper = Paper {
        questions: vec![Question::Text {
            id: String::new(),
            section: String::new(),
            marks: 0.0,
            content,
        }],
        ..Paper::default()
    };
    let package = renderer().render_paper(&paper).expect("paper renders");
    let document = part(&package, "word/document.xml");
    assert!(document.contains("<w:b/>"));
    assert!(document.contains("<w:i/>"));
    assert!(document.contains(r#"<w:u w:val="single"/>"#));
    assert!(full_text(&document).contains("stressed"));
}

#[test]
fn test_lists_flatten_items() {
    let content: RichTextNode = serde_json::from_value(serde_json::json!({
        "type": "doc",
        "content": [{"type": "bulletList", "content": [
            {"type": "listItem", "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "alpha"}]}
            ]},
            {"type": "listItem", "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "beta "}]},
                // Nested list structure collapses into the item's text.
                {"type": "bulletList", "content": [{"type": "listItem", "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "gamma"}]}
                ]}]}
            ]}
        ]}]
    }))
    .expect("valid editor tree");
    let paper = Paper {
        questions: vec![Question::Text {
            id: String::new(),
            section: String::new(),
            marks: 0.0,
            content,
        }],
        ..Paper::default()
    };
    let package = renderer().render_paper(&paper).expect("paper renders");
    let document = part(&package, "word/document.xml");
    let paragraphs = paragraph_texts(&document);
    assert!(paragraphs.iter().any(|text| text == "alpha"));
    assert!(paragraphs.iter().any(|text| text == "beta gamma"));
    assert_eq!(document.matches(r#"<w:numId w:val="1"/>"#).count(), 2);
}

#[test]
fn test_table_tree_produces_grid_with_cell_placement() {
    let content: RichTextNode = serde_json::from_value(serde_json::json!({
        "type": "doc",
        "content": [{"type": "table", "content": [
            {"type": "tableRow", "content": [
                {"type": "tableCell", "content": [{"type": "paragraph",
                    "content": [{"type": "text", "text": "Header 1"}]}]},
                {"type": "tableCell", "content": [{"type": "paragraph",
                    "content": [{"type": "text", "text": "Header 2"}]}]}
            ]},
            {"type": "tableRow", "content": [
                {"type": "tableCell", "content": [{"type": "paragraph",
                    "content": [{"type": "text", "text": "Cell A"}]}]},
                {"type": "tableCell", "content": [{"type": "paragraph",
                    "content": [{"type": "text", "text": "Cell B"}]}]}
            ]}
        ]}]
    }))
    .expect("valid editor tree");
    let paper = Paper {
        questions: vec![Question::Table {
            id: String::new(),
            section: String::new(),
            marks: 0.0,
            content,
        }],
        ..Paper::default()
    };
    let package = renderer().render_paper(&paper).expect("paper renders");
    let document = part(&package, "word/document.xml");
    assert_eq!(document.matches("<w:tbl>").count(), 1);
    assert_eq!(document.matches("<w:tc>").count(), 4);

    // First and last cells land in the expected corners.
    let cells: Vec<String> = paragraph_texts(&document)
        .into_iter()
        .filter(|text| text.starts_with("Header") || text.starts_with("Cell"))
        .collect();
    assert_eq!(cells.first().map(String::as_str), Some("Header 1"));
    assert_eq!(cells.last().map(String::as_str), Some("Cell B"));
}

#[test]
fn test_empty_table_tree_is_skipped() {
    let content: RichTextNode = serde_json::from_value(serde_json::json!({
        "type": "doc",
        "content": [{"type": "table", "content": []}]
    }))
    .expect("valid editor tree");
    let paper = Paper {
        questions: vec![Question::Table {
            id: String::new(),
            section: String::new(),
            marks: 0.0,
            content,
        }],
        ..Paper::default()
    };
    let package = renderer().render_paper(&paper).expect("paper renders");
    assert!(!part(&package, "word/document.xml").contains("<w:tbl>"));
}

#[test]
fn test_unknown_node_kinds_are_ignored() {
    let content: RichTextNode = serde_json::from_value(serde_json::json!({
        "type": "doc",
        "content": [
            {"type": "horizontalRule"},
            {"type": "paragraph", "content": [{"type": "text", "text": "still here"}]}
        ]
    }))
    .expect("valid editor tree");
    let paper = Paper {
        questions: vec![Question::Text {
            id: String::new(),
            section: String::new(),
            marks: 0.0,
            content,
        }],
        ..Paper::default()
    };
    let text = rendered_text(&paper);
    assert!(text.contains("still here"));
}

#[test]
fn test_empty_tree_renders_header_only() {
    let paper = Paper {
        header: PaperHeader {
            title: "Structured Quiz".to_string(),
            ..PaperHeader::default()
        },
        questions: vec![Question::Text {
            id: String::new(),
            section: String::new(),
            marks: 0.0,
            content: RichTextNode::empty_doc(),
        }],
        ..Paper::default()
    };
    let text = rendered_text(&paper);
    assert!(text.contains("Structured Quiz"));
    assert!(text.contains("Q1."));
}

// ========================================================================
// Answer key
// ========================================================================

#[test]
fn test_answer_key_numbers_over_mcqs_only() {
    let paper = Paper {
        header: PaperHeader {
            title: "Quiz".to_string(),
            ..PaperHeader::default()
        },
        questions: vec![
            mcq_question(
                "First MCQ",
                vec![
                    option("A", "Wrong", false),
                    option("B", "Right", true),
                    option("C", "Wrong", false),
                    option("D", "Wrong", false),
                ],
            ),
            text_question("Describe evolution."),
            mcq_question(
                "Second MCQ",
                vec![option("A", "Right", true), option("B", "Wrong", false)],
            ),
        ],
        ..Paper::default()
    };
    let package = renderer().render_answer_key(&paper).expect("key renders");
    let document = part(&package, "word/document.xml");
    let paragraphs = paragraph_texts(&document);

    assert!(paragraphs.iter().any(|text| text == "Answer Key: Quiz"));
    assert!(paragraphs.iter().any(|text| text == "Q1: B"));
    assert!(paragraphs.iter().any(|text| text == "Q2: A"));
    assert!(!paragraphs.iter().any(|text| text.contains("Q3:")));
    assert!(!full_text(&document).contains("Describe evolution"));
    assert!(!full_text(&document).contains("First MCQ"));
}

#[test]
fn test_answer_key_without_flags_lists_na() {
    let paper = Paper {
        questions: vec![mcq_question(
            "Unkeyed",
            vec![option("A", "x", false), option("B", "y", false)],
        )],
        ..Paper::default()
    };
    let package = renderer().render_answer_key(&paper).expect("key renders");
    let paragraphs = paragraph_texts(&part(&package, "word/document.xml"));
    assert!(paragraphs.iter().any(|text| text == "Q1: N/A"));
}

#[test]
fn test_answer_key_falls_back_to_exam_title() {
    let package = renderer()
        .render_answer_key(&Paper::default())
        .expect("key renders");
    let paragraphs = paragraph_texts(&part(&package, "word/document.xml"));
    assert!(paragraphs.iter().any(|text| text == "Answer Key: Exam"));
}
