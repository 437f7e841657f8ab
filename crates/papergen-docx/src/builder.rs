//! Document assembler and question renderer.
//!
//! [`DocxRenderer`] turns a [`Paper`] into a complete document package, and
//! a reduced answer-key variant listing correct MCQ options only. Rendering
//! is stateless per call: renders may run concurrently from independent
//! threads with no coordination, each producing a fresh output buffer.

// Clippy pedantic allows:
// - Marks comparisons are against exact sentinel values, not computed floats
#![allow(clippy::float_cmp)]

use crate::assets::AssetStore;
use crate::docx::{inches_to_emu, Alignment, Document, Paragraph};
use crate::richtext::compile_into;
use papergen_core::{display_number, Paper, PaperHeader, PaperStyle, Question, Result};

/// Display width for the style logo in the header block, inches.
const LOGO_WIDTH_IN: f64 = 1.5;
/// Display width for a standalone question image, inches.
const QUESTION_IMAGE_WIDTH_IN: f64 = 4.0;
/// Separator between the header block's detail fields.
const DETAIL_SEPARATOR: &str = "   |   ";

/// Compiles [`Paper`] values into document packages.
#[derive(Debug, Clone)]
pub struct DocxRenderer {
    assets: AssetStore,
}

impl DocxRenderer {
    /// Create a renderer resolving image references through `assets`.
    #[must_use = "returns the renderer"]
    pub fn new(assets: AssetStore) -> Self {
        Self { assets }
    }

    /// Build a complete exam paper package.
    ///
    /// Applies the style's page margins and base font, writes the running
    /// header/footer text when present, renders the institutional header
    /// block, then every question in order. Any fault propagates whole —
    /// partially written output is never returned.
    pub fn render_paper(&self, paper: &Paper) -> Result<Vec<u8>> {
        let mut doc = self.base_document(paper);
        if !paper.style.header_text.is_empty() {
            doc.set_header_text(&paper.style.header_text);
        }
        if !paper.style.footer_text.is_empty() {
            doc.set_footer_text(&paper.style.footer_text);
        }
        self.add_paper_header(&mut doc, &paper.header, &paper.style)?;
        self.add_questions(&mut doc, &paper.questions)?;
        doc.to_bytes()
    }

    /// Build an answer-key package listing correct MCQ answers only.
    ///
    /// Questions of other kinds are skipped entirely; the `Q<n>` counter
    /// runs over MCQs alone. An MCQ with no option flagged correct lists
    /// `N/A` rather than failing.
    pub fn render_answer_key(&self, paper: &Paper) -> Result<Vec<u8>> {
        let mut doc = self.base_document(paper);

        let title = if paper.header.title.is_empty() {
            "Exam"
        } else {
            paper.header.title.as_str()
        };
        doc.add_heading(&format!("Answer Key: {title}"), 0);

        let mut mcq_number = 0usize;
        for question in &paper.questions {
            if let Question::Mcq { options, .. } = question {
                mcq_number += 1;
                let correct = options
                    .iter()
                    .find(|option| option.is_correct)
                    .map_or("N/A", |option| option.label.as_str());
                doc.add_paragraph(&format!("Q{mcq_number}: {correct}"));
            }
        }
        doc.to_bytes()
    }

    /// A fresh document carrying the paper's font, margins, and title.
    fn base_document(&self, paper: &Paper) -> Document {
        let style = &paper.style;
        let mut doc = Document::new(style.font_family.as_str(), style.font_size);
        doc.set_margins(
            style.margin_top,
            style.margin_bottom,
            style.margin_left,
            style.margin_right,
        );
        if !paper.header.title.is_empty() {
            doc.set_title(&paper.header.title);
        }
        doc
    }

    /// Render the institutional header block: logo, institution, title,
    /// details row, horizontal rule, spacer. Every step is independently
    /// optional on field presence.
    fn add_paper_header(
        &self,
        doc: &mut Document,
        header: &PaperHeader,
        style: &PaperStyle,
    ) -> Result<()> {
        if let Some(logo) = &style.logo_filename {
            // A missing logo file skips the logo, not the render.
            if let Some(bytes) = self.assets.resolve(logo) {
                let image = doc.register_image(bytes, inches_to_emu(LOGO_WIDTH_IN))?;
                let mut paragraph = Paragraph::new().align(Alignment::Center);
                paragraph.add_image_run(image);
                doc.push_paragraph(paragraph);
            }
        }

        if !header.institution.is_empty() {
            let mut paragraph = Paragraph::new().align(Alignment::Center);
            paragraph
                .add_run(header.institution.as_str())
                .bold()
                .size_pt(style.font_size + 4);
            doc.push_paragraph(paragraph);
        }

        if !header.title.is_empty() {
            let mut paragraph = Paragraph::new().align(Alignment::Center);
            paragraph
                .add_run(header.title.as_str())
                .bold()
                .size_pt(style.font_size + 2);
            doc.push_paragraph(paragraph);
        }

        let mut details: Vec<String> = Vec::new();
        if !header.subject.is_empty() {
            details.push(format!("Subject: {}", header.subject));
        }
        if !header.date.is_empty() {
            details.push(format!("Date: {}", header.date));
        }
        if !header.duration.is_empty() {
            details.push(format!("Duration: {}", header.duration));
        }
        if header.total_marks != 0.0 {
            details.push(format!(
                "Total Marks: {}",
                display_number(header.total_marks)
            ));
        }
        if !details.is_empty() {
            let mut paragraph = Paragraph::new().align(Alignment::Center);
            paragraph.add_run(details.join(DETAIL_SEPARATOR));
            doc.push_paragraph(paragraph);
        }

        // Horizontal rule beneath the header block, then a spacer.
        doc.push_paragraph(Paragraph::new().bottom_border());
        doc.push_paragraph(Paragraph::new());
        Ok(())
    }

    /// Render all questions with continuous 1-based numbering, inserting a
    /// section heading whenever a non-empty section label changes.
    fn add_questions(&self, doc: &mut Document, questions: &[Question]) -> Result<()> {
        let mut current_section = String::new();
        for (index, question) in questions.iter().enumerate() {
            let number = index + 1;

            let section = question.section();
            if !section.is_empty() && section != current_section {
                current_section = section.to_string();
                doc.add_heading(section, 2);
            }

            let marks = marks_label(question.marks());
            match question {
                Question::Text { content, .. } | Question::Table { content, .. } => {
                    write_question_prefix(doc, number, &marks);
                    compile_into(doc, content, &self.assets)?;
                }
                Question::Mcq { stem, options, .. } => {
                    write_question_prefix(doc, number, &marks);
                    compile_into(doc, stem, &self.assets)?;
                    for option in options {
                        doc.add_paragraph(&format!("    ({}) {}", option.label, option.text));
                    }
                }
                Question::Image {
                    filename, caption, ..
                } => {
                    write_question_prefix(doc, number, &marks);
                    if let Some(bytes) = self.assets.resolve(filename) {
                        let image =
                            doc.register_image(bytes, inches_to_emu(QUESTION_IMAGE_WIDTH_IN))?;
                        let mut paragraph = Paragraph::new().align(Alignment::Center);
                        paragraph.add_image_run(image);
                        doc.push_paragraph(paragraph);
                    }
                    // The caption renders whether or not the image resolved.
                    if !caption.is_empty() {
                        let mut paragraph = Paragraph::new().align(Alignment::Center);
                        paragraph.add_run(caption.as_str()).italic();
                        doc.push_paragraph(paragraph);
                    }
                }
            }

            // Spacer between questions, unconditionally.
            doc.push_paragraph(Paragraph::new());
        }
        Ok(())
    }
}

/// Bold `Q<n>.` prefix with the optional italic marks label.
fn write_question_prefix(doc: &mut Document, number: usize, marks: &str) {
    let mut paragraph = Paragraph::new();
    paragraph.add_run(format!("Q{number}.")).bold();
    if !marks.is_empty() {
        paragraph.add_run(format!("  {marks}")).italic();
    }
    doc.push_paragraph(paragraph);
}

/// Marks label for a question: empty at zero, singular at exactly one.
fn marks_label(marks: f64) -> String {
    if marks == 0.0 {
        return String::new();
    }
    let plural = if marks == 1.0 { "" } else { "s" };
    format!("[{} mark{plural}]", display_number(marks))
}
