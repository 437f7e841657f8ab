//! Minimal WordprocessingML writer.
//!
//! An in-memory document model with a small mutation API, serialized to a
//! complete OPC package on [`Document::to_bytes`]. The model is deliberately
//! limited to what exam papers need: styled paragraphs and runs, bullet and
//! numbered list paragraphs, plain-text table grids, inline images, page
//! geometry, and running header/footer text.
//!
//! ## Package layout
//!
//! | Part | Content |
//! |------|---------|
//! | `word/document.xml` | Body blocks and section geometry |
//! | `word/styles.xml` | Base font plus `Title`/`Heading1`-`Heading6` |
//! | `word/numbering.xml` | Bullet and decimal list definitions |
//! | `word/header1.xml`, `word/footer1.xml` | Running text, when set |
//! | `word/media/*` | Registered images |
//! | `docProps/core.xml` | Title and timestamps |
//!
//! Geometry uses the format's native units: twentieths of a point for page
//! margins, half-points for font sizes, EMUs for drawing extents.

mod package;
mod xml;

use image::{ImageFormat, ImageReader};
use papergen_core::{PapergenError, Result};
use std::io::Cursor;

/// English Metric Units per inch, the extent unit of embedded drawings.
const EMU_PER_INCH: f64 = 914_400.0;

/// Convert a display size in inches to EMUs.
#[inline]
#[must_use = "returns the size in EMUs"]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Left-aligned (the document default)
    Left,
    /// Centered
    Center,
    /// Right-aligned
    Right,
}

impl Alignment {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// List style of a list paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Bulleted list
    Bullet,
    /// Decimal-numbered list
    Numbered,
}

impl ListKind {
    /// Numbering definition referenced from the paragraph properties.
    pub(crate) const fn num_id(self) -> u32 {
        match self {
            Self::Bullet => 1,
            Self::Numbered => 2,
        }
    }
}

/// Character formatting of a run. Flags are independent and combinable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunProps {
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Single underline
    pub underline: bool,
    /// Font size override in points; `None` inherits the document default
    pub size_pt: Option<u32>,
}

impl RunProps {
    pub(crate) fn any(self) -> bool {
        self.bold || self.italic || self.underline || self.size_pt.is_some()
    }
}

/// Handle to a registered media image, carrying its display extent.
#[derive(Debug, Clone, Copy)]
pub struct ImageRef {
    pub(crate) media_index: usize,
    pub(crate) width_emu: i64,
    pub(crate) height_emu: i64,
}

#[derive(Debug, Clone)]
pub(crate) enum RunContent {
    Text(String),
    Image(ImageRef),
}

/// One run: a stretch of identically formatted text, or an inline image.
#[derive(Debug, Clone)]
pub struct Run {
    pub(crate) props: RunProps,
    pub(crate) content: RunContent,
}

impl Run {
    /// Make the run bold.
    pub fn bold(&mut self) -> &mut Self {
        self.props.bold = true;
        self
    }

    /// Make the run italic.
    pub fn italic(&mut self) -> &mut Self {
        self.props.italic = true;
        self
    }

    /// Underline the run.
    pub fn underline(&mut self) -> &mut Self {
        self.props.underline = true;
        self
    }

    /// Override the run's font size in points.
    pub fn size_pt(&mut self, points: u32) -> &mut Self {
        self.props.size_pt = Some(points);
        self
    }
}

/// One paragraph: block-level properties plus an ordered run sequence.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    pub(crate) style_id: Option<String>,
    pub(crate) alignment: Option<Alignment>,
    pub(crate) list: Option<ListKind>,
    pub(crate) bottom_border: bool,
    pub(crate) runs: Vec<Run>,
}

impl Paragraph {
    /// An empty paragraph with default properties.
    #[must_use = "returns a new paragraph"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference a named paragraph style (`Title`, `Heading2`, ...).
    #[must_use = "returns the styled paragraph"]
    pub fn style(mut self, id: impl Into<String>) -> Self {
        self.style_id = Some(id.into());
        self
    }

    /// Set the paragraph alignment.
    #[must_use = "returns the aligned paragraph"]
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Turn the paragraph into a list paragraph of the given kind.
    #[must_use = "returns the list paragraph"]
    pub fn list(mut self, kind: ListKind) -> Self {
        self.list = Some(kind);
        self
    }

    /// Draw only a bottom border, making the paragraph a horizontal rule.
    #[must_use = "returns the bordered paragraph"]
    pub fn bottom_border(mut self) -> Self {
        self.bottom_border = true;
        self
    }

    /// Append a text run and return it for formatting.
    pub fn add_run(&mut self, text: impl Into<String>) -> &mut Run {
        self.runs.push(Run {
            props: RunProps::default(),
            content: RunContent::Text(text.into()),
        });
        self.runs.last_mut().expect("run was just pushed")
    }

    /// Append an inline image run.
    pub fn add_image_run(&mut self, image: ImageRef) {
        self.runs.push(Run {
            props: RunProps::default(),
            content: RunContent::Image(image),
        });
    }
}

/// A table of plain-text cells rendered with visible grid lines.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub(crate) rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub(crate) enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 1.0,
            bottom: 1.0,
            left: 1.0,
            right: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MediaImage {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
    pub content_type: &'static str,
}

/// A document under construction.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) font_family: String,
    pub(crate) font_size_pt: u32,
    pub(crate) margins: Margins,
    pub(crate) header_text: Option<String>,
    pub(crate) footer_text: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) blocks: Vec<Block>,
    pub(crate) media: Vec<MediaImage>,
}

impl Document {
    /// An empty document with the given base font.
    #[must_use = "returns a new empty document"]
    pub fn new(font_family: impl Into<String>, font_size_pt: u32) -> Self {
        Self {
            font_family: font_family.into(),
            font_size_pt,
            margins: Margins::default(),
            header_text: None,
            footer_text: None,
            title: None,
            blocks: Vec::new(),
            media: Vec::new(),
        }
    }

    /// Set the page margins, in inches.
    pub fn set_margins(&mut self, top: f64, bottom: f64, left: f64, right: f64) {
        self.margins = Margins {
            top,
            bottom,
            left,
            right,
        };
    }

    /// Set the running page-header text, centered.
    pub fn set_header_text(&mut self, text: impl Into<String>) {
        self.header_text = Some(text.into());
    }

    /// Set the running page-footer text, centered.
    pub fn set_footer_text(&mut self, text: impl Into<String>) {
        self.footer_text = Some(text.into());
    }

    /// Set the package title property.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Append a built paragraph.
    pub fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    /// Append a plain paragraph with one unformatted run.
    pub fn add_paragraph(&mut self, text: &str) {
        let mut paragraph = Paragraph::new();
        if !text.is_empty() {
            paragraph.add_run(text);
        }
        self.push_paragraph(paragraph);
    }

    /// Append a heading. Level 0 is the title style; levels 1-6 map to the
    /// corresponding heading styles.
    pub fn add_heading(&mut self, text: &str, level: u8) {
        let style_id = if level == 0 {
            "Title".to_string()
        } else {
            format!("Heading{}", level.clamp(1, 6))
        };
        let mut paragraph = Paragraph::new().style(style_id);
        if !text.is_empty() {
            paragraph.add_run(text);
        }
        self.push_paragraph(paragraph);
    }

    /// Append one list paragraph of the given kind.
    pub fn add_list_paragraph(&mut self, text: &str, kind: ListKind) {
        let mut paragraph = Paragraph::new().list(kind);
        if !text.is_empty() {
            paragraph.add_run(text);
        }
        self.push_paragraph(paragraph);
    }

    /// Append a table of plain-text cells. Rows may be ragged; short rows
    /// are padded with blank cells up to the widest row.
    pub fn add_table(&mut self, rows: Vec<Vec<String>>) {
        self.blocks.push(Block::Table(Table { rows }));
    }

    /// Register image bytes as a media part and compute its display extent.
    ///
    /// The height is derived from the image's intrinsic pixel dimensions so
    /// a fixed display width keeps the aspect ratio. Bytes that do not
    /// decode as a supported image format are a render failure — callers
    /// wanting the silent-skip behavior must decide it *before* registering
    /// (a missing asset never reaches this point).
    pub fn register_image(&mut self, bytes: Vec<u8>, width_emu: i64) -> Result<ImageRef> {
        let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| PapergenError::InvalidImage(format!("unreadable image data: {e}")))?;
        let format = reader
            .format()
            .ok_or_else(|| PapergenError::InvalidImage("unrecognized image format".to_string()))?;
        let (extension, content_type) = match format {
            ImageFormat::Png => ("png", "image/png"),
            ImageFormat::Jpeg => ("jpeg", "image/jpeg"),
            ImageFormat::Gif => ("gif", "image/gif"),
            ImageFormat::WebP => ("webp", "image/webp"),
            other => {
                return Err(PapergenError::InvalidImage(format!(
                    "unsupported image format {other:?}"
                )))
            }
        };
        let (px_width, px_height) = reader
            .into_dimensions()
            .map_err(|e| PapergenError::InvalidImage(format!("undecodable image: {e}")))?;
        if px_width == 0 || px_height == 0 {
            return Err(PapergenError::InvalidImage(
                "image has a zero dimension".to_string(),
            ));
        }

        let height_emu =
            ((width_emu as f64) * f64::from(px_height) / f64::from(px_width)).round() as i64;
        self.media.push(MediaImage {
            bytes,
            extension,
            content_type,
        });
        Ok(ImageRef {
            media_index: self.media.len() - 1,
            width_emu,
            height_emu,
        })
    }

    /// Serialize the document as a complete package.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(package::write_package(self)?)
    }
}
