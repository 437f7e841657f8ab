//! Exam paper domain records: questions, styling, and header metadata.
//!
//! These records are constructed by the persistence/HTTP layer before a
//! render call and are read-only input to the compiler. Serde shapes match
//! the JSON the upstream editor and store exchange, with the question kind
//! discriminated by a `type` tag.

use crate::richtext::RichTextNode;
use serde::{Deserialize, Serialize};

/// A single option in a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McqOption {
    /// Display label, conventionally "A"-"D"
    pub label: String,
    /// Option text
    pub text: String,
    /// Answer-key-only flag; never rendered into the paper itself
    #[serde(default)]
    pub is_correct: bool,
}

/// A question of any kind, discriminated by the `type` tag.
///
/// All kinds share `id`, `section`, and `marks`. The domain convention for
/// MCQs is four options, but any count is accepted and rendered as given;
/// zero options flagged correct is the valid "answer key not ready" state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Question {
    /// Free-form rich-text question
    Text {
        /// Stable question identifier
        #[serde(default)]
        id: String,
        /// Section label; empty means no section
        #[serde(default)]
        section: String,
        /// Marks awarded, non-negative
        #[serde(default)]
        marks: f64,
        /// Question body as an editor tree
        content: RichTextNode,
    },
    /// Multiple-choice question with a rich-text stem
    Mcq {
        /// Stable question identifier
        #[serde(default)]
        id: String,
        /// Section label; empty means no section
        #[serde(default)]
        section: String,
        /// Marks awarded, non-negative
        #[serde(default)]
        marks: f64,
        /// Question stem as an editor tree
        stem: RichTextNode,
        /// Ordered options
        #[serde(default)]
        options: Vec<McqOption>,
    },
    /// Question whose body contains a table node
    Table {
        /// Stable question identifier
        #[serde(default)]
        id: String,
        /// Section label; empty means no section
        #[serde(default)]
        section: String,
        /// Marks awarded, non-negative
        #[serde(default)]
        marks: f64,
        /// Question body as an editor tree
        content: RichTextNode,
    },
    /// Question that displays an uploaded image with an optional caption
    Image {
        /// Stable question identifier
        #[serde(default)]
        id: String,
        /// Section label; empty means no section
        #[serde(default)]
        section: String,
        /// Marks awarded, non-negative
        #[serde(default)]
        marks: f64,
        /// Filename reference into the asset store
        filename: String,
        /// Caption rendered beneath the image; empty means none
        #[serde(default)]
        caption: String,
    },
}

impl Question {
    /// Stable identifier shared by all question kinds.
    #[must_use = "returns the question id"]
    pub fn id(&self) -> &str {
        match self {
            Self::Text { id, .. }
            | Self::Mcq { id, .. }
            | Self::Table { id, .. }
            | Self::Image { id, .. } => id,
        }
    }

    /// Section label; empty means the question belongs to no section.
    #[must_use = "returns the section label"]
    pub fn section(&self) -> &str {
        match self {
            Self::Text { section, .. }
            | Self::Mcq { section, .. }
            | Self::Table { section, .. }
            | Self::Image { section, .. } => section,
        }
    }

    /// Marks awarded for the question.
    #[must_use = "returns the marks value"]
    pub fn marks(&self) -> f64 {
        match self {
            Self::Text { marks, .. }
            | Self::Mcq { marks, .. }
            | Self::Table { marks, .. }
            | Self::Image { marks, .. } => *marks,
        }
    }
}

/// Per-paper styling configuration, immutable for the duration of a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperStyle {
    /// Base font family applied to the default paragraph formatting
    pub font_family: String,
    /// Base font size in points
    pub font_size: u32,
    /// Logo reference into the asset store; absent means no logo
    pub logo_filename: Option<String>,
    /// Free text for the running page header; empty means none
    pub header_text: String,
    /// Free text for the running page footer; empty means none
    pub footer_text: String,
    /// Top page margin in inches
    pub margin_top: f64,
    /// Bottom page margin in inches
    pub margin_bottom: f64,
    /// Left page margin in inches
    pub margin_left: f64,
    /// Right page margin in inches
    pub margin_right: f64,
    /// Accent color as a `#rrggbb` hex string
    pub accent_color: String,
}

impl Default for PaperStyle {
    fn default() -> Self {
        Self {
            font_family: "Times New Roman".to_string(),
            font_size: 12,
            logo_filename: None,
            header_text: String::new(),
            footer_text: String::new(),
            margin_top: 1.0,
            margin_bottom: 1.0,
            margin_left: 1.25,
            margin_right: 1.25,
            accent_color: "#000000".to_string(),
        }
    }
}

/// Metadata shown in the formatted paper's institutional header block.
///
/// Every field is optional in the sense that an empty value suppresses the
/// corresponding header line or detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperHeader {
    /// Institution name
    pub institution: String,
    /// Exam title
    pub title: String,
    /// Subject line
    pub subject: String,
    /// Exam date as free text
    pub date: String,
    /// Exam duration as free text
    pub duration: String,
    /// Total marks; zero suppresses the detail
    pub total_marks: f64,
}

/// A complete exam paper: header metadata, ordered questions, and styling.
///
/// The unit of work handed to the compiler. Owned by the caller; the
/// compiler only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paper {
    /// Stable paper identifier
    pub id: String,
    /// Creation timestamp as stored upstream
    pub created_at: String,
    /// Last-update timestamp as stored upstream
    pub updated_at: String,
    /// Header metadata
    pub header: PaperHeader,
    /// Questions in render order
    pub questions: Vec<Question>,
    /// Styling configuration
    pub style: PaperStyle,
}

/// Lightweight paper view used in listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperSummary {
    /// Stable paper identifier
    pub id: String,
    /// Exam title
    pub title: String,
    /// Subject line
    pub subject: String,
    /// Last-update timestamp as stored upstream
    pub updated_at: String,
}

/// Format a non-negative number, dropping the decimal point when its
/// fractional part is exactly zero (`100.0` displays as `"100"`, `2.5` as
/// `"2.5"`).
#[inline]
#[must_use = "returns the formatted number"]
pub fn display_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
