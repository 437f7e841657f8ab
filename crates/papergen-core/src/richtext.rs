//! Rich-text tree model mirroring the editor's JSON document format.
//!
//! The web editor serializes content as a recursive tagged tree:
//!
//! ```json
//! {
//!   "type": "doc",
//!   "content": [
//!     {
//!       "type": "paragraph",
//!       "content": [
//!         { "type": "text", "text": "Define ", "marks": [{ "type": "bold" }] },
//!         { "type": "text", "text": "osmosis." }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! This module mirrors that schema as a closed enum so the compiler can match
//! exhaustively on node kinds, while still tolerating kinds added upstream:
//! an unrecognized `type` deserializes to [`RichTextNode::Unknown`] and the
//! whole subtree renders as a no-op rather than erroring.

use serde::{Deserialize, Serialize};

/// Inline formatting mark carried by a [`RichTextNode::Text`] node.
///
/// Marks are independent and combinable; a run may be bold, italic, and
/// underlined at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    /// Bold text
    Bold,
    /// Italic text
    Italic,
    /// Underlined text
    Underline,
    /// Any mark kind this compiler does not style (links, highlights, ...)
    #[serde(other)]
    Other,
}

/// Attributes of a [`RichTextNode::Heading`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingAttrs {
    /// Heading level 1-6; the editor defaults omitted levels to 1.
    #[serde(default = "default_heading_level")]
    pub level: u8,
}

impl Default for HeadingAttrs {
    #[inline]
    fn default() -> Self {
        Self { level: 1 }
    }
}

const fn default_heading_level() -> u8 {
    1
}

/// Attributes of a [`RichTextNode::Image`] node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttrs {
    /// Source reference: an upload URL or a bare filename.
    #[serde(default)]
    pub src: String,
}

/// One node of the editor's rich-text tree, tagged by `type`.
///
/// Container variants carry an ordered `content` sequence; leaf variants
/// carry only their own attributes. The tree is finite and acyclic — the
/// upstream editor guarantees that and it is not re-verified here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RichTextNode {
    /// Document root
    Doc {
        /// Child nodes in document order
        #[serde(default)]
        content: Vec<RichTextNode>,
    },
    /// Paragraph of inline content (text runs, inline images)
    Paragraph {
        /// Child nodes in document order
        #[serde(default)]
        content: Vec<RichTextNode>,
    },
    /// Heading with a declared level
    Heading {
        /// Node attributes (level)
        #[serde(default)]
        attrs: HeadingAttrs,
        /// Child nodes in document order
        #[serde(default)]
        content: Vec<RichTextNode>,
    },
    /// Unordered list of list items
    BulletList {
        /// List item children
        #[serde(default)]
        content: Vec<RichTextNode>,
    },
    /// Ordered list of list items
    OrderedList {
        /// List item children
        #[serde(default)]
        content: Vec<RichTextNode>,
    },
    /// One item inside a bullet or ordered list
    ListItem {
        /// Child nodes (paragraphs, nested lists)
        #[serde(default)]
        content: Vec<RichTextNode>,
    },
    /// Table whose children are rows
    Table {
        /// Row children
        #[serde(default)]
        content: Vec<RichTextNode>,
    },
    /// One table row whose children are cells
    TableRow {
        /// Cell children
        #[serde(default)]
        content: Vec<RichTextNode>,
    },
    /// One table cell
    TableCell {
        /// Child nodes in document order
        #[serde(default)]
        content: Vec<RichTextNode>,
    },
    /// Text leaf with optional formatting marks
    Text {
        /// The text content
        #[serde(default)]
        text: String,
        /// Formatting marks, independent and combinable
        #[serde(default)]
        marks: Vec<Mark>,
    },
    /// Inline or block image reference
    Image {
        /// Node attributes (source reference)
        #[serde(default)]
        attrs: ImageAttrs,
    },
    /// Any node kind this compiler does not recognize.
    ///
    /// The whole subtree is dropped at deserialization time and renders as a
    /// no-op, keeping the compiler forward-compatible with editor schema
    /// additions.
    #[serde(other)]
    Unknown,
}

impl RichTextNode {
    /// Child nodes of a container variant, empty for leaves.
    #[must_use = "returns the node's children"]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Doc { content }
            | Self::Paragraph { content }
            | Self::Heading { content, .. }
            | Self::BulletList { content }
            | Self::OrderedList { content }
            | Self::ListItem { content }
            | Self::Table { content }
            | Self::TableRow { content }
            | Self::TableCell { content } => content,
            Self::Text { .. } | Self::Image { .. } | Self::Unknown => &[],
        }
    }

    /// Flattened plain-text content of the subtree.
    ///
    /// A [`Self::Text`] node yields its string; any other node concatenates
    /// the flattened text of its children in order, ignoring marks. Used
    /// wherever a plain-text summary is required (headings, list items,
    /// table cells).
    #[must_use = "returns the flattened text"]
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text { text, .. } => text.clone(),
            node => node.children().iter().map(Self::plain_text).collect(),
        }
    }

    /// An empty document root.
    #[inline]
    #[must_use = "returns a new empty document node"]
    pub const fn empty_doc() -> Self {
        Self::Doc { content: Vec::new() }
    }
}
