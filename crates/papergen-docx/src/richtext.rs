//! Rich-text tree compiler.
//!
//! Maps the editor's tagged tree onto document blocks by pure structural
//! recursion. Unknown node kinds are no-ops so upstream schema additions
//! never fail a render. Nested lists are intentionally collapsed: each
//! top-level list item becomes one list paragraph carrying the item's
//! flattened text, sub-list structure included only as concatenated text.

use crate::assets::AssetStore;
use crate::docx::{inches_to_emu, Document, ListKind, Paragraph};
use log::debug;
use papergen_core::{Mark, Result, RichTextNode};

/// Display width for an inline image, narrower than a standalone question
/// image.
const INLINE_IMAGE_WIDTH_IN: f64 = 3.0;

/// Append the subtree rooted at `node` to the document under construction.
pub(crate) fn compile_into(
    doc: &mut Document,
    node: &RichTextNode,
    assets: &AssetStore,
) -> Result<()> {
    match node {
        RichTextNode::Doc { content } => {
            for child in content {
                compile_into(doc, child, assets)?;
            }
        }
        RichTextNode::Paragraph { content } => compile_paragraph(doc, content, assets)?,
        RichTextNode::Heading { attrs, .. } => {
            doc.add_heading(&node.plain_text(), attrs.level.clamp(1, 6));
        }
        RichTextNode::BulletList { content } => {
            for item in content {
                doc.add_list_paragraph(&item.plain_text(), ListKind::Bullet);
            }
        }
        RichTextNode::OrderedList { content } => {
            for item in content {
                doc.add_list_paragraph(&item.plain_text(), ListKind::Numbered);
            }
        }
        RichTextNode::Table { content } => compile_table(doc, content),
        other => {
            debug!("ignoring unsupported block node: {}", kind_name(other));
        }
    }
    Ok(())
}

fn compile_paragraph(
    doc: &mut Document,
    content: &[RichTextNode],
    assets: &AssetStore,
) -> Result<()> {
    let mut paragraph = Paragraph::new();
    for child in content {
        match child {
            RichTextNode::Text { text, marks } => {
                let run = paragraph.add_run(text.clone());
                for mark in marks {
                    match mark {
                        Mark::Bold => {
                            run.bold();
                        }
                        Mark::Italic => {
                            run.italic();
                        }
                        Mark::Underline => {
                            run.underline();
                        }
                        Mark::Other => {}
                    }
                }
            }
            RichTextNode::Image { attrs } => {
                // Unresolvable inline images are skipped, not errored.
                if let Some(bytes) = assets.resolve(&attrs.src) {
                    let image = doc.register_image(bytes, inches_to_emu(INLINE_IMAGE_WIDTH_IN))?;
                    paragraph.add_image_run(image);
                }
            }
            other => {
                debug!("ignoring unsupported inline node: {}", kind_name(other));
            }
        }
    }
    doc.push_paragraph(paragraph);
    Ok(())
}

/// Children are taken as rows; the column count is the widest row. Short
/// rows pad with blank cells; a table with no rows or no cells is skipped
/// whole.
fn compile_table(doc: &mut Document, rows: &[RichTextNode]) {
    let columns = rows
        .iter()
        .map(|row| row.children().len())
        .max()
        .unwrap_or(0);
    if rows.is_empty() || columns == 0 {
        return;
    }
    let grid = rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row
                .children()
                .iter()
                .map(RichTextNode::plain_text)
                .collect();
            cells.resize(columns, String::new());
            cells
        })
        .collect();
    doc.add_table(grid);
}

fn kind_name(node: &RichTextNode) -> &'static str {
    match node {
        RichTextNode::Doc { .. } => "doc",
        RichTextNode::Paragraph { .. } => "paragraph",
        RichTextNode::Heading { .. } => "heading",
        RichTextNode::BulletList { .. } => "bulletList",
        RichTextNode::OrderedList { .. } => "orderedList",
        RichTextNode::ListItem { .. } => "listItem",
        RichTextNode::Table { .. } => "table",
        RichTextNode::TableRow { .. } => "tableRow",
        RichTextNode::TableCell { .. } => "tableCell",
        RichTextNode::Text { .. } => "text",
        RichTextNode::Image { .. } => "image",
        RichTextNode::Unknown => "unknown",
    }
}
