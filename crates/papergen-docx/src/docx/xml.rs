//! WordprocessingML part markup.
//!
//! Streams the `word/*` parts as XML events. The document body is written
//! block by block; the section properties trail the body with the page
//! geometry:
//!
//! ```xml
//! <w:body>
//!   <w:p>
//!     <w:pPr><w:jc w:val="center"/></w:pPr>
//!     <w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">...</w:t></w:r>
//!   </w:p>
//!   <w:sectPr>
//!     <w:pgSz w:w="12240" w:h="15840"/>
//!     <w:pgMar w:top="1440" w:right="1800" w:bottom="1440" w:left="1800" .../>
//!   </w:sectPr>
//! </w:body>
//! ```

// Clippy pedantic allows:
// - XML part writers are necessarily long
#![allow(clippy::too_many_lines)]

use super::package::{media_rel_id, REL_FOOTER, REL_HEADER};
use super::{Block, Document, ImageRef, Margins, Paragraph, Run, RunContent, Table};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

/// Twentieths of a point per inch, the unit of page geometry.
const TWIPS_PER_INCH: f64 = 1_440.0;

/// Letter page extent in twips.
const PAGE_WIDTH_TWIPS: i64 = 12_240;
const PAGE_HEIGHT_TWIPS: i64 = 15_840;

/// Font size step above the base size per heading style, `Heading1`-`Heading6`.
const HEADING_SIZE_STEPS: [u32; 6] = [8, 6, 4, 3, 2, 1];
/// Font size step above the base size for the `Title` style.
const TITLE_SIZE_STEP: u32 = 10;

pub(super) type XmlWriter = Writer<Vec<u8>>;

#[inline]
fn inches_to_twips(inches: f64) -> i64 {
    (inches * TWIPS_PER_INCH).round() as i64
}

pub(super) fn new_writer() -> Result<XmlWriter> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(writer)
}

pub(super) fn start(writer: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(name);
    for attr in attrs {
        elem.push_attribute(*attr);
    }
    writer.write_event(Event::Start(elem))?;
    Ok(())
}

pub(super) fn empty(writer: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(name);
    for attr in attrs {
        elem.push_attribute(*attr);
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

pub(super) fn end(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub(super) fn text(writer: &mut XmlWriter, value: &str) -> Result<()> {
    writer.write_event(Event::Text(BytesText::new(value)))?;
    Ok(())
}

/// `<name xml:space="preserve">value</name>`, keeping significant spaces.
fn preserved_text(writer: &mut XmlWriter, name: &str, value: &str) -> Result<()> {
    start(writer, name, &[("xml:space", "preserve")])?;
    text(writer, value)?;
    end(writer, name)
}

// ========================================================================
// word/document.xml
// ========================================================================

pub(super) fn document_xml(doc: &Document) -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    start(
        &mut w,
        "w:document",
        &[
            ("xmlns:w", NS_W),
            ("xmlns:r", NS_R),
            ("xmlns:wp", NS_WP),
            ("xmlns:a", NS_A),
            ("xmlns:pic", NS_PIC),
        ],
    )?;
    start(&mut w, "w:body", &[])?;
    for block in &doc.blocks {
        match block {
            Block::Paragraph(paragraph) => write_paragraph(&mut w, paragraph)?,
            Block::Table(table) => write_table(&mut w, table, doc.margins)?,
        }
    }
    write_sect_pr(&mut w, doc)?;
    end(&mut w, "w:body")?;
    end(&mut w, "w:document")?;
    Ok(w.into_inner())
}

fn write_sect_pr(w: &mut XmlWriter, doc: &Document) -> Result<()> {
    start(w, "w:sectPr", &[])?;
    if doc.header_text.is_some() {
        empty(w, "w:headerReference", &[("w:type", "default"), ("r:id", REL_HEADER)])?;
    }
    if doc.footer_text.is_some() {
        empty(w, "w:footerReference", &[("w:type", "default"), ("r:id", REL_FOOTER)])?;
    }
    empty(
        w,
        "w:pgSz",
        &[
            ("w:w", &PAGE_WIDTH_TWIPS.to_string()),
            ("w:h", &PAGE_HEIGHT_TWIPS.to_string()),
        ],
    )?;
    let margins = doc.margins;
    empty(
        w,
        "w:pgMar",
        &[
            ("w:top", &inches_to_twips(margins.top).to_string()),
            ("w:right", &inches_to_twips(margins.right).to_string()),
            ("w:bottom", &inches_to_twips(margins.bottom).to_string()),
            ("w:left", &inches_to_twips(margins.left).to_string()),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    end(w, "w:sectPr")
}

fn write_paragraph(w: &mut XmlWriter, paragraph: &Paragraph) -> Result<()> {
    start(w, "w:p", &[])?;
    let has_props = paragraph.style_id.is_some()
        || paragraph.alignment.is_some()
        || paragraph.list.is_some()
        || paragraph.bottom_border;
    if has_props {
        start(w, "w:pPr", &[])?;
        if let Some(style_id) = &paragraph.style_id {
            empty(w, "w:pStyle", &[("w:val", style_id.as_str())])?;
        }
        if let Some(kind) = paragraph.list {
            start(w, "w:numPr", &[])?;
            empty(w, "w:ilvl", &[("w:val", "0")])?;
            empty(w, "w:numId", &[("w:val", &kind.num_id().to_string())])?;
            end(w, "w:numPr")?;
        }
        if paragraph.bottom_border {
            // A bottom border with no other sides renders as a horizontal rule.
            start(w, "w:pBdr", &[])?;
            empty(
                w,
                "w:bottom",
                &[
                    ("w:val", "single"),
                    ("w:sz", "6"),
                    ("w:space", "1"),
                    ("w:color", "auto"),
                ],
            )?;
            end(w, "w:pBdr")?;
        }
        if let Some(alignment) = paragraph.alignment {
            empty(w, "w:jc", &[("w:val", alignment.as_str())])?;
        }
        end(w, "w:pPr")?;
    }
    for run in &paragraph.runs {
        write_run(w, run)?;
    }
    end(w, "w:p")
}

fn write_run(w: &mut XmlWriter, run: &Run) -> Result<()> {
    start(w, "w:r", &[])?;
    if run.props.any() {
        start(w, "w:rPr", &[])?;
        if run.props.bold {
            empty(w, "w:b", &[])?;
        }
        if run.props.italic {
            empty(w, "w:i", &[])?;
        }
        if let Some(points) = run.props.size_pt {
            let half_points = (points * 2).to_string();
            empty(w, "w:sz", &[("w:val", half_points.as_str())])?;
            empty(w, "w:szCs", &[("w:val", half_points.as_str())])?;
        }
        if run.props.underline {
            empty(w, "w:u", &[("w:val", "single")])?;
        }
        end(w, "w:rPr")?;
    }
    match &run.content {
        RunContent::Text(value) => preserved_text(w, "w:t", value)?,
        RunContent::Image(image) => write_inline_image(w, image)?,
    }
    end(w, "w:r")
}

fn write_inline_image(w: &mut XmlWriter, image: &ImageRef) -> Result<()> {
    let cx = image.width_emu.to_string();
    let cy = image.height_emu.to_string();
    let doc_pr_id = (image.media_index + 1).to_string();
    let name = format!("Picture {doc_pr_id}");
    let rel_id = media_rel_id(image.media_index);

    start(w, "w:drawing", &[])?;
    start(
        w,
        "wp:inline",
        &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
    )?;
    empty(w, "wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    empty(
        w,
        "wp:docPr",
        &[("id", doc_pr_id.as_str()), ("name", name.as_str())],
    )?;
    start(w, "a:graphic", &[])?;
    start(w, "a:graphicData", &[("uri", NS_PIC)])?;
    start(w, "pic:pic", &[])?;
    start(w, "pic:nvPicPr", &[])?;
    empty(
        w,
        "pic:cNvPr",
        &[("id", doc_pr_id.as_str()), ("name", name.as_str())],
    )?;
    empty(w, "pic:cNvPicPr", &[])?;
    end(w, "pic:nvPicPr")?;
    start(w, "pic:blipFill", &[])?;
    empty(w, "a:blip", &[("r:embed", rel_id.as_str())])?;
    start(w, "a:stretch", &[])?;
    empty(w, "a:fillRect", &[])?;
    end(w, "a:stretch")?;
    end(w, "pic:blipFill")?;
    start(w, "pic:spPr", &[])?;
    start(w, "a:xfrm", &[])?;
    empty(w, "a:off", &[("x", "0"), ("y", "0")])?;
    empty(w, "a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    end(w, "a:xfrm")?;
    start(w, "a:prstGeom", &[("prst", "rect")])?;
    empty(w, "a:avLst", &[])?;
    end(w, "a:prstGeom")?;
    end(w, "pic:spPr")?;
    end(w, "pic:pic")?;
    end(w, "a:graphicData")?;
    end(w, "a:graphic")?;
    end(w, "wp:inline")?;
    end(w, "w:drawing")
}

fn write_table(w: &mut XmlWriter, table: &Table, margins: Margins) -> Result<()> {
    let columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
    if table.rows.is_empty() || columns == 0 {
        return Ok(());
    }

    // Share the usable width between the margins evenly across columns.
    let usable_twips =
        PAGE_WIDTH_TWIPS - inches_to_twips(margins.left) - inches_to_twips(margins.right);
    let column_twips = (usable_twips / columns as i64).max(1).to_string();

    start(w, "w:tbl", &[])?;
    start(w, "w:tblPr", &[])?;
    empty(w, "w:tblW", &[("w:w", "0"), ("w:type", "auto")])?;
    start(w, "w:tblBorders", &[])?;
    for side in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        let name = format!("w:{side}");
        empty(
            w,
            &name,
            &[
                ("w:val", "single"),
                ("w:sz", "4"),
                ("w:space", "0"),
                ("w:color", "auto"),
            ],
        )?;
    }
    end(w, "w:tblBorders")?;
    end(w, "w:tblPr")?;

    start(w, "w:tblGrid", &[])?;
    for _ in 0..columns {
        empty(w, "w:gridCol", &[("w:w", column_twips.as_str())])?;
    }
    end(w, "w:tblGrid")?;

    for row in &table.rows {
        start(w, "w:tr", &[])?;
        for column in 0..columns {
            let cell_text = row.get(column).map(String::as_str).unwrap_or("");
            start(w, "w:tc", &[])?;
            start(w, "w:tcPr", &[])?;
            empty(
                w,
                "w:tcW",
                &[("w:w", column_twips.as_str()), ("w:type", "dxa")],
            )?;
            end(w, "w:tcPr")?;
            start(w, "w:p", &[])?;
            if !cell_text.is_empty() {
                start(w, "w:r", &[])?;
                preserved_text(w, "w:t", cell_text)?;
                end(w, "w:r")?;
            }
            end(w, "w:p")?;
            end(w, "w:tc")?;
        }
        end(w, "w:tr")?;
    }
    end(w, "w:tbl")
}

// ========================================================================
// word/styles.xml
// ========================================================================

pub(super) fn styles_xml(doc: &Document) -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    start(&mut w, "w:styles", &[("xmlns:w", NS_W)])?;

    // Base font for everything that does not override it.
    let base_half_points = (doc.font_size_pt * 2).to_string();
    start(&mut w, "w:docDefaults", &[])?;
    start(&mut w, "w:rPrDefault", &[])?;
    start(&mut w, "w:rPr", &[])?;
    let family = doc.font_family.as_str();
    empty(
        &mut w,
        "w:rFonts",
        &[
            ("w:ascii", family),
            ("w:hAnsi", family),
            ("w:eastAsia", family),
            ("w:cs", family),
        ],
    )?;
    empty(&mut w, "w:sz", &[("w:val", base_half_points.as_str())])?;
    empty(&mut w, "w:szCs", &[("w:val", base_half_points.as_str())])?;
    end(&mut w, "w:rPr")?;
    end(&mut w, "w:rPrDefault")?;
    empty(&mut w, "w:pPrDefault", &[])?;
    end(&mut w, "w:docDefaults")?;

    start(
        &mut w,
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    empty(&mut w, "w:name", &[("w:val", "Normal")])?;
    end(&mut w, "w:style")?;

    write_heading_style(&mut w, "Title", doc.font_size_pt + TITLE_SIZE_STEP)?;
    for (index, step) in HEADING_SIZE_STEPS.iter().enumerate() {
        let style_id = format!("Heading{}", index + 1);
        write_heading_style(&mut w, &style_id, doc.font_size_pt + step)?;
    }

    end(&mut w, "w:styles")?;
    Ok(w.into_inner())
}

fn write_heading_style(w: &mut XmlWriter, style_id: &str, size_pt: u32) -> Result<()> {
    let half_points = (size_pt * 2).to_string();
    start(
        w,
        "w:style",
        &[("w:type", "paragraph"), ("w:styleId", style_id)],
    )?;
    empty(w, "w:name", &[("w:val", style_id)])?;
    empty(w, "w:basedOn", &[("w:val", "Normal")])?;
    start(w, "w:pPr", &[])?;
    empty(w, "w:spacing", &[("w:before", "240"), ("w:after", "120")])?;
    end(w, "w:pPr")?;
    start(w, "w:rPr", &[])?;
    empty(w, "w:b", &[])?;
    empty(w, "w:sz", &[("w:val", half_points.as_str())])?;
    empty(w, "w:szCs", &[("w:val", half_points.as_str())])?;
    end(w, "w:rPr")?;
    end(w, "w:style")
}

// ========================================================================
// word/numbering.xml
// ========================================================================

pub(super) fn numbering_xml() -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    start(&mut w, "w:numbering", &[("xmlns:w", NS_W)])?;
    write_abstract_num(&mut w, "0", "bullet", "\u{2022}")?;
    write_abstract_num(&mut w, "1", "decimal", "%1.")?;
    for (num_id, abstract_id) in [("1", "0"), ("2", "1")] {
        start(&mut w, "w:num", &[("w:numId", num_id)])?;
        empty(&mut w, "w:abstractNumId", &[("w:val", abstract_id)])?;
        end(&mut w, "w:num")?;
    }
    end(&mut w, "w:numbering")?;
    Ok(w.into_inner())
}

fn write_abstract_num(
    w: &mut XmlWriter,
    abstract_id: &str,
    format: &str,
    level_text: &str,
) -> Result<()> {
    start(w, "w:abstractNum", &[("w:abstractNumId", abstract_id)])?;
    empty(w, "w:multiLevelType", &[("w:val", "singleLevel")])?;
    start(w, "w:lvl", &[("w:ilvl", "0")])?;
    empty(w, "w:start", &[("w:val", "1")])?;
    empty(w, "w:numFmt", &[("w:val", format)])?;
    empty(w, "w:lvlText", &[("w:val", level_text)])?;
    empty(w, "w:lvlJc", &[("w:val", "left")])?;
    start(w, "w:pPr", &[])?;
    empty(w, "w:ind", &[("w:left", "720"), ("w:hanging", "360")])?;
    end(w, "w:pPr")?;
    end(w, "w:lvl")?;
    end(w, "w:abstractNum")
}

// ========================================================================
// word/header1.xml and word/footer1.xml
// ========================================================================

pub(super) fn header_xml(text: &str) -> Result<Vec<u8>> {
    furniture_xml("w:hdr", text)
}

pub(super) fn footer_xml(text: &str) -> Result<Vec<u8>> {
    furniture_xml("w:ftr", text)
}

/// A header or footer part holding one centered paragraph of free text.
fn furniture_xml(root: &str, value: &str) -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    start(&mut w, root, &[("xmlns:w", NS_W)])?;
    start(&mut w, "w:p", &[])?;
    start(&mut w, "w:pPr", &[])?;
    empty(&mut w, "w:jc", &[("w:val", "center")])?;
    end(&mut w, "w:pPr")?;
    start(&mut w, "w:r", &[])?;
    preserved_text(&mut w, "w:t", value)?;
    end(&mut w, "w:r")?;
    end(&mut w, "w:p")?;
    end(&mut w, root)?;
    Ok(w.into_inner())
}
