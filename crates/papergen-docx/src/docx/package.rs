//! OPC container assembly.
//!
//! A `.docx` file is a ZIP archive of XML parts plus media, wired together
//! by relationship parts:
//!
//! - `[Content_Types].xml`: content type per extension/part
//! - `_rels/.rels`: package-level relationships (main document, properties)
//! - `word/_rels/document.xml.rels`: styles, numbering, header/footer, images
//! - `docProps/core.xml`: title and timestamps
//! - `word/media/imageN.*`: registered image bytes

use super::xml::{self, empty, end, new_writer, start, text};
use super::Document;
use anyhow::Result;
use chrono::Utc;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub(super) const REL_STYLES: &str = "rIdStyles";
pub(super) const REL_NUMBERING: &str = "rIdNumbering";
pub(super) const REL_HEADER: &str = "rIdHeader";
pub(super) const REL_FOOTER: &str = "rIdFooter";

const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_TYPE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_TYPE_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_TYPE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_TYPE_NUMBERING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
const REL_TYPE_HEADER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
const REL_TYPE_FOOTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
const REL_TYPE_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_XML: &str = "application/xml";
const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const CT_NUMBERING: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
const CT_HEADER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
const CT_FOOTER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
const CT_CORE_PROPS: &str = "application/vnd.openxmlformats-package.core-properties+xml";

/// Relationship id of the media part at `index`.
pub(super) fn media_rel_id(index: usize) -> String {
    format!("rIdImage{}", index + 1)
}

/// Part name of the media part at `index`, relative to `word/`.
fn media_part_name(index: usize, extension: &str) -> String {
    format!("media/image{}.{extension}", index + 1)
}

/// Serialize the whole document as one ZIP package.
pub(super) fn write_package(doc: &Document) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    add_part(&mut zip, "[Content_Types].xml", &content_types_xml(doc)?, options)?;
    add_part(&mut zip, "_rels/.rels", &root_rels_xml()?, options)?;
    add_part(&mut zip, "docProps/core.xml", &core_props_xml(doc)?, options)?;
    add_part(&mut zip, "word/document.xml", &xml::document_xml(doc)?, options)?;
    add_part(&mut zip, "word/styles.xml", &xml::styles_xml(doc)?, options)?;
    add_part(&mut zip, "word/numbering.xml", &xml::numbering_xml()?, options)?;
    if let Some(value) = &doc.header_text {
        add_part(&mut zip, "word/header1.xml", &xml::header_xml(value)?, options)?;
    }
    if let Some(value) = &doc.footer_text {
        add_part(&mut zip, "word/footer1.xml", &xml::footer_xml(value)?, options)?;
    }
    add_part(
        &mut zip,
        "word/_rels/document.xml.rels",
        &document_rels_xml(doc)?,
        options,
    )?;
    for (index, media) in doc.media.iter().enumerate() {
        let name = format!("word/{}", media_part_name(index, media.extension));
        add_part(&mut zip, &name, &media.bytes, options)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn add_part(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    data: &[u8],
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(name, options)?;
    zip.write_all(data)?;
    Ok(())
}

fn content_types_xml(doc: &Document) -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    start(&mut w, "Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    empty(&mut w, "Default", &[("Extension", "rels"), ("ContentType", CT_RELS)])?;
    empty(&mut w, "Default", &[("Extension", "xml"), ("ContentType", CT_XML)])?;

    let mut seen_extensions: Vec<&str> = Vec::new();
    for media in &doc.media {
        if !seen_extensions.contains(&media.extension) {
            seen_extensions.push(media.extension);
            empty(
                &mut w,
                "Default",
                &[
                    ("Extension", media.extension),
                    ("ContentType", media.content_type),
                ],
            )?;
        }
    }

    let mut overrides = vec![
        ("/word/document.xml", CT_DOCUMENT),
        ("/word/styles.xml", CT_STYLES),
        ("/word/numbering.xml", CT_NUMBERING),
    ];
    if doc.header_text.is_some() {
        overrides.push(("/word/header1.xml", CT_HEADER));
    }
    if doc.footer_text.is_some() {
        overrides.push(("/word/footer1.xml", CT_FOOTER));
    }
    overrides.push(("/docProps/core.xml", CT_CORE_PROPS));
    for (part_name, content_type) in overrides {
        empty(
            &mut w,
            "Override",
            &[("PartName", part_name), ("ContentType", content_type)],
        )?;
    }

    end(&mut w, "Types")?;
    Ok(w.into_inner())
}

fn root_rels_xml() -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    start(&mut w, "Relationships", &[("xmlns", NS_RELATIONSHIPS)])?;
    empty(
        &mut w,
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", REL_TYPE_DOCUMENT),
            ("Target", "word/document.xml"),
        ],
    )?;
    empty(
        &mut w,
        "Relationship",
        &[
            ("Id", "rId2"),
            ("Type", REL_TYPE_CORE_PROPS),
            ("Target", "docProps/core.xml"),
        ],
    )?;
    end(&mut w, "Relationships")?;
    Ok(w.into_inner())
}

fn document_rels_xml(doc: &Document) -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    start(&mut w, "Relationships", &[("xmlns", NS_RELATIONSHIPS)])?;
    let relationship = |w: &mut xml::XmlWriter, id: &str, rel_type: &str, target: &str| {
        empty(
            w,
            "Relationship",
            &[("Id", id), ("Type", rel_type), ("Target", target)],
        )
    };
    relationship(&mut w, REL_STYLES, REL_TYPE_STYLES, "styles.xml")?;
    relationship(&mut w, REL_NUMBERING, REL_TYPE_NUMBERING, "numbering.xml")?;
    if doc.header_text.is_some() {
        relationship(&mut w, REL_HEADER, REL_TYPE_HEADER, "header1.xml")?;
    }
    if doc.footer_text.is_some() {
        relationship(&mut w, REL_FOOTER, REL_TYPE_FOOTER, "footer1.xml")?;
    }
    for (index, media) in doc.media.iter().enumerate() {
        relationship(
            &mut w,
            &media_rel_id(index),
            REL_TYPE_IMAGE,
            &media_part_name(index, media.extension),
        )?;
    }
    end(&mut w, "Relationships")?;
    Ok(w.into_inner())
}

fn core_props_xml(doc: &Document) -> Result<Vec<u8>> {
    let stamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let mut w = new_writer()?;
    start(
        &mut w,
        "cp:coreProperties",
        &[
            ("xmlns:cp", "http://schemas.openxmlformats.org/package/2006/metadata/core-properties"),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    if let Some(title) = &doc.title {
        start(&mut w, "dc:title", &[])?;
        text(&mut w, title)?;
        end(&mut w, "dc:title")?;
    }
    for name in ["dcterms:created", "dcterms:modified"] {
        start(&mut w, name, &[("xsi:type", "dcterms:W3CDTF")])?;
        text(&mut w, &stamp)?;
        end(&mut w, name)?;
    }
    end(&mut w, "cp:coreProperties")?;
    Ok(w.into_inner())
}
