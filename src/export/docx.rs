//! DOCX rendering
//!
//! Writes a minimal WordprocessingML package: content types, package
//! relationships, core properties and `word/document.xml`.

use std::io::{Cursor, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use super::types::ExportError;

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

/// A run of text inside a paragraph
struct Run<'a> {
    text: &'a str,
    bold: bool,
    /// Font size in half-points
    size: Option<u32>,
}

impl<'a> Run<'a> {
    fn plain(text: &'a str) -> Self {
        Self {
            text,
            bold: false,
            size: None,
        }
    }

    fn bold(text: &'a str) -> Self {
        Self {
            text,
            bold: true,
            size: None,
        }
    }
}

/// Render a DOCX with a title, optional bold-keyed metadata and the content
pub fn render_docx(
    title: &str,
    metadata: &[(String, String)],
    content: &str,
    created: DateTime<Utc>,
) -> Result<Vec<u8>, ExportError> {
    let document = document_xml(title, metadata, content)?;
    let core = core_xml(title, created)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(PACKAGE_RELS.as_bytes())?;

    zip.start_file("docProps/core.xml", options)?;
    zip.write_all(&core)?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(&document)?;

    Ok(zip.finish()?.into_inner())
}

fn document_xml(
    title: &str,
    metadata: &[(String, String)],
    content: &str,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut root = BytesStart::new("w:document");
    root.push_attribute(("xmlns:w", WORDML_NS));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    write_paragraph(
        &mut writer,
        &[Run {
            text: title,
            bold: true,
            size: Some(36),
        }],
    )?;

    if !metadata.is_empty() {
        for (key, value) in metadata {
            let label = format!("{}: ", key);
            write_paragraph(&mut writer, &[Run::bold(&label), Run::plain(value)])?;
        }
        write_paragraph(&mut writer, &[])?;
    }

    for line in content.lines() {
        write_paragraph(&mut writer, &[Run::plain(line)])?;
    }

    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;

    Ok(writer.into_inner().into_inner())
}

fn write_paragraph<W: Write>(writer: &mut Writer<W>, runs: &[Run<'_>]) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;

    for run in runs {
        writer.write_event(Event::Start(BytesStart::new("w:r")))?;

        if run.bold || run.size.is_some() {
            writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
            if run.bold {
                writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
            }
            if let Some(size) = run.size {
                let size = size.to_string();
                writer.write_event(Event::Empty(
                    BytesStart::new("w:sz").with_attributes([("w:val", size.as_str())]),
                ))?;
            }
            writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
        }

        writer.write_event(Event::Start(
            BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]),
        ))?;
        writer.write_event(Event::Text(BytesText::new(run.text)))?;
        writer.write_event(Event::End(BytesEnd::new("w:t")))?;

        writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

fn core_xml(title: &str, created: DateTime<Utc>) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut root = BytesStart::new("cp:coreProperties");
    root.push_attribute((
        "xmlns:cp",
        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
    ));
    root.push_attribute(("xmlns:dc", "http://purl.org/dc/elements/1.1/"));
    root.push_attribute(("xmlns:dcterms", "http://purl.org/dc/terms/"));
    root.push_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"));
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(BytesStart::new("dc:title")))?;
    writer.write_event(Event::Text(BytesText::new(title)))?;
    writer.write_event(Event::End(BytesEnd::new("dc:title")))?;

    let timestamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
    writer.write_event(Event::Start(
        BytesStart::new("dcterms:created").with_attributes([("xsi:type", "dcterms:W3CDTF")]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(&timestamp)))?;
    writer.write_event(Event::End(BytesEnd::new("dcterms:created")))?;

    writer.write_event(Event::End(BytesEnd::new("cp:coreProperties")))?;
    Ok(writer.into_inner().into_inner())
}
