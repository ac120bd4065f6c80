//! Minimal WordprocessingML writer: headings and monospace paragraphs,
//! packaged as an OOXML zip archive.

use crate::error::{CodeDocxError, Result};
use chrono::{DateTime, Utc};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

mod namespace {
    pub const WORDPROCESSING: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
}

mod paths {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const PACKAGE_RELS: &str = "_rels/.rels";
    pub const DOCUMENT: &str = "word/document.xml";
    pub const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";
    pub const STYLES: &str = "word/styles.xml";
    pub const CORE_PROPS: &str = "docProps/core.xml";
    pub const APP_PROPS: &str = "docProps/app.xml";
}

pub const CODE_STYLE: &str = "Code";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Code(String),
}

/// Fixed-width face applied to every code run, for both Latin and East-Asian text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFont {
    pub family: String,
    pub size_pt: u32,
}

impl CodeFont {
    pub fn new<S: Into<String>>(family: S, size_pt: u32) -> Self {
        Self {
            family: family.into(),
            size_pt,
        }
    }

    fn half_points(&self) -> String {
        self.size_pt.saturating_mul(2).to_string()
    }
}

impl Default for CodeFont {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_FONT_FAMILY, crate::config::DEFAULT_FONT_SIZE)
    }
}

#[derive(Debug, Clone)]
pub struct DocxDocument {
    title: Option<String>,
    blocks: Vec<Block>,
    font: CodeFont,
    created: DateTime<Utc>,
}

impl DocxDocument {
    pub fn new(font: CodeFont) -> Self {
        Self {
            title: None,
            blocks: Vec::new(),
            font,
            created: Utc::now(),
        }
    }

    /// Adds a heading. The first level-1 heading also becomes the document title.
    pub fn add_heading<S: Into<String>>(&mut self, text: S, level: u8) {
        let text = sanitize_xml_text(&text.into());
        if level == 1 && self.title.is_none() {
            self.title = Some(text.clone());
        }
        self.blocks.push(Block::Heading {
            level: level.clamp(1, 9),
            text,
        });
    }

    pub fn add_code_block<S: AsRef<str>>(&mut self, content: S) {
        self.blocks
            .push(Block::Code(sanitize_xml_text(content.as_ref())));
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn code_block_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Code(_)))
            .count()
    }

    /// Serializes the whole package in memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);

        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let document_xml = self.document_xml()?;
        let styles_xml = self.styles_xml();
        let core_xml = self.core_xml();
        let parts: [(&str, &[u8]); 7] = [
            (paths::CONTENT_TYPES, CONTENT_TYPES_XML.as_bytes()),
            (paths::PACKAGE_RELS, PACKAGE_RELS_XML.as_bytes()),
            (paths::DOCUMENT, &document_xml),
            (paths::DOCUMENT_RELS, DOCUMENT_RELS_XML.as_bytes()),
            (paths::STYLES, styles_xml.as_bytes()),
            (paths::CORE_PROPS, core_xml.as_bytes()),
            (paths::APP_PROPS, APP_XML.as_bytes()),
        ];

        for (name, content) in parts {
            zip.start_file(name, options).map_err(|e| {
                CodeDocxError::archive(format!("Failed to create {name}: {e}"))
            })?;
            zip.write_all(content)
                .map_err(|e| CodeDocxError::archive(format!("Failed to write {name}: {e}")))?;
        }

        zip.finish()
            .map_err(|e| CodeDocxError::archive(format!("Failed to finalize archive: {e}")))?;

        Ok(buffer.into_inner())
    }

    /// Writes the package to `path` and returns its size in bytes.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        fs::write(path, &bytes).map_err(|source| CodeDocxError::Save {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "document saved");
        Ok(bytes.len() as u64)
    }

    fn document_xml(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
        )?;

        let mut root = BytesStart::new("w:document");
        root.push_attribute(("xmlns:w", namespace::WORDPROCESSING));
        emit(&mut writer, Event::Start(root))?;
        emit(&mut writer, Event::Start(BytesStart::new("w:body")))?;

        for block in &self.blocks {
            match block {
                Block::Heading { level, text } => {
                    self.write_paragraph(&mut writer, &format!("Heading{level}"), text, false)?
                }
                Block::Code(content) => {
                    self.write_paragraph(&mut writer, CODE_STYLE, content, true)?
                }
            }
        }

        write_section_properties(&mut writer)?;

        emit(&mut writer, Event::End(BytesEnd::new("w:body")))?;
        emit(&mut writer, Event::End(BytesEnd::new("w:document")))?;

        Ok(writer.into_inner().into_inner())
    }

    fn write_paragraph<W: Write>(
        &self,
        writer: &mut Writer<W>,
        style: &str,
        text: &str,
        monospace: bool,
    ) -> Result<()> {
        emit(writer, Event::Start(BytesStart::new("w:p")))?;

        emit(writer, Event::Start(BytesStart::new("w:pPr")))?;
        let mut style_elem = BytesStart::new("w:pStyle");
        style_elem.push_attribute(("w:val", style));
        emit(writer, Event::Empty(style_elem))?;
        emit(writer, Event::End(BytesEnd::new("w:pPr")))?;

        emit(writer, Event::Start(BytesStart::new("w:r")))?;
        if monospace {
            self.write_code_run_properties(writer)?;
        }
        write_run_text(writer, text)?;
        emit(writer, Event::End(BytesEnd::new("w:r")))?;

        emit(writer, Event::End(BytesEnd::new("w:p")))
    }

    fn write_code_run_properties<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let family = self.font.family.as_str();
        let size = self.font.half_points();

        emit(writer, Event::Start(BytesStart::new("w:rPr")))?;

        let mut fonts = BytesStart::new("w:rFonts");
        fonts.push_attribute(("w:ascii", family));
        fonts.push_attribute(("w:hAnsi", family));
        fonts.push_attribute(("w:eastAsia", family));
        fonts.push_attribute(("w:cs", family));
        emit(writer, Event::Empty(fonts))?;

        let mut sz = BytesStart::new("w:sz");
        sz.push_attribute(("w:val", size.as_str()));
        emit(writer, Event::Empty(sz))?;

        let mut sz_cs = BytesStart::new("w:szCs");
        sz_cs.push_attribute(("w:val", size.as_str()));
        emit(writer, Event::Empty(sz_cs))?;

        emit(writer, Event::End(BytesEnd::new("w:rPr")))
    }

    fn styles_xml(&self) -> String {
        let family = escape(self.font.family.as_str());
        let size = self.font.half_points();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{ns}">
  <w:docDefaults>
    <w:rPrDefault><w:rPr><w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr></w:rPrDefault>
    <w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:qFormat/>
    <w:pPr><w:keepNext/><w:spacing w:before="480" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="32"/><w:szCs w:val="32"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading2">
    <w:name w:val="heading 2"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:qFormat/>
    <w:pPr><w:keepNext/><w:spacing w:before="240" w:after="80"/><w:outlineLvl w:val="1"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="26"/><w:szCs w:val="26"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:customStyle="1" w:styleId="{code}">
    <w:name w:val="{code}"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr>
    <w:rPr><w:rFonts w:ascii="{family}" w:hAnsi="{family}" w:eastAsia="{family}" w:cs="{family}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr>
  </w:style>
</w:styles>
"#,
            ns = namespace::WORDPROCESSING,
            code = CODE_STYLE,
        )
    }

    fn core_xml(&self) -> String {
        let title = escape(self.title.as_deref().unwrap_or(""));
        let timestamp = self.created.format("%Y-%m-%dT%H:%M:%SZ");

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title>{title}</dc:title>
  <dc:creator>codedocx</dc:creator>
  <dcterms:created xsi:type="dcterms:W3CDTF">{timestamp}</dcterms:created>
  <dcterms:modified xsi:type="dcterms:W3CDTF">{timestamp}</dcterms:modified>
</cp:coreProperties>
"#
        )
    }
}

impl Default for DocxDocument {
    fn default() -> Self {
        Self::new(CodeFont::default())
    }
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| CodeDocxError::xml(format!("Write error: {e}")))
}

/// Newlines become `<w:br/>` and tabs `<w:tab/>` inside a single run.
fn write_run_text<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
    for (line_index, line) in text.split('\n').enumerate() {
        if line_index > 0 {
            emit(writer, Event::Empty(BytesStart::new("w:br")))?;
        }

        let line = line.strip_suffix('\r').unwrap_or(line);
        for (piece_index, piece) in line.split('\t').enumerate() {
            if piece_index > 0 {
                emit(writer, Event::Empty(BytesStart::new("w:tab")))?;
            }
            if piece.is_empty() {
                continue;
            }

            let mut t = BytesStart::new("w:t");
            t.push_attribute(("xml:space", "preserve"));
            emit(writer, Event::Start(t))?;
            emit(writer, Event::Text(BytesText::new(piece)))?;
            emit(writer, Event::End(BytesEnd::new("w:t")))?;
        }
    }

    Ok(())
}

fn write_section_properties<W: Write>(writer: &mut Writer<W>) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new("w:sectPr")))?;

    // A4 portrait, one-inch margins
    let mut size = BytesStart::new("w:pgSz");
    size.push_attribute(("w:w", "11906"));
    size.push_attribute(("w:h", "16838"));
    emit(writer, Event::Empty(size))?;

    let mut margins = BytesStart::new("w:pgMar");
    for (name, value) in [
        ("w:top", "1440"),
        ("w:right", "1440"),
        ("w:bottom", "1440"),
        ("w:left", "1440"),
        ("w:header", "720"),
        ("w:footer", "720"),
        ("w:gutter", "0"),
    ] {
        margins.push_attribute((name, value));
    }
    emit(writer, Event::Empty(margins))?;

    emit(writer, Event::End(BytesEnd::new("w:sectPr")))
}

/// Drops characters XML 1.0 cannot carry (C0 controls other than tab, LF, CR).
pub fn sanitize_xml_text(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
        })
        .collect()
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
  <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>
"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>
"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>
"#;

const APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
  <Application>codedocx</Application>
</Properties>
"#;
