//! OOXML package writer.
//!
//! The whole package is assembled in memory; a failed write leaves nothing
//! behind and is reported as [`Error::Serialization`](crate::Error).

use crate::document::{Block, Document, ListId, ListNumbering, Paragraph, Run, RunContent, Table, MAX_LIST_LEVEL};
use crate::error::Result;
use crate::numbering::NumberingScheme;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const HEADING_SIZES: [u32; 6] = [32, 28, 26, 24, 22, 22];

const BULLET_NUM_ID: u32 = 1;
const FIRST_ORDERED_NUM_ID: u32 = 2;

fn xml_escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => out.push('\u{FFFD}'),
            _ => out.push(ch),
        }
    }
    out
}

/// Maps started numbering sequences to `w:numId` values.
struct NumIds(Vec<ListId>);

impl NumIds {
    fn get(&self, numbering: ListNumbering) -> Option<u32> {
        match numbering {
            ListNumbering::Bullet => Some(BULLET_NUM_ID),
            ListNumbering::Ordered(list) => self
                .0
                .iter()
                .position(|l| *l == list)
                .map(|i| FIRST_ORDERED_NUM_ID + i as u32),
        }
    }
}

fn run_xml(run: &Run) -> String {
    let mut out = String::new();
    out.push_str("<w:r>");
    if run.bold || run.italic || run.underline || run.strike {
        out.push_str("<w:rPr>");
        if run.bold {
            out.push_str("<w:b/>");
        }
        if run.italic {
            out.push_str("<w:i/>");
        }
        if run.strike {
            out.push_str("<w:strike/>");
        }
        if run.underline {
            out.push_str("<w:u w:val=\"single\"/>");
        }
        out.push_str("</w:rPr>");
    }
    for item in &run.content {
        match item {
            RunContent::Tab => out.push_str("<w:tab/>"),
            RunContent::Break => out.push_str("<w:br/>"),
            RunContent::Text(text) => {
                out.push_str("<w:t xml:space=\"preserve\">");
                out.push_str(&xml_escape_text(text));
                out.push_str("</w:t>");
            }
        }
    }
    out.push_str("</w:r>");
    out
}

fn paragraph_xml(p: &Paragraph, num_ids: &NumIds) -> String {
    let mut out = String::new();
    out.push_str("<w:p>");

    let style_id = p.style.style_id();
    let num_id = p.numbering.and_then(|n| num_ids.get(n));
    if style_id.is_some() || num_id.is_some() {
        out.push_str("<w:pPr>");
        if let Some(id) = style_id {
            out.push_str(&format!("<w:pStyle w:val=\"{id}\"/>"));
        }
        if let Some(num_id) = num_id {
            out.push_str("<w:numPr>");
            out.push_str(&format!("<w:ilvl w:val=\"{}\"/>", p.ilvl));
            out.push_str(&format!("<w:numId w:val=\"{num_id}\"/>"));
            out.push_str("</w:numPr>");
        }
        out.push_str("</w:pPr>");
    }

    for run in &p.runs {
        out.push_str(&run_xml(run));
    }

    out.push_str("</w:p>");
    out
}

fn cell_xml(text: &str) -> String {
    let mut out = String::new();
    out.push_str("<w:tc>");
    out.push_str("<w:tcPr><w:tcW w:w=\"0\" w:type=\"auto\"/></w:tcPr>");
    out.push_str("<w:p>");
    if !text.is_empty() {
        out.push_str("<w:r><w:t xml:space=\"preserve\">");
        out.push_str(&xml_escape_text(text));
        out.push_str("</w:t></w:r>");
    }
    out.push_str("</w:p>");
    out.push_str("</w:tc>");
    out
}

fn table_xml(t: &Table) -> String {
    let mut out = String::new();
    out.push_str("<w:tbl>");
    out.push_str("<w:tblPr>");
    out.push_str("<w:tblStyle w:val=\"TableGrid\"/>");
    out.push_str("<w:tblW w:w=\"0\" w:type=\"auto\"/>");
    out.push_str(
        r#"<w:tblBorders>
<w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/>
<w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/>
<w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/>
<w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/>
<w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/>
<w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/>
</w:tblBorders>"#,
    );
    out.push_str("</w:tblPr>");

    out.push_str("<w:tblGrid>");
    for _ in 0..t.columns {
        out.push_str("<w:gridCol/>");
    }
    out.push_str("</w:tblGrid>");

    out.push_str("<w:tr><w:trPr><w:tblHeader/></w:trPr>");
    for text in &t.header {
        out.push_str(&cell_xml(text));
    }
    out.push_str("</w:tr>");

    for row in &t.rows {
        out.push_str("<w:tr>");
        for text in row {
            out.push_str(&cell_xml(text));
        }
        out.push_str("</w:tr>");
    }

    out.push_str("</w:tbl>");
    out
}

pub fn document_xml(doc: &Document) -> String {
    let num_ids = NumIds(doc.started_lists());
    let mut body = String::new();
    for block in doc.blocks() {
        match block {
            Block::Paragraph(id) => body.push_str(&paragraph_xml(doc.paragraph(*id), &num_ids)),
            Block::Table(t) => body.push_str(&table_xml(t)),
            Block::PageBreak => body.push_str("<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>"),
        }
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{NS_W}" xmlns:r="{NS_R}">
  <w:body>
    {body}
    <w:sectPr>
      <w:pgSz w:w="12240" w:h="15840"/>
      <w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>
      <w:cols w:space="708"/>
      <w:docGrid w:linePitch="360"/>
    </w:sectPr>
  </w:body>
</w:document>"#
    )
}

fn content_types_xml(has_numbering: bool) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(r#"<Types xmlns="{NS_CT}">"#));
    out.push('\n');
    out.push_str(
        r#"  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    );
    out.push('\n');
    out.push_str(r#"  <Default Extension="xml" ContentType="application/xml"/>"#);
    out.push('\n');
    out.push_str(r#"  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#);
    out.push('\n');
    out.push_str(r#"  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#);
    out.push('\n');
    if has_numbering {
        out.push_str(r#"  <Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>"#);
        out.push('\n');
    }
    out.push_str("</Types>");
    out
}

fn rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_RELS}">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#
    )
}

fn document_rels_xml(has_numbering: bool) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(r#"<Relationships xmlns="{NS_RELS}">"#));
    out.push('\n');
    out.push_str(r#"  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#);
    out.push('\n');
    if has_numbering {
        out.push_str(r#"  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>"#);
        out.push('\n');
    }
    out.push_str("</Relationships>");
    out
}

fn heading_style_xml(level: u32) -> String {
    // Half-points.
    let size = HEADING_SIZES[(level.clamp(1, 6) - 1) as usize];
    format!(
        r#"  <w:style w:type="paragraph" w:styleId="Heading{level}">
    <w:name w:val="heading {level}"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:uiPriority w:val="9"/>
    <w:qFormat/>
    <w:pPr>
      <w:keepNext/>
      <w:spacing w:before="240" w:after="120"/>
      <w:outlineLvl w:val="{outline}"/>
    </w:pPr>
    <w:rPr>
      <w:b/>
      <w:sz w:val="{size}"/>
    </w:rPr>
  </w:style>
"#,
        outline = level - 1,
    )
}

fn list_style_xml(kind: &str, display: &str, level: u32) -> String {
    let suffix = if level == 1 { String::new() } else { level.to_string() };
    let name_suffix = if level == 1 { String::new() } else { format!(" {level}") };
    format!(
        r#"  <w:style w:type="paragraph" w:styleId="{kind}{suffix}">
    <w:name w:val="{display}{name_suffix}"/>
    <w:basedOn w:val="Normal"/>
    <w:uiPriority w:val="99"/>
    <w:pPr>
      <w:ind w:left="{left}" w:hanging="360"/>
      <w:contextualSpacing/>
    </w:pPr>
  </w:style>
"#,
        left = 360 * (level + 1),
    )
}

fn styles_xml() -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(r#"<w:styles xmlns:w="{NS_W}">"#));
    out.push('\n');
    out.push_str(
        r#"  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>
  <w:style w:type="table" w:styleId="TableGrid">
    <w:name w:val="Table Grid"/>
    <w:uiPriority w:val="59"/>
  </w:style>
"#,
    );
    for level in 1..=6 {
        out.push_str(&heading_style_xml(level));
    }
    for level in 1..=MAX_LIST_LEVEL {
        out.push_str(&list_style_xml("ListNumber", "List Number", level));
        out.push_str(&list_style_xml("ListBullet", "List Bullet", level));
    }
    out.push_str("</w:styles>");
    out
}

fn lvl_xml(ilvl: u32, num_fmt: &str, lvl_text: &str) -> String {
    format!(
        r#"<w:lvl w:ilvl="{ilvl}"><w:start w:val="1"/><w:numFmt w:val="{num_fmt}"/><w:lvlText w:val="{text}"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="{left}" w:hanging="360"/></w:pPr></w:lvl>"#,
        text = xml_escape_text(lvl_text),
        left = 360 * (ilvl + 2),
    )
}

pub fn numbering_xml(scheme: &NumberingScheme, started: usize) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(r#"<w:numbering xmlns:w="{NS_W}">"#));
    out.push('\n');

    out.push_str("  <w:abstractNum w:abstractNumId=\"1\">\n");
    out.push_str("    <w:multiLevelType w:val=\"hybridMultilevel\"/>\n");
    for ilvl in 0..MAX_LIST_LEVEL {
        out.push_str("    ");
        out.push_str(&lvl_xml(ilvl, "bullet", "•"));
        out.push('\n');
    }
    out.push_str("  </w:abstractNum>\n");

    out.push_str("  <w:abstractNum w:abstractNumId=\"2\">\n");
    out.push_str("    <w:multiLevelType w:val=\"multilevel\"/>\n");
    for ilvl in 0..MAX_LIST_LEVEL {
        let level = ilvl as usize + 1;
        out.push_str("    ");
        out.push_str(&lvl_xml(ilvl, scheme.num_fmt(level), &scheme.lvl_text(level)));
        out.push('\n');
    }
    out.push_str("  </w:abstractNum>\n");

    out.push_str(&format!(
        "  <w:num w:numId=\"{BULLET_NUM_ID}\"><w:abstractNumId w:val=\"1\"/></w:num>\n"
    ));
    // Every ordered list gets its own instance so its numbering restarts at 1.
    for i in 0..started {
        out.push_str(&format!(
            "  <w:num w:numId=\"{}\"><w:abstractNumId w:val=\"2\"/>",
            FIRST_ORDERED_NUM_ID + i as u32
        ));
        for ilvl in 0..MAX_LIST_LEVEL {
            out.push_str(&format!(
                "<w:lvlOverride w:ilvl=\"{ilvl}\"><w:startOverride w:val=\"1\"/></w:lvlOverride>"
            ));
        }
        out.push_str("</w:num>\n");
    }
    out.push_str("</w:numbering>");
    out
}

/// Serializes `doc` into `.docx` bytes, applying `scheme` to ordered lists.
pub fn write_docx(doc: &Document, scheme: &NumberingScheme) -> Result<Vec<u8>> {
    let has_numbering = doc.has_lists();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", opts)?;
    zip.write_all(content_types_xml(has_numbering).as_bytes())?;

    zip.start_file("_rels/.rels", opts)?;
    zip.write_all(rels_xml().as_bytes())?;

    zip.start_file("word/document.xml", opts)?;
    zip.write_all(document_xml(doc).as_bytes())?;

    zip.start_file("word/styles.xml", opts)?;
    zip.write_all(styles_xml().as_bytes())?;

    if has_numbering {
        zip.start_file("word/numbering.xml", opts)?;
        zip.write_all(numbering_xml(scheme, doc.started_lists().len()).as_bytes())?;
    }

    zip.start_file("word/_rels/document.xml.rels", opts)?;
    zip.write_all(document_rels_xml(has_numbering).as_bytes())?;

    let bytes = zip.finish()?.into_inner();
    log::info!("wrote docx package ({} bytes, {} blocks)", bytes.len(), doc.blocks().len());
    Ok(bytes)
}
