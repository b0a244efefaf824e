//! # html2docx
//!
//! Converts an HTML document into a `.docx` word-processing package:
//! paragraphs, headings, bold/italic/underline/strike runs, nested ordered and
//! unordered lists, tables, line breaks and page breaks.
//!
//! ```no_run
//! let bytes = html2docx::convert("<body><h1>Report</h1><p>Hello <b>World</b></p></body>")?;
//! std::fs::write("report.docx", bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Recognized extensions beyond plain HTML:
//! - `<pagebreak>` forces a page break.
//! - `scheme`, `prefix` and `suffix` on the first `<ol>` configure ordered
//!   list numbering, e.g. `<ol scheme="decimal;lowerRoman" prefix="(" suffix=")">`.
//! - the classes `underline-marker`, `strike-marker` and `tab-marker`.

pub mod document;
pub mod docx;
pub mod dom;
pub mod error;
pub mod numbering;
pub mod options;
pub mod style;
pub mod table;
pub mod traverse;

pub use document::Document;
pub use error::{Error, Result};
pub use numbering::NumberingScheme;
pub use options::ConvertOptions;

use traverse::Converter;

/// Converts `html` into `.docx` bytes with default options.
pub fn convert(html: &str) -> Result<Vec<u8>> {
    convert_with(html, &ConvertOptions::default())
}

pub fn convert_with(html: &str, options: &ConvertOptions) -> Result<Vec<u8>> {
    let (doc, scheme) = build(html, options)?;
    docx::write_docx(&doc, &scheme)
}

/// Runs the traversal only and returns the resulting document model.
pub fn build_document(html: &str, options: &ConvertOptions) -> Result<Document> {
    build(html, options).map(|(doc, _)| doc)
}

fn build(html: &str, options: &ConvertOptions) -> Result<(Document, NumberingScheme)> {
    let dom = dom::html5_parse(html);
    let root = dom::find_body(&dom).unwrap_or_else(|| dom.document.clone());
    let scheme = NumberingScheme::resolve(&root);

    let mut doc = Document::new();
    Converter::new(&mut doc, options).run(&root)?;
    log::debug!("converted html into {} blocks", doc.blocks().len());
    Ok((doc, scheme))
}
