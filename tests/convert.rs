use html2docx::document::{Block, ParagraphStyle};
use html2docx::{build_document, convert, ConvertOptions};
use std::io::{Cursor, Read};
use zip::ZipArchive;

fn part(bytes: &[u8], name: &str) -> Option<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("zip");
    let mut file = archive.by_name(name).ok()?;
    let mut out = String::new();
    file.read_to_string(&mut out).expect("utf-8 part");
    Some(out)
}

#[test]
fn package_contains_the_word_parts() {
    let bytes = convert("<html><body><p>Hello <strong>World</strong></p></body></html>").expect("docx");
    for name in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/document.xml",
        "word/styles.xml",
        "word/_rels/document.xml.rels",
    ] {
        assert!(part(&bytes, name).is_some(), "missing {name}");
    }
    // No lists, no numbering part.
    assert!(part(&bytes, "word/numbering.xml").is_none());

    let doc = part(&bytes, "word/document.xml").expect("document");
    assert!(doc.contains("<w:t xml:space=\"preserve\"> Hello</w:t>"));
    assert!(doc.contains("<w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\"> World</w:t>"));
}

#[test]
fn numbering_part_follows_first_ordered_list() {
    let html = r#"<body>
        <ol scheme="decimal;lowerRoman" prefix="(" suffix=")">
          <li>one<ol><li>one.a</li></ol></li>
          <li>two</li>
        </ol>
        <ul><li>dot</li></ul>
    </body>"#;
    let bytes = convert(html).expect("docx");
    let numbering = part(&bytes, "word/numbering.xml").expect("numbering");
    assert!(numbering.contains(r#"<w:numFmt w:val="lowerRoman"/><w:lvlText w:val="(%2)"/>"#));
    assert!(numbering.contains(r#"<w:num w:numId="3">"#));

    let types = part(&bytes, "[Content_Types].xml").expect("types");
    assert!(types.contains("/word/numbering.xml"));
    let rels = part(&bytes, "word/_rels/document.xml.rels").expect("rels");
    assert!(rels.contains("numbering.xml"));

    let doc = part(&bytes, "word/document.xml").expect("document");
    assert!(doc.contains(r#"<w:pStyle w:val="ListNumber"/>"#));
    assert!(doc.contains(r#"<w:pStyle w:val="ListNumber2"/>"#));
    assert!(doc.contains(r#"<w:pStyle w:val="ListBullet"/>"#));
}

#[test]
fn page_breaks_and_tables_are_written() {
    let html = "<body><div>a</div><pagebreak></pagebreak>\
                <table><thead><tr><th>H1</th></tr></thead><tr><td>v1</td></tr></table></body>";
    let bytes = convert(html).expect("docx");
    let doc = part(&bytes, "word/document.xml").expect("document");
    assert!(doc.contains(r#"<w:br w:type="page"/>"#));
    assert!(doc.contains("<w:tbl>"));
    assert!(doc.contains("H1"));
    assert!(doc.contains("v1"));
}

#[test]
fn scenarios_on_the_document_model() {
    let options = ConvertOptions::default();

    let doc = build_document("<body><h2>Title</h2></body>", &options).expect("doc");
    assert_eq!(doc.blocks().len(), 1);
    let heading = doc.paragraphs().next().expect("heading");
    assert_eq!(heading.style, ParagraphStyle::Heading(2));
    assert_eq!(heading.text().trim(), "Title");

    let doc = build_document("<body><ul><li>A</li><li>B</li></ul></body>", &options).expect("doc");
    let items: Vec<_> = doc
        .paragraphs()
        .filter(|p| p.style == ParagraphStyle::ListBullet(1))
        .map(|p| p.text().trim().to_string())
        .collect();
    assert_eq!(items, vec!["A", "B"]);

    let doc = build_document(
        "<body><table><thead><tr><th>H1</th></tr></thead><tr><td>v1</td></tr></table></body>",
        &options,
    )
    .expect("doc");
    match &doc.blocks()[0] {
        Block::Table(t) => {
            assert_eq!(t.columns, 1);
            assert_eq!(t.header, vec!["H1"]);
            assert_eq!(t.rows, vec![vec!["v1".to_string()]]);
        }
        other => panic!("expected a table, got {other:?}"),
    }
}

#[test]
fn over_wide_row_is_reported() {
    let err = convert("<body><table><tr><td>a</td></tr><tr><td>b</td><td>c</td></tr></table></body>")
        .expect_err("bounds");
    assert!(matches!(err, html2docx::Error::TableBounds { .. }));
}

#[test]
fn conversions_on_separate_threads_are_independent() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let html = format!("<body><ol><li>item {i}</li></ol></body>");
                build_document(&html, &ConvertOptions::default()).expect("doc")
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let doc = handle.join().expect("thread");
        assert_eq!(doc.started_lists().len(), 1);
        let item = doc.paragraphs().find(|p| p.numbering.is_some()).expect("item");
        assert_eq!(item.text().trim(), format!("item {i}"));
    }
}

#[test]
fn control_characters_do_not_break_the_document_part() {
    let bytes = convert("<body><p>a\u{1}b\u{b}c</p></body>").expect("docx");
    let doc = part(&bytes, "word/document.xml").expect("document");
    let bad: Vec<char> = doc
        .chars()
        .filter(|c| (*c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r'))
        .collect();
    assert!(bad.is_empty(), "control characters in document.xml: {bad:?}");
    assert!(doc.contains("a\u{FFFD}b"));
}
