//! Depth-first walk from the HTML tree into a [`Document`].
//!
//! The walk runs over an explicit stack of `(node, style)` frames instead of
//! native recursion, so arbitrarily deep input cannot exhaust the call stack.

use crate::document::{Document, ListNumbering, ParagraphStyle, Run, RunContent};
use crate::dom;
use crate::error::Result;
use crate::options::ConvertOptions;
use crate::style::{ListType, Style};
use crate::table;
use markup5ever_rcdom::{Handle, NodeData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Ignored,
    LineBreak,
    List(ListType),
    Span,
    Bold,
    Italic,
    Underline,
    Strike,
    Paragraph,
    Heading(u8),
    ListItem,
    Table,
    PageBreak,
    Other,
}

fn classify(tag: &str, options: &ConvertOptions) -> ElementKind {
    if options.is_ignored(tag) {
        return ElementKind::Ignored;
    }
    match tag {
        "br" => ElementKind::LineBreak,
        "ol" => ElementKind::List(ListType::Ordered),
        "ul" => ElementKind::List(ListType::Unordered),
        "span" => ElementKind::Span,
        "strong" | "b" => ElementKind::Bold,
        "i" | "em" => ElementKind::Italic,
        "u" => ElementKind::Underline,
        "s" | "strike" | "del" => ElementKind::Strike,
        "p" => ElementKind::Paragraph,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            ElementKind::Heading(tag[1..].parse().unwrap_or(1))
        }
        "li" => ElementKind::ListItem,
        "table" => ElementKind::Table,
        "pagebreak" => ElementKind::PageBreak,
        _ => ElementKind::Other,
    }
}

/// True when the inline `style` attribute declares `margin-left`.
fn has_margin_left(node: &Handle) -> bool {
    dom::attr_get(node, "style").is_some_and(|css| {
        css.split(';').any(|decl| {
            decl.split(':')
                .next()
                .is_some_and(|prop| prop.trim().eq_ignore_ascii_case("margin-left"))
        })
    })
}

struct Frame {
    node: Handle,
    style: Style,
    /// List type of the immediate parent, `None` unless it is `ol`/`ul`.
    parent: ListType,
}

pub struct Converter<'a> {
    doc: &'a mut Document,
    options: &'a ConvertOptions,
}

impl<'a> Converter<'a> {
    pub fn new(doc: &'a mut Document, options: &'a ConvertOptions) -> Self {
        Self { doc, options }
    }

    /// Walks `root` (normally the `<body>` element) with a fresh style.
    pub fn run(&mut self, root: &Handle) -> Result<()> {
        let mut stack = vec![Frame {
            node: root.clone(),
            style: Style::default(),
            parent: ListType::None,
        }];
        while let Some(frame) = stack.pop() {
            self.visit(frame, &mut stack)?;
        }
        Ok(())
    }

    fn visit(&mut self, frame: Frame, stack: &mut Vec<Frame>) -> Result<()> {
        let node = frame.node;
        match &node.data {
            NodeData::Text { contents } => {
                self.text(&contents.borrow(), &frame.style);
                return Ok(());
            }
            NodeData::Document => {
                push_children(stack, &node, frame.style, ListType::None);
                return Ok(());
            }
            NodeData::Element { .. } => {}
            _ => return Ok(()),
        }
        let Some(tag) = dom::tag_lower(&node) else {
            return Ok(());
        };

        let mut style = frame.style.derive(&node);
        match classify(&tag, self.options) {
            ElementKind::Ignored => {
                log::debug!("skipping ignored <{tag}>");
                return Ok(());
            }
            ElementKind::LineBreak => {
                self.line_break(&style);
                return Ok(());
            }
            ElementKind::List(list_type) => {
                self.open_list(&mut style, list_type);
                push_list_children(stack, &node, style, list_type);
                return Ok(());
            }
            ElementKind::Span => {
                if has_margin_left(&node) {
                    style.indent = true;
                }
            }
            ElementKind::Bold => style.bold = true,
            ElementKind::Italic => style.italic = true,
            ElementKind::Underline => style.underline = true,
            ElementKind::Strike => style.strike = true,
            ElementKind::Paragraph => {
                if style.paragraph.is_none() {
                    style.paragraph = Some(self.doc.add_paragraph(ParagraphStyle::Normal));
                }
            }
            ElementKind::Heading(level) => {
                style.paragraph = Some(self.doc.add_heading(level));
            }
            ElementKind::ListItem => self.list_item(&mut style, frame.parent),
            ElementKind::Table => return table::materialize(self.doc, &node),
            ElementKind::PageBreak => {
                self.doc.add_page_break();
                return Ok(());
            }
            ElementKind::Other => {}
        }

        push_children(stack, &node, style, ListType::None);
        Ok(())
    }

    fn text(&mut self, raw: &str, style: &Style) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        let (para, was_open) = match style.paragraph {
            Some(p) => (p, true),
            None => (self.doc.add_paragraph(ParagraphStyle::Normal), false),
        };

        let mut run = Run {
            bold: style.bold,
            italic: style.italic,
            underline: style.underline,
            strike: style.strike,
            ..Run::default()
        };
        if style.tab || style.indent {
            run.content.push(RunContent::Tab);
        }
        run.content.push(RunContent::Text(format!(" {}", dom::collapse_ws(trimmed))));
        // Fragments flowing into an already open block each end on their own line.
        if was_open {
            run.content.push(RunContent::Break);
        }
        self.doc.paragraph_mut(para).runs.push(run);
    }

    fn line_break(&mut self, style: &Style) {
        let para = style
            .paragraph
            .unwrap_or_else(|| self.doc.add_paragraph(ParagraphStyle::Normal));
        self.doc.paragraph_mut(para).runs.push(Run {
            content: vec![RunContent::Break],
            ..Run::default()
        });
    }

    fn open_list(&mut self, style: &mut Style, list_type: ListType) {
        style.level += 1;
        style.list_type = list_type;
        if !style.in_ordered_list {
            // Outermost list gets an empty spacer paragraph.
            self.doc.add_paragraph(ParagraphStyle::Normal);
        }
        if list_type == ListType::Ordered {
            style.in_ordered_list = true;
            style.numbering = Some(self.doc.reserve_list());
        }
    }

    fn list_item(&mut self, style: &mut Style, parent: ListType) {
        let numbering = match parent {
            ListType::Ordered => {
                let list = match style.numbering {
                    Some(list) => list,
                    None => self.doc.reserve_list(),
                };
                if style.first_in_list {
                    self.doc.new_list(list);
                }
                ListNumbering::Ordered(list)
            }
            ListType::Unordered => ListNumbering::Bullet,
            ListType::None => return,
        };
        style.paragraph = Some(self.doc.add_list_paragraph(style.level, numbering));
    }
}

fn push_children(stack: &mut Vec<Frame>, node: &Handle, style: Style, parent: ListType) {
    for child in node.children.borrow().iter().rev() {
        stack.push(Frame {
            node: child.clone(),
            style,
            parent,
        });
    }
}

/// Like [`push_children`], but flags the first `li` of an ordered list so
/// that it opens a new numbering sequence.
fn push_list_children(stack: &mut Vec<Frame>, node: &Handle, style: Style, list_type: ListType) {
    let children = node.children.borrow();
    let first_item = children.iter().position(|c| dom::is_tag(c, "li"));
    for (i, child) in children.iter().enumerate().rev() {
        let mut child_style = style;
        child_style.first_in_list = list_type == ListType::Ordered && Some(i) == first_item;
        stack.push(Frame {
            node: child.clone(),
            style: child_style,
            parent: list_type,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;

    fn convert(html: &str) -> Document {
        convert_with(html, &ConvertOptions::default())
    }

    fn convert_with(html: &str, options: &ConvertOptions) -> Document {
        let dom = dom::html5_parse(html);
        let body = dom::find_body(&dom).expect("body");
        let mut doc = Document::new();
        Converter::new(&mut doc, options).run(&body).expect("convert");
        doc
    }

    fn paragraphs(doc: &Document) -> Vec<&crate::document::Paragraph> {
        doc.paragraphs().collect()
    }

    #[test]
    fn paragraph_with_bold_fragment() {
        let doc = convert("<body><p>Hello <strong>World</strong></p></body>");
        let paras = paragraphs(&doc);
        assert_eq!(paras.len(), 1);
        let runs = &paras[0].runs;
        assert_eq!(runs.len(), 2);
        assert!(!runs[0].bold);
        assert!(runs[1].bold);
        assert_eq!(runs[0].text(), " Hello");
        assert_eq!(runs[1].text(), " World");
        assert_eq!(paras[0].text().trim(), "Hello World");
        assert!(runs.iter().all(Run::has_break));
    }

    #[test]
    fn whitespace_only_text_creates_nothing() {
        let doc = convert("<body>   <div> \n\t </div> </body>");
        assert!(doc.blocks().is_empty());
    }

    #[test]
    fn loose_text_gets_its_own_paragraph_without_break() {
        let doc = convert("<body>first<div>second</div></body>");
        let paras = paragraphs(&doc);
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0].text(), " first");
        assert!(!paras[0].runs[0].has_break());
        assert_eq!(paras[1].text(), " second");
    }

    #[test]
    fn heading_level_from_tag() {
        let doc = convert("<body><h2>Title</h2></body>");
        let paras = paragraphs(&doc);
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(paras[0].style, ParagraphStyle::Heading(2));
        assert_eq!(paras[0].text().trim(), "Title");
    }

    #[test]
    fn bulleted_list_items_in_order() {
        let doc = convert("<body><ul><li>A</li><li>B</li></ul></body>");
        let paras = paragraphs(&doc);
        // Spacer paragraph, then one paragraph per item.
        assert_eq!(paras.len(), 3);
        assert!(paras[0].runs.is_empty());
        assert_eq!(paras[1].style, ParagraphStyle::ListBullet(1));
        assert_eq!(paras[2].style, ParagraphStyle::ListBullet(1));
        assert_eq!(paras[1].text().trim(), "A");
        assert_eq!(paras[2].text().trim(), "B");
        assert!(doc.started_lists().is_empty());
    }

    #[test]
    fn ordered_list_starts_one_sequence() {
        let doc = convert("<body><ol><li>A</li><li>B</li></ol></body>");
        assert_eq!(doc.started_lists().len(), 1);
        let items: Vec<_> = doc.paragraphs().filter(|p| p.numbering.is_some()).collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].numbering, items[1].numbering);
        assert_eq!(items[0].style, ParagraphStyle::ListNumber(1));
    }

    #[test]
    fn nested_ordered_list_is_one_level_deeper() {
        let doc = convert("<body><ol><li>A<ol><li>A.1</li></ol></li><li>B</li></ol></body>");
        let items: Vec<_> = doc.paragraphs().filter(|p| p.numbering.is_some()).collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].style, ParagraphStyle::ListNumber(1));
        assert_eq!(items[1].style, ParagraphStyle::ListNumber(2));
        assert_eq!(items[1].ilvl, 1);
        assert_eq!(items[2].style, ParagraphStyle::ListNumber(1));
        // The outer list keeps its own sequence after the nested one.
        assert_eq!(items[0].numbering, items[2].numbering);
        assert_ne!(items[0].numbering, items[1].numbering);
        assert_eq!(doc.started_lists().len(), 2);
        // Only the outermost list emits a spacer.
        assert_eq!(doc.paragraphs().filter(|p| p.runs.is_empty()).count(), 1);
    }

    #[test]
    fn unordered_inside_unordered_emits_two_spacers() {
        let doc = convert("<body><ul><li>A<ul><li>B</li></ul></li></ul></body>");
        assert_eq!(doc.paragraphs().filter(|p| p.runs.is_empty()).count(), 2);
        let items: Vec<_> = doc.paragraphs().filter(|p| p.numbering.is_some()).collect();
        assert_eq!(items[1].style, ParagraphStyle::ListBullet(2));
    }

    #[test]
    fn sibling_ordered_lists_restart() {
        let doc = convert("<body><ol><li>A</li></ol><p>x</p><ol><li>B</li></ol></body>");
        assert_eq!(doc.started_lists().len(), 2);
    }

    #[test]
    fn line_breaks() {
        let doc = convert("<body><p>a<br>b</p><br></body>");
        let paras = paragraphs(&doc);
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0].runs.len(), 3);
        assert_eq!(paras[0].runs[1].content, vec![RunContent::Break]);
        assert_eq!(paras[1].runs[0].content, vec![RunContent::Break]);
    }

    #[test]
    fn ignored_tags_skip_their_subtree() {
        let doc = convert("<body><hr><p>kept</p></body>");
        assert_eq!(doc.blocks().len(), 1);

        let options = ConvertOptions {
            ignore: vec!["aside".to_string()],
        };
        let doc = convert_with("<body><aside><p>gone</p></aside><hr></body>", &options);
        assert!(doc.blocks().is_empty());
    }

    #[test]
    fn comments_are_ignored() {
        let doc = convert("<body><!-- note --><p>x</p></body>");
        assert_eq!(doc.blocks().len(), 1);
    }

    #[test]
    fn marker_classes_do_not_leak_to_siblings() {
        let doc = convert(
            r#"<body><p><span class="underline-marker">a</span><span>b</span><span class="tab-marker">c</span></p></body>"#,
        );
        let runs = &paragraphs(&doc)[0].runs;
        assert!(runs[0].underline);
        assert!(!runs[1].underline);
        assert_eq!(runs[1].content[0], RunContent::Text(" b".to_string()));
        assert_eq!(runs[2].content[0], RunContent::Tab);
    }

    #[test]
    fn inline_tags_set_decoration() {
        let doc = convert("<body><p><em>i</em><u>u</u><s>s</s><b>b</b></p></body>");
        let runs = &paragraphs(&doc)[0].runs;
        assert!(runs[0].italic);
        assert!(runs[1].underline);
        assert!(runs[2].strike);
        assert!(runs[3].bold);
        assert!(!runs[3].italic);
    }

    #[test]
    fn margin_left_span_indents_its_own_text() {
        let doc = convert(
            r#"<body><p><span style="color: red; margin-left: 2em">in</span>out</p></body>"#,
        );
        let runs = &paragraphs(&doc)[0].runs;
        assert_eq!(runs[0].content[0], RunContent::Tab);
        assert_eq!(runs[1].content[0], RunContent::Text(" out".to_string()));
    }

    #[test]
    fn page_break_and_table_blocks() {
        let doc = convert(
            "<body><div>a</div><pagebreak></pagebreak><table><tr><td>x</td></tr></table><div>b</div></body>",
        );
        let blocks = doc.blocks();
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[1], Block::PageBreak);
        assert!(matches!(blocks[2], Block::Table(_)));
    }

    #[test]
    fn empty_table_does_not_stop_conversion() {
        let doc = convert("<body><p>before</p><table><tr></tr></table><p>after</p></body>");
        assert_eq!(doc.tables().count(), 0);
        assert_eq!(paragraphs(&doc).len(), 2);
    }

    #[test]
    fn paragraph_inside_list_item_reuses_it() {
        let doc = convert("<body><ul><li><p>one</p></li></ul></body>");
        let items: Vec<_> = doc.paragraphs().filter(|p| p.numbering.is_some()).collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text().trim(), "one");
        assert_eq!(doc.paragraphs().count(), 2);
    }

    #[test]
    fn deep_nesting_is_walked_iteratively() {
        let depth = 5_000;
        let html = format!("<body>{}deep{}</body>", "<span>".repeat(depth), "</span>".repeat(depth));
        let doc = convert(&html);
        assert_eq!(paragraphs(&doc)[0].text(), " deep");
    }
}
