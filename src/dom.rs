use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

pub fn html5_parse(input: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(input)
}

pub fn tag_lower(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string().to_ascii_lowercase()),
        _ => None,
    }
}

pub fn is_tag(node: &Handle, tag: &str) -> bool {
    match &node.data {
        NodeData::Element { name, .. } => name.local.to_string().eq_ignore_ascii_case(tag),
        _ => false,
    }
}

pub fn attr_get(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.to_string().eq_ignore_ascii_case(name))
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Whitespace-separated entries of the `class` attribute.
pub fn classes(node: &Handle) -> Vec<String> {
    attr_get(node, "class")
        .map(|v| v.split_ascii_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn collapse_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                out.push(' ');
                in_ws = true;
            }
        } else {
            out.push(ch);
            in_ws = false;
        }
    }
    out
}

pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|c| matches!(c.data, NodeData::Element { .. }))
        .cloned()
        .collect()
}

/// Visits the descendants of `node` (excluding itself) in document order until
/// `visit` returns false. Iterative so deep trees cannot overflow the stack.
fn walk_descendants(node: &Handle, mut visit: impl FnMut(&Handle) -> bool) {
    let mut stack: Vec<Handle> = node.children.borrow().iter().rev().cloned().collect();
    while let Some(n) = stack.pop() {
        if !visit(&n) {
            return;
        }
        stack.extend(n.children.borrow().iter().rev().cloned());
    }
}

pub fn find_first(node: &Handle, tag: &str) -> Option<Handle> {
    let mut found = None;
    walk_descendants(node, |n| {
        if is_tag(n, tag) {
            found = Some(n.clone());
            return false;
        }
        true
    });
    found
}

pub fn find_all(node: &Handle, tag: &str) -> Vec<Handle> {
    let mut out = Vec::new();
    walk_descendants(node, |n| {
        if is_tag(n, tag) {
            out.push(n.clone());
        }
        true
    });
    out
}

pub fn find_body(dom: &RcDom) -> Option<Handle> {
    if is_tag(&dom.document, "body") {
        return Some(dom.document.clone());
    }
    find_first(&dom.document, "body")
}

/// Concatenated text of every text node under `node`.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    walk_descendants(node, |n| {
        if let NodeData::Text { contents } = &n.data {
            out.push_str(&contents.borrow());
        }
        true
    });
    out
}
