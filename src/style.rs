use crate::document::{ListId, ParagraphId};
use crate::dom;
use markup5ever_rcdom::Handle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListType {
    #[default]
    None,
    Ordered,
    Unordered,
}

/// Formatting inherited down the tree.
///
/// `Style` is a plain value: every descent works on its own copy, so a change
/// made for one branch is never visible to a sibling or an ancestor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    /// List nesting depth, 0 outside of lists.
    pub level: u32,
    pub list_type: ListType,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    /// Emit a tab before the next text run.
    pub tab: bool,
    /// Left-margin hint from an inline `margin-left` declaration.
    pub indent: bool,
    /// Paragraph that text is currently flowing into.
    pub paragraph: Option<ParagraphId>,
    /// Set on the first item of a freshly opened numbered list.
    pub first_in_list: bool,
    /// Numbering sequence reserved by the enclosing `<ol>`.
    pub numbering: Option<ListId>,
    /// Some ancestor is an `<ol>`.
    pub in_ordered_list: bool,
}

impl Style {
    /// Copies `self` for `node`, applying the marker classes it carries.
    pub fn derive(&self, node: &Handle) -> Style {
        let mut style = *self;
        for class in dom::classes(node) {
            style.apply_class(&class);
        }
        style
    }

    fn apply_class(&mut self, class: &str) {
        match class {
            "underline-marker" => self.underline = true,
            "strike-marker" => self.strike = true,
            "tab-marker" => self.tab = true,
            _ => {}
        }
    }
}
