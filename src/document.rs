//! In-memory word-processing document produced by the traversal.
//!
//! The model is append-only: blocks are pushed in document order and
//! paragraphs are reached through the [`ParagraphId`] handed out when they
//! were created.

/// Handle to a paragraph owned by a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphId(usize);

/// Handle to a numbering sequence owned by a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Normal,
    Heading(u8),
    ListNumber(u32),
    ListBullet(u32),
}

impl ParagraphStyle {
    /// Style id as written to `w:pStyle`. Level 1 list styles carry no suffix.
    pub fn style_id(&self) -> Option<String> {
        match *self {
            ParagraphStyle::Normal => None,
            ParagraphStyle::Heading(level) => Some(format!("Heading{level}")),
            ParagraphStyle::ListNumber(level) => Some(format!("ListNumber{}", level_suffix(level))),
            ParagraphStyle::ListBullet(level) => Some(format!("ListBullet{}", level_suffix(level))),
        }
    }
}

/// Style-variant suffix for a list level: empty for level 1.
pub fn level_suffix(level: u32) -> String {
    if level <= 1 {
        String::new()
    } else {
        level.min(MAX_LIST_LEVEL).to_string()
    }
}

/// Deepest list level Word numbering definitions can express.
pub const MAX_LIST_LEVEL: u32 = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    Text(String),
    Tab,
    Break,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub content: Vec<RunContent>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
}

impl Run {
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                RunContent::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_break(&self) -> bool {
        self.content.contains(&RunContent::Break)
    }
}

/// Numbering attached to a list paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListNumbering {
    Bullet,
    Ordered(ListId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub numbering: Option<ListNumbering>,
    /// Zero-based nesting level used for `w:ilvl`.
    pub ilvl: u32,
    pub runs: Vec<Run>,
}

impl Paragraph {
    fn new(style: ParagraphStyle) -> Self {
        Self {
            style,
            numbering: None,
            ilvl: 0,
            runs: Vec::new(),
        }
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(Run::text).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: usize,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// An empty table with an all-blank header row.
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            header: vec![String::new(); columns],
            rows: Vec::new(),
        }
    }

    /// Appends an empty row and returns its cells.
    pub fn add_row(&mut self) -> &mut [String] {
        self.rows.push(vec![String::new(); self.columns]);
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(ParagraphId),
    Table(Table),
    PageBreak,
}

/// An ordered numbering sequence. Only sequences that were started are
/// written to the package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct NumberingSequence {
    started: bool,
}

#[derive(Debug, Default)]
pub struct Document {
    blocks: Vec<Block>,
    paragraphs: Vec<Paragraph>,
    sequences: Vec<NumberingSequence>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(&mut self, style: ParagraphStyle) -> ParagraphId {
        let id = ParagraphId(self.paragraphs.len());
        self.paragraphs.push(Paragraph::new(style));
        self.blocks.push(Block::Paragraph(id));
        id
    }

    pub fn add_heading(&mut self, level: u8) -> ParagraphId {
        self.add_paragraph(ParagraphStyle::Heading(level.clamp(1, 6)))
    }

    /// Adds a list paragraph at `level` (1-based) carrying `numbering`.
    pub fn add_list_paragraph(&mut self, level: u32, numbering: ListNumbering) -> ParagraphId {
        let style = match numbering {
            ListNumbering::Bullet => ParagraphStyle::ListBullet(level),
            ListNumbering::Ordered(_) => ParagraphStyle::ListNumber(level),
        };
        let id = self.add_paragraph(style);
        let p = self.paragraph_mut(id);
        p.numbering = Some(numbering);
        p.ilvl = level.clamp(1, MAX_LIST_LEVEL) - 1;
        id
    }

    pub fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    pub fn add_page_break(&mut self) {
        self.blocks.push(Block::PageBreak);
    }

    /// Reserves a numbering sequence for an ordered list. It is written out
    /// only once [`Document::new_list`] starts it.
    pub fn reserve_list(&mut self) -> ListId {
        self.sequences.push(NumberingSequence::default());
        ListId(self.sequences.len() - 1)
    }

    /// Starts numbering afresh for the reserved sequence `id`.
    pub fn new_list(&mut self, id: ListId) {
        if let Some(seq) = self.sequences.get_mut(id.0) {
            seq.started = true;
        }
    }

    /// Started numbering sequences in creation order.
    pub fn started_lists(&self) -> Vec<ListId> {
        self.sequences
            .iter()
            .enumerate()
            .filter(|(_, s)| s.started)
            .map(|(i, _)| ListId(i))
            .collect()
    }

    pub fn paragraph(&self, id: ParagraphId) -> &Paragraph {
        &self.paragraphs[id.0]
    }

    pub fn paragraph_mut(&mut self, id: ParagraphId) -> &mut Paragraph {
        &mut self.paragraphs[id.0]
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Paragraphs in block order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(id) => Some(self.paragraph(*id)),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn has_lists(&self) -> bool {
        self.paragraphs.iter().any(|p| p.numbering.is_some())
    }
}
