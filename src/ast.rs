/// A parsed markdown document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub children: Vec<Node>,
}

/// Markdown syntax tree node (block and inline level share one enum,
/// mirroring the standard markdown AST).
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Block level
    Paragraph(Vec<Node>),
    Heading {
        depth: u8,
        children: Vec<Node>,
    },
    Code {
        lang: Option<String>,
        value: String,
    },
    Blockquote(Vec<Node>),
    List(List),
    Table(Table),
    ThematicBreak,
    Html(String),

    // Inline level
    Text(String),
    Emphasis(Vec<Node>),
    Strong(Vec<Node>),
    Delete(Vec<Node>),
    Link {
        url: String,
        title: Option<String>,
        children: Vec<Node>,
    },
    InlineCode(String),
    Image {
        url: String,
        alt: String,
        title: Option<String>,
    },
    Break,
}

/// A list. `start` is set only for ordered lists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct List {
    pub start: Option<u64>,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItem {
    /// For task lists: None = not a task, Some(false) = unchecked, Some(true) = checked
    pub checked: Option<bool>,
    pub children: Vec<Node>,
}

/// A GFM table. The first row is the header row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCell {
    pub children: Vec<Node>,
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }
}

impl ListItem {
    /// Split off the leading paragraph that labels this item.
    ///
    /// Returns `None` when the first child is missing or is not a paragraph.
    pub fn split_label(&self) -> Option<(&[Node], &[Node])> {
        match self.children.split_first() {
            Some((Node::Paragraph(label), rest)) => Some((label.as_slice(), rest)),
            _ => None,
        }
    }
}
