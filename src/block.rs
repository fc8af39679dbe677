use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Formatting flags carried by a rich text object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    Default,
}

/// A run of text with uniform formatting and an optional link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichText {
    pub content: String,
    pub annotations: Annotations,
    pub link: Option<String>,
}

impl RichText {
    /// Unformatted text
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            annotations: Annotations::default(),
            link: None,
        }
    }
}

/// One cell of a table row
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TableCell {
    pub rich_text: Vec<RichText>,
}

/// Notion blocks produced from markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph {
        rich_text: Vec<RichText>,
    },
    Heading1 {
        rich_text: Vec<RichText>,
    },
    Heading2 {
        rich_text: Vec<RichText>,
    },
    Heading3 {
        rich_text: Vec<RichText>,
    },
    BulletedListItem {
        rich_text: Vec<RichText>,
        children: Vec<Block>,
    },
    NumberedListItem {
        rich_text: Vec<RichText>,
        children: Vec<Block>,
    },
    ToDo {
        checked: bool,
        rich_text: Vec<RichText>,
        children: Vec<Block>,
    },
    Code {
        rich_text: Vec<RichText>,
        language: String,
    },
    Quote {
        rich_text: Vec<RichText>,
    },
    Image {
        url: String,
    },
    TableOfContents,
    Table {
        table_width: usize,
        children: Vec<Block>,
    },
    TableRow {
        cells: Vec<TableCell>,
    },
}

impl Block {
    /// A table whose width is taken from its first row
    pub fn table(rows: Vec<Block>) -> Self {
        let table_width = match rows.first() {
            Some(Block::TableRow { cells }) => cells.len(),
            _ => 0,
        };
        Block::Table {
            table_width,
            children: rows,
        }
    }

    /// The Notion `type` discriminator
    pub fn block_type(&self) -> &'static str {
        match self {
            Block::Paragraph { .. } => "paragraph",
            Block::Heading1 { .. } => "heading_1",
            Block::Heading2 { .. } => "heading_2",
            Block::Heading3 { .. } => "heading_3",
            Block::BulletedListItem { .. } => "bulleted_list_item",
            Block::NumberedListItem { .. } => "numbered_list_item",
            Block::ToDo { .. } => "to_do",
            Block::Code { .. } => "code",
            Block::Quote { .. } => "quote",
            Block::Image { .. } => "image",
            Block::TableOfContents => "table_of_contents",
            Block::Table { .. } => "table",
            Block::TableRow { .. } => "table_row",
        }
    }
}

// Wire shapes. These borrow from the model so serialization never clones.

#[derive(Serialize)]
struct TextPayload<'a> {
    rich_text: &'a [RichText],
}

#[derive(Serialize)]
struct ListItemPayload<'a> {
    rich_text: &'a [RichText],
    #[serde(skip_serializing_if = "no_children")]
    children: &'a [Block],
}

#[derive(Serialize)]
struct ToDoPayload<'a> {
    rich_text: &'a [RichText],
    checked: bool,
    #[serde(skip_serializing_if = "no_children")]
    children: &'a [Block],
}

#[derive(Serialize)]
struct CodePayload<'a> {
    rich_text: &'a [RichText],
    language: &'a str,
}

#[derive(Serialize)]
struct ImagePayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    external: ExternalFile<'a>,
}

#[derive(Serialize)]
struct ExternalFile<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct EmptyPayload {}

#[derive(Serialize)]
struct TablePayload<'a> {
    table_width: usize,
    has_column_header: bool,
    has_row_header: bool,
    children: &'a [Block],
}

#[derive(Serialize)]
struct TableRowPayload<'a> {
    cells: &'a [TableCell],
}

#[derive(Serialize)]
struct TextObject<'a> {
    content: &'a str,
    link: Option<Link<'a>>,
}

#[derive(Serialize)]
struct Link<'a> {
    url: &'a str,
}

fn no_children(children: &&[Block]) -> bool {
    children.is_empty()
}

impl Serialize for RichText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", "text")?;
        map.serialize_entry("annotations", &self.annotations)?;
        map.serialize_entry(
            "text",
            &TextObject {
                content: &self.content,
                link: self.link.as_deref().map(|url| Link { url }),
            },
        )?;
        map.end()
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let block_type = self.block_type();
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("object", "block")?;
        map.serialize_entry("type", block_type)?;

        match self {
            Block::Paragraph { rich_text }
            | Block::Heading1 { rich_text }
            | Block::Heading2 { rich_text }
            | Block::Heading3 { rich_text }
            | Block::Quote { rich_text } => {
                map.serialize_entry(block_type, &TextPayload { rich_text })?
            }
            Block::BulletedListItem {
                rich_text,
                children,
            }
            | Block::NumberedListItem {
                rich_text,
                children,
            } => map.serialize_entry(
                block_type,
                &ListItemPayload {
                    rich_text,
                    children,
                },
            )?,
            Block::ToDo {
                checked,
                rich_text,
                children,
            } => map.serialize_entry(
                block_type,
                &ToDoPayload {
                    rich_text,
                    checked: *checked,
                    children,
                },
            )?,
            Block::Code {
                rich_text,
                language,
            } => map.serialize_entry(
                block_type,
                &CodePayload {
                    rich_text,
                    language,
                },
            )?,
            Block::Image { url } => map.serialize_entry(
                block_type,
                &ImagePayload {
                    kind: "external",
                    external: ExternalFile { url },
                },
            )?,
            Block::TableOfContents => map.serialize_entry(block_type, &EmptyPayload {})?,
            Block::Table {
                table_width,
                children,
            } => map.serialize_entry(
                block_type,
                &TablePayload {
                    table_width: *table_width,
                    has_column_header: true,
                    has_row_header: false,
                    children,
                },
            )?,
            Block::TableRow { cells } => {
                map.serialize_entry(block_type, &TableRowPayload { cells })?
            }
        }

        map.end()
    }
}
