use url::Url;

use crate::ast::{Document, List, Node, Table};
use crate::block::{Block, RichText, TableCell};
use crate::config::Config;
use crate::inline::{Style, chunk_text, map_inlines};

/// Settings that shape the block mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Keep tables, which are otherwise dropped
    pub allow_unsupported: bool,
    /// Language for code blocks without an info string
    pub default_language: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Config::default().convert_options()
    }
}

/// Convert every top-level node of a document, in order.
pub fn parse_blocks(document: &Document, options: &ConvertOptions) -> Vec<Block> {
    let blocks: Vec<Block> = document
        .children
        .iter()
        .flat_map(|node| parse_node(node, options))
        .collect();
    log::debug!(
        "converted {} top-level nodes into {} blocks",
        document.children.len(),
        blocks.len()
    );
    blocks
}

/// Convert one block-level node. Nodes Notion cannot represent yield nothing.
pub fn parse_node(node: &Node, options: &ConvertOptions) -> Vec<Block> {
    match node {
        Node::Heading { depth, children } => vec![parse_heading(*depth, children)],
        Node::Paragraph(children) => vec![parse_paragraph(children)],
        Node::Code { lang, value } => vec![parse_code(lang.as_deref(), value, options)],
        Node::Blockquote(children) => vec![parse_blockquote(children, options)],
        Node::List(list) => parse_list(list, options),
        Node::Table(table) if options.allow_unsupported => vec![parse_table(table)],
        _ => Vec::new(),
    }
}

fn parse_heading(depth: u8, children: &[Node]) -> Block {
    let rich_text = map_inlines(children, &Style::default());

    // Notion only has three heading levels
    match depth {
        1 => Block::Heading1 { rich_text },
        2 => Block::Heading2 { rich_text },
        _ => Block::Heading3 { rich_text },
    }
}

fn parse_paragraph(children: &[Node]) -> Block {
    // A leading image turns the whole paragraph into an image block
    if let Some(Node::Image { url, .. }) = children.first() {
        match Url::parse(url) {
            Ok(_) => return Block::Image { url: url.clone() },
            Err(err) => {
                log::warn!("{url} is not a valid url ({err}), keeping the paragraph as text")
            }
        }
    }

    if is_table_of_contents(children) {
        return Block::TableOfContents;
    }

    Block::Paragraph {
        rich_text: map_inlines(children, &Style::default()),
    }
}

/// Legacy `[[_TOC_]]` marker
fn is_table_of_contents(children: &[Node]) -> bool {
    match children {
        [Node::Text(open), Node::Emphasis(inner), _, ..] if open == "[[" => {
            matches!(inner.first(), Some(Node::Text(text)) if text == "TOC")
        }
        _ => false,
    }
}

fn parse_code(lang: Option<&str>, value: &str, options: &ConvertOptions) -> Block {
    Block::Code {
        rich_text: chunk_text(value, &Style::default()),
        language: lang.unwrap_or(&options.default_language).to_string(),
    }
}

/// Quotes hold only rich text, so nested blocks are reduced to the text of
/// their paragraphs and headings. Everything else inside the quote is lost.
fn parse_blockquote(children: &[Node], options: &ConvertOptions) -> Block {
    let rich_text: Vec<RichText> = children
        .iter()
        .flat_map(|child| parse_node(child, options))
        .flat_map(|block| match block {
            Block::Paragraph { rich_text }
            | Block::Heading1 { rich_text }
            | Block::Heading2 { rich_text }
            | Block::Heading3 { rich_text } => rich_text,
            _ => Vec::new(),
        })
        .collect();

    Block::Quote { rich_text }
}

fn parse_list(list: &List, options: &ConvertOptions) -> Vec<Block> {
    list.items
        .iter()
        .filter_map(|item| {
            // Items that don't open with a paragraph have no label and are skipped
            let (label, rest) = item.split_label()?;
            let rich_text = map_inlines(label, &Style::default());
            let children: Vec<Block> = rest
                .iter()
                .flat_map(|child| parse_node(child, options))
                .collect();

            // An ordered list numbers every item, task markers included
            let block = if list.start.is_some() {
                Block::NumberedListItem {
                    rich_text,
                    children,
                }
            } else if let Some(checked) = item.checked {
                Block::ToDo {
                    checked,
                    rich_text,
                    children,
                }
            } else {
                Block::BulletedListItem {
                    rich_text,
                    children,
                }
            };
            Some(block)
        })
        .collect()
}

fn parse_table(table: &Table) -> Block {
    let rows = table
        .rows
        .iter()
        .map(|row| Block::TableRow {
            cells: row
                .cells
                .iter()
                .map(|cell| TableCell {
                    rich_text: map_inlines(&cell.children, &Style::default()),
                })
                .collect(),
        })
        .collect();

    Block::table(rows)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::ast::ListItem;
    use crate::parser::parse;

    fn convert(markdown: &str) -> Vec<Block> {
        parse_blocks(&parse(markdown, false), &ConvertOptions::default())
    }

    fn paragraph(text: &str) -> Node {
        Node::Paragraph(vec![Node::text(text)])
    }

    fn image(url: &str) -> Node {
        Node::Image {
            url: url.into(),
            alt: String::new(),
            title: None,
        }
    }

    #[rstest]
    #[case(1, "heading_1")]
    #[case(2, "heading_2")]
    #[case(3, "heading_3")]
    #[case(4, "heading_3")]
    #[case(5, "heading_3")]
    #[case(6, "heading_3")]
    #[case(0, "heading_3")]
    fn heading_depths_collapse(#[case] depth: u8, #[case] expected: &str) {
        let node = Node::Heading {
            depth,
            children: vec![Node::text("title")],
        };
        let blocks = parse_node(&node, &ConvertOptions::default());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type(), expected);
    }

    #[test]
    fn image_promotion_discards_rest_of_paragraph() {
        let node = Node::Paragraph(vec![
            image("https://example.com/x.png"),
            Node::text(" caption"),
        ]);
        assert_eq!(
            parse_node(&node, &ConvertOptions::default()),
            vec![Block::Image {
                url: "https://example.com/x.png".into()
            }]
        );
    }

    #[test]
    fn invalid_image_url_falls_back_to_text() {
        let node = Node::Paragraph(vec![image("not a url"), Node::text("after")]);
        assert_eq!(
            parse_node(&node, &ConvertOptions::default()),
            vec![Block::Paragraph {
                rich_text: vec![RichText::plain("after")]
            }]
        );

        let lone = Node::Paragraph(vec![image("not a url")]);
        assert_eq!(
            parse_node(&lone, &ConvertOptions::default()),
            vec![Block::Paragraph { rich_text: vec![] }]
        );
    }

    #[test]
    fn image_must_come_first() {
        let node = Node::Paragraph(vec![
            Node::text("see "),
            image("https://example.com/x.png"),
        ]);
        assert_eq!(
            parse_node(&node, &ConvertOptions::default()),
            vec![Block::Paragraph {
                rich_text: vec![RichText::plain("see ")]
            }]
        );
    }

    #[test]
    fn table_of_contents_marker() {
        let node = Node::Paragraph(vec![
            Node::text("[["),
            Node::Emphasis(vec![Node::text("TOC")]),
            Node::text("]]"),
        ]);
        assert_eq!(
            parse_node(&node, &ConvertOptions::default()),
            vec![Block::TableOfContents]
        );
    }

    #[test]
    fn table_of_contents_needs_three_children() {
        let node = Node::Paragraph(vec![
            Node::text("[["),
            Node::Emphasis(vec![Node::text("TOC")]),
        ]);
        let blocks = parse_node(&node, &ConvertOptions::default());
        assert_eq!(blocks[0].block_type(), "paragraph");

        let other = Node::Paragraph(vec![
            Node::text("[["),
            Node::Emphasis(vec![Node::text("toc")]),
            Node::text("]]"),
        ]);
        let blocks = parse_node(&other, &ConvertOptions::default());
        assert_eq!(blocks[0].block_type(), "paragraph");
    }

    #[test]
    fn code_block_language() {
        assert_eq!(
            convert("```rust\nfn main() {}\n```\n\n```\nraw\n```"),
            vec![
                Block::Code {
                    rich_text: vec![RichText::plain("fn main() {}")],
                    language: "rust".into(),
                },
                Block::Code {
                    rich_text: vec![RichText::plain("raw")],
                    language: "plain text".into(),
                },
            ]
        );
    }

    #[test]
    fn long_code_block_is_chunked() {
        let node = Node::Code {
            lang: None,
            value: "a".repeat(4100),
        };
        let blocks = parse_node(&node, &ConvertOptions::default());
        let Block::Code { rich_text, .. } = &blocks[0] else {
            panic!("expected code block, got {:?}", blocks[0]);
        };
        assert_eq!(rich_text.len(), 3);
    }

    #[test]
    fn blockquote_keeps_paragraph_and_heading_text() {
        let node = Node::Blockquote(vec![
            paragraph("first"),
            Node::Heading {
                depth: 2,
                children: vec![Node::text("second")],
            },
        ]);
        assert_eq!(
            parse_node(&node, &ConvertOptions::default()),
            vec![Block::Quote {
                rich_text: vec![RichText::plain("first"), RichText::plain("second")]
            }]
        );
    }

    #[test]
    fn blockquote_drops_lists_and_code() {
        assert_eq!(
            convert("> intro\n>\n> - item\n>\n> ```\n> code\n> ```"),
            vec![Block::Quote {
                rich_text: vec![RichText::plain("intro")]
            }]
        );
    }

    #[test]
    fn numbered_list_overrides_tasks() {
        let list = Node::List(List {
            start: Some(1),
            items: vec![
                ListItem {
                    checked: Some(true),
                    children: vec![paragraph("a")],
                },
                ListItem {
                    checked: None,
                    children: vec![paragraph("b")],
                },
            ],
        });
        let blocks = parse_node(&list, &ConvertOptions::default());
        let kinds: Vec<_> = blocks.iter().map(Block::block_type).collect();
        assert_eq!(kinds, vec!["numbered_list_item", "numbered_list_item"]);
    }

    #[test]
    fn checked_state_classifies_per_item() {
        assert_eq!(
            convert("- [x] done\n- [ ] todo\n- plain"),
            vec![
                Block::ToDo {
                    checked: true,
                    rich_text: vec![RichText::plain("done")],
                    children: vec![],
                },
                Block::ToDo {
                    checked: false,
                    rich_text: vec![RichText::plain("todo")],
                    children: vec![],
                },
                Block::BulletedListItem {
                    rich_text: vec![RichText::plain("plain")],
                    children: vec![],
                },
            ]
        );
    }

    #[test]
    fn items_labelled_with_markup_are_kept() {
        let blocks = convert("- **bold** item\n- [link](https://a.b)\n- [x] *done*\n- plain");
        let kinds: Vec<_> = blocks.iter().map(Block::block_type).collect();
        assert_eq!(
            kinds,
            vec![
                "bulleted_list_item",
                "bulleted_list_item",
                "to_do",
                "bulleted_list_item"
            ]
        );

        let Block::ToDo { rich_text, .. } = &blocks[2] else {
            panic!("expected to-do, got {:?}", blocks[2]);
        };
        assert_eq!(rich_text[0].content, "done");
        assert!(rich_text[0].annotations.italic);
    }

    #[test]
    fn nested_list_items_become_children() {
        assert_eq!(
            convert("1. parent\n   - child\n2. next"),
            vec![
                Block::NumberedListItem {
                    rich_text: vec![RichText::plain("parent")],
                    children: vec![Block::BulletedListItem {
                        rich_text: vec![RichText::plain("child")],
                        children: vec![],
                    }],
                },
                Block::NumberedListItem {
                    rich_text: vec![RichText::plain("next")],
                    children: vec![],
                },
            ]
        );
    }

    #[test]
    fn item_without_leading_paragraph_is_skipped() {
        let list = Node::List(List {
            start: None,
            items: vec![
                ListItem {
                    checked: None,
                    children: vec![Node::Code {
                        lang: None,
                        value: "x".into(),
                    }],
                },
                ListItem::default(),
                ListItem {
                    checked: None,
                    children: vec![paragraph("kept")],
                },
            ],
        });
        assert_eq!(
            parse_node(&list, &ConvertOptions::default()),
            vec![Block::BulletedListItem {
                rich_text: vec![RichText::plain("kept")],
                children: vec![],
            }]
        );
    }

    #[test]
    fn tables_need_allow_unsupported() {
        let markdown = "| A | B |\n|---|---|\n| 1 | 2 |";
        assert!(convert(markdown).is_empty());

        let options = ConvertOptions {
            allow_unsupported: true,
            ..ConvertOptions::default()
        };
        let blocks = parse_blocks(&parse(markdown, false), &options);
        let cell = |text: &str| TableCell {
            rich_text: vec![RichText::plain(text)],
        };
        assert_eq!(
            blocks,
            vec![Block::Table {
                table_width: 2,
                children: vec![
                    Block::TableRow {
                        cells: vec![cell("A"), cell("B")]
                    },
                    Block::TableRow {
                        cells: vec![cell("1"), cell("2")]
                    },
                ],
            }]
        );
    }

    #[test]
    fn unsupported_blocks_are_dropped() {
        assert!(convert("---\n\n<div>raw</div>").is_empty());
    }

    #[test]
    fn conversion_is_deterministic() {
        let markdown = "# T\n\n> q\n\n- [x] a\n  1. b\n\n**x** *y* `z` [l](https://a.b)";
        let document = parse(markdown, false);
        let options = ConvertOptions::default();
        assert_eq!(
            parse_blocks(&document, &options),
            parse_blocks(&document, &options)
        );
    }
}
