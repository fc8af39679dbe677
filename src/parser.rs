use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

use crate::ast::{Document, List, ListItem, Node, Table, TableCell, TableRow};

/// Parse markdown text into a syntax tree.
///
/// GitHub extensions (tables, strikethrough, task lists) are always on.
/// With `strip_frontmatter`, a leading YAML block is dropped.
pub fn parse(markdown: &str, strip_frontmatter: bool) -> Document {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    if strip_frontmatter {
        options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    }

    let mut state = TreeBuilder::default();
    for event in Parser::new_ext(markdown, options) {
        state.process_event(event);
    }
    state.finish()
}

/// What an open frame will become once its `End` event arrives
enum FrameKind {
    Document,
    Paragraph,
    // Paragraph synthesized around inline content of a tight list item
    ImplicitParagraph,
    Heading(u8),
    Blockquote,
    CodeBlock { lang: Option<String>, value: String },
    HtmlBlock(String),
    List { start: Option<u64>, items: Vec<ListItem> },
    Item { checked: Option<bool> },
    Table(Vec<TableRow>),
    // Table head and body rows both become rows
    TableRow(Vec<TableCell>),
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String, title: Option<String> },
    Image { url: String, title: Option<String> },
    // Constructs the tree has no node for; content is discarded
    Skip,
}

struct Frame {
    kind: FrameKind,
    children: Vec<Node>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }
}

struct TreeBuilder {
    stack: Vec<Frame>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            stack: vec![Frame::new(FrameKind::Document)],
        }
    }
}

impl TreeBuilder {
    fn process_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(_) => {
                // Implicit paragraphs never see their own End
                if self.top_is(|kind| matches!(kind, FrameKind::ImplicitParagraph)) {
                    self.close();
                }
                self.close();
            }

            Event::Text(text) => match self.top_kind_mut() {
                Some(FrameKind::CodeBlock { value, .. }) => value.push_str(&text),
                _ => self.push_inline(Node::Text(text.into_string())),
            },
            Event::Code(code) => self.push_inline(Node::InlineCode(code.into_string())),
            Event::InlineHtml(html) => self.push_inline(Node::Html(html.into_string())),
            Event::Html(html) => match self.top_kind_mut() {
                Some(FrameKind::HtmlBlock(value)) => value.push_str(&html),
                _ => self.push_block(Node::Html(html.into_string())),
            },

            // Soft breaks stay inside the surrounding text
            Event::SoftBreak => self.push_inline(Node::text("\n")),
            Event::HardBreak => self.push_inline(Node::Break),
            Event::Rule => self.push_block(Node::ThematicBreak),

            Event::TaskListMarker(checked) => {
                let item = self.stack.iter_mut().rev().find_map(|frame| match &mut frame.kind {
                    FrameKind::Item { checked: slot } => Some(slot),
                    _ => None,
                });
                if let Some(slot) = item {
                    *slot = Some(checked);
                }
            }

            // Footnotes, math
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag) {
        let kind = match tag {
            Tag::Emphasis => FrameKind::Emphasis,
            Tag::Strong => FrameKind::Strong,
            Tag::Strikethrough => FrameKind::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => FrameKind::Link {
                url: dest_url.into_string(),
                title: non_empty(title.into_string()),
            },
            Tag::Image {
                dest_url, title, ..
            } => FrameKind::Image {
                url: dest_url.into_string(),
                title: non_empty(title.into_string()),
            },
            block => {
                self.close_implicit_paragraph();
                let kind = match block {
                    Tag::Paragraph => FrameKind::Paragraph,
                    Tag::Heading { level, .. } => FrameKind::Heading(heading_level_to_u8(level)),
                    Tag::BlockQuote(_) => FrameKind::Blockquote,
                    Tag::CodeBlock(kind) => FrameKind::CodeBlock {
                        lang: match kind {
                            CodeBlockKind::Fenced(info) => info
                                .split_whitespace()
                                .next()
                                .map(str::to_string),
                            CodeBlockKind::Indented => None,
                        },
                        value: String::new(),
                    },
                    Tag::HtmlBlock => FrameKind::HtmlBlock(String::new()),
                    Tag::List(start) => FrameKind::List {
                        start,
                        items: Vec::new(),
                    },
                    Tag::Item => FrameKind::Item { checked: None },
                    Tag::Table(_) => FrameKind::Table(Vec::new()),
                    Tag::TableHead | Tag::TableRow => FrameKind::TableRow(Vec::new()),
                    Tag::TableCell => FrameKind::TableCell,
                    _ => FrameKind::Skip,
                };
                self.stack.push(Frame::new(kind));
                return;
            }
        };
        self.ensure_inline_parent();
        self.stack.push(Frame::new(kind));
    }

    /// Pop the innermost frame and attach its result to the new innermost frame.
    fn close(&mut self) {
        // The document frame is never closed by an event
        if self.stack.len() < 2 {
            return;
        }
        let Some(Frame { kind, children }) = self.stack.pop() else {
            return;
        };

        match kind {
            FrameKind::Document | FrameKind::Skip => {}
            FrameKind::Paragraph | FrameKind::ImplicitParagraph => {
                self.attach(Node::Paragraph(children))
            }
            FrameKind::Heading(depth) => self.attach(Node::Heading { depth, children }),
            FrameKind::Blockquote => self.attach(Node::Blockquote(children)),
            FrameKind::CodeBlock { lang, mut value } => {
                if value.ends_with('\n') {
                    value.pop();
                }
                self.attach(Node::Code { lang, value });
            }
            FrameKind::HtmlBlock(value) => self.attach(Node::Html(value)),
            FrameKind::List { start, items } => self.attach(Node::List(List { start, items })),
            FrameKind::Item { checked } => {
                if let Some(FrameKind::List { items, .. }) = self.top_kind_mut() {
                    items.push(ListItem { checked, children });
                }
            }
            FrameKind::Table(rows) => self.attach(Node::Table(Table { rows })),
            FrameKind::TableRow(cells) => {
                if let Some(FrameKind::Table(rows)) = self.top_kind_mut() {
                    rows.push(TableRow { cells });
                }
            }
            FrameKind::TableCell => {
                if let Some(FrameKind::TableRow(cells)) = self.top_kind_mut() {
                    cells.push(TableCell { children });
                }
            }
            FrameKind::Emphasis => self.attach(Node::Emphasis(children)),
            FrameKind::Strong => self.attach(Node::Strong(children)),
            FrameKind::Strikethrough => self.attach(Node::Delete(children)),
            FrameKind::Link { url, title } => self.attach(Node::Link {
                url,
                title,
                children,
            }),
            FrameKind::Image { url, title } => self.attach(Node::Image {
                url,
                alt: plain_text(&children),
                title,
            }),
        }
    }

    fn finish(mut self) -> Document {
        while self.stack.len() > 1 {
            self.close();
        }
        let children = self
            .stack
            .pop()
            .map(|frame| frame.children)
            .unwrap_or_default();
        Document { children }
    }

    fn push_inline(&mut self, node: Node) {
        self.ensure_inline_parent();
        self.attach(node);
    }

    /// Tight list items carry inline content without a paragraph
    fn ensure_inline_parent(&mut self) {
        if self.top_is(|kind| matches!(kind, FrameKind::Item { .. })) {
            self.stack.push(Frame::new(FrameKind::ImplicitParagraph));
        }
    }

    fn push_block(&mut self, node: Node) {
        self.close_implicit_paragraph();
        self.attach(node);
    }

    fn close_implicit_paragraph(&mut self) {
        if self.top_is(|kind| matches!(kind, FrameKind::ImplicitParagraph)) {
            self.close();
        }
    }

    /// Append a node to the innermost frame, merging adjacent text.
    fn attach(&mut self, node: Node) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        match (frame.children.last_mut(), node) {
            (Some(Node::Text(prev)), Node::Text(text)) => prev.push_str(&text),
            (_, node) => frame.children.push(node),
        }
    }

    fn top_is(&self, pred: impl Fn(&FrameKind) -> bool) -> bool {
        self.stack.last().is_some_and(|frame| pred(&frame.kind))
    }

    fn top_kind_mut(&mut self) -> Option<&mut FrameKind> {
        self.stack.last_mut().map(|frame| &mut frame.kind)
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Concatenated text content of an inline subtree
fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) | Node::InlineCode(text) => out.push_str(text),
            Node::Emphasis(children)
            | Node::Strong(children)
            | Node::Delete(children)
            | Node::Link { children, .. } => out.push_str(&plain_text(children)),
            Node::Image { alt, .. } => out.push_str(alt),
            _ => {}
        }
    }
    out
}
