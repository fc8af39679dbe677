use crate::ast::Node;
use crate::block::{Annotations, RichText};

/// Maximum length of a single rich text object, in UTF-16 code units
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Formatting inherited from the enclosing inline nodes.
///
/// Each container derives a fresh copy for its children, so flags set on one
/// branch never leak into its siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    pub annotations: Annotations,
    pub link: Option<String>,
}

impl Style {
    fn with(&self, apply: impl FnOnce(&mut Annotations)) -> Self {
        let mut style = self.clone();
        apply(&mut style.annotations);
        style
    }

    fn with_link(&self, url: &str) -> Self {
        Self {
            annotations: self.annotations,
            link: Some(url.to_string()),
        }
    }

    fn rich_text(&self, content: &str) -> RichText {
        RichText {
            content: content.to_string(),
            annotations: self.annotations,
            link: self.link.clone(),
        }
    }
}

/// Split `text` into rich text objects no longer than [`MAX_TEXT_LENGTH`].
///
/// Pieces are cut at the first character that would overflow the limit,
/// never inside a character. Empty text yields nothing.
pub fn chunk_text(text: &str, style: &Style) -> Vec<RichText> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut units = 0;

    for (idx, ch) in text.char_indices() {
        let width = ch.len_utf16();
        if units + width > MAX_TEXT_LENGTH {
            chunks.push(style.rich_text(&text[start..idx]));
            start = idx;
            units = 0;
        }
        units += width;
    }
    if start < text.len() {
        chunks.push(style.rich_text(&text[start..]));
    }

    chunks
}

/// Map one inline node to rich text, applying the inherited style.
///
/// Nodes without a rich text form (images, breaks, raw HTML) map to nothing.
pub fn map_inline(node: &Node, style: &Style) -> Vec<RichText> {
    match node {
        Node::Text(text) => chunk_text(text, style),
        Node::Delete(children) => {
            map_inlines(children, &style.with(|a| a.strikethrough = true))
        }
        Node::Emphasis(children) => map_inlines(children, &style.with(|a| a.italic = true)),
        Node::Strong(children) => map_inlines(children, &style.with(|a| a.bold = true)),
        Node::Link { url, children, .. } => map_inlines(children, &style.with_link(url)),
        Node::InlineCode(code) => chunk_text(code, &style.with(|a| a.code = true)),
        _ => Vec::new(),
    }
}

/// Map a sequence of sibling inline nodes, in order.
pub fn map_inlines(nodes: &[Node], style: &Style) -> Vec<RichText> {
    nodes.iter().flat_map(|node| map_inline(node, style)).collect()
}
