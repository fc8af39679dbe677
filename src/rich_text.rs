use crate::ast::{Document, Node};
use crate::block::RichText;
use crate::inline::{MAX_TEXT_LENGTH, Style, chunk_text, map_inlines};

/// Convert the paragraphs of an inline fragment into one flat run of rich text.
///
/// The parser folds blank lines between paragraphs and drops hard breaks, so
/// both are restored as newlines from `source`: every paragraph after the
/// first is prefixed with the blank-line run that preceded it, and each hard
/// break becomes a newline on the following text.
pub fn parse_rich_text(document: &Document, source: &str) -> Vec<RichText> {
    let runs = blank_line_runs(source);
    let mut out = Vec::new();

    let paragraphs = document.children.iter().filter_map(|node| match node {
        Node::Paragraph(children) => Some(children),
        _ => None,
    });

    for (index, children) in paragraphs.enumerate() {
        let mut spans = map_inlines(&restore_breaks(children), &Style::default());

        if index > 0 {
            if let Some(&run) = runs.get(index - 1) {
                // Nothing to attach the run to when the paragraph maps to no text
                prepend(&mut spans, &"\n".repeat(run));
            }
        }
        out.extend(spans);
    }

    log::debug!("converted fragment into {} rich text objects", out.len());
    out
}

/// Lengths of every run of two or more consecutive newlines, in order.
fn blank_line_runs(source: &str) -> Vec<usize> {
    let mut runs = Vec::new();
    let mut count = 0;

    for ch in source.chars() {
        if ch == '\n' {
            count += 1;
            continue;
        }
        if count >= 2 {
            runs.push(count);
        }
        count = 0;
    }
    if count >= 2 {
        runs.push(count);
    }

    runs
}

/// Drop hard breaks, moving each one onto the next text node as a newline.
fn restore_breaks(children: &[Node]) -> Vec<Node> {
    let mut pending = 0;
    let mut out = Vec::with_capacity(children.len());

    for child in children {
        match child {
            Node::Break => pending += 1,
            Node::Text(text) if pending > 0 => {
                out.push(Node::Text("\n".repeat(pending) + text));
                pending = 0;
            }
            other => out.push(other.clone()),
        }
    }

    out
}

fn prepend(spans: &mut Vec<RichText>, prefix: &str) {
    let Some(first) = spans.first_mut() else {
        return;
    };
    first.content.insert_str(0, prefix);

    if first.content.encode_utf16().count() > MAX_TEXT_LENGTH {
        let first = spans.remove(0);
        let style = Style {
            annotations: first.annotations,
            link: first.link,
        };
        let pieces = chunk_text(&first.content, &style);
        spans.splice(0..0, pieces);
    }
}
