//! Convert Markdown (with GitHub extensions) into Notion blocks and rich text.
//!
//! Headings deeper than level 3 become level 3 headings. Numbered, bulleted
//! and to-do lists, italics, bold, strikethrough, inline code and links are
//! supported. Tables are dropped unless explicitly allowed; raw HTML and
//! thematic breaks are always dropped. Block quotes keep only the text of
//! their paragraphs and headings.

pub mod ast;
mod block;
mod config;
mod convert;
mod error;
mod inline;
mod parser;
mod rich_text;

pub use block::{Annotations, Block, Color, RichText, TableCell};
pub use config::{BlocksConfig, CodeConfig, Config};
pub use convert::{ConvertOptions, parse_blocks, parse_node};
pub use error::{Error, Result};
pub use inline::{MAX_TEXT_LENGTH, Style, chunk_text, map_inline};
pub use parser::parse;
pub use rich_text::parse_rich_text;

use serde::Serialize;

/// Convert markdown into Notion blocks.
///
/// With `allow_unsupported`, tables are converted instead of dropped.
pub fn markdown_to_blocks(markdown: &str, allow_unsupported: bool) -> Vec<Block> {
    let mut config = Config::compiled_default();
    config.blocks.allow_unsupported = allow_unsupported;
    markdown_to_blocks_with_config(markdown, &config)
}

/// Convert markdown into Notion blocks with custom config.
pub fn markdown_to_blocks_with_config(markdown: &str, config: &Config) -> Vec<Block> {
    let document = parse(markdown, config.blocks.strip_frontmatter);
    parse_blocks(&document, &config.convert_options())
}

/// Convert inline markdown into Notion rich text.
///
/// Only text, italics, bold, strikethrough, inline code and links survive;
/// blank lines between paragraphs and hard breaks are kept as newlines.
pub fn markdown_to_rich_text(text: &str) -> Vec<RichText> {
    parse_rich_text(&parse(text, false), text)
}

/// Render blocks or rich text as Notion API JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
