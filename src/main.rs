use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use martian::Config;

#[derive(Parser)]
#[command(name = "martian")]
#[command(about = "Convert Markdown into Notion blocks")]
struct Cli {
    /// Input Markdown file (reads stdin when omitted or `-`)
    input: Option<PathBuf>,

    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert inline Markdown into rich text instead of blocks
    #[arg(long)]
    rich_text: bool,

    /// Keep tables instead of dropping them
    #[arg(long)]
    allow_unsupported: bool,

    /// TOML config file (defaults to the bundled config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::compiled_default(),
    };
    if cli.allow_unsupported {
        config.blocks.allow_unsupported = true;
    }

    let markdown = read_input(cli.input.as_ref())?;

    let json = if cli.rich_text {
        martian::to_json(&martian::markdown_to_rich_text(&markdown), cli.pretty)?
    } else {
        let blocks = martian::markdown_to_blocks_with_config(&markdown, &config);
        martian::to_json(&blocks, cli.pretty)?
    };

    match &cli.output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("Error writing {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("Error reading {}", path.display())),
        _ => {
            let mut markdown = String::new();
            io::stdin()
                .read_to_string(&mut markdown)
                .context("Error reading stdin")?;
            Ok(markdown)
        }
    }
}
