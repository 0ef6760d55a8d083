//! inkmark - render Markdown and highlight source code in the terminal

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use clap::Parser;
use crossterm::tty::IsTty;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use inkmark::markdown::MarkdownParser;
use inkmark::terminal::{self, DEFAULT_WIDTH};
use inkmark::{render_document, HighlighterRegistry, RenderConfig};

#[derive(Parser)]
#[command(name = "inkmark", version, about = "Render Markdown and source code in the terminal")]
struct Cli {
    /// File to render (reads stdin when absent)
    file: Option<PathBuf>,

    /// Highlight the input as source code in this language instead of Markdown
    #[arg(short, long, value_name = "TAG")]
    lang: Option<String>,

    /// Output width in columns (default: terminal width)
    #[arg(short, long, value_name = "N")]
    width: Option<usize>,

    /// Configuration file (default: ~/.inkmark.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// List the registered language tags and exit
    #[arg(long)]
    list_languages: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("config file '{}' not found", path.display());
            }
            RenderConfig::load_from(path)?
        }
        None => RenderConfig::load()?,
    };
    let registry = HighlighterRegistry::from_config(&config)?;

    if cli.list_languages {
        for tag in registry.languages() {
            println!("{}", tag);
        }
        return Ok(());
    }

    let source = read_input(cli.file.as_ref())?;

    let node = match &cli.lang {
        Some(tag) => match registry.highlight(tag, &source) {
            Some(node) => node,
            None => bail!("no highlighter for language '{}' (see --list-languages)", tag),
        },
        None => {
            let blocks = MarkdownParser::new().parse(&source);
            debug!(blocks = blocks.len(), "parsed markdown");
            render_document(&blocks, &config, &registry)?
        }
    };

    let mut stdout = io::stdout();
    let width = cli
        .width
        .or_else(terminal::terminal_width)
        .unwrap_or(DEFAULT_WIDTH);
    let color = !cli.no_color && stdout.is_tty();
    let lines = terminal::layout(&node, width);
    terminal::write_lines(&mut stdout, &lines, color)?;
    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("cannot read '{}'", path.display()))
        }
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("cannot read standard input")?;
            Ok(source)
        }
    }
}
