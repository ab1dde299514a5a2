// src/main.rs
//
// truncahtml — command-line front end.
//
// Reads rendered HTML from a file or stdin and writes the result to a file or
// stdout. Logging goes to stderr and is controlled by RUST_LOG, e.g.
// `RUST_LOG=truncahtml=debug`.
//
// Subcommands:
//   reserialize   : echo the HTML back (optionally without cut separators)
//   truncate      : cut to N words, keep the raw marker, close open elements
//   summarize     : cut separator or word limit, marker replaced by an ellipsis
//   absolutify    : make local href/src values absolute against a base domain

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use truncahtml::summary::DEFAULT_SUMMARY_WORDS;
use truncahtml::{
    absolutify, reserialize, strip_cut_separator, summarize, truncate, SummaryOptions,
    DEFAULT_MARKER,
};

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Re-serialize HTML unchanged
    Reserialize {
        #[command(flatten)]
        io: IoArgs,

        /// Remove `<!-- cut -->` style separators
        #[arg(long)]
        strip_cut: bool,
    },
    /// Truncate to a word budget, closing open elements
    Truncate {
        #[command(flatten)]
        io: IoArgs,

        /// Maximum number of words (unlimited when omitted)
        #[arg(short = 'n', long)]
        max_words: Option<usize>,

        /// Text written where the cut happens
        #[arg(long, default_value = DEFAULT_MARKER)]
        marker: String,
    },
    /// Build a post summary
    Summarize {
        #[command(flatten)]
        io: IoArgs,

        /// Maximum number of words when there is no cut separator
        #[arg(short = 'n', long, default_value_t = DEFAULT_SUMMARY_WORDS)]
        max_words: usize,

        /// Text written where the cut happens, before it becomes the ellipsis
        #[arg(long, default_value = DEFAULT_MARKER)]
        marker: String,

        /// Replacement for the marker and the whitespace before it
        #[arg(long, default_value = "...")]
        ellipsis: String,
    },
    /// Make local href/src URLs absolute
    Absolutify {
        #[command(flatten)]
        io: IoArgs,

        /// Base domain, e.g. `example.com` or `https://example.com/blog`
        #[arg(long)]
        base: String,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Input file (default: stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (io, html) = match &cli.command {
        Command::Reserialize { io, strip_cut } => {
            let src = read_input(io.input.as_deref())?;
            let html = if *strip_cut {
                reserialize(&strip_cut_separator(&src))
            } else {
                reserialize(&src)
            };
            (io, html)
        }
        Command::Truncate {
            io,
            max_words,
            marker,
        } => {
            let src = read_input(io.input.as_deref())?;
            (io, truncate(&src, *max_words, marker))
        }
        Command::Summarize {
            io,
            max_words,
            marker,
            ellipsis,
        } => {
            let src = read_input(io.input.as_deref())?;
            let options = SummaryOptions {
                max_words: Some(*max_words),
                marker: marker.clone(),
                ellipsis: ellipsis.clone(),
            };
            (io, summarize(&src, &options))
        }
        Command::Absolutify { io, base } => {
            let src = read_input(io.input.as_deref())?;
            (io, absolutify(&src, base))
        }
    };

    write_output(io.output.as_deref(), &html)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            let bytes =
                fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            info!("read {} bytes from {}", bytes.len(), path.display());
            String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8", path.display()))
        }
        None => {
            let mut src = String::new();
            io::stdin()
                .read_to_string(&mut src)
                .context("reading stdin")?;
            Ok(src)
        }
    }
}

fn write_output(path: Option<&Path>, html: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {} bytes to {}", html.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes()).context("writing stdout")?;
            stdout.flush().context("flushing stdout")?;
        }
    }
    Ok(())
}
