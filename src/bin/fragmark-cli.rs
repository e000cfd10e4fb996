use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fragmark::highlight::{HighlightTarget, TextHighlighter};
use fragmark::persistence::FragmentService;
use fragmark::timefmt::format_interval;
use fragmark::HttpFragmentService;

#[derive(Parser, Debug)]
#[command(name = "fragmark-cli")]
#[command(about = "Inspect and text-link saved audio fragments")]
struct Params {
    /// Base URL of the fragment backend.
    #[arg(long = "backend", default_value = "http://127.0.0.1:8000")]
    backend: String,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List the regions saved for an audio file.
    List {
        /// Audio filename as known to the backend.
        #[arg(long)]
        audio: String,
    },
    /// Show the stored data for one fragment.
    Fragment {
        /// Server-assigned fragment filename.
        #[arg(long)]
        filename: String,
    },
    /// Match each saved region's comment against a transcript file.
    Link {
        /// Audio filename as known to the backend.
        #[arg(long)]
        audio: String,
        /// Path to the transcript text file.
        #[arg(long)]
        text: std::path::PathBuf,
    },
}

fn main() {
    fragmark::logging::init();

    if let Err(err) = run() {
        eprintln!("fragmark-cli: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let params = Params::parse();
    let service =
        HttpFragmentService::new(&params.backend).context("invalid backend configuration")?;

    match params.command {
        Cmd::List { audio } => {
            let regions = service
                .saved_regions(&audio)
                .context("failed to list saved regions")?;
            if regions.is_empty() {
                println!("no saved regions for {audio}");
                return Ok(());
            }
            for region in regions {
                println!(
                    "{}  {}  {}",
                    region.filename,
                    format_interval(region.start, region.end),
                    region.comment
                );
            }
        }
        Cmd::Fragment { filename } => {
            let fragment = service
                .fragment_data(&filename)
                .context("failed to fetch fragment data")?;
            println!(
                "{filename}  {}  duration {:.3}s",
                format_interval(fragment.start_time, fragment.end_time),
                fragment.duration
            );
            if let Some(text) = fragment.selected_text {
                println!("  text: {text}");
            }
        }
        Cmd::Link { audio, text } => {
            let document = std::fs::read_to_string(&text)
                .with_context(|| format!("failed to read transcript '{}'", text.display()))?;
            let regions = service
                .saved_regions(&audio)
                .context("failed to list saved regions")?;

            let mut highlighter = TextHighlighter::new(document);
            for region in &regions {
                if region.comment.trim().is_empty() {
                    println!("{}  (no comment, skipped)", region.filename);
                    continue;
                }
                let target = HighlightTarget {
                    fragment: region.filename.clone(),
                    start: region.start,
                    end: region.end,
                };
                match highlighter.bind(&region.comment, &target) {
                    Some(bound) => {
                        let span = bound.range.clone();
                        println!(
                            "{}  {}  bytes {}..{} ({:?})",
                            region.filename,
                            format_interval(region.start, region.end),
                            span.start,
                            span.end,
                            bound.strategy
                        );
                    }
                    None => println!("{}  no match in transcript", region.filename),
                }
            }
        }
    }

    Ok(())
}
