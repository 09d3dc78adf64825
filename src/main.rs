//! `stagepipe` – list the fenced code blocks of a markdown document.
//!
//! ```bash
//! stagepipe DOC.md                 # every block
//! stagepipe DOC.md --lang python   # only python blocks
//! stagepipe DOC.md --print -v      # include the code, debug logging
//! ```

use clap::{ArgAction, Parser};
use stagepipe::{CodeBlock, Pipeline, PipelineError, Predicate, Transform, extract_code_blocks};
use std::{error::Error, fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stagepipe", version, about = "List the fenced code blocks of a markdown file")]
struct Cli {
    /// Markdown file to scan
    #[arg(default_value = "DOC.md")]
    path: PathBuf,

    /// Only list blocks tagged with this language
    #[arg(short, long)]
    lang: Option<String>,

    /// Print the code of each block under its summary line
    #[arg(short, long)]
    print: bool,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn describe(index: usize, block: &CodeBlock) -> String {
    format!(
        "[{index}] {lang} (line {line}): {count} line{s}",
        lang = block.lang.as_deref().unwrap_or("-"),
        line = block.line,
        count = block.line_count(),
        s = if block.line_count() == 1 { "" } else { "s" },
    )
}

/// One summary line per block, optionally restricted to `lang`; with `print`
/// the block's code follows its summary.
fn listing(
    blocks: Vec<CodeBlock>,
    lang: Option<String>,
    print: bool,
) -> Result<Vec<String>, PipelineError> {
    Pipeline::<(usize, CodeBlock)>::empty()
        .with_stage(Predicate::named("lang", move |(_, block): &(usize, CodeBlock)| {
            lang.as_deref()
                .is_none_or(|lang| block.lang.as_deref() == Some(lang))
        }))
        .with_stage(Transform::named("describe", move |(index, block): (usize, CodeBlock)| {
            let summary = describe(index, &block);
            if print {
                format!("{summary}\n{}", block.code)
            } else {
                summary
            }
        }))
        .run(blocks.into_iter().enumerate())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let markdown = fs::read_to_string(&cli.path)
        .map_err(|e| format!("cannot read {}: {e}", cli.path.display()))?;
    let blocks = extract_code_blocks(&markdown)?;
    info!(path = %cli.path.display(), blocks = blocks.len(), "parsed document");

    for line in listing(blocks, cli.lang, cli.print)? {
        println!("{line}");
    }
    Ok(())
}
