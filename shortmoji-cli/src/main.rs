//! shortmoji CLI
//!
//! Applies `:shortcode:` emoji to HTML and inspects the packaged data.
//!
//! - `shortmoji apply page.html`       # Print the rewritten fragment
//! - `shortmoji dump --aliases`        # Print the normalized alias table
//! - `shortmoji sync-data`             # Refresh the packaged data files

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use shortmoji_common::{Component, warn_once};
use shortmoji_core::{
    ApplyOptions, DATA_DIR_ENV, DataSource, SyncOutcome, apply_emoji_shortcodes, load_alias_map,
    load_emoji_map, sync_data,
};
use shortmoji_dom::NodeId;
use shortmoji_html::{parse_fragment, print_tree, serialize_children};

/// Data directory of the core crate, relative to the workspace root.
const DEFAULT_DATA_DEST: &str = "crates/shortmoji-core/data";

/// shortmoji: emoji shortcodes for HTML fragments
#[derive(Parser, Debug)]
#[command(name = "shortmoji")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Rewrite a file
    shortmoji apply notes.html

    # Rewrite inline HTML, leaving .raw elements alone
    shortmoji apply --html '<p>:tada: <span class="raw">:tada:</span></p>' --skip .raw

    # Show the DOM after substitution
    shortmoji apply --tree --html '<p>:+1:</p>'

    # Dump the normalized emoji table from a custom directory
    shortmoji dump --data-dir ./assets
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace shortcodes in an HTML fragment and print the result
    Apply(ApplyArgs),
    /// Print a normalized data table as JSON
    Dump(DumpArgs),
    /// Copy assets/*.json from a workspace into the packaged data directory
    SyncData(SyncArgs),
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Load emoji-unicodes.json and emoji-aliases.json from this directory
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Do not resolve aliases
    #[arg(long)]
    no_aliases: bool,

    /// Rewrite text inside math regions too
    #[arg(long)]
    keep_math: bool,

    /// Skip text under elements matching this selector (repeatable)
    #[arg(long = "skip", value_name = "SELECTOR")]
    skip: Vec<String>,

    /// Print the DOM tree instead of serialized HTML
    #[arg(long)]
    tree: bool,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Dump the alias table instead of the emoji table
    #[arg(long)]
    aliases: bool,

    /// Load data files from this directory
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SyncArgs {
    /// Workspace root containing assets/
    #[arg(long, value_name = "DIR", default_value = ".")]
    workspace: PathBuf,

    /// Destination directory (default: <workspace>/crates/shortmoji-core/data)
    #[arg(long, value_name = "DIR")]
    dest: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Apply(args) => run_apply(&args),
        Command::Dump(args) => run_dump(&args),
        Command::SyncData(args) => run_sync(&args),
    }
}

/// `--data-dir` wins over `SHORTMOJI_DATA_DIR`.
fn data_source(data_dir: Option<&Path>) -> DataSource {
    DataSource::with_override(data_dir, std::env::var_os(DATA_DIR_ENV))
}

/// Load HTML from CLI arguments
fn load_html(args: &ApplyArgs) -> Result<String> {
    if let Some(ref html) = args.html {
        Ok(html.clone())
    } else if let Some(ref path) = args.path {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    } else {
        bail!("apply requires a file path or --html")
    }
}

fn run_apply(args: &ApplyArgs) -> Result<()> {
    let html = load_html(args)?;
    let source = data_source(args.data_dir.as_deref());

    let emoji = load_emoji_map(&source);
    let aliases = (!args.no_aliases).then(|| load_alias_map(&source));

    let mut options = ApplyOptions::new(&emoji)
        .with_skip_math(!args.keep_math)
        .with_skip_selectors(args.skip.iter().cloned());
    if let Some(ref aliases) = aliases {
        options = options.with_aliases(aliases);
    }

    let mut tree = parse_fragment(&html);
    apply_emoji_shortcodes(&mut tree, NodeId::ROOT, &options);

    if args.tree {
        print_tree(&tree, NodeId::ROOT);
    } else {
        println!("{}", serialize_children(&tree, NodeId::ROOT));
    }
    Ok(())
}

fn run_dump(args: &DumpArgs) -> Result<()> {
    let source = data_source(args.data_dir.as_deref());
    let json = if args.aliases {
        serde_json::to_string_pretty(&load_alias_map(&source))
    } else {
        serde_json::to_string_pretty(&load_emoji_map(&source))
    }
    .context("failed to serialize data table")?;
    println!("{json}");
    Ok(())
}

fn run_sync(args: &SyncArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| args.workspace.join(DEFAULT_DATA_DEST));

    let outcomes = sync_data(&args.workspace, &dest)
        .with_context(|| format!("failed to sync data into {}", dest.display()))?;

    for outcome in outcomes {
        match outcome {
            SyncOutcome::Copied { .. } => println!("{}", outcome.to_string().green()),
            SyncOutcome::Skipped { .. } => warn_once(Component::Sync, &outcome.to_string()),
        }
    }
    Ok(())
}
