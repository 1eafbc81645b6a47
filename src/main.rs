mod autolink;
mod config;
mod diagnostics;
mod docstring;
mod error;
mod generator;
mod index;
mod naming;
mod renderer;
mod resolver;
mod symbols;
mod typefmt;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::config::{AnchorStyle, Config, Layout};

#[derive(Parser)]
#[command(
    name = "docpage",
    about = "Generate cross-linked markdown reference pages from a module index"
)]
struct Cli {
    /// Heading anchor syntax
    #[arg(long, value_enum)]
    anchor_style: Option<AnchorStyle>,

    /// Document entities whose names start with an underscore
    #[arg(long)]
    include_private: bool,

    /// Module index file(s) or directories containing them
    #[arg(short = 'i', long = "index", required = true, num_args = 1..)]
    index: Vec<PathBuf>,

    /// Dotted name(s) of modules to document; defaults to every indexed module
    #[arg(short = 'm', long = "module")]
    module: Vec<String>,

    /// Output directory
    #[arg(short = 'o', long = "out-dir", default_value = "output")]
    out_dir: PathBuf,

    /// Concatenate all pages into a single index.md
    #[arg(long)]
    single_file: bool,

    /// Link builtin type names to the upstream language documentation
    #[arg(long)]
    stdlib_links: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(count) => {
            println!("Wrote {count} page(s) to {}", cli.out_dir.display());
            ExitCode::SUCCESS
        },
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    }
}

/// Load config and index, then generate all requested pages.
///
/// # Errors
///
/// Returns errors from config loading, index loading, or page generation.
fn run(cli: &Cli) -> Result<usize, error::Error> {
    let config = effective_config(cli)?;
    let registry = index::load_registry(&cli.index)?;

    // The known-module set: an explicit request, or every indexed module
    // in registration order.
    let requested: Vec<String> = if cli.module.is_empty() {
        registry.modules().iter().map(|m| m.name.clone()).collect()
    } else {
        cli.module.clone()
    };

    generator::generate(&registry, &requested, &config, &cli.out_dir)
}

/// Config file values with command-line overrides applied on top.
fn effective_config(cli: &Cli) -> Result<Config, error::Error> {
    let mut config = Config::load(&PathBuf::from("."))?;
    if let Some(style) = cli.anchor_style {
        config.anchor_style = style;
    }
    if cli.single_file {
        config.layout = Layout::SingleFile;
    }
    config.include_private = config.include_private || cli.include_private;
    config.stdlib_links = config.stdlib_links || cli.stdlib_links;
    Ok(config)
}
