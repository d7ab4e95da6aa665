use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use glox::printer::{self, Format};
use glox::{error, repl, scanner};

#[derive(Parser, Debug)]
#[command(name = "glox", version, about = "Tokenize Lox source code")]
struct Cli {
    /// Lox source file to scan (omit for an interactive prompt)
    file: Option<PathBuf>,

    /// Token output format
    #[arg(long, value_enum, default_value_t = Format::Debug, env = "GLOX_FORMAT")]
    format: Format,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored log output
    #[arg(long)]
    no_color: bool,
}

fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("GLOX_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("initialize logging")
}

fn run_file(path: &Path, format: Format) -> Result<()> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("read source file '{}'", path.display()))?;
    info!(file = %path.display(), bytes = source.len(), "scanning");

    let scan = scanner::scan(&source);
    print!("{}", printer::render(&scan.tokens, format));

    if scan.has_errors() {
        let name = path.display().to_string();
        for report in error::render(&scan.diagnostics, &name, &source) {
            eprintln!("{report:?}");
        }
        bail!("{} error(s)", scan.diagnostics.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.no_color)?;

    match cli.file {
        Some(ref path) => run_file(path, cli.format),
        None => repl::run_repl(cli.format).context("read from prompt"),
    }
}
