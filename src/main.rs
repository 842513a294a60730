use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use slop_scrub::{Catalog, CatalogData, Humanizer, Hyperparameters, Mode};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Full,
    Conservative,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Full => Mode::Full,
            ModeArg::Conservative => Mode::Conservative,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "slop-scrub",
    about = "Rewrite machine-generated prose to break up its statistical tells",
    version
)]
struct Cli {
    /// File paths to rewrite (reads stdin if none provided)
    files: Vec<String>,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Rewriting depth
    #[arg(long, value_enum, default_value = "full")]
    mode: ModeArg,

    /// Print a JSON diagnostic report instead of rewriting
    #[arg(long)]
    analyze: bool,

    /// JSON file overriding hyperparameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON catalog to use instead of the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Print the built-in catalog as JSON and exit
    #[arg(long)]
    dump_catalog: bool,
}

fn humanizer(cli: &Cli) -> slop_scrub::Result<Humanizer> {
    let mut humanizer = Humanizer::new(cli.seed).with_mode(cli.mode.into());
    if let Some(path) = &cli.config {
        humanizer = humanizer.with_hyperparameters(Hyperparameters::load(path)?);
    }
    if let Some(path) = &cli.catalog {
        humanizer = humanizer.with_catalog(Arc::new(Catalog::load(path)?));
    }
    Ok(humanizer)
}

fn handle(humanizer: &Humanizer, text: &str, analyze: bool) -> slop_scrub::Result<()> {
    if analyze {
        let report = humanizer.analyze(text)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", humanizer.process(text));
    }
    Ok(())
}

fn run(cli: &Cli) -> slop_scrub::Result<()> {
    if cli.dump_catalog {
        println!("{}", serde_json::to_string_pretty(&CatalogData::builtin())?);
        return Ok(());
    }

    let humanizer = humanizer(cli)?;
    if cli.files.is_empty() {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        return handle(&humanizer, &input, cli.analyze);
    }
    for path in &cli.files {
        let text = std::fs::read_to_string(path).map_err(|e| {
            tracing::error!(%path, "cannot read input");
            e
        })?;
        handle(&humanizer, &text, cli.analyze)?;
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
