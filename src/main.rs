//! voltage — parse patch expressions and print their syntax trees.
//!
//! Reads each file given on the command line (or stdin when there are none),
//! parses it, and prints the resulting block. Parse failures are reported
//! with the offending source line and carets under the error span.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::Context as _;
use clap::Parser;
use tracing::Level;

use voltage::config::Config;
use voltage::dsl::{diagnostic, Block, Compiler};

#[derive(Parser, Debug)]
#[command(name = "voltage", version)]
struct Cli {
    /// Source files to parse. Reads stdin when none are given.
    files: Vec<PathBuf>,

    /// Parse this expression instead of reading files.
    #[arg(short = 'e', long = "expr")]
    expr: Option<String>,

    /// Print the tree as JSON instead of Rust debug output.
    #[arg(long)]
    json: bool,

    /// Deepest expression nesting accepted (overrides the config file).
    #[arg(long)]
    max_depth: Option<usize>,

    /// Log level: error, warn, info, debug or trace (overrides the config file).
    #[arg(long)]
    log_level: Option<String>,

    /// Config file to use instead of ~/.voltage/config.yaml.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every input parsed.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_default(),
    };
    if let Some(depth) = cli.max_depth {
        config.parser.max_depth = depth;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    let level = Level::from_str(&config.log_level)
        .with_context(|| format!("invalid log level '{}'", config.log_level))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let inputs = read_inputs(&cli)?;
    let mut ok = true;
    for (label, source) in &inputs {
        tracing::info!(input = %label, "parsing");
        match Compiler::parse_with(source, &config.parser) {
            Ok(block) => print_block(&block, cli.json)?,
            Err(err) => {
                eprintln!("{label}:");
                eprint!("{}", diagnostic::render(source, &err));
                ok = false;
            }
        }
    }
    Ok(ok)
}

fn read_inputs(cli: &Cli) -> anyhow::Result<Vec<(String, String)>> {
    if let Some(expr) = &cli.expr {
        return Ok(vec![("<expr>".to_string(), expr.clone())]);
    }

    if cli.files.is_empty() {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("read stdin")?;
        return Ok(vec![("<stdin>".to_string(), source)]);
    }

    cli.files
        .iter()
        .map(|path| {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            Ok((path.display().to_string(), source))
        })
        .collect()
}

fn print_block(block: &Block, json: bool) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(block).context("serialize block")?;
        println!("{out}");
    } else {
        for expr in &block.expressions {
            println!("{expr:#?}");
        }
    }
    Ok(())
}
