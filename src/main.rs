use clap::{ArgAction, Parser};
use fridh::{Config, Indentation, Output};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Front end for the fridh scripting language.
#[derive(Debug, Parser)]
#[command(name = "fridh", version, about = "Parses fridh modules and prints their structure")]
struct Cli {
    /// The module to process
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the lexed lines instead of the translated module
    #[arg(long)]
    lexemes: bool,

    /// Write the output to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Indent with this many spaces per level instead of tabs
    #[arg(long, value_name = "N")]
    spaces: Option<usize>,

    /// Deepest permitted nesting of brackets, blocks and expression trees
    #[arg(long, value_name = "N", default_value_t = Config::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    let indentation = match cli.spaces {
        Some(0) => {
            eprintln!("Error: --spaces must be at least 1");
            return ExitCode::FAILURE;
        }
        Some(n) => Indentation::Spaces(n),
        None => Indentation::Tab,
    };
    let config = Config::default()
        .with_indentation(indentation)
        .with_max_depth(cli.max_depth);
    let output = if cli.lexemes {
        Output::Lexemes
    } else {
        Output::Tree
    };

    run_file(&cli.file, cli.output.as_deref(), &config, output)
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "fridh=warn",
        1 => "fridh=debug",
        _ => "fridh=trace",
    }
}

fn run_file(path: &Path, destination: Option<&Path>, config: &Config, output: Output) -> ExitCode {
    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        return ExitCode::FAILURE;
    }

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    debug!(path = %path.display(), bytes = source.len(), "read module");

    let filename = path.to_string_lossy();
    let Some(rendered) = fridh::run(&source, Some(&*filename), config, output) else {
        return ExitCode::FAILURE;
    };

    match destination {
        Some(destination) => {
            if let Err(e) = fs::write(destination, rendered) {
                eprintln!("Error writing file '{}': {}", destination.display(), e);
                return ExitCode::FAILURE;
            }
        }
        None => print!("{}", rendered),
    }
    ExitCode::SUCCESS
}
