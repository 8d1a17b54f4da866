use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use rox::ast_printer::AstPrinter;
use rox::parser::Parser;
use rox::scanner::{scan_tokens, Scanner};
use rox::token::Token;
use rox::RunConfig;

#[derive(ClapParser, Debug)]
#[command(version, about = "Rox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to a file (app.log unless --log-file is given)
    #[arg(long, global = true)]
    log: bool,

    /// Log file path; implies --log
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Nested calls allowed before a program fails with "Stack overflow."
    #[arg(long, global = true, value_name = "N")]
    max_call_depth: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the token stream as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses a file and prints every statement in prefix form
    Parse { filename: PathBuf },

    /// Runs a file as a Rox program
    Run {
        filename: PathBuf,

        /// Do not print the implicit result of a program that printed nothing
        #[arg(long, short)]
        quiet: bool,
    },
}

/// Maps a source file read‑only.
fn read_file(filename: &Path) -> Result<Mmap> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).with_context(|| format!("Failed to open file {:?}", filename))?;

    // SAFETY: the mapping is read‑only and lives no longer than this process's
    // use of the source; concurrent truncation by another process is not guarded.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map file {:?}", filename))?;

    info!("Mapped {} bytes from {:?}", mmap.len(), filename);

    Ok(mmap)
}

fn as_source<'m>(mmap: &'m Mmap, filename: &Path) -> Result<&'m str> {
    std::str::from_utf8(mmap).with_context(|| format!("{:?} is not valid UTF-8", filename))
}

fn init_logger(path: &Path) -> Result<()> {
    // Create or open the log file
    let log_file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;

    // Configure env_logger to write to file with module and source line
    Builder::new()
        .format(|buf, record| {
            // Strip 'rox::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to {:?}", path);
    Ok(())
}

fn tokenize(source: &str, json: bool) -> Result<()> {
    let mut tokens: Vec<Token<'_>> = Vec::new();
    let mut tokenized = true;
    let mut stdout = io::stdout().lock();

    for token in Scanner::new(source) {
        match token {
            Ok(token) => {
                debug!("Scanned token: {}", token);

                if json {
                    tokens.push(token);
                } else {
                    writeln!(stdout, "{}", token)?;
                }
            }

            Err(e) => {
                tokenized = false;
                debug!("Tokenization debug: {}", e);
                eprintln!("{}", e);
            }
        }
    }

    if json {
        let dump = serde_json::to_string_pretty(&tokens).context("Failed to serialize tokens")?;
        writeln!(stdout, "{}", dump)?;
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code 65");
        std::process::exit(65);
    }

    info!("Tokenization completed successfully");
    Ok(())
}

fn parse(source: &str) -> Result<()> {
    let tokens = match scan_tokens(source) {
        Ok(tokens) => tokens,
        Err(errors) => exit_with_static_errors(&errors),
    };

    match Parser::new(&tokens).parse() {
        Ok(statements) => {
            let mut stdout = io::stdout().lock();
            for stmt in &statements {
                writeln!(stdout, "{}", AstPrinter::print_stmt(stmt))?;
            }
            info!("Parse subcommand completed");
            Ok(())
        }

        Err(errors) => exit_with_static_errors(&errors),
    }
}

fn exit_with_static_errors(errors: &[rox::LoxError]) -> ! {
    for e in errors {
        eprintln!("{}", e);
    }
    debug!("Static errors, exiting with code 65");
    std::process::exit(65);
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log or --log-file is provided
    if args.log || args.log_file.is_some() {
        let path = args
            .log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("app.log"));
        init_logger(&path)?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match &args.commands {
        Commands::Tokenize { filename, json } => {
            info!("Running Tokenize subcommand");
            let mmap = read_file(filename)?;
            tokenize(as_source(&mmap, filename)?, *json)?;
        }

        Commands::Parse { filename } => {
            info!("Running Parse subcommand");
            let mmap = read_file(filename)?;
            parse(as_source(&mmap, filename)?)?;
        }

        Commands::Run { filename, quiet } => {
            info!("Running Run subcommand");
            let mmap = read_file(filename)?;
            let source = as_source(&mmap, filename)?;
            let config = RunConfig::from_args(args.max_call_depth, *quiet);

            let outcome = rox::run(source, &config, io::stdout().lock(), io::stdin().lock());

            if let Err(e) = outcome {
                debug!("Run failed: {}", e);
                io::stdout().flush()?;
                eprintln!("{}", e);
                std::process::exit(e.exit_code());
            }

            info!("Program executed successfully");
        }
    }

    Ok(())
}
