use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use skeptical::ast_printer::AstPrinter;
use skeptical::config::Config;
use skeptical::error::SkepticalError;
use skeptical::interpreter::Interpreter;
use skeptical::parse_program;
use skeptical::scanner::Scanner;

/// Exit code for lexical and syntax errors.
const EXIT_DATA_ERR: i32 = 65;
/// Exit code for runtime errors.
const EXIT_SOFTWARE: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Skeptical language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to skeptical.log
    #[arg(long, global = true)]
    log: bool,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum nesting of function calls
    #[arg(long, global = true)]
    max_call_depth: Option<usize>,

    /// Seed for the `rand` statement
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Allow constants to be reassigned
    #[arg(long, global = true)]
    advisory_constants: bool,

    /// Directory searched by `run <name>` in the REPL
    #[arg(long, global = true)]
    program_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a source file, printing each token
    Tokenize { filename: PathBuf },

    /// Parses a source file and prints its AST
    Parse {
        filename: PathBuf,

        /// Print the AST as JSON
        #[arg(long)]
        json: bool,
    },

    /// Runs a source file as a Skeptical program
    Run { filename: PathBuf },

    /// Interactive prompt: `run <name>` loads a program file, any other line
    /// is run as program text
    Repl,
}

/// Reads a whole source file through a read‑only memory map.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;

    // SAFETY: the mapping is only read while copied into an owned String.
    let mmap = unsafe { Mmap::map(&file) }.context(format!("Failed to map file {:?}", filename))?;

    let text = std::str::from_utf8(&mmap)
        .context(format!("File {:?} is not valid UTF-8", filename))?
        .to_owned();

    info!("Read {} bytes from {:?}", text.len(), filename);

    Ok(text)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("skeptical.log").context("Failed to create skeptical.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("skeptical::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "{} [{}:{}] {} - {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to skeptical.log");
    Ok(())
}

fn load_config(args: &Cli) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration {:?}", path))?,
        None => Config::default(),
    };

    if let Some(depth) = args.max_call_depth {
        config.max_call_depth = depth;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if args.advisory_constants {
        config.enforce_constants = false;
    }
    if let Some(dir) = &args.program_dir {
        config.program_dir = dir.clone();
    }

    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Maps an error to the exit code the CLI reports it with.
fn exit_code(err: &SkepticalError) -> i32 {
    match err {
        SkepticalError::Lex { .. } | SkepticalError::Parse { .. } => EXIT_DATA_ERR,
        _ => EXIT_SOFTWARE,
    }
}

/// Parses and runs one program against the console.
fn execute_source(source: &str, config: &Config) -> std::result::Result<(), SkepticalError> {
    let program = parse_program(source)?;
    debug!("Parsed program: {:?}", program);

    let mut interpreter = Interpreter::stdio(config.clone());
    interpreter.run(&program)?;

    Ok(())
}

fn repl(config: &Config) -> Result<()> {
    info!("Starting REPL");
    let stdin = io::stdin();

    loop {
        print!("$ ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        match line {
            "" => continue,
            "exit" | "quit" => break,
            _ => {}
        }

        let source = match line.strip_prefix("run ") {
            Some(name) => match read_file(&config.program_dir.join(name.trim())) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("{:#}", e);
                    continue;
                }
            },
            None => line.to_string(),
        };

        if let Err(e) = execute_source(&source, config) {
            debug!("REPL error: {}", e);
            eprintln!("{}", e);
        }
    }

    info!("REPL finished");
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .parse_env("RUST_LOG")
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let config = load_config(&args)?;

    match &args.commands {
        Commands::Tokenize { filename } => {
            info!("Running Tokenize subcommand");
            let source = read_file(filename)?;
            let mut tokenized = true;

            for token in Scanner::new(&source) {
                match token {
                    Ok(token) => println!("{}", token),

                    Err(e) => {
                        tokenized = false;
                        eprintln!("{}", e);
                    }
                }
            }

            if !tokenized {
                debug!("Tokenization failed, exiting with code {}", EXIT_DATA_ERR);
                std::process::exit(EXIT_DATA_ERR);
            }
        }

        Commands::Parse { filename, json } => {
            info!("Running Parse subcommand");
            let source = read_file(filename)?;

            match parse_program(&source) {
                Ok(program) if *json => {
                    let text = serde_json::to_string_pretty(&program)
                        .context("Failed to serialize AST")?;
                    println!("{}", text);
                }

                Ok(program) => print!("{}", AstPrinter.print_program(&program)),

                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(exit_code(&e));
                }
            }
        }

        Commands::Run { filename } => {
            info!("Running Run subcommand");
            let source = read_file(filename)?;

            if let Err(e) = execute_source(&source, &config) {
                debug!("Run failed: {}", e);
                eprintln!("{}", e);
                std::process::exit(exit_code(&e));
            }

            info!("Program executed successfully");
        }

        Commands::Repl => repl(&config)?,
    }

    Ok(())
}
