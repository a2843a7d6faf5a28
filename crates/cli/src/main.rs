//! marathi CLI - runs and inspects Marathi script programs.

use clap::Parser as ClapParser;
use marathi_interp::{Error, Interpreter, InterpreterConfig};
use marathi_language::{parse, scan};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Program read when no file is given.
const DEFAULT_PROGRAM: &str = "test.marathi";

#[derive(ClapParser)]
#[command(name = "marathi")]
#[command(about = "Interpreter for the Marathi scripting language")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run a program and print its output
    Run {
        /// Path to the source file
        #[arg(default_value = DEFAULT_PROGRAM)]
        file: PathBuf,
        /// Deepest allowed nesting of function calls
        #[arg(long, default_value_t = InterpreterConfig::default().max_call_depth)]
        max_call_depth: usize,
        /// Print the end-of-run report instead of bare lines
        #[arg(long)]
        report: bool,
    },
    /// Dump the token stream
    Tokens {
        #[arg(default_value = DEFAULT_PROGRAM)]
        file: PathBuf,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Dump the syntax tree
    Ast {
        #[arg(default_value = DEFAULT_PROGRAM)]
        file: PathBuf,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Run every test_*.marathi file under a directory
    Test {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn read_source(file: &Path) -> Result<String, String> {
    let source = fs::read_to_string(file).map_err(|e| format!("Error reading {}: {}", file.display(), e))?;
    log::debug!("read {} bytes from {}", source.len(), file.display());
    Ok(source)
}

fn run(command: Commands) -> Result<(), String> {
    match command {
        Commands::Run { file, max_call_depth, report } => {
            let source = read_source(&file)?;
            let tokens = scan(&source).map_err(|e| Error::from(e).to_string())?;
            let program = parse(&tokens).map_err(|e| Error::from(e).to_string())?;

            let mut interpreter = Interpreter::with_config(InterpreterConfig { max_call_depth });
            let result = interpreter.run(&program);

            // lines printed before a failure are still shown
            if report {
                println!("{}", interpreter.report());
            } else {
                for line in interpreter.output() {
                    println!("{}", line);
                }
            }
            result.map_err(|e| Error::from(e).to_string())?;
        }
        Commands::Tokens { file, json } => {
            let source = read_source(&file)?;
            let tokens = scan(&source).map_err(|e| Error::from(e).to_string())?;
            if json {
                let dump = serde_json::to_string_pretty(&tokens).map_err(|e| e.to_string())?;
                println!("{}", dump);
            } else {
                println!("Tokens:");
                for token in &tokens {
                    println!("{}", token);
                }
            }
        }
        Commands::Ast { file, json } => {
            let source = read_source(&file)?;
            let tokens = scan(&source).map_err(|e| Error::from(e).to_string())?;
            let program = parse(&tokens).map_err(|e| Error::from(e).to_string())?;
            if json {
                let dump = serde_json::to_string_pretty(&program).map_err(|e| e.to_string())?;
                println!("{}", dump);
            } else {
                println!("AST:");
                println!("{:#?}", program);
            }
        }
        Commands::Test { path } => {
            let mut passed = 0;
            let mut failed = 0;
            let start_time = std::time::Instant::now();

            run_tests_recursive(&path, &mut passed, &mut failed)?;

            let duration = start_time.elapsed();
            println!("\nTest Summary:");
            println!("  Passed: {}", passed);
            println!("  Failed: {}", failed);
            println!("  Time:   {:.2?}", duration);

            if failed > 0 {
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("marathi v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn is_test_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "marathi")
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("test_"))
}

fn run_tests_recursive(path: &Path, passed: &mut usize, failed: &mut usize) -> Result<(), String> {
    if path.is_dir() {
        let mut entries = fs::read_dir(path)
            .map_err(|e| format!("Error reading dir {}: {}", path.display(), e))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| e.to_string())?;
        entries.sort();
        for entry in entries {
            run_tests_recursive(&entry, passed, failed)?;
        }
    } else if is_test_file(path) {
        print!("Running {} ... ", path.display());
        std::io::stdout().flush().map_err(|e| e.to_string())?;

        match run_test_file(path) {
            Ok(()) => {
                println!("OK");
                *passed += 1;
            }
            Err(e) => {
                println!("FAILED");
                println!("  Error: {}", e);
                *failed += 1;
            }
        }
    }
    Ok(())
}

fn run_test_file(path: &Path) -> Result<(), String> {
    let source = read_source(path)?;
    marathi_interp::run_source(&source)
        .map(|_| ())
        .map_err(|e| e.to_string())
}
