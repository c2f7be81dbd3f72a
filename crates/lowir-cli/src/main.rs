use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

mod input;

use input::{load_program, CliConfig};
use lowir_emit::{write_module, OutputFormat};
use lowir_lower::{lower_program, FunctionSelection};

#[derive(Parser)]
#[command(name = "lowir")]
#[command(about = "lowir - lower SSA programs into LLVM-style register IR")]
#[command(version = "0.1.0")]
#[command(author = "Gianluca Brigandi <gbrigand@gmail.com>")]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Compile {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Function to lower; repeatable. Defaults to `main`.
        #[arg(long = "entry", value_name = "NAME")]
        entries: Vec<String>,

        #[arg(long, conflicts_with = "entries")]
        all_functions: bool,

        #[arg(long, value_enum, default_value = "text")]
        emit: EmitFormat,

        #[arg(long)]
        nul_terminate: bool,

        #[arg(long, value_name = "NAME")]
        output_function: Option<String>,

        #[arg(long)]
        color: bool,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    Check {
        input: PathBuf,
    },

    Dump {
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EmitFormat {
    Text,
    Json,
}

impl From<EmitFormat> for OutputFormat {
    fn from(format: EmitFormat) -> Self {
        match format {
            EmitFormat::Text => OutputFormat::Text,
            EmitFormat::Json => OutputFormat::Json,
        }
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "warn,lowir_lower=debug,lowir_cli=debug"
        } else {
            "warn"
        })
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compile {
            input,
            output,
            entries,
            all_functions,
            emit,
            nul_terminate,
            output_function,
            color,
            config,
        } => {
            let mut settings = match config {
                Some(path) => CliConfig::load(&path)?,
                None => CliConfig::default(),
            };
            if all_functions {
                settings.lower.selection = FunctionSelection::All;
            } else if !entries.is_empty() {
                settings.lower.selection = FunctionSelection::Named(entries);
            }
            if nul_terminate {
                settings.lower.nul_terminate_strings = true;
            }
            if let Some(name) = output_function {
                settings.lower.output_function = name;
            }
            if color {
                settings.emit.use_colors = true;
            }
            cmd_compile(input, output, emit.into(), settings, cli.verbose)
        }
        Commands::Check { input } => cmd_check(input, cli.verbose),
        Commands::Dump { input } => cmd_dump(input, cli.verbose),
    }
}

fn cmd_compile(
    input: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    settings: CliConfig,
    verbose: bool,
) -> Result<()> {
    let start = Instant::now();

    let program = load_program(&input)?;
    let lowered = lower_program(&program, &settings.lower)
        .with_context(|| format!("Failed to lower {}", input.display()))?;

    match &output {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_module(&lowered.module, format, &settings.emit, &mut file)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_module(&lowered.module, format, &settings.emit, &mut handle)?;
            handle.flush()?;
        }
    }

    if verbose {
        let stats = &lowered.stats;
        eprintln!(
            "\n {} Lowered {} function(s), skipped {}",
            "SUCCESS:".bright_green().bold(),
            stats.functions_lowered,
            stats.functions_skipped
        );
        eprintln!(
            "   Instructions: {}  Globals: {}",
            stats.instructions_lowered,
            lowered.module.globals.len()
        );
        eprintln!("   Time: {:.3}s", start.elapsed().as_secs_f64());
        if let Some(path) = output {
            eprintln!("   Output: {}", path.display());
        }
    }

    Ok(())
}

fn cmd_check(input: PathBuf, verbose: bool) -> Result<()> {
    match load_program(&input) {
        Ok(program) => {
            println!("{}", " VALID".bright_green().bold());
            if verbose {
                println!("   Packages: {}", program.packages.len());
                println!("   Functions: {}", program.functions().count());
                println!("   Values: {}", program.values().len());
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", " INVALID".bright_red().bold());
            println!("\n{}", "Parse Error:".bright_red());
            println!("{:#}", e);
            Err(anyhow!("Validation failed"))
        }
    }
}

fn cmd_dump(input: PathBuf, verbose: bool) -> Result<()> {
    let program = load_program(&input)?;

    if verbose {
        for package in &program.packages {
            eprintln!("{}", format!(" Package: {}", package.path).bright_green().bold());
            for function in package.functions() {
                eprintln!(
                    "   {} blocks: {}, instructions: {}",
                    function.name.bright_yellow(),
                    function.blocks.len(),
                    function.instruction_count()
                );
            }
        }
    }

    print!("{}", program);
    Ok(())
}
