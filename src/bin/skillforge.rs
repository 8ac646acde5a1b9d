//! Command-line interface for skill-forge.
//!
//! Usage:
//!   skillforge convert `<path>` [--target codex,gemini,antigravity,cursor|all]
//!                              [--output DIR] [--dry-run] [--include-mcp]
//!
//! Prints a single JSON report on stdout, or an error report on stderr.
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use clap::{Parser, Subcommand};
use log::debug;
use skill_forge::error::ForgeError;
use skill_forge::{convert, ConvertOptions, Report, Target};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "skillforge", version, about = "Convert skills to other agent platforms")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a skill directory for one or more target platforms
    Convert {
        /// Path to the skill directory containing SKILL.md
        path: PathBuf,
        #[arg(
            long,
            short = 't',
            default_value = "all",
            help = "Comma-separated targets: codex,gemini,antigravity,cursor,all"
        )]
        target: String,
        #[arg(long, short = 'o', default_value = "./dist", help = "Output directory")]
        output: PathBuf,
        #[arg(long, help = "Analyze compatibility without generating files")]
        dry_run: bool,
        #[arg(long, help = "Convert .mcp.json config files for target platforms")]
        include_mcp: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let report = match run(cli.command) {
        Ok(report) => report,
        Err(err) => {
            let report = Report::error(&err);
            debug!("{:?}", miette::Report::new(err));
            report
        }
    };

    let json = match report.to_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("{{\"status\": \"error\", \"message\": \"{e}\"}}");
            return ExitCode::FAILURE;
        }
    };

    if report.is_error() {
        eprintln!("{json}");
        ExitCode::FAILURE
    } else {
        println!("{json}");
        ExitCode::SUCCESS
    }
}

fn run(command: Commands) -> Result<Report, ForgeError> {
    match command {
        Commands::Convert {
            path,
            target,
            output,
            dry_run,
            include_mcp,
        } => {
            if !path.is_dir() {
                return Err(ForgeError::MissingDocument { path });
            }
            let options = ConvertOptions {
                targets: Target::parse_list(&target)?,
                output_dir: output,
                dry_run,
                include_mcp,
            };
            convert(&path, &options)
        }
    }
}
