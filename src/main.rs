//! Docrun - run the shell commands embedded in your README.
//!
//! Docrun extracts comment-delimited command blocks from a project's
//! README, confirms each block once, and runs the commands in document
//! order.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docrun::block::fingerprint;
use docrun::{App, DocumentRunner, TerminalPrompter};

/// Run the shell commands embedded in your README
#[derive(Parser)]
#[command(name = "docrun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the blocks defined in the README, in document order (default)
    Run {
        /// Path to the project directory containing the README
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Path to a .env file (defaults to .env in the project directory)
        #[arg(short, long)]
        env: Option<PathBuf>,

        /// Auto-trust all blocks and skip confirmation prompts
        #[arg(short, long)]
        trust: bool,

        /// Show what would be executed without running anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List the blocks found in the README
    List {
        /// Path to the project directory containing the README
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    let result = match cli.command {
        None => cmd_run(None, None, false, false),
        Some(Commands::Run { path, env, trust, dry_run }) => {
            cmd_run(path, env, trust, dry_run)
        }
        Some(Commands::List { path, format }) => cmd_list(path, &format),
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run the document's blocks.
fn cmd_run(
    path: Option<PathBuf>,
    env: Option<PathBuf>,
    trust: bool,
    dry_run: bool,
) -> Result<()> {
    let app = App::load(path.as_deref(), env.as_deref())?;

    if app.blocks.is_empty() {
        println!("No blocks found in {}", app.readme_path.display());
        return Ok(());
    }

    if dry_run {
        println!("DRY RUN - blocks that would be executed:\n");
        for (i, block) in app.blocks.iter().enumerate() {
            println!("{}. {}", i + 1, block.label());
            for command in &block.commands {
                println!("     {command}");
            }
        }
        return Ok(());
    }

    let mut prompter = TerminalPrompter;
    let report =
        DocumentRunner::new(app.blocks, app.defaults, &app.working_dir, &mut prompter)
            .trust(trust)
            .run()?;

    match (report.executed, report.skipped) {
        (0, skipped) if skipped > 0 => println!("\nAll {skipped} blocks skipped."),
        (executed, 0) => println!("\nDone. {executed} blocks executed."),
        (executed, skipped) => {
            println!("\nDone. {executed} blocks executed, {skipped} skipped.");
        }
    }

    Ok(())
}

/// List parsed blocks.
fn cmd_list(path: Option<PathBuf>, format: &str) -> Result<()> {
    let app = App::load(path.as_deref(), None)?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&app.blocks)?;
            println!("{json}");
        }
        _ => {
            for (i, block) in app.blocks.iter().enumerate() {
                println!("{}. {}", i + 1, block.label());
                for (name, value) in &block.variables {
                    println!("     {name} = {}", value.display());
                }
                for command in &block.commands {
                    println!("     $ {command}");
                }
                println!("     fingerprint: {}", fingerprint(block));
            }
            println!("\nTotal: {} blocks", app.blocks.len());
        }
    }

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "docrun", &mut io::stdout());
}
