mod bindings;
mod catalog;
mod commands;
mod config;
mod error;
mod extractor;
mod inherit;
mod oracle;
mod resolver;
mod tags;
mod types;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "luadoc", about = "Extract a documentation catalog from Luau doc comments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan Luau sources and write the JSON catalog
    Extract {
        /// Project root holding luadoc.toml
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Subdirectory to scan, relative to the root
        #[arg(long)]
        src: Option<PathBuf>,
        /// Catalog output path
        #[arg(long, default_value = "luadoc.json")]
        out: PathBuf,
        /// Exit non-zero when any diagnostic is raised, not just errors
        #[arg(long)]
        fail_on_warning: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            root,
            src,
            out,
            fail_on_warning,
        } => match commands::extract(&root, src.as_deref(), &out, fail_on_warning) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            },
        },
    }
}
