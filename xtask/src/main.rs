//! Build tasks for the godrays workspace.
//!
//! ```text
//! cargo run -p godrays-xtask -- schema            # options JSON schema
//! cargo run -p godrays-xtask -- preset out.toml   # default options TOML
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use godrays::options::Options;

#[derive(Parser)]
#[command(name = "xtask", about = "Build tasks for the godrays workspace")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the JSON schema of the UI-exposed options.
    Schema {
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the default options as a TOML preset.
    Preset {
        /// Destination file.
        path: PathBuf,
        /// Validate an existing preset instead of writing one.
        #[arg(long)]
        check: bool,
    },
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Schema { output } => {
            let schema = serde_json::to_string_pretty(&Options::json_schema())
                .context("serializing options schema")?;
            match output {
                Some(path) => std::fs::write(&path, schema)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{schema}"),
            }
        }
        Command::Preset { path, check: true } => {
            let options = Options::load(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            let diff = toml::to_string_pretty(&options)?;
            println!("{} is valid:\n{diff}", path.display());
        }
        Command::Preset { path, check: false } => {
            Options::default()
                .save(&path)
                .with_context(|| format!("saving {}", path.display()))?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
