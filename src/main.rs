//! chromed - Cyberpunk 2077 mod installer core.
//!
//! The CLI runs the installer pipeline against an already-unpacked mod
//! archive: `detect` names the installer that would claim it, `plan`
//! prints the instruction plan as JSON.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use chromed::{
    api, paths, AutoconvertArchives, Features, FileTree, InstallContext, ModInfo, Pipeline,
    StagingHost,
};

#[derive(Parser)]
#[command(name = "chromed")]
#[command(version)]
#[command(about = "Cyberpunk 2077 mod installer - plans where an unpacked mod archive's files go")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use RUST_LOG=debug for more detail)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which installer claims the staged archive
    Detect {
        /// Directory the archive was unpacked into
        staging_dir: PathBuf,
    },

    /// Print the instruction plan for the staged archive as JSON
    Plan {
        /// Directory the archive was unpacked into
        staging_dir: PathBuf,

        /// Mod name (defaults to the staging directory name)
        #[arg(long)]
        mod_name: Option<String>,

        /// Mod version recorded in generated metadata
        #[arg(long, default_value = "1.0.0")]
        mod_version: String,

        /// Rewrite archive-only mods into REDmod modules
        #[arg(long)]
        autoconvert: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Collects the staged files as normalized archive-relative paths.
fn staged_paths(staging_dir: &PathBuf) -> Result<Vec<String>> {
    if !staging_dir.is_dir() {
        bail!("staging directory does not exist: {}", staging_dir.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(staging_dir) {
        let entry = entry.with_context(|| {
            format!("Failed to walk staging directory {}", staging_dir.display())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(staging_dir)
            .with_context(|| format!("Path escapes staging dir: {}", entry.path().display()))?;
        files.push(paths::normalize(&relative.to_string_lossy()));
    }
    files.sort();
    Ok(files)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let pipeline = Pipeline::new();

    match cli.command {
        Commands::Detect { staging_dir } => {
            let files = staged_paths(&staging_dir)?;
            let tree = FileTree::from_paths(&files);
            let installer = pipeline.select(&tree);
            println!("{}", installer.installer_type);
            Ok(())
        }
        Commands::Plan {
            staging_dir,
            mod_name,
            mod_version,
            autoconvert,
            pretty,
        } => {
            let files = staged_paths(&staging_dir)?;
            let host = StagingHost;
            let name = mod_name.unwrap_or_else(|| paths::synthesize_mod_name(&staging_dir));
            let ctx = InstallContext {
                host: &host,
                mod_info: ModInfo {
                    name,
                    version: mod_version,
                },
                staging_dir,
                features: Features {
                    redmod_autoconvert_archives: if autoconvert {
                        AutoconvertArchives::Enabled
                    } else {
                        AutoconvertArchives::Disabled
                    },
                },
            };

            let result =
                api::install(&pipeline, &ctx, &files).context("No installable layout")?;

            let json = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{json}");
            Ok(())
        }
    }
}
