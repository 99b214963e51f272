use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::core::manifest;

#[derive(Args, Debug, Default)]
pub struct ManifestArgs {
    /// Base install directory. A trailing copy of the source path is stripped.
    pub install_path: String,

    /// The directory tree to include.
    pub source_path: String,

    /// File name suffix to leave out (e.g. `.pyc`). Repeat or comma-separate for several.
    #[arg(long, short, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Print the manifest as JSON instead of a listing.
    #[arg(long)]
    pub json: bool,
}

pub fn handle(args: ManifestArgs) -> Result<()> {
    let entries = manifest::include_directory(&args.install_path, &args.source_path, &args.exclude)
        .with_context(|| format!("Failed to build manifest for '{}'", args.source_path))?;

    if args.json {
        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize manifest")?;
        println!("{}", json);
        return Ok(());
    }

    if entries.is_empty() {
        println!(
            "{}",
            format!(t!("manifest.empty"), source = args.source_path).yellow()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!(
            t!("manifest.header"),
            source = args.source_path,
            install = args.install_path
        )
        .bold()
    );
    for entry in &entries {
        println!("{}", entry.install_dir.display().to_string().cyan());
        for file in &entry.files {
            println!("  {}", file.display());
        }
    }

    let file_count: usize = entries.iter().map(|e| e.files.len()).sum();
    println!(
        "\n{}",
        format!(t!("manifest.summary"), dirs = entries.len(), files = file_count).dimmed()
    );
    Ok(())
}
