//! `loggo plugins`: list the plugin commands found at startup

use crate::cli::HostCommandTree;
use anyhow::{Context, Result};
use colored::*;
use std::io::Write;
use std::path::Path;

pub fn list_plugins(tree: &HostCommandTree, dir: &Path, out: &mut dyn Write) -> Result<()> {
    write_listing(tree, dir, out).context("Failed to write plugin list")
}

fn write_listing(tree: &HostCommandTree, dir: &Path, out: &mut dyn Write) -> std::io::Result<()> {
    if tree.plugins().is_empty() {
        writeln!(out, "{} No plugins found in {}", "ℹ".cyan(), dir.display())?;
        return Ok(());
    }

    writeln!(out, "{} {}", "Plugins in".bold(), dir.display())?;
    let width = tree
        .plugins()
        .iter()
        .map(|p| p.descriptor.name.len())
        .max()
        .unwrap_or(0);

    for plugin in tree.plugins() {
        writeln!(
            out,
            "  {:<width$}  {}  {}",
            plugin.descriptor.name.green(),
            plugin.descriptor.about,
            format!("({})", plugin.file.file_name).dimmed(),
            width = width
        )?;
    }
    out.flush()
}
