//! Shell completion scripts
//!
//! The script covers the tree as built at startup, so discovered plugins
//! complete like native commands.

use crate::cli::{HostCommandTree, BIN_NAME};
use anyhow::{Context, Result};
use clap_complete::{generate, Shell};
use std::io::Write;

pub fn write_completion(tree: &HostCommandTree, shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut command = tree.command();
    generate(shell, &mut command, BIN_NAME, out);
    out.flush()
        .with_context(|| format!("Failed to write {} completion script", shell))
}
