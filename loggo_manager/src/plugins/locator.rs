//! Plugin discovery on disk

use super::PLUGIN_PREFIX;
use crate::error::StartupError;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A `loggo-*` entry found in the plugin directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginFile {
    pub dir: PathBuf,
    pub file_name: String,
    /// File name with the prefix stripped; the subcommand name
    pub name: String,
}

impl PluginFile {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Scan `dir` (non-recursively) for plugin files, sorted by file name.
///
/// Directories are skipped; symlinks are judged by what they point at.
/// Executability is not checked here, a non-executable plugin fails when
/// it is dispatched. When two names are equal ignoring ASCII case, the
/// first in sorted order wins.
pub fn discover(dir: &Path) -> Result<Vec<PluginFile>, StartupError> {
    let read_err = |source| StartupError::ReadPluginDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();

        if fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false) {
            continue;
        }

        let file_name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                if raw.to_string_lossy().starts_with(PLUGIN_PREFIX) {
                    tracing::warn!("skipping plugin with non UTF-8 name: {:?}", raw);
                }
                continue;
            }
        };

        let name = match file_name.strip_prefix(PLUGIN_PREFIX) {
            Some("") | None => continue,
            Some(name) => name.to_string(),
        };

        found.push(PluginFile {
            dir: dir.to_path_buf(),
            file_name,
            name,
        });
    }

    found.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    let mut seen = HashSet::new();
    found.retain(|plugin| {
        let fresh = seen.insert(plugin.name.to_ascii_lowercase());
        if fresh {
            tracing::debug!("discovered plugin {} at {}", plugin.name, plugin.path().display());
        } else {
            tracing::warn!(
                "ignoring {}: plugin name {} was already discovered",
                plugin.path().display(),
                plugin.name
            );
        }
        fresh
    });

    Ok(found)
}
