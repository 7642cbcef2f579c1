//! Compiled-in descriptors for sanctioned plugins
//!
//! A plugin existing on disk is not enough to become a command: it also
//! needs a descriptor here, which supplies its help text and tells the
//! host whether to parse flags or hand everything to the plugin.

use super::PluginFile;
use crate::error::StartupError;
use std::collections::BTreeMap;

pub const CMD_GCP_STREAM: &str = "gcp-stream";

/// Subcommand names the host defines itself
const RESERVED_NAMES: &[&str] = &["help", "plugins", "completion"];

/// How the host treats arguments after a plugin's name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagPolicy {
    /// The host owns `--help` and rejects flags it does not know
    HostParses,
    /// Every argument goes to the plugin verbatim
    Passthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub about: &'static str,
    pub long_about: &'static str,
    pub flag_policy: FlagPolicy,
}

const GCP_STREAM: CommandDescriptor = CommandDescriptor {
    name: CMD_GCP_STREAM,
    about: "Continuously stream GCP stack driver logs",
    long_about: "Continuously stream Google Cloud Platform log entries
from a given selected project and GCP logging filters:

    loggo gcp-stream \\
        --project myGCPProject123 \\
        --from 1m \\
        --filter 'resource.labels.namespace_name=\"awesome-sit\" AND resource.labels.container_name=\"some\"'",
    flag_policy: FlagPolicy::Passthrough,
};

const BUILTIN: &[CommandDescriptor] = &[GCP_STREAM];

/// A discovered plugin paired with its descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredPlugin {
    pub file: PluginFile,
    pub descriptor: CommandDescriptor,
}

/// Immutable lookup table from logical name to descriptor
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    descriptors: BTreeMap<&'static str, CommandDescriptor>,
}

impl CommandRegistry {
    /// Build a registry, rejecting duplicate and reserved names.
    pub fn new<I>(descriptors: I) -> Result<Self, StartupError>
    where
        I: IntoIterator<Item = CommandDescriptor>,
    {
        let mut table = BTreeMap::new();
        for descriptor in descriptors {
            if RESERVED_NAMES.contains(&descriptor.name) {
                return Err(StartupError::ReservedName {
                    name: descriptor.name.to_string(),
                });
            }
            if table.insert(descriptor.name, descriptor).is_some() {
                return Err(StartupError::DuplicateDescriptor {
                    name: descriptor.name.to_string(),
                });
            }
        }
        Ok(Self { descriptors: table })
    }

    /// The plugins loggo ships with
    pub fn builtin() -> Self {
        Self {
            descriptors: BUILTIN.iter().map(|d| (d.name, *d)).collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandDescriptor> {
        self.descriptors.get(name)
    }

    /// Pair every discovered plugin with its descriptor.
    ///
    /// The first plugin without a descriptor aborts startup.
    pub fn resolve(&self, plugins: Vec<PluginFile>) -> Result<Vec<RegisteredPlugin>, StartupError> {
        plugins
            .into_iter()
            .map(|file| match self.lookup(&file.name) {
                Some(descriptor) => Ok(RegisteredPlugin {
                    descriptor: *descriptor,
                    file,
                }),
                None => Err(StartupError::UnregisteredPlugin { name: file.name }),
            })
            .collect()
    }
}
