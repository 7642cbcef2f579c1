//! loggo Plugin System
//!
//! Most loggo subcommands are separate executables shipped next to the
//! `loggo` binary. This module finds them and runs them.
//!
//! ## Architecture
//!
//! - **Locator**: scans the plugin directory for `loggo-*` files
//! - **Registry**: compiled-in descriptors (help text, flag policy) for every
//!   sanctioned plugin; a plugin on disk without a descriptor is fatal
//! - **Dispatcher**: spawns the plugin with the host's standard streams and
//!   maps its exit status to the host's exit code
//! - **Cancel**: the host's interrupt signal, forwarded to the running plugin
//!
//! ## Plugin Discovery
//!
//! Plugins are discovered by scanning the directory containing the running
//! executable for `loggo-<name>` entries. `<name>` becomes the subcommand.

mod cancel;
mod dispatcher;
mod locator;
mod registry;

pub use cancel::CancelSignal;
pub use dispatcher::{DispatchRequest, Dispatcher, PluginExit};
pub use locator::{discover, PluginFile};
pub use registry::{
    CommandDescriptor, CommandRegistry, FlagPolicy, RegisteredPlugin, CMD_GCP_STREAM,
};

/// File name prefix every plugin executable carries
pub const PLUGIN_PREFIX: &str = "loggo-";
