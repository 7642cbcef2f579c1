//! Startup and invocation
//!
//! [`initialize`] builds the command surface exactly once: resolve the plugin
//! directory, discover plugins, pair them with registry descriptors, build
//! the command tree. Only then is the command line parsed by
//! [`Launcher::run`].

use crate::cli::{HostCommandTree, Invocation};
use crate::commands;
use crate::context::ExecutionContext;
use crate::error::{LoggoResult, StartupError};
use crate::plugins::{discover, CancelSignal, CommandRegistry, DispatchRequest, Dispatcher};
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

pub struct Launcher<C> {
    context: C,
    plugin_dir: PathBuf,
    tree: HostCommandTree,
}

/// Build the command surface.
///
/// Fails when the plugin directory cannot be resolved or read, or when a
/// plugin on disk has no descriptor in `registry`.
pub fn initialize<C: ExecutionContext>(
    context: C,
    registry: &CommandRegistry,
) -> Result<Launcher<C>, StartupError> {
    let plugin_dir = context.plugin_dir()?;
    let discovered = discover(&plugin_dir)?;
    let tree = HostCommandTree::new(registry, discovered)?;

    tracing::debug!(
        "{} plugin command(s) registered from {}",
        tree.plugins().len(),
        plugin_dir.display()
    );

    Ok(Launcher {
        context,
        plugin_dir,
        tree,
    })
}

impl<C: ExecutionContext> Launcher<C> {
    pub fn tree(&self) -> &HostCommandTree {
        &self.tree
    }

    /// Parse `argv` and carry it out, returning the host's exit code.
    ///
    /// For plugin commands the code is the plugin's own. Native command
    /// output goes to `out`.
    pub fn run<I, T>(&self, argv: I, cancel: &CancelSignal, out: &mut dyn Write) -> LoggoResult<i32>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        match self.tree.parse_from(argv)? {
            Invocation::Plugin { name, args } => {
                let dispatcher = Dispatcher::new(&self.context, self.plugin_dir.clone());
                let exit = dispatcher.run(DispatchRequest {
                    name,
                    args,
                    cancel: cancel.clone(),
                })?;
                Ok(exit.exit_code())
            }
            Invocation::ListPlugins => {
                commands::plugins::list_plugins(&self.tree, &self.plugin_dir, out)?;
                Ok(0)
            }
            Invocation::Completion(shell) => {
                commands::completion::write_completion(&self.tree, shell, out)?;
                Ok(0)
            }
        }
    }
}
