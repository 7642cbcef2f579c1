//! Plugin execution
//!
//! One invocation, one child process. The child owns the host's standard
//! streams until it exits; the host only waits.

use super::{CancelSignal, PLUGIN_PREFIX};
use crate::context::ExecutionContext;
use crate::error::DispatchError;
use std::ffi::OsString;
use std::path::PathBuf;

/// How a plugin process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginExit {
    /// Exited normally with this code
    Code(i32),
    /// Killed by this signal number
    Signaled(i32),
}

impl PluginExit {
    /// Exit code the host propagates. Signals follow the shell convention.
    pub fn exit_code(self) -> i32 {
        match self {
            PluginExit::Code(code) => code,
            PluginExit::Signaled(signo) => 128 + signo,
        }
    }
}

/// A single invocation to forward to a plugin
#[derive(Debug)]
pub struct DispatchRequest {
    pub name: String,
    pub args: Vec<OsString>,
    pub cancel: CancelSignal,
}

pub struct Dispatcher<'a> {
    context: &'a dyn ExecutionContext,
    dir: PathBuf,
}

impl<'a> Dispatcher<'a> {
    pub fn new(context: &'a dyn ExecutionContext, dir: impl Into<PathBuf>) -> Self {
        Self {
            context,
            dir: dir.into(),
        }
    }

    /// `<dir>/loggo-<name>`
    pub fn plugin_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}{}", PLUGIN_PREFIX, name))
    }

    /// Run the plugin to completion.
    ///
    /// The plugin is bound to `request.cancel` while it runs. There is no
    /// timeout and no retry.
    pub fn run(&self, request: DispatchRequest) -> Result<PluginExit, DispatchError> {
        let DispatchRequest { name, args, cancel } = request;
        let path = self.plugin_path(&name);

        tracing::debug!("executing subcommand {} ({})", name, path.display());

        let mut child = match self.context.spawn(&path, &args) {
            Ok(child) => child,
            Err(source) => return Err(DispatchError::Launch { name, path, source }),
        };
        tracing::debug!("subcommand {} started with pid {}", name, child.id());

        let wait_err = |source| DispatchError::Wait {
            name: name.clone(),
            source,
        };

        // Disarm before reaping so an interrupt never signals a recycled PID
        cancel.arm(child.terminator());
        let exited = child.wait_for_exit();
        cancel.disarm();
        exited.map_err(wait_err)?;

        let exit = child.reap().map_err(wait_err)?;
        tracing::debug!("subcommand {} finished: {:?}", name, exit);

        Ok(exit)
    }
}
