//! Error types for the loggo host
//!
//! Startup errors are fatal: the host cannot know its command surface
//! without them. Dispatch errors are reported and mapped to a reserved
//! exit code.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for fatal startup errors (discovery failure, unregistered plugin).
pub const STARTUP_FAILURE_EXIT_CODE: i32 = 1;

/// Exit code used when a plugin could not be started at all.
pub const DISPATCH_FAILURE_EXIT_CODE: i32 = 3;

/// Failures while building the command surface.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("could not resolve the path of the running executable: {0}")]
    CurrentExe(#[source] io::Error),

    #[error("executable path {} has no parent directory", .0.display())]
    NoParentDir(PathBuf),

    #[error("failed to read plugin directory {}: {source}", path.display())]
    ReadPluginDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no implementation found for command {name}")]
    UnregisteredPlugin { name: String },

    #[error("command {name} is registered more than once")]
    DuplicateDescriptor { name: String },

    #[error("command {name} clashes with a built-in loggo command")]
    ReservedName { name: String },
}

/// Failures while handing an invocation to a plugin.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to run subcommand {name} ({}): {source}", path.display())]
    Launch {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for subcommand {name}: {source}")]
    Wait {
        name: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum LoggoError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("{0:#}")]
    Command(#[from] anyhow::Error),
}

impl LoggoError {
    /// Process exit code the host terminates with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoggoError::Startup(_) => STARTUP_FAILURE_EXIT_CODE,
            LoggoError::Dispatch(_) => DISPATCH_FAILURE_EXIT_CODE,
            LoggoError::Cli(e) => e.exit_code(),
            LoggoError::Command(_) => 1,
        }
    }
}

pub type LoggoResult<T> = Result<T, LoggoError>;
