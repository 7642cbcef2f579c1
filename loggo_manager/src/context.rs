//! Execution context for the loggo host
//!
//! Resolving the plugin directory and starting processes are the two
//! pieces of the host that touch the operating system. Both live behind
//! [`ExecutionContext`] so discovery and dispatch can run against a fake.

use crate::config::HostConfig;
use crate::error::StartupError;
use crate::plugins::PluginExit;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

/// Terminates a running plugin. Called from the interrupt handler thread.
pub type Terminator = Box<dyn FnMut() + Send>;

pub trait ExecutionContext {
    /// Directory scanned for `loggo-*` plugins.
    fn plugin_dir(&self) -> Result<PathBuf, StartupError>;

    /// Start `program` with `args`, inheriting the host's standard streams.
    fn spawn(&self, program: &Path, args: &[OsString]) -> io::Result<Box<dyn RunningPlugin>>;
}

/// A plugin process that has been started.
pub trait RunningPlugin {
    fn id(&self) -> u32;

    /// Handle that asks the process to terminate.
    fn terminator(&self) -> Terminator;

    /// Block until the process exits, without reaping it.
    ///
    /// The exited process keeps its PID until [`RunningPlugin::reap`], so a
    /// terminator firing in between cannot reach an unrelated process.
    fn wait_for_exit(&mut self) -> io::Result<()>;

    /// Collect the exit status of a process that has exited.
    fn reap(&mut self) -> io::Result<PluginExit>;
}

/// Real context: plugins sit next to the running executable.
#[derive(Debug, Clone, Default)]
pub struct SystemContext {
    plugin_dir_override: Option<PathBuf>,
}

impl SystemContext {
    pub fn new(config: &HostConfig) -> Self {
        Self {
            plugin_dir_override: config.plugin_dir.clone(),
        }
    }
}

impl ExecutionContext for SystemContext {
    fn plugin_dir(&self) -> Result<PathBuf, StartupError> {
        if let Some(dir) = &self.plugin_dir_override {
            return Ok(dir.clone());
        }

        let exe = std::env::current_exe().map_err(StartupError::CurrentExe)?;
        match exe.parent() {
            Some(dir) => Ok(dir.to_path_buf()),
            None => Err(StartupError::NoParentDir(exe)),
        }
    }

    fn spawn(&self, program: &Path, args: &[OsString]) -> io::Result<Box<dyn RunningPlugin>> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;

        Ok(Box::new(SystemChild { child }))
    }
}

struct SystemChild {
    child: Child,
}

impl RunningPlugin for SystemChild {
    fn id(&self) -> u32 {
        self.child.id()
    }

    #[cfg(unix)]
    fn terminator(&self) -> Terminator {
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        let pid = Pid::from_raw(self.child.id() as i32);
        Box::new(move || {
            if let Err(e) = signal::kill(pid, Signal::SIGTERM) {
                tracing::debug!("failed to send SIGTERM to plugin {}: {}", pid, e);
            }
        })
    }

    #[cfg(not(unix))]
    fn terminator(&self) -> Terminator {
        let pid = self.child.id().to_string();
        Box::new(move || {
            let status = Command::new("taskkill")
                .args(["/PID", pid.as_str(), "/T", "/F"])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            if let Err(e) = status {
                tracing::debug!("failed to terminate plugin {}: {}", pid, e);
            }
        })
    }

    #[cfg(unix)]
    fn wait_for_exit(&mut self) -> io::Result<()> {
        let pid = self.child.id() as libc::id_t;
        loop {
            // WNOWAIT leaves the child a zombie; `reap` collects it
            let mut info: libc::siginfo_t = unsafe { std::mem::zeroed() };
            let rc = unsafe {
                libc::waitid(libc::P_PID, pid, &mut info, libc::WEXITED | libc::WNOWAIT)
            };
            if rc == 0 {
                return Ok(());
            }

            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    // The open process handle keeps the PID reserved until `Child` is dropped
    #[cfg(not(unix))]
    fn wait_for_exit(&mut self) -> io::Result<()> {
        self.child.wait().map(|_| ())
    }

    fn reap(&mut self) -> io::Result<PluginExit> {
        self.child.wait().map(exit_of)
    }
}

fn exit_of(status: ExitStatus) -> PluginExit {
    if let Some(code) = status.code() {
        return PluginExit::Code(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signo) = status.signal() {
            return PluginExit::Signaled(signo);
        }
    }

    PluginExit::Code(1)
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_override_replaces_executable_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = HostConfig {
            plugin_dir: Some(temp_dir.path().to_path_buf()),
            ..HostConfig::default()
        };
        let context = SystemContext::new(&config);
        assert_eq!(context.plugin_dir().unwrap(), temp_dir.path());
    }

    #[test]
    fn test_default_dir_is_executable_parent() {
        let context = SystemContext::default();
        let exe = std::env::current_exe().unwrap();
        assert_eq!(context.plugin_dir().unwrap(), exe.parent().unwrap());
    }

    #[test]
    fn test_spawn_missing_program_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = SystemContext::default().spawn(&temp_dir.path().join("loggo-none"), &[]);
        assert_eq!(result.err().map(|e| e.kind()), Some(io::ErrorKind::NotFound));
    }

    #[cfg(unix)]
    #[test]
    fn test_exited_plugin_keeps_pid_until_reaped() {
        use nix::sys::signal;
        use nix::unistd::Pid;

        let mut child = SystemContext::default()
            .spawn(Path::new("/bin/sh"), &["-c".into(), "exit 4".into()])
            .unwrap();
        child.wait_for_exit().unwrap();

        // Still a zombie: signalling it succeeds and reaches nothing else
        let pid = Pid::from_raw(child.id() as i32);
        assert!(signal::kill(pid, None).is_ok());

        assert_eq!(child.reap().unwrap(), PluginExit::Code(4));
    }
}
