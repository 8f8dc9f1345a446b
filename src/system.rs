use crate::detect::helper::Helper;
use crate::sysfs::SysfsRoot;
use std::process::{Command, Stdio};

/// Captured result of an external command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
}

/// Every external command goes through this seam so that tests can record
/// and script them.
pub trait SystemOps {
    /// Run a command to completion. Spawn failures and non-zero exits are `false`.
    fn run(&mut self, program: &str, args: &[&str]) -> bool;

    /// Run a command and capture its stdout. `None` if it could not be spawned.
    fn output(&mut self, program: &str, args: &[&str]) -> Option<CommandOutput>;
}

/// Runs commands for real, non-interactively.
#[derive(Debug, Default)]
pub struct RealSystemOps;

impl SystemOps for RealSystemOps {
    fn run(&mut self, program: &str, args: &[&str]) -> bool {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(s) => {
                tracing::debug!(program, ?args, code = ?s.code(), "command finished");
                s.success()
            }
            Err(e) => {
                tracing::debug!(program, ?args, error = %e, "command could not be started");
                false
            }
        }
    }

    fn output(&mut self, program: &str, args: &[&str]) -> Option<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();
        match output {
            Ok(o) => Some(CommandOutput {
                success: o.status.success(),
                stdout: String::from_utf8_lossy(&o.stdout).into_owned(),
            }),
            Err(e) => {
                tracing::debug!(program, ?args, error = %e, "command could not be started");
                None
            }
        }
    }
}

/// The machine being inspected or reconfigured: a filesystem root, a way to
/// run commands, and the GPU-management helper to talk to.
#[derive(Debug)]
pub struct Host<O: SystemOps> {
    pub root: SysfsRoot,
    pub ops: O,
    pub helper: Helper,
}

impl Host<RealSystemOps> {
    pub fn system(helper: Helper) -> Self {
        Self {
            root: SysfsRoot::system(),
            ops: RealSystemOps,
            helper,
        }
    }
}

impl<O: SystemOps> Host<O> {
    pub fn new(root: SysfsRoot, ops: O, helper: Helper) -> Self {
        Self { root, ops, helper }
    }
}
