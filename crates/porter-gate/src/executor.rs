//! Command execution seam for the gate runner.

use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use serde::Serialize;

use crate::step::CheckStep;

/// How a step's command exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Exit {
    pub success: bool,

    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl Exit {
    pub fn from_code(code: i32) -> Self {
        Self {
            success: code == 0,
            code: Some(code),
        }
    }
}

impl From<ExitStatus> for Exit {
    fn from(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Runs one check step to completion.
pub trait CommandExecutor {
    /// Run the step and block until it exits.
    ///
    /// An `Err` means the command could not be started at all.
    fn run(&mut self, step: &CheckStep) -> io::Result<Exit>;
}

/// Executes steps as real subprocesses. Output goes straight to the terminal.
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor {
    /// Working directory for every step (defaults to the current one)
    pub working_dir: Option<PathBuf>,
}

impl SystemExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
        }
    }
}

impl CommandExecutor for SystemExecutor {
    fn run(&mut self, step: &CheckStep) -> io::Result<Exit> {
        let mut cmd = Command::new(&step.program);
        cmd.args(&step.args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        cmd.status().map(Exit::from)
    }
}
