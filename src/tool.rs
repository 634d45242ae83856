//! Blocking invocation of the external converters.
//!
//! The build never does any rendering itself: images go through Inkscape, the
//! book goes through pandoc (which in turn drives XeLaTeX for the PDF). A hung
//! tool hangs the build; there is no timeout.

use crate::error::BuildError;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::process::{Command, ExitStatus};

/// An external program together with the advice to show when it is missing.
#[derive(Debug, Clone)]
pub struct Tool {
    program: String,
    hint: &'static str,
}

impl Tool {
    pub fn new<S: ToString>(program: S, hint: &'static str) -> Tool {
        Tool {
            program: program.to_string(),
            hint,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn not_found(&self) -> BuildError {
        BuildError::ToolNotFound {
            tool: self.program.clone(),
            hint: self.hint,
        }
    }

    /// Check that the tool can be started by asking it for its version.
    pub fn probe(&self) -> Result<(), BuildError> {
        log::debug!("probing `{} --version`", self.program);
        match Command::new(&self.program).arg("--version").output() {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => {
                log::debug!("`{}` probe exited with {}", self.program, output.status);
                Err(self.not_found())
            }
            Err(e) => {
                log::debug!("`{}` probe failed to start: {e}", self.program);
                Err(self.not_found())
            }
        }
    }

    /// Run the tool to completion.
    ///
    /// A non-zero exit is turned into an error by `on_failure`, which receives the
    /// exit status and everything the tool printed (stdout followed by stderr).
    pub fn run<I, S, F>(&self, args: I, on_failure: F) -> Result<(), BuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
        F: FnOnce(ExitStatus, String) -> BuildError,
    {
        let mut command = Command::new(&self.program);
        command.args(args);
        log::debug!("running {command:?}");

        let output = match command.output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(self.not_found()),
            Err(source) => {
                return Err(BuildError::Io {
                    path: self.program.clone().into(),
                    source,
                })
            }
        };

        if output.status.success() {
            return Ok(());
        }

        let mut printed = String::from_utf8_lossy(&output.stdout).into_owned();
        printed.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(on_failure(output.status, printed))
    }
}
