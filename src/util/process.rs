//! Subprocess execution utilities.
//!
//! Every external tool (`xcodebuild`, `dwarfdump`, `ditto`, `swift`) is run
//! through a [`ProcessRunner`]. A runner only reports launch failures through
//! its error channel; how the process ended is carried by [`Termination`] and
//! classified by [`CommandOutput::into_result`].

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

use thiserror::Error;

use crate::util::shell::Shell;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The process exited with a status code.
    Exited(i32),
    /// The process was terminated by a signal.
    Signalled(i32),
}

/// Captured result of one external invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Full argument list, program first.
    pub arguments: Vec<String>,
    pub termination: Termination,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with code 0.
    pub fn success(&self) -> bool {
        self.termination == Termination::Exited(0)
    }

    /// Classify the outcome, turning non-zero exits and signals into errors.
    pub fn into_result(self) -> Result<CommandOutput, CommandError> {
        match self.termination {
            Termination::Exited(0) => Ok(self),
            Termination::Exited(code) => Err(CommandError::NonZeroExit {
                code,
                arguments: self.arguments,
                stderr: self.stderr,
            }),
            Termination::Signalled(signal) => Err(CommandError::SignalExit {
                signal,
                arguments: self.arguments,
            }),
        }
    }
}

/// Failure of an external command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command exited with code {code}\n    {}\n{stderr}", .arguments.join(" "))]
    NonZeroExit {
        code: i32,
        arguments: Vec<String>,
        stderr: String,
    },

    #[error("command exited due to signal {signal}\n    {}", .arguments.join(" "))]
    SignalExit { signal: i32, arguments: Vec<String> },

    #[error("command returned error: {source}\n    {}", .arguments.join(" "))]
    ErrorThrown {
        #[source]
        source: io::Error,
        arguments: Vec<String>,
    },
}

impl CommandError {
    /// The argument list of the failing command.
    pub fn arguments(&self) -> &[String] {
        match self {
            CommandError::NonZeroExit { arguments, .. }
            | CommandError::SignalExit { arguments, .. }
            | CommandError::ErrorThrown { arguments, .. } => arguments,
        }
    }
}

/// Runs external commands given as an argument list.
pub trait ProcessRunner {
    /// Launch `arguments[0]` with the remaining arguments and wait for it.
    ///
    /// Only failures to launch or inspect the process are returned as errors
    /// (always [`CommandError::ErrorThrown`]).
    fn run(&self, arguments: &[String]) -> Result<CommandOutput, CommandError>;

    /// Run, log stdout at verbose level whatever the outcome, and require success.
    fn exec_and_check(
        &self,
        arguments: &[String],
        shell: &Shell,
    ) -> Result<CommandOutput, CommandError> {
        let output = self.run(arguments)?;
        shell.verbose_lines(&output.stdout);
        output.into_result()
    }
}

/// Runner backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, arguments: &[String]) -> Result<CommandOutput, CommandError> {
        let thrown = |source: io::Error| CommandError::ErrorThrown {
            source,
            arguments: arguments.to_vec(),
        };

        let (program, rest) = arguments.split_first().ok_or_else(|| {
            thrown(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty argument list",
            ))
        })?;

        let builder = ProcessBuilder::new(program).args(rest);
        tracing::debug!("running `{}`", builder.display_command());
        let output = builder.exec().map_err(thrown)?;

        let termination = termination(output.status).ok_or_else(|| {
            thrown(io::Error::other(
                "process ended without an exit code or signal",
            ))
        })?;

        Ok(CommandOutput {
            arguments: arguments.to_vec(),
            termination,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn termination(status: ExitStatus) -> Option<Termination> {
    if let Some(code) = status.code() {
        return Some(Termination::Exited(code));
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Some(Termination::Signalled(signal));
        }
    }

    None
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Execute the command and wait for completion, capturing both streams.
    pub fn exec(&self) -> io::Result<Output> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        cmd.spawn()?.wait_with_output()
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
