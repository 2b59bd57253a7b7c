//! Test utilities and mocks for unit tests.
//!
//! Provides a scripted [`MockRunner`] standing in for external tools and a
//! [`MockFileSystem`] that answers existence probes from an in-memory set.
//!
//! # Example
//!
//! ```rust,ignore
//! let runner = MockRunner::new();
//! runner.expect_prefix("xcrun xcodebuild archive", MockOutcome::success(""));
//!
//! let fs = MockFileSystem::new();
//! fs.add_dir("/build/Release-iphoneos/Foo.framework.dSYM");
//! ```

pub mod fixtures;

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::util::fs::FileSystem;
use crate::util::process::{CommandError, CommandOutput, ProcessRunner, Termination};

/// Scripted result of one mocked command.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// The process ran and exited with `status`.
    Exit {
        status: i32,
        stdout: String,
        stderr: String,
    },
    /// The process was killed by a signal.
    Signal(i32),
    /// The process could not be launched.
    LaunchFailure(String),
}

impl MockOutcome {
    /// A successful run with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockOutcome::Exit {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A run that exited with `status`.
    pub fn exit(status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        MockOutcome::Exit {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// A run killed by `signal`.
    pub fn signal(signal: i32) -> Self {
        MockOutcome::Signal(signal)
    }

    /// A command that could not be started.
    pub fn launch_failure(message: impl Into<String>) -> Self {
        MockOutcome::LaunchFailure(message.into())
    }

    fn into_output(self, arguments: &[String]) -> Result<CommandOutput, CommandError> {
        match self {
            MockOutcome::Exit {
                status,
                stdout,
                stderr,
            } => Ok(CommandOutput {
                arguments: arguments.to_vec(),
                termination: Termination::Exited(status),
                stdout,
                stderr,
            }),
            MockOutcome::Signal(signal) => Ok(CommandOutput {
                arguments: arguments.to_vec(),
                termination: Termination::Signalled(signal),
                stdout: String::new(),
                stderr: String::new(),
            }),
            MockOutcome::LaunchFailure(message) => Err(CommandError::ErrorThrown {
                source: io::Error::new(io::ErrorKind::NotFound, message),
                arguments: arguments.to_vec(),
            }),
        }
    }
}

/// Pattern for matching commands in [`MockRunner`].
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Any => true,
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    pub pattern: CommandPattern,
    pub outcome: MockOutcome,
    /// Number of times this expectation can be used (None = unlimited).
    pub times: Option<usize>,
    pub used: usize,
}

impl CommandExpectation {
    pub fn new(pattern: CommandPattern, outcome: MockOutcome) -> Self {
        CommandExpectation {
            pattern,
            outcome,
            times: None,
            used: 0,
        }
    }

    /// Set the number of times this expectation can be used.
    pub fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    fn available(&self) -> bool {
        match self.times {
            Some(n) => self.used < n,
            None => true,
        }
    }
}

#[derive(Debug, Default)]
struct RunnerState {
    expectations: Vec<CommandExpectation>,
    calls: Vec<Vec<String>>,
}

/// Mock process runner.
///
/// Records every invocation and answers with the first available matching
/// expectation. Unmatched commands fail to launch.
#[derive(Debug, Default)]
pub struct MockRunner {
    state: Mutex<RunnerState>,
}

impl MockRunner {
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, outcome: MockOutcome) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            outcome,
        ))
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, outcome: MockOutcome) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            outcome,
        ))
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, outcome: MockOutcome) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            outcome,
        ))
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&self, expectation: CommandExpectation) -> &Self {
        self.state
            .lock()
            .unwrap()
            .expectations
            .push(expectation);
        self
    }

    /// All commands run so far, each joined with spaces.
    pub fn calls(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|args| args.join(" "))
            .collect()
    }

    /// All argument lists run so far.
    pub fn argument_lists(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Commands whose joined form starts with `prefix`.
    pub fn calls_starting_with(&self, prefix: &str) -> Vec<Vec<String>> {
        self.argument_lists()
            .into_iter()
            .filter(|args| args.join(" ").starts_with(prefix))
            .collect()
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, arguments: &[String]) -> Result<CommandOutput, CommandError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(arguments.to_vec());

        let full_cmd = arguments.join(" ");
        for exp in &mut state.expectations {
            if exp.pattern.matches(&full_cmd) && exp.available() {
                exp.used += 1;
                return exp.outcome.clone().into_output(arguments);
            }
        }

        MockOutcome::LaunchFailure(format!("unexpected command: {}", full_cmd))
            .into_output(arguments)
    }
}

/// In-memory filesystem answering existence probes.
#[derive(Debug, Default)]
pub struct MockFileSystem {
    paths: Mutex<BTreeSet<PathBuf>>,
    removed: Mutex<Vec<PathBuf>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        MockFileSystem::default()
    }

    /// Add a file (and its parent directories).
    pub fn add_file(&self, path: impl AsRef<Path>) {
        self.add_dir(path);
    }

    /// Add a directory and all parent directories.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut paths = self.paths.lock().unwrap();
        let mut current = Some(path.as_ref());
        while let Some(p) = current {
            if p.as_os_str().is_empty() {
                break;
            }
            paths.insert(p.to_path_buf());
            current = p.parent();
        }
    }

    /// Paths passed to `remove_all`, in order.
    pub fn removed(&self) -> Vec<PathBuf> {
        self.removed.lock().unwrap().clone()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.paths.lock().unwrap().contains(path)
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        self.removed.lock().unwrap().push(path.to_path_buf());
        let mut paths = self.paths.lock().unwrap();
        if !paths.iter().any(|p| p.starts_with(path)) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not found: {}", path.display()),
            ));
        }
        paths.retain(|p| !p.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_matches_in_order() {
        let runner = MockRunner::new();
        runner.expect_pattern(
            CommandExpectation::new(
                CommandPattern::StartsWith("xcrun".to_string()),
                MockOutcome::exit(65, "", "failed"),
            )
            .times(1),
        );
        runner.expect_prefix("xcrun", MockOutcome::success("ok"));

        let args = vec!["xcrun".to_string(), "xcodebuild".to_string()];
        let first = runner.run(&args).unwrap();
        let second = runner.run(&args).unwrap();

        assert_eq!(first.termination, Termination::Exited(65));
        assert!(second.success());
        assert_eq!(second.stdout, "ok");
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_mock_runner_unexpected_command() {
        let runner = MockRunner::new();
        let err = runner.run(&["unknown".to_string()]).unwrap_err();
        assert!(matches!(err, CommandError::ErrorThrown { .. }));
    }

    #[test]
    fn test_mock_filesystem_parents_and_removal() {
        let fs = MockFileSystem::new();
        fs.add_file("/out/Foo.xcframework/Info.plist");

        assert!(fs.exists(Path::new("/out")));
        assert!(fs.exists(Path::new("/out/Foo.xcframework")));

        fs.remove_all(Path::new("/out/Foo.xcframework")).unwrap();
        assert!(!fs.exists(Path::new("/out/Foo.xcframework/Info.plist")));
        assert!(fs.exists(Path::new("/out")));
        assert!(fs.remove_all(Path::new("/out/missing")).is_err());
        assert_eq!(fs.removed().len(), 2);
    }
}
