//! Centralized shell output and progress management.
//!
//! A [`Shell`] is created once by the CLI and handed by reference to every
//! component that reports progress. There is no global logger: verbosity is a
//! property of the shell value that was passed in.
//!
//! - Status messages with consistent formatting
//! - Verbose passthrough of captured tool output
//! - Progress bar over archive builds (via indicatif)
//! - JSON output mode for machine-readable output

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Shell output mode - Human and Json are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellMode {
    /// Human-readable output with optional colors and progress bars.
    Human {
        verbosity: Verbosity,
        color: ColorChoice,
    },
    /// Machine-readable JSON output only.
    Json,
}

impl Default for ShellMode {
    fn default() -> Self {
        ShellMode::Human {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
        }
    }
}

/// Output verbosity level (Human mode only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only, no progress
    Quiet,
    /// Default: status messages + progress bars
    #[default]
    Normal,
    /// --verbose: status lines plus the captured output of every tool
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Created,
    Finished,
    Packaged,

    // In-progress statuses (cyan)
    Cleaning,
    Compiling,
    Merging,
    Packaging,

    // Warning statuses (yellow)
    Warning,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::Finished => "Finished",
            Status::Packaged => "Packaged",
            Status::Cleaning => "Cleaning",
            Status::Compiling => "Compiling",
            Status::Merging => "Merging",
            Status::Packaging => "Packaging",
            Status::Warning => "warning",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            // Success: bold green
            Status::Created | Status::Finished | Status::Packaged => "\x1b[1;32m",
            // In-progress: bold cyan
            Status::Cleaning | Status::Compiling | Status::Merging | Status::Packaging => {
                "\x1b[1;36m"
            }
            // Warning: bold yellow
            Status::Warning => "\x1b[1;33m",
        }
    }

    /// Get the width for alignment (12 characters).
    fn width(&self) -> usize {
        12
    }
}

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    mode: ShellMode,
    use_color: bool,
}

impl Shell {
    /// Create a new shell with the given mode.
    pub fn new(mode: ShellMode) -> Self {
        let use_color = match &mode {
            ShellMode::Json => false,
            ShellMode::Human { color, .. } => match color {
                ColorChoice::Auto => io::stderr().is_terminal(),
                ColorChoice::Always => true,
                ColorChoice::Never => false,
            },
        };

        Shell { mode, use_color }
    }

    /// Create a shell from CLI flags with proper precedence.
    ///
    /// JSON mode takes precedence over quiet/verbose.
    pub fn from_flags(
        quiet: bool,
        verbose: bool,
        color: ColorChoice,
        message_format_json: bool,
    ) -> Self {
        let mode = if message_format_json {
            ShellMode::Json
        } else {
            let verbosity = if quiet {
                Verbosity::Quiet
            } else if verbose {
                Verbosity::Verbose
            } else {
                Verbosity::Normal
            };
            ShellMode::Human { verbosity, color }
        };

        Shell::new(mode)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(
            self.mode,
            ShellMode::Human {
                verbosity: Verbosity::Quiet,
                ..
            }
        )
    }

    pub fn is_verbose(&self) -> bool {
        matches!(
            self.mode,
            ShellMode::Human {
                verbosity: Verbosity::Verbose,
                ..
            }
        )
    }

    pub fn is_json(&self) -> bool {
        matches!(self.mode, ShellMode::Json)
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`
    ///
    /// Nothing is printed in quiet mode. In JSON mode, messages are
    /// silently ignored (use json_event for JSON output).
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_json() || self.is_quiet() {
            return;
        }

        let prefix = self.format_status(status);
        eprintln!("{} {}", prefix, msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Print a line only in verbose mode.
    pub fn verbose(&self, msg: impl Display) {
        if self.is_verbose() {
            eprintln!("{}", msg);
        }
    }

    /// Print captured tool output line by line in verbose mode.
    pub fn verbose_lines(&self, text: &str) {
        if !self.is_verbose() {
            return;
        }
        for line in text.lines() {
            eprintln!("{}", line);
        }
    }

    /// Print plain output to stdout (human mode only).
    pub fn print(&self, msg: impl Display) {
        if !self.is_json() {
            println!("{}", msg);
        }
    }

    /// Print a JSON event to stdout.
    ///
    /// Only works in JSON mode; silently ignored in human mode.
    pub fn json_event(&self, event: &serde_json::Value) {
        if !self.is_json() {
            return;
        }

        let json_str = serde_json::to_string(event).unwrap_or_default();
        println!("{}", json_str);
        let _ = io::stdout().flush();
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();
        let width = status.width();

        if self.use_color {
            let color = status.color_code();
            format!("{}{:>width$}\x1b[0m", color, text, width = width)
        } else {
            format!("{:>width$}", text, width = width)
        }
    }

    /// Create a scoped span for timing an operation.
    pub fn span(self: &Arc<Self>, msg: impl Display) -> Span {
        Span::new(Arc::clone(self), msg.to_string())
    }

    /// Create a progress bar.
    ///
    /// In quiet, verbose, or JSON mode, returns a no-op progress bar.
    pub fn progress(&self, total: u64, msg: impl Display) -> Progress {
        Progress::new(self, total, msg.to_string())
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(ShellMode::default())
    }
}

/// A scoped timing span; reports the elapsed time when finished.
pub struct Span {
    shell: Arc<Shell>,
    message: String,
    start: Instant,
}

impl Span {
    fn new(shell: Arc<Shell>, message: String) -> Self {
        Span {
            shell,
            message,
            start: Instant::now(),
        }
    }

    /// Finish the span, printing `Finished {message} in {duration}`.
    pub fn finish(self) {
        if self.shell.is_json() || self.shell.is_quiet() {
            return;
        }
        let duration_str = format_duration(self.start.elapsed());
        self.shell.status(
            Status::Finished,
            format!("{} in {}", self.message, duration_str),
        );
    }
}

/// Progress bar wrapper that respects shell mode.
///
/// The bar is cleared when finished or dropped, so an error reported after
/// an aborted run is not printed under a stale bar.
pub struct Progress {
    pb: Option<ProgressBar>,
}

impl Progress {
    fn new(shell: &Shell, total: u64, message: String) -> Self {
        let pb = if shell.is_quiet() || shell.is_verbose() || shell.is_json() {
            None
        } else if total > 1 {
            let pb = ProgressBar::new(total);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.set_message(message);
            Some(pb)
        } else {
            None
        };

        Progress { pb }
    }

    /// Increment progress.
    pub fn inc(&mut self, delta: u64) {
        if let Some(pb) = &self.pb {
            pb.inc(delta);
        }
    }

    /// Finish the progress bar.
    pub fn finish(&self) {
        if let Some(pb) = &self.pb {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Format a duration in a human-readable way.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_modes() {
        let shell = Shell::new(ShellMode::Human {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Never,
        });
        assert!(!shell.is_quiet());
        assert!(!shell.is_verbose());
        assert!(!shell.is_json());

        let quiet_shell = Shell::new(ShellMode::Human {
            verbosity: Verbosity::Quiet,
            color: ColorChoice::Never,
        });
        assert!(quiet_shell.is_quiet());

        let json_shell = Shell::new(ShellMode::Json);
        assert!(json_shell.is_json());
    }

    #[test]
    fn test_color_choice_parse() {
        assert_eq!("auto".parse::<ColorChoice>().unwrap(), ColorChoice::Auto);
        assert_eq!("always".parse::<ColorChoice>().unwrap(), ColorChoice::Always);
        assert_eq!("never".parse::<ColorChoice>().unwrap(), ColorChoice::Never);
        assert!("invalid".parse::<ColorChoice>().is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "0.50s");
        assert_eq!(format_duration(Duration::from_secs(2)), "2.00s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }

    #[test]
    fn test_status_formatting() {
        let shell = Shell::new(ShellMode::Human {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Never,
        });

        let formatted = shell.format_status(Status::Compiling);
        assert_eq!(formatted.trim(), "Compiling");
        assert_eq!(formatted.len(), 12);
    }

    #[test]
    fn test_from_flags() {
        let shell = Shell::from_flags(false, false, ColorChoice::Auto, false);
        assert!(!shell.is_quiet());
        assert!(!shell.is_verbose());

        let shell = Shell::from_flags(true, false, ColorChoice::Auto, false);
        assert!(shell.is_quiet());

        let shell = Shell::from_flags(false, true, ColorChoice::Auto, false);
        assert!(shell.is_verbose());

        // JSON takes precedence
        let shell = Shell::from_flags(true, true, ColorChoice::Auto, true);
        assert!(shell.is_json());
        assert!(!shell.is_quiet());
    }

    #[test]
    fn test_progress_without_bar() {
        let shell = Shell::from_flags(true, false, ColorChoice::Never, false);
        let mut progress = shell.progress(3, "archiving");
        progress.inc(1);
        assert!(progress.pb.is_none());
        progress.finish();
    }

    #[test]
    fn test_progress_cleared_on_drop() {
        let shell = Shell::from_flags(false, false, ColorChoice::Never, false);
        let mut progress = shell.progress(4, "archiving");
        progress.inc(1);
        let bar = progress.pb.clone().unwrap();
        assert!(!bar.is_finished());

        // An aborted run drops the progress without calling finish
        drop(progress);
        assert!(bar.is_finished());
        assert_eq!(bar.position(), 1);
    }
}
