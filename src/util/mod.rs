//! Shared utilities

pub mod config;
pub mod fs;
pub mod hash;
pub mod process;
pub mod shell;

pub use config::Config;
pub use fs::{FileSystem, RealFileSystem};
pub use process::{CommandError, CommandOutput, ProcessRunner, SystemRunner};
pub use shell::Shell;
