//! Archive and merge pipeline.
//!
//! This module drives `xcodebuild` to archive each target per SDK and merges
//! the resulting frameworks into xcframeworks.

pub mod context;
pub mod debug_symbols;
pub mod errors;
pub mod framework;
pub mod xcframework;

pub use context::{BuildContext, ProjectSelector};
pub use debug_symbols::DebugSymbolLocator;
pub use errors::BuildError;
pub use framework::{Framework, FrameworkBuilder};
pub use xcframework::{XcFramework, XcFrameworkBuilder};
