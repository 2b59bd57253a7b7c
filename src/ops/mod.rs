//! High-level operations.
//!
//! This module contains the implementation of the create-xcframework command.

pub mod create_xcframeworks;
pub mod package_zip;

pub use create_xcframeworks::{
    create_xcframeworks, package_xcframeworks, CreateOptions, CreateResult, Pipeline,
    PipelineState,
};
pub use package_zip::{write_github_action_output, zip_path, Zipper};
