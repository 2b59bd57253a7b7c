//! Pipeline error types.

use thiserror::Error;

use crate::util::process::CommandError;

/// Error raised while building or merging frameworks.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("no frameworks to merge for `{target}`")]
    MissingFrameworks { target: String },

    #[error("cannot merge frameworks of different targets into `{target}`: {}", .found.join(", "))]
    MixedTargets { target: String, found: Vec<String> },

    #[error("targets {} would all be written to `{name}.xcframework`", .targets.join(", "))]
    OutputCollision { name: String, targets: Vec<String> },
}
