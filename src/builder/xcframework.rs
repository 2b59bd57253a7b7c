//! Merge Engine: `xcodebuild -create-xcframework` once per target.

use std::path::{Path, PathBuf};

use crate::builder::context::BuildContext;
use crate::builder::debug_symbols::DebugSymbolLocator;
use crate::builder::errors::BuildError;
use crate::builder::framework::Framework;
use crate::core::naming::normalize_product_name;
use crate::util::fs::FileSystem;
use crate::util::process::ProcessRunner;
use crate::util::shell::{Shell, Status};

/// A merged multi-platform bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XcFramework {
    pub name: String,
    pub path: PathBuf,
}

pub struct XcFrameworkBuilder<'a> {
    ctx: &'a BuildContext,
    runner: &'a dyn ProcessRunner,
    fs: &'a dyn FileSystem,
    shell: &'a Shell,
}

impl<'a> XcFrameworkBuilder<'a> {
    pub fn new(
        ctx: &'a BuildContext,
        runner: &'a dyn ProcessRunner,
        fs: &'a dyn FileSystem,
        shell: &'a Shell,
    ) -> Self {
        XcFrameworkBuilder {
            ctx,
            runner,
            fs,
            shell,
        }
    }

    /// Merge every framework built for `target` into one xcframework.
    pub fn merge(&self, target: &str, frameworks: &[Framework]) -> Result<XcFramework, BuildError> {
        if frameworks.is_empty() {
            return Err(BuildError::MissingFrameworks {
                target: target.to_string(),
            });
        }

        let expected = normalize_product_name(target);
        let mut mismatched: Vec<String> = frameworks
            .iter()
            .filter(|f| normalize_product_name(&f.name) != expected)
            .map(|f| f.name.clone())
            .collect();
        if !mismatched.is_empty() {
            mismatched.sort();
            mismatched.dedup();
            return Err(BuildError::MixedTargets {
                target: target.to_string(),
                found: mismatched,
            });
        }

        let output = self.ctx.xcframework_path(target);
        if self.fs.exists(&output) {
            // A real failure here surfaces from xcodebuild below
            if let Err(err) = self.fs.remove_all(&output) {
                tracing::debug!("failed to remove {}: {}", output.display(), err);
            }
        }

        self.shell.status(
            Status::Merging,
            output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| output.display().to_string()),
        );

        let arguments = self.merge_arguments(frameworks, &output)?;
        self.runner.exec_and_check(&arguments, self.shell)?;

        Ok(XcFramework {
            name: target.to_string(),
            path: output,
        })
    }

    /// `xcrun xcodebuild -create-xcframework` with one `-framework` per
    /// input, each followed by the debug symbols found for it.
    pub fn merge_arguments(
        &self,
        frameworks: &[Framework],
        output: &Path,
    ) -> Result<Vec<String>, BuildError> {
        let mut arguments = vec![
            "xcrun".to_string(),
            "xcodebuild".to_string(),
            "-create-xcframework".to_string(),
        ];

        let locator = DebugSymbolLocator::new(self.runner, self.fs, self.shell);
        for framework in frameworks {
            arguments.push("-framework".to_string());
            arguments.push(framework.path.display().to_string());

            if self.ctx.debug_symbols {
                let candidates = locator.locate(&framework.name, &framework.debug_symbols_dir)?;
                for file in locator.existing(candidates) {
                    arguments.push("-debug-symbols".to_string());
                    arguments.push(file.display().to_string());
                }
            }
        }

        arguments.push("-output".to_string());
        arguments.push(output.display().to_string());
        Ok(arguments)
    }
}
