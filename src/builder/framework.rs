//! Artifact Builder: one archive build per (target, SDK).

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::builder::context::BuildContext;
use crate::builder::errors::BuildError;
use crate::core::platform::Sdk;
use crate::util::process::ProcessRunner;
use crate::util::shell::{Shell, Status};

/// A framework built for one SDK.
///
/// Paths are computed, not checked. The Merge Engine and the Debug Symbol
/// Locator find out whether they exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framework {
    /// Target name as declared in the package
    pub name: String,
    pub sdk: Sdk,
    /// The `.framework` bundle inside the archive
    pub path: PathBuf,
    /// Products folder that may hold the dSYM and symbol maps
    pub debug_symbols_dir: PathBuf,
}

/// Runs `xcodebuild archive` for targets of a package.
pub struct FrameworkBuilder<'a> {
    ctx: &'a BuildContext,
    runner: &'a dyn ProcessRunner,
    shell: &'a Shell,
}

impl<'a> FrameworkBuilder<'a> {
    pub fn new(ctx: &'a BuildContext, runner: &'a dyn ProcessRunner, shell: &'a Shell) -> Self {
        FrameworkBuilder { ctx, runner, shell }
    }

    /// Archive `target` for `sdk` and return where the framework landed.
    pub fn build(&self, target: &str, sdk: Sdk) -> Result<Framework, BuildError> {
        self.shell.status(
            Status::Compiling,
            format!("{} for {}", target, sdk.destination()),
        );

        let arguments = self.archive_arguments(target, sdk);
        self.runner.exec_and_check(&arguments, self.shell)?;

        Ok(Framework {
            name: target.to_string(),
            sdk,
            path: self.ctx.framework_path(target, sdk),
            debug_symbols_dir: self.ctx.debug_symbols_dir(sdk),
        })
    }

    /// Archive every target for one SDK, stopping at the first failure.
    pub fn build_all(
        &self,
        targets: &[String],
        sdk: Sdk,
    ) -> Result<BTreeMap<String, Framework>, BuildError> {
        let mut frameworks = BTreeMap::new();
        for target in targets {
            let framework = self.build(target, sdk)?;
            frameworks.insert(target.clone(), framework);
        }
        Ok(frameworks)
    }

    /// Remove previous build products for the project.
    pub fn clean(&self) -> Result<(), BuildError> {
        self.shell
            .status(Status::Cleaning, self.ctx.build_dir.display());

        let mut arguments = vec!["xcrun".to_string(), "xcodebuild".to_string()];
        arguments.extend(self.ctx.project.arguments());
        arguments.push(format!("BUILD_DIR={}", self.ctx.build_dir.display()));
        arguments.push("clean".to_string());

        self.runner.exec_and_check(&arguments, self.shell)?;
        Ok(())
    }

    /// The full `xcrun xcodebuild archive` argument list.
    pub fn archive_arguments(&self, target: &str, sdk: Sdk) -> Vec<String> {
        let ctx = self.ctx;
        let mut arguments = vec![
            "xcrun".to_string(),
            "xcodebuild".to_string(),
            "archive".to_string(),
        ];
        arguments.extend(ctx.project.arguments());
        arguments.extend([
            "-scheme".to_string(),
            target.to_string(),
            "-configuration".to_string(),
            ctx.configuration.xcode_name().to_string(),
            "-archivePath".to_string(),
            ctx.archive_path(target, sdk).display().to_string(),
            "-destination".to_string(),
            sdk.destination().to_string(),
        ]);

        if let Some(xcconfig) = &ctx.xcconfig {
            arguments.push("-xcconfig".to_string());
            arguments.push(xcconfig.display().to_string());
        }

        arguments.push(format!("BUILD_DIR={}", ctx.build_dir.display()));
        arguments.push("SKIP_INSTALL=NO".to_string());

        for (name, value) in sdk.build_settings() {
            arguments.push(format!("{}={}", name, value));
        }

        // With stack evolution the setting is expected from the xcconfig
        if !ctx.stack_evolution {
            arguments.push("BUILD_LIBRARY_FOR_DISTRIBUTION=YES".to_string());
        }

        // Later occurrences win in xcodebuild, so user settings go last
        arguments.extend(ctx.xc_settings.iter().map(ToString::to_string));

        arguments
    }
}
