//! Implementation of the create-xcframeworks command.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::builder::{
    BuildContext, BuildError, Framework, FrameworkBuilder, ProjectSelector, XcFramework,
    XcFrameworkBuilder,
};
use crate::builder::context::resolve_xcconfig;
use crate::core::build_config::{BuildConfiguration, BuildSetting};
use crate::core::naming::normalize_product_name;
use crate::core::package::PackageDescription;
use crate::core::platform::{sdks_for, Sdk, TargetPlatform};
use crate::ops::package_zip::{write_github_action_output, Zipper};
use crate::util::fs::FileSystem;
use crate::util::process::ProcessRunner;
use crate::util::shell::Shell;

/// Where the orchestrator is in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Building { target: String, sdk_index: usize },
    Merging { target: String },
    Done,
    Failed(String),
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => f.write_str("idle"),
            PipelineState::Building { target, sdk_index } => {
                write!(f, "building {} (sdk #{})", target, sdk_index)
            }
            PipelineState::Merging { target } => write!(f, "merging {}", target),
            PipelineState::Done => f.write_str("done"),
            PipelineState::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Archives every target for every SDK, then merges each target.
///
/// Runs sequentially and stops at the first failure. No xcframeworks are
/// returned from a failed run.
pub struct Pipeline<'a> {
    ctx: &'a BuildContext,
    runner: &'a dyn ProcessRunner,
    fs: &'a dyn FileSystem,
    shell: &'a Shell,
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        ctx: &'a BuildContext,
        runner: &'a dyn ProcessRunner,
        fs: &'a dyn FileSystem,
        shell: &'a Shell,
    ) -> Self {
        Pipeline {
            ctx,
            runner,
            fs,
            shell,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// One xcframework per target, in target order.
    pub fn run(&mut self, targets: &[String], sdks: &[Sdk]) -> Result<Vec<XcFramework>, BuildError> {
        match self.run_targets(targets, sdks) {
            Ok(xcframeworks) => {
                self.transition(PipelineState::Done);
                Ok(xcframeworks)
            }
            Err(err) => {
                self.transition(PipelineState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    fn run_targets(
        &mut self,
        targets: &[String],
        sdks: &[Sdk],
    ) -> Result<Vec<XcFramework>, BuildError> {
        check_unique_outputs(targets)?;

        let builder = FrameworkBuilder::new(self.ctx, self.runner, self.shell);
        let merger = XcFrameworkBuilder::new(self.ctx, self.runner, self.fs, self.shell);

        let total = (targets.len() * sdks.len()) as u64;
        let mut progress = self.shell.progress(total, "Archiving");

        let mut xcframeworks = Vec::with_capacity(targets.len());
        for target in targets {
            let mut frameworks: Vec<Framework> = Vec::with_capacity(sdks.len());
            for (sdk_index, sdk) in sdks.iter().enumerate() {
                self.transition(PipelineState::Building {
                    target: target.clone(),
                    sdk_index,
                });
                let framework = builder.build(target, *sdk);
                progress.inc(1);
                frameworks.push(framework?);
            }

            self.transition(PipelineState::Merging {
                target: target.clone(),
            });
            xcframeworks.push(merger.merge(target, &frameworks)?);
        }

        progress.finish();
        Ok(xcframeworks)
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!("pipeline: {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Each target must own its archive directory and output bundle.
fn check_unique_outputs(targets: &[String]) -> Result<(), BuildError> {
    let mut by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for target in targets {
        by_name
            .entry(normalize_product_name(target))
            .or_default()
            .push(target.clone());
    }

    match by_name.into_iter().find(|(_, targets)| targets.len() > 1) {
        Some((name, targets)) => Err(BuildError::OutputCollision { name, targets }),
        None => Ok(()),
    }
}

/// Options for creating xcframeworks from a package.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Package root containing Package.swift
    pub package_dir: PathBuf,

    /// Build/cache directory, relative to the package when not absolute
    pub build_path: PathBuf,

    /// Where to place the xcframeworks
    pub output: PathBuf,

    pub configuration: BuildConfiguration,

    /// Clean before building
    pub clean: bool,

    /// Include debug symbols in the xcframeworks
    pub debug_symbols: bool,

    /// Print library products and stop
    pub list_products: bool,

    /// Extra xcconfig, relative to the package when not absolute
    pub xcconfig: Option<String>,

    pub stack_evolution: bool,

    pub xc_settings: Vec<BuildSetting>,

    /// Platforms to build (empty = package platforms or defaults)
    pub platforms: Vec<TargetPlatform>,

    /// Library products to build (empty = all)
    pub products: Vec<String>,

    /// Explicit project or workspace (default = SwiftPM's package workspace)
    pub project: Option<ProjectSelector>,

    /// Zip each xcframework and write a checksum
    pub zip: bool,

    pub zip_version: Option<String>,

    /// Write the packaged paths for a GitHub Action
    pub github_action: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        CreateOptions {
            package_dir: PathBuf::from("."),
            build_path: PathBuf::from(".build"),
            output: PathBuf::from("."),
            configuration: BuildConfiguration::default(),
            clean: true,
            debug_symbols: true,
            list_products: false,
            xcconfig: None,
            stack_evolution: false,
            xc_settings: Vec::new(),
            platforms: Vec::new(),
            products: Vec::new(),
            project: None,
            zip: false,
            zip_version: None,
            github_action: false,
        }
    }
}

impl CreateOptions {
    /// The build path resolved against the package directory.
    pub fn resolved_build_path(&self) -> PathBuf {
        self.package_dir.join(&self.build_path)
    }

    /// Build context for these options.
    pub fn build_context(&self) -> BuildContext {
        let project = self
            .project
            .clone()
            .unwrap_or_else(|| ProjectSelector::package_workspace(&self.package_dir));

        let mut ctx = BuildContext::new(
            project,
            BuildContext::build_dir_for(&self.resolved_build_path()),
            self.output.clone(),
        );
        ctx.configuration = self.configuration;
        ctx.stack_evolution = self.stack_evolution;
        ctx.debug_symbols = self.debug_symbols;
        ctx.xcconfig = self
            .xcconfig
            .as_deref()
            .map(|path| resolve_xcconfig(&self.package_dir, path));
        ctx.xc_settings = self.xc_settings.clone();
        ctx
    }
}

/// What a run produced.
#[derive(Debug, Clone, Default)]
pub struct CreateResult {
    /// Library products, filled only when listing
    pub products: Vec<String>,

    pub xcframeworks: Vec<XcFramework>,

    /// Zip and checksum files, in order
    pub packaged: Vec<PathBuf>,
}

/// Build xcframeworks for the library products of a Swift package.
pub fn create_xcframeworks(
    opts: &CreateOptions,
    runner: &dyn ProcessRunner,
    fs: &dyn FileSystem,
    shell: &Shell,
) -> Result<CreateResult> {
    let package = PackageDescription::load(runner, shell, &opts.package_dir)
        .with_context(|| format!("failed to load package at {}", opts.package_dir.display()))?;
    package.validate()?;

    if opts.list_products {
        let products = package.library_product_names();
        shell.print(format!(
            "\nAvailable {} products:\n    {}\n",
            package.name,
            products.join("\n    ")
        ));
        return Ok(CreateResult {
            products,
            ..CreateResult::default()
        });
    }

    let platforms = package.filter_platforms(&opts.platforms);
    for requested in &opts.platforms {
        if !platforms.contains(requested) {
            shell.warn(format!(
                "skipping {}: not a platform of package `{}`",
                requested, package.name
            ));
        }
    }
    if platforms.is_empty() {
        bail!(
            "none of the requested platforms are supported by package `{}`",
            package.name
        );
    }
    let sdks = sdks_for(&platforms);
    let targets = package.resolve_targets(&opts.products)?;

    tracing::info!(
        "building {} target(s) for {} SDK(s)",
        targets.len(),
        sdks.len()
    );

    let ctx = opts.build_context();
    if opts.clean {
        FrameworkBuilder::new(&ctx, runner, shell).clean()?;
    }

    let xcframeworks = Pipeline::new(&ctx, runner, fs, shell).run(&targets, &sdks)?;

    let packaged = if opts.zip {
        package_xcframeworks(opts, &xcframeworks, runner, fs, shell)?
    } else {
        Vec::new()
    };

    Ok(CreateResult {
        products: Vec::new(),
        xcframeworks,
        packaged,
    })
}

/// Zip each xcframework, write its checksum, and remove the bundle.
///
/// Returns the zip and checksum paths in order.
pub fn package_xcframeworks(
    opts: &CreateOptions,
    xcframeworks: &[XcFramework],
    runner: &dyn ProcessRunner,
    fs: &dyn FileSystem,
    shell: &Shell,
) -> Result<Vec<PathBuf>> {
    let zipper = Zipper::new(runner, fs, shell);
    let mut packaged = Vec::with_capacity(xcframeworks.len() * 2);
    for xcframework in xcframeworks {
        let zip = zipper.zip(
            &xcframework.name,
            opts.zip_version.as_deref(),
            &xcframework.path,
        )?;
        let checksum = zipper.checksum(&zip)?;
        zipper.clean(&xcframework.path)?;
        packaged.push(zip);
        packaged.push(checksum);
    }

    if opts.github_action {
        write_github_action_output(&opts.resolved_build_path(), &packaged)?;
    }

    Ok(packaged)
}
