//! The create-xcframework command

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::cli::{flag_pair, Cli};
use create_xcframework::builder::ProjectSelector;
use create_xcframework::core::package::{PackageError, MANIFEST_NAME};
use create_xcframework::ops::{create_xcframeworks, CreateOptions};
use create_xcframework::util::config::{global_config_path, load_config, project_config_path, Config};
use create_xcframework::util::process::find_executable;
use create_xcframework::util::shell::{Shell, Status};
use create_xcframework::util::{RealFileSystem, SystemRunner};

pub fn execute(cli: Cli, shell: &Arc<Shell>) -> Result<()> {
    let package_dir = cli.package_path.clone();
    if !package_dir.join(MANIFEST_NAME).is_file() {
        return Err(PackageError::MissingManifest { path: package_dir }.into());
    }

    // Load configuration (global + project)
    let config = load_config(
        global_config_path().as_deref(),
        &project_config_path(&package_dir),
    );
    let opts = create_options(cli, config);

    let tools: &[&str] = if opts.list_products {
        &["swift"]
    } else {
        &["swift", "xcrun"]
    };
    for tool in tools {
        if find_executable(tool).is_none() {
            bail!(
                "`{}` not found in PATH\n\
                 hint: install Xcode and its command line tools, then run `xcode-select --install`",
                tool
            );
        }
    }

    let span = shell.span("creating xcframeworks");
    let result = create_xcframeworks(&opts, &SystemRunner, &RealFileSystem, shell)?;

    if opts.list_products {
        shell.json_event(&serde_json::json!({
            "reason": "products",
            "products": result.products,
        }));
        span.finish();
        return Ok(());
    }

    for xcframework in &result.xcframeworks {
        shell.status(Status::Created, xcframework.path.display());
        shell.json_event(&serde_json::json!({
            "reason": "xcframework-created",
            "target": xcframework.name,
            "path": xcframework.path,
        }));
    }
    for file in &result.packaged {
        shell.status(Status::Packaged, file.display());
        shell.json_event(&serde_json::json!({
            "reason": "packaged",
            "path": file,
        }));
    }

    span.finish();
    Ok(())
}

/// Combine config files and flags; flags win.
fn create_options(cli: Cli, config: Config) -> CreateOptions {
    let defaults = CreateOptions::default();
    let build = config.build;

    let project = match (cli.project, cli.workspace) {
        (Some(project), _) => Some(ProjectSelector::Project(project)),
        (None, Some(workspace)) => Some(ProjectSelector::Workspace(workspace)),
        (None, None) => None,
    };

    CreateOptions {
        package_dir: cli.package_path,
        build_path: cli
            .build_path
            .or(build.build_path)
            .unwrap_or(defaults.build_path),
        output: cli.output.or(build.output).unwrap_or(defaults.output),
        configuration: cli
            .configuration
            .or(build.configuration)
            .unwrap_or(defaults.configuration),
        clean: flag_pair(cli.clean, cli.no_clean)
            .or(build.clean)
            .unwrap_or(defaults.clean),
        debug_symbols: flag_pair(cli.debug_symbols, cli.no_debug_symbols)
            .or(build.debug_symbols)
            .unwrap_or(defaults.debug_symbols),
        list_products: cli.list_products,
        xcconfig: cli.xcconfig.or(build.xcconfig),
        stack_evolution: cli.stack_evolution || build.stack_evolution.unwrap_or(false),
        xc_settings: non_empty_or(cli.xc_settings, build.xc_settings),
        platforms: non_empty_or(cli.platforms, build.platforms),
        products: non_empty_or(cli.products, build.products),
        project,
        zip: cli.zip || config.package.zip.unwrap_or(false),
        zip_version: cli.zip_version.or(config.package.zip_version),
        github_action: cli.github_action,
    }
}

fn non_empty_or<T>(cli: Vec<T>, config: Vec<T>) -> Vec<T> {
    if cli.is_empty() {
        config
    } else {
        cli
    }
}
