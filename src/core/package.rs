//! Swift package description.
//!
//! The package graph itself is owned by SwiftPM. We ask it for the root
//! manifest as JSON (`swift package dump-package`) and read only what the
//! pipeline needs: library products, their targets, declared platforms, and
//! the target shapes that cannot be archived.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::platform::TargetPlatform;
use crate::util::process::{CommandError, ProcessRunner};
use crate::util::shell::Shell;

/// Name of the manifest file at the package root.
pub const MANIFEST_NAME: &str = "Package.swift";

/// Errors loading or validating a package.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("no {} found in {}", MANIFEST_NAME, .path.display())]
    MissingManifest { path: PathBuf },

    #[error("failed to decode package description: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Package validation failed:\n{}", join_lines(.0))]
    ValidationFailed(Vec<ValidationError>),

    #[error("unknown product `{name}`\navailable products: {available}")]
    UnknownProduct { name: String, available: String },
}

/// A reason the package cannot be turned into XCFrameworks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(
        "Xcode builds are not supported for packages that contain binary targets.\nDetected binary targets: {}",
        .0.join(", ")
    )]
    ContainsBinaryTargets(Vec<String>),

    #[error(
        "Xcode builds are not supported for packages that reference system modules.\nReferenced system modules: {}",
        .0.join(", ")
    )]
    ContainsSystemModules(Vec<String>),

    #[error(
        "Conditional target dependencies are not supported, so the package may not build successfully.\nTargets with conditional dependencies: {}",
        .0.join(", ")
    )]
    ContainsConditionalDependencies(Vec<String>),

    #[error("No library products to create XCFrameworks for were found")]
    MissingLibraryProducts,
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The root manifest of a Swift package.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageDescription {
    pub name: String,

    #[serde(default)]
    pub platforms: Vec<PlatformDescription>,

    #[serde(default)]
    pub products: Vec<ProductDescription>,

    #[serde(default)]
    pub targets: Vec<TargetDescription>,
}

/// A minimum-deployment declaration such as `.iOS(.v13)`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDescription {
    pub platform_name: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductDescription {
    pub name: String,

    #[serde(default)]
    pub targets: Vec<String>,

    /// `{"library": ["automatic"]}`, `{"executable": null}`, ...
    #[serde(rename = "type")]
    pub kind: serde_json::Value,
}

impl ProductDescription {
    pub fn is_library(&self) -> bool {
        self.kind.get("library").is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Regular,
    Executable,
    Test,
    System,
    Binary,
    Plugin,
    Macro,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetDescription {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: TargetType,

    /// Each entry is `{"byName"|"target"|"product": [..., condition]}`.
    #[serde(default)]
    pub dependencies: Vec<serde_json::Value>,
}

impl TargetDescription {
    /// Whether any dependency carries a platform or configuration condition.
    pub fn has_conditional_dependencies(&self) -> bool {
        self.dependencies.iter().any(|dependency| {
            dependency
                .as_object()
                .into_iter()
                .flat_map(|obj| obj.values())
                .filter_map(|fields| fields.as_array())
                .filter_map(|fields| fields.last())
                .any(|condition| condition.is_object())
        })
    }
}

impl PackageDescription {
    /// Decode the JSON printed by `swift package dump-package`.
    pub fn from_json(json: &str) -> Result<Self, PackageError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Ask SwiftPM for the description of the package at `package_dir`.
    pub fn load(
        runner: &dyn ProcessRunner,
        shell: &Shell,
        package_dir: &Path,
    ) -> Result<Self, PackageError> {
        let manifest = package_dir.join(MANIFEST_NAME);
        if !manifest.is_file() {
            return Err(PackageError::MissingManifest {
                path: package_dir.to_path_buf(),
            });
        }

        let arguments = vec![
            "swift".to_string(),
            "package".to_string(),
            "--package-path".to_string(),
            package_dir.display().to_string(),
            "dump-package".to_string(),
        ];
        shell.verbose(format!("Evaluating manifest {}", manifest.display()));
        let output = runner.run(&arguments)?.into_result()?;

        let description = Self::from_json(&output.stdout)?;
        tracing::debug!(
            "package `{}`: {} products, {} targets",
            description.name,
            description.products.len(),
            description.targets.len()
        );
        Ok(description)
    }

    pub fn library_products(&self) -> impl Iterator<Item = &ProductDescription> {
        self.products.iter().filter(|p| p.is_library())
    }

    /// Library product names, sorted for display.
    pub fn library_product_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.library_products().map(|p| p.name.clone()).collect();
        names.sort();
        names
    }

    /// Check every rule and report all failures together.
    pub fn validate(&self) -> Result<(), PackageError> {
        let mut errors = Vec::new();

        let names_of = |kind: TargetType| -> Vec<String> {
            self.targets
                .iter()
                .filter(|t| t.kind == kind)
                .map(|t| t.name.clone())
                .collect()
        };

        let binary_targets = names_of(TargetType::Binary);
        if !binary_targets.is_empty() {
            errors.push(ValidationError::ContainsBinaryTargets(binary_targets));
        }

        let system_targets = names_of(TargetType::System);
        if !system_targets.is_empty() {
            errors.push(ValidationError::ContainsSystemModules(system_targets));
        }

        let conditional: Vec<String> = self
            .targets
            .iter()
            .filter(|t| t.has_conditional_dependencies())
            .map(|t| t.name.clone())
            .collect();
        if !conditional.is_empty() {
            errors.push(ValidationError::ContainsConditionalDependencies(conditional));
        }

        if self.library_products().next().is_none() {
            errors.push(ValidationError::MissingLibraryProducts);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PackageError::ValidationFailed(errors))
        }
    }

    /// Platforms to build: the requested ones (or the defaults) limited to
    /// those the package declares, in declaration order.
    pub fn filter_platforms(&self, requested: &[TargetPlatform]) -> Vec<TargetPlatform> {
        let supported = if requested.is_empty() {
            TargetPlatform::defaults()
        } else {
            requested.to_vec()
        };

        let mut platforms: Vec<TargetPlatform> = Vec::new();

        if self.platforms.is_empty() {
            for platform in supported {
                if !platforms.contains(&platform) {
                    platforms.push(platform);
                }
            }
            return platforms;
        }

        for declared in &self.platforms {
            for platform in &supported {
                if platform.matches_manifest_platform(&declared.platform_name)
                    && !platforms.contains(platform)
                {
                    platforms.push(*platform);
                }
            }
        }

        platforms
    }

    /// Targets of the selected library products, without duplicates.
    ///
    /// An empty selection means every library product.
    pub fn resolve_targets(&self, products: &[String]) -> Result<Vec<String>, PackageError> {
        for requested in products {
            if !self.library_products().any(|p| &p.name == requested) {
                let available = self.library_product_names();
                return Err(PackageError::UnknownProduct {
                    name: requested.clone(),
                    available: if available.is_empty() {
                        "(none)".to_string()
                    } else {
                        available.join(", ")
                    },
                });
            }
        }

        let mut targets: Vec<String> = Vec::new();
        for product in self.library_products() {
            if !products.is_empty() && !products.contains(&product.name) {
                continue;
            }
            for target in &product.targets {
                if !targets.contains(target) {
                    targets.push(target.clone());
                }
            }
        }

        Ok(targets)
    }
}
