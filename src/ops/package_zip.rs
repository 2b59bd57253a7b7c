//! Distribution packaging: zip, checksum, and GitHub Action output.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::util::fs::{write_string, FileSystem};
use crate::util::hash::sha256_file;
use crate::util::process::ProcessRunner;
use crate::util::shell::{Shell, Status};

/// File listing the packaged artifacts for CI workflows.
pub const GITHUB_ACTION_OUTPUT: &str = "xcframework-zipfile.url";

pub struct Zipper<'a> {
    runner: &'a dyn ProcessRunner,
    fs: &'a dyn FileSystem,
    shell: &'a Shell,
}

impl<'a> Zipper<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, fs: &'a dyn FileSystem, shell: &'a Shell) -> Self {
        Zipper { runner, fs, shell }
    }

    /// Zip `xcframework` next to itself with `ditto`.
    pub fn zip(&self, target: &str, version: Option<&str>, xcframework: &Path) -> Result<PathBuf> {
        let zip = zip_path(xcframework, version);
        self.shell.status(
            Status::Packaging,
            format!("{} into {}", target, zip.display()),
        );

        let arguments = vec![
            "ditto".to_string(),
            "-c".to_string(),
            "-k".to_string(),
            "--keepParent".to_string(),
            xcframework.display().to_string(),
            zip.display().to_string(),
        ];
        self.runner
            .exec_and_check(&arguments, self.shell)
            .with_context(|| format!("failed to zip {}", xcframework.display()))?;

        Ok(zip)
    }

    /// Write the SHA-256 of `zip` to a sibling `.sha256` file.
    pub fn checksum(&self, zip: &Path) -> Result<PathBuf> {
        if zip.extension().and_then(|e| e.to_str()) != Some("zip") {
            bail!(
                "unexpected file type for {}; supported extensions are: zip",
                zip.display()
            );
        }
        if !zip.is_file() {
            bail!("file not found at path: {}", zip.display());
        }

        let sum = sha256_file(zip)?;
        let checksum_file = zip.with_extension("sha256");
        write_string(&checksum_file, &sum)?;
        tracing::debug!("{}: {}", zip.display(), sum);
        Ok(checksum_file)
    }

    /// Remove the unzipped bundle.
    pub fn clean(&self, xcframework: &Path) -> Result<()> {
        self.fs
            .remove_all(xcframework)
            .with_context(|| format!("failed to remove {}", xcframework.display()))
    }
}

/// `Foo.xcframework` becomes `Foo-1.0.0.zip`, or `Foo.zip` without a version.
pub fn zip_path(xcframework: &Path, version: Option<&str>) -> PathBuf {
    let suffix = version.map(|v| format!("-{}", v)).unwrap_or_default();
    let file_name = xcframework
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(".xcframework")
        .unwrap_or(&file_name);
    xcframework.with_file_name(format!("{}{}.zip", stem, suffix))
}

/// Write the packaged file paths, one per line, for a GitHub Action step.
pub fn write_github_action_output(build_path: &Path, files: &[PathBuf]) -> Result<PathBuf> {
    let contents = files
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    let path = build_path.join(GITHUB_ACTION_OUTPUT);
    write_string(&path, &contents)?;
    Ok(path)
}
