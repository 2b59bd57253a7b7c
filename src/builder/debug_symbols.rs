//! Debug Symbol Locator.
//!
//! A release archive leaves `<Name>.framework.dSYM` in the products folder,
//! plus one `<UUID>.bcsymbolmap` per architecture slice when bitcode was
//! involved. The slice UUIDs come from `xcrun dwarfdump --uuid`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::core::naming::normalize_product_name;
use crate::util::fs::FileSystem;
use crate::util::process::{CommandError, ProcessRunner};
use crate::util::shell::Shell;

pub struct DebugSymbolLocator<'a> {
    runner: &'a dyn ProcessRunner,
    fs: &'a dyn FileSystem,
    shell: &'a Shell,
}

impl<'a> DebugSymbolLocator<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, fs: &'a dyn FileSystem, shell: &'a Shell) -> Self {
        DebugSymbolLocator { runner, fs, shell }
    }

    /// Candidate debug symbol files for `target` in `dir`.
    ///
    /// Returns nothing when there is no dSYM. Symbol maps are returned
    /// without checking they exist; see [`DebugSymbolLocator::existing`].
    /// A failing `dwarfdump` is an error.
    pub fn locate(&self, target: &str, dir: &Path) -> Result<Vec<PathBuf>, CommandError> {
        let name = normalize_product_name(target);

        let dsym = dir.join(format!("{}.framework.dSYM", name));
        if !self.fs.exists(&dsym) {
            tracing::debug!("no dSYM at {}", dsym.display());
            return Ok(Vec::new());
        }

        let dwarf = dsym
            .join("Contents")
            .join("Resources")
            .join("DWARF")
            .join(&name);
        let mut files = vec![dsym];
        if !self.fs.exists(&dwarf) {
            return Ok(files);
        }

        let arguments = vec![
            "xcrun".to_string(),
            "dwarfdump".to_string(),
            "--uuid".to_string(),
            dwarf.display().to_string(),
        ];
        let output = self.runner.exec_and_check(&arguments, self.shell)?;

        for uuid in slice_identifiers(&output.stdout) {
            files.push(dir.join(format!("{}.bcsymbolmap", uuid.to_ascii_uppercase())));
        }

        Ok(files)
    }

    /// Keep only the paths that exist.
    pub fn existing(&self, candidates: Vec<PathBuf>) -> Vec<PathBuf> {
        candidates
            .into_iter()
            .filter(|path| {
                let found = self.fs.exists(path);
                if !found {
                    tracing::debug!("skipping missing debug symbols {}", path.display());
                }
                found
            })
            .collect()
    }
}

static UUID_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^UUID: ([a-zA-Z0-9\-]+)").expect("valid UUID pattern"));

/// UUIDs from `dwarfdump --uuid` output, one per `UUID: <uuid> ...` line.
pub fn slice_identifiers(output: &str) -> Vec<String> {
    UUID_LINE
        .captures_iter(output)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|candidate| is_uuid(candidate))
        .map(str::to_string)
        .collect()
}

/// `8-4-4-4-12` hex digits.
fn is_uuid(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(group, len)| group.len() == len && group.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures;
    use crate::test_support::{MockFileSystem, MockOutcome, MockRunner};
    use crate::util::fs::RealFileSystem;
    use tempfile::TempDir;

    const DIR: &str = "/build/Release-iphoneos";
    const DWARF: &str = "/build/Release-iphoneos/Foo.framework.dSYM/Contents/Resources/DWARF/Foo";

    #[test]
    fn test_no_dsym_returns_nothing() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("unrelated.txt"), "x").unwrap();
        std::fs::create_dir(tmp.path().join("Bar.framework.dSYM")).unwrap();

        let runner = MockRunner::new();
        let shell = Shell::default();
        let locator = DebugSymbolLocator::new(&runner, &RealFileSystem, &shell);

        assert!(locator.locate("Foo", tmp.path()).unwrap().is_empty());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_dsym_without_dwarf() {
        let fs = MockFileSystem::new();
        fs.add_dir(format!("{}/Foo.framework.dSYM", DIR));
        let runner = MockRunner::new();
        let shell = Shell::default();
        let locator = DebugSymbolLocator::new(&runner, &fs, &shell);

        assert_eq!(
            locator.locate("Foo", Path::new(DIR)).unwrap(),
            vec![PathBuf::from("/build/Release-iphoneos/Foo.framework.dSYM")]
        );
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_symbol_maps_from_dwarf_uuids() {
        let fs = MockFileSystem::new();
        fs.add_file(DWARF);
        let runner = MockRunner::new();
        runner.expect(
            &format!("xcrun dwarfdump --uuid {}", DWARF),
            MockOutcome::success(
                "UUID: AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE (x86_64) /path\n",
            ),
        );
        let shell = Shell::default();
        let locator = DebugSymbolLocator::new(&runner, &fs, &shell);

        assert_eq!(
            locator.locate("Foo", Path::new(DIR)).unwrap(),
            vec![
                PathBuf::from("/build/Release-iphoneos/Foo.framework.dSYM"),
                PathBuf::from(
                    "/build/Release-iphoneos/AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE.bcsymbolmap"
                ),
            ]
        );
    }

    #[test]
    fn test_uuids_are_uppercased() {
        let fs = MockFileSystem::new();
        fs.add_file(DWARF);
        let runner = MockRunner::new();
        runner.expect_prefix(
            "xcrun dwarfdump",
            MockOutcome::success(fixtures::DWARFDUMP_TWO_SLICES),
        );
        let shell = Shell::default();
        let locator = DebugSymbolLocator::new(&runner, &fs, &shell);

        let files = locator.locate("Foo", Path::new(DIR)).unwrap();
        assert_eq!(files.len(), 3);
        assert_eq!(
            files[2],
            PathBuf::from(
                "/build/Release-iphoneos/0A1B2C3D-4E5F-6071-8293-A4B5C6D7E8F9.bcsymbolmap"
            )
        );
    }

    #[test]
    fn test_dwarfdump_failure_is_fatal() {
        let fs = MockFileSystem::new();
        fs.add_file(DWARF);
        let runner = MockRunner::new();
        runner.expect_prefix("xcrun dwarfdump", MockOutcome::exit(1, "", "not a Mach-O"));
        let shell = Shell::default();
        let locator = DebugSymbolLocator::new(&runner, &fs, &shell);

        let err = locator.locate("Foo", Path::new(DIR)).unwrap_err();
        assert!(matches!(err, CommandError::NonZeroExit { code: 1, .. }));
    }

    #[test]
    fn test_existing_filters_missing_files() {
        let fs = MockFileSystem::new();
        fs.add_dir("/d/Foo.framework.dSYM");
        let runner = MockRunner::new();
        let shell = Shell::default();
        let locator = DebugSymbolLocator::new(&runner, &fs, &shell);

        let kept = locator.existing(vec![
            PathBuf::from("/d/Foo.framework.dSYM"),
            PathBuf::from("/d/AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE.bcsymbolmap"),
        ]);
        assert_eq!(kept, vec![PathBuf::from("/d/Foo.framework.dSYM")]);
    }

    #[test]
    fn test_slice_identifiers_ignores_other_lines() {
        let output = "warning: something\n  UUID: AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE (arm64)\nUUID: not-a-uuid (arm64)\n";
        assert!(slice_identifiers(output).is_empty());
        assert_eq!(slice_identifiers(fixtures::DWARFDUMP_TWO_SLICES).len(), 2);
    }

    #[test]
    fn test_slice_identifiers_without_space_before_arch() {
        assert_eq!(
            slice_identifiers("UUID: AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE(arm64) /p\n"),
            vec!["AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE"]
        );
    }

    #[test]
    fn test_slice_identifiers_handles_crlf() {
        let output = "UUID: AAAAAAAA-BBBB-CCCC-DDDD-EEEEEEEEEEEE (x86_64) /p\r\nUUID: 0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9 (arm64) /p\r\n";
        assert_eq!(slice_identifiers(output).len(), 2);
    }
}
