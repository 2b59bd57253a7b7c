//! Build context - project selector, configuration, and output layout.

use std::path::{Path, PathBuf};

use crate::core::build_config::{BuildConfiguration, BuildSetting};
use crate::core::naming::normalize_product_name;
use crate::core::platform::Sdk;

/// Name of the tool's private folder under the build path.
pub const BUILD_FOLDER: &str = "create-xcframework";

/// Which Xcode container xcodebuild is pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSelector {
    Project(PathBuf),
    Workspace(PathBuf),
}

impl ProjectSelector {
    /// The workspace SwiftPM generates for a package opened in Xcode.
    pub fn package_workspace(package_dir: &Path) -> Self {
        ProjectSelector::Workspace(
            package_dir
                .join(".swiftpm")
                .join("xcode")
                .join("package.xcworkspace"),
        )
    }

    pub fn flag(&self) -> &'static str {
        match self {
            ProjectSelector::Project(_) => "-project",
            ProjectSelector::Workspace(_) => "-workspace",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ProjectSelector::Project(p) | ProjectSelector::Workspace(p) => p,
        }
    }

    /// `[-project|-workspace, <path>]`
    pub fn arguments(&self) -> [String; 2] {
        [self.flag().to_string(), self.path().display().to_string()]
    }
}

/// Everything the Artifact Builder and Merge Engine need to know about a run.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Project or workspace holding the schemes
    pub project: ProjectSelector,

    /// Configuration passed to xcodebuild
    pub configuration: BuildConfiguration,

    /// `BUILD_DIR`, also the root of every archive
    pub build_dir: PathBuf,

    /// Where merged xcframeworks are written
    pub output_dir: PathBuf,

    /// Library evolution comes from an xcconfig instead of a forced setting
    pub stack_evolution: bool,

    /// Attach dSYMs and symbol maps when merging
    pub debug_symbols: bool,

    /// Extra xcconfig passed to archive builds
    pub xcconfig: Option<PathBuf>,

    /// User build settings, appended last
    pub xc_settings: Vec<BuildSetting>,
}

impl BuildContext {
    /// Create a context with default options (release, debug symbols on).
    pub fn new(project: ProjectSelector, build_dir: PathBuf, output_dir: PathBuf) -> Self {
        BuildContext {
            project,
            configuration: BuildConfiguration::default(),
            build_dir,
            output_dir,
            stack_evolution: false,
            debug_symbols: true,
            xcconfig: None,
            xc_settings: Vec::new(),
        }
    }

    /// `<build_path>/create-xcframework/build`
    pub fn build_dir_for(build_path: &Path) -> PathBuf {
        build_path.join(BUILD_FOLDER).join("build")
    }

    /// `<build_dir>/<target>/<sdk archive>`
    pub fn archive_path(&self, target: &str, sdk: Sdk) -> PathBuf {
        self.build_dir
            .join(normalize_product_name(target))
            .join(sdk.archive_name())
    }

    /// The framework inside the archive built for `sdk`.
    pub fn framework_path(&self, target: &str, sdk: Sdk) -> PathBuf {
        let name = normalize_product_name(target);
        self.archive_path(target, sdk)
            .join("Products")
            .join("Library")
            .join("Frameworks")
            .join(format!("{}.framework", name))
    }

    /// The products folder xcodebuild writes dSYMs and symbol maps to.
    pub fn debug_symbols_dir(&self, sdk: Sdk) -> PathBuf {
        self.build_dir.join(sdk.release_folder(self.configuration))
    }

    /// `<output_dir>/<target>.xcframework`
    pub fn xcframework_path(&self, target: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.xcframework", normalize_product_name(target)))
    }
}

/// Resolve a user-supplied xcconfig path.
///
/// Absolute paths are kept, a leading `./` is dropped, and anything else is
/// taken relative to the package directory.
pub fn resolve_xcconfig(package_dir: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    let relative = path.strip_prefix("./").unwrap_or(path);
    package_dir.join(relative)
}
