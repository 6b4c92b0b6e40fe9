use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ScenarioConfigError, ScenarioConfigResult};

/// A build tool version, used verbatim in display and profile names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("{_0}")]
pub struct BuildToolVersion(String);

impl BuildToolVersion {
    pub fn new(version: impl Into<String>) -> ScenarioConfigResult<Self> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(ScenarioConfigError::EmptyVersion);
        }

        Ok(Self(version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BuildToolVersion {
    type Err = ScenarioConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A resolved Gradle installation.
///
/// Detecting the version of an installation is done elsewhere. This only carries the result so
/// that every scenario sharing an installation reports it the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradleBuildConfiguration {
    version: BuildToolVersion,
    gradle_home: PathBuf,
    java_home: Option<PathBuf>,
    jvm_arguments: Vec<String>,
}

impl GradleBuildConfiguration {
    pub fn new(version: BuildToolVersion, gradle_home: impl Into<PathBuf>) -> Self {
        Self {
            version,
            gradle_home: gradle_home.into(),
            java_home: None,
            jvm_arguments: Vec::new(),
        }
    }

    pub fn with_java_home(mut self, java_home: impl Into<PathBuf>) -> Self {
        self.java_home = Some(java_home.into());
        self
    }

    pub fn with_jvm_arguments(mut self, jvm_arguments: Vec<String>) -> Self {
        self.jvm_arguments = jvm_arguments;
        self
    }

    pub fn version(&self) -> &BuildToolVersion {
        &self.version
    }

    pub fn gradle_home(&self) -> &Path {
        &self.gradle_home
    }

    pub fn java_home(&self) -> Option<&Path> {
        self.java_home.as_deref()
    }

    pub fn jvm_arguments(&self) -> &[String] {
        &self.jvm_arguments
    }
}

/// Build tools that are driven purely through their command line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum BuildTool {
    #[display("Maven")]
    Maven,
    #[display("Bazel")]
    Bazel,
    #[display("Buck")]
    Buck,
}

impl BuildTool {
    pub fn config_key(&self) -> &'static str {
        match self {
            BuildTool::Maven => "maven",
            BuildTool::Bazel => "bazel",
            BuildTool::Buck => "buck",
        }
    }

    /// Name of the executable looked up inside the tool home, or on the `PATH` without one.
    pub fn executable_name(&self) -> &'static str {
        match self {
            BuildTool::Maven => "mvn",
            BuildTool::Bazel => "bazel",
            BuildTool::Buck => "buck",
        }
    }
}

impl FromStr for BuildTool {
    type Err = ScenarioConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "maven" => Ok(BuildTool::Maven),
            "bazel" => Ok(BuildTool::Bazel),
            "buck" => Ok(BuildTool::Buck),
            other => Err(ScenarioConfigError::UnknownBuildTool(other.to_string())),
        }
    }
}
