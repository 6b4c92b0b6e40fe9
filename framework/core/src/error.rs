use std::path::PathBuf;

/// Errors raised while building or loading scenario definitions.
///
/// All of these are configuration errors. They surface before any build is run so that a bad
/// scenario file aborts the whole run set instead of failing part way through.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioConfigError {
    #[error("Scenario '{scenario}' must run at least one build, got build count {build_count}")]
    InvalidBuildCount { scenario: String, build_count: u32 },
    #[error("Scenario '{scenario}' is missing required field '{field}'")]
    MissingField {
        scenario: String,
        field: &'static str,
    },
    #[error("Scenario name must not be empty")]
    EmptyName,
    #[error("Scenario name '{scenario}' must be a single directory name")]
    InvalidName { scenario: String },
    #[error("Build tool version must not be empty")]
    EmptyVersion,
    #[error("Tooling model type name must not be empty")]
    EmptyToolingModel,
    #[error("Scenario '{scenario}' requests tooling model '{model}' but '{invoker}' cannot fetch tooling models")]
    ToolingModelNotSupported {
        scenario: String,
        model: String,
        invoker: String,
    },
    #[error("Unknown invoker '{0}', expected one of: cli, no-daemon, tooling-api")]
    UnknownInvoker(String),
    #[error("Unknown build tool '{0}', expected one of: gradle, maven, bazel, buck")]
    UnknownBuildTool(String),
    #[error("Scenario '{0}' is defined more than once")]
    DuplicateScenario(String),
    #[error("Scenarios '{first}' and '{second}' share the output directory {}", .dir.display())]
    DuplicateOutputDir {
        first: String,
        second: String,
        dir: PathBuf,
    },
    #[error("Scenario '{scenario}' requests Gradle version '{version}' but no such installation is known")]
    UnknownVersion { scenario: String, version: String },
    #[error("Scenario '{scenario}' lists Gradle version '{version}' more than once")]
    DuplicateVersion { scenario: String, version: String },
    #[error("Scenario '{scenario}' requests Gradle but no Gradle installation is known")]
    NoInstallation { scenario: String },
    #[error("Scenario '{scenario}' uses unknown mutator '{mutator}'")]
    UnknownMutator { scenario: String, mutator: String },
    #[error("Scenario '{scenario}' sets '{field}' which does not apply to {build_tool} scenarios")]
    UnsupportedField {
        scenario: String,
        field: &'static str,
        build_tool: String,
    },
    #[error("Unknown scenario '{0}' selected")]
    UnknownScenario(String),
    #[error("Failed to read scenario file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse scenario file: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type ScenarioConfigResult<T> = Result<T, ScenarioConfigError>;
