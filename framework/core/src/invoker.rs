use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScenarioConfigError;

/// How the build tool is launched for a scenario.
///
/// The scenario only names the invoker. Launching the build is the runner's job.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Invoker {
    /// Launch `gradle` as a separate process, reusing a warm daemon between builds.
    #[serde(rename = "cli")]
    #[display("`gradle` command")]
    Cli,
    /// Launch `gradle --no-daemon` as a separate process for every build.
    #[serde(rename = "no-daemon")]
    #[display("`gradle` command with --no-daemon")]
    CliNoDaemon,
    /// Run builds in-process through the embedded Tooling API client.
    #[serde(rename = "tooling-api")]
    #[display("Tooling API")]
    #[default]
    ToolingApi,
}

impl Invoker {
    /// Only the Tooling API can hand back typed result models.
    pub fn supports_tooling_model(&self) -> bool {
        matches!(self, Invoker::ToolingApi)
    }

    pub fn reuses_daemon(&self) -> bool {
        !matches!(self, Invoker::CliNoDaemon)
    }

    /// Warm-ups only pay off when a daemon survives between builds.
    pub fn default_warm_up_count(&self) -> u32 {
        if self.reuses_daemon() {
            6
        } else {
            1
        }
    }

    /// The key used for this invoker in scenario files.
    pub fn config_key(&self) -> &'static str {
        match self {
            Invoker::Cli => "cli",
            Invoker::CliNoDaemon => "no-daemon",
            Invoker::ToolingApi => "tooling-api",
        }
    }
}

impl FromStr for Invoker {
    type Err = ScenarioConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cli" => Ok(Invoker::Cli),
            "no-daemon" => Ok(Invoker::CliNoDaemon),
            "tooling-api" => Ok(Invoker::ToolingApi),
            other => Err(ScenarioConfigError::UnknownInvoker(other.to_string())),
        }
    }
}
