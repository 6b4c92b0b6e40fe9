use std::io::Write;
use std::path::{Path, PathBuf};

use build_profiler_core::prelude::{BuildMutatorFactory, BuildTool, ScenarioConfigResult};

use crate::definition::{format_list, ScenarioCommon, ScenarioCommonBuilder, ScenarioDefinition};

/// Warm-ups for command line scenarios that do not set their own.
pub const DEFAULT_COMMAND_LINE_WARM_UP_COUNT: u32 = 6;

/// A scenario for a build tool that can only be driven through its command line.
#[derive(Debug, Clone)]
pub struct CommandLineScenarioDefinition {
    common: ScenarioCommon,
    build_tool: BuildTool,
    targets: Vec<String>,
    tool_home: Option<PathBuf>,
}

impl CommandLineScenarioDefinition {
    pub fn build_tool(&self) -> BuildTool {
        self.build_tool
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn tool_home(&self) -> Option<&Path> {
        self.tool_home.as_deref()
    }

    /// The executable to launch. Without a tool home the runner resolves it from the `PATH`.
    pub fn executable_path(&self) -> PathBuf {
        let executable = self.build_tool.executable_name();
        match &self.tool_home {
            Some(home) => home.join("bin").join(executable),
            None => PathBuf::from(executable),
        }
    }
}

impl ScenarioDefinition for CommandLineScenarioDefinition {
    fn common(&self) -> &ScenarioCommon {
        &self.common
    }

    fn display_name(&self) -> String {
        format!("{} using {}", self.name(), self.build_tool)
    }

    fn profile_name(&self) -> String {
        format!("{}-{}", self.name(), self.build_tool.config_key())
    }

    fn build_tool_display_name(&self) -> String {
        self.build_tool.to_string()
    }

    fn tasks_display_name(&self) -> String {
        self.targets.join(" ")
    }

    fn print_detail(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "  Targets: {}", format_list(&self.targets))?;
        if let Some(home) = &self.tool_home {
            writeln!(out, "  {} home: {}", self.build_tool, home.display())?;
        }

        Ok(())
    }
}

#[derive(Debug)]
pub struct CommandLineScenarioDefinitionBuilder {
    common: ScenarioCommonBuilder,
    build_tool: BuildTool,
    targets: Vec<String>,
    tool_home: Option<PathBuf>,
}

impl CommandLineScenarioDefinitionBuilder {
    pub fn new(name: &str, build_tool: BuildTool) -> Self {
        Self {
            common: ScenarioCommonBuilder::new(name),
            build_tool,
            targets: Vec::new(),
            tool_home: None,
        }
    }

    pub fn with_targets<S: Into<String>>(mut self, targets: impl IntoIterator<Item = S>) -> Self {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tool_home(mut self, tool_home: impl Into<PathBuf>) -> Self {
        self.tool_home = Some(tool_home.into());
        self
    }

    pub fn with_build_mutator(mut self, factory: BuildMutatorFactory) -> Self {
        self.common.set_build_mutator(factory);
        self
    }

    pub fn with_warm_up_count(mut self, warm_up_count: u32) -> Self {
        self.common.set_warm_up_count(warm_up_count);
        self
    }

    pub fn with_build_count(mut self, build_count: u32) -> Self {
        self.common.set_build_count(build_count);
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.common.set_output_dir(output_dir.into());
        self
    }

    pub fn build(self) -> ScenarioConfigResult<CommandLineScenarioDefinition> {
        Ok(CommandLineScenarioDefinition {
            common: self.common.build(DEFAULT_COMMAND_LINE_WARM_UP_COUNT)?,
            build_tool: self.build_tool,
            targets: self.targets,
            tool_home: self.tool_home,
        })
    }
}
