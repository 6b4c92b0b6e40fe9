use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use build_profiler_core::prelude::{
    BuildMutatorFactory, GradleBuildConfiguration, Invoker, ScenarioConfigError,
    ScenarioConfigResult, ToolingModel,
};

use crate::definition::{format_list, ScenarioCommon, ScenarioCommonBuilder, ScenarioDefinition};

/// A scenario that runs Gradle, either through its command line or through the Tooling API.
#[derive(Debug, Clone)]
pub struct GradleScenarioDefinition {
    common: ScenarioCommon,
    invoker: Invoker,
    build_configuration: GradleBuildConfiguration,
    tooling_model: Option<ToolingModel>,
    cleanup_tasks: Vec<String>,
    tasks: Vec<String>,
    gradle_args: Vec<String>,
    system_properties: BTreeMap<String, String>,
}

impl GradleScenarioDefinition {
    /// Extra arguments passed to Gradle verbatim.
    pub fn gradle_args(&self) -> &[String] {
        &self.gradle_args
    }

    pub fn invoker(&self) -> Invoker {
        self.invoker
    }

    /// The measured tasks, in the order they are requested.
    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    /// The model to fetch from the Tooling API, if any.
    pub fn tooling_model(&self) -> Option<&ToolingModel> {
        self.tooling_model.as_ref()
    }

    /// Tasks run before each build to reset state. They are not part of the measurement.
    pub fn cleanup_tasks(&self) -> &[String] {
        &self.cleanup_tasks
    }

    pub fn build_configuration(&self) -> &GradleBuildConfiguration {
        &self.build_configuration
    }

    /// System properties, iterated in key order.
    pub fn system_properties(&self) -> &BTreeMap<String, String> {
        &self.system_properties
    }
}

impl ScenarioDefinition for GradleScenarioDefinition {
    fn common(&self) -> &ScenarioCommon {
        &self.common
    }

    fn display_name(&self) -> String {
        format!(
            "{} using {}",
            self.name(),
            self.build_configuration.version()
        )
    }

    fn profile_name(&self) -> String {
        format!(
            "{}-{}",
            self.name(),
            self.build_configuration.version().as_str()
        )
    }

    fn build_tool_display_name(&self) -> String {
        self.build_configuration.version().to_string()
    }

    fn tasks_display_name(&self) -> String {
        self.tasks.join(" ")
    }

    // Report diffing depends on this exact order.
    fn print_detail(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            out,
            "  Gradle {} ({})",
            self.build_configuration.version(),
            self.build_configuration.gradle_home().display()
        )?;
        writeln!(out, "  Run using: {}", self.invoker)?;
        writeln!(out, "  Cleanup Tasks: {}", format_list(&self.cleanup_tasks))?;
        writeln!(out, "  Tasks: {}", format_list(&self.tasks))?;
        if let Some(tooling_model) = &self.tooling_model {
            writeln!(out, "  Tooling model: {}", tooling_model)?;
        }
        writeln!(out, "  Gradle args: {}", format_list(&self.gradle_args))?;
        if !self.system_properties.is_empty() {
            writeln!(out, "  System properties:")?;
            for (key, value) in &self.system_properties {
                writeln!(out, "    {}={}", key, value)?;
            }
        }

        Ok(())
    }
}

/// The builder for a [GradleScenarioDefinition].
///
/// Nothing is validated until [GradleScenarioDefinitionBuilder::build], which either binds every
/// field at once or fails with a [ScenarioConfigError].
#[derive(Debug)]
pub struct GradleScenarioDefinitionBuilder {
    common: ScenarioCommonBuilder,
    invoker: Invoker,
    build_configuration: GradleBuildConfiguration,
    tooling_model: Option<ToolingModel>,
    cleanup_tasks: Vec<String>,
    tasks: Vec<String>,
    gradle_args: Vec<String>,
    system_properties: BTreeMap<String, String>,
}

impl GradleScenarioDefinitionBuilder {
    pub fn new(name: &str, invoker: Invoker, build_configuration: GradleBuildConfiguration) -> Self {
        Self {
            common: ScenarioCommonBuilder::new(name),
            invoker,
            build_configuration,
            tooling_model: None,
            cleanup_tasks: Vec::new(),
            tasks: Vec::new(),
            gradle_args: Vec::new(),
            system_properties: BTreeMap::new(),
        }
    }

    pub fn with_tasks<S: Into<String>>(mut self, tasks: impl IntoIterator<Item = S>) -> Self {
        self.tasks = tasks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cleanup_tasks<S: Into<String>>(
        mut self,
        cleanup_tasks: impl IntoIterator<Item = S>,
    ) -> Self {
        self.cleanup_tasks = cleanup_tasks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_gradle_args<S: Into<String>>(
        mut self,
        gradle_args: impl IntoIterator<Item = S>,
    ) -> Self {
        self.gradle_args = gradle_args.into_iter().map(Into::into).collect();
        self
    }

    /// Set a system property. Setting the same key twice keeps the last value.
    pub fn add_system_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if let Some(previous) = self.system_properties.insert(key.clone(), value) {
            log::warn!(
                "System property '{}' for scenario {} replaced, previous value was '{}'",
                key,
                self.common.name(),
                previous
            );
        }
        self
    }

    pub fn with_system_properties(mut self, system_properties: BTreeMap<String, String>) -> Self {
        self.system_properties = system_properties;
        self
    }

    pub fn with_tooling_model(mut self, tooling_model: ToolingModel) -> Self {
        self.tooling_model = Some(tooling_model);
        self
    }

    pub fn with_build_mutator(mut self, factory: BuildMutatorFactory) -> Self {
        self.common.set_build_mutator(factory);
        self
    }

    /// Defaults to [Invoker::default_warm_up_count].
    pub fn with_warm_up_count(mut self, warm_up_count: u32) -> Self {
        self.common.set_warm_up_count(warm_up_count);
        self
    }

    /// Defaults to [crate::definition::DEFAULT_BUILD_COUNT]. Must be at least 1.
    pub fn with_build_count(mut self, build_count: u32) -> Self {
        self.common.set_build_count(build_count);
        self
    }

    /// Required.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.common.set_output_dir(output_dir.into());
        self
    }

    pub fn build(self) -> ScenarioConfigResult<GradleScenarioDefinition> {
        if let Some(tooling_model) = &self.tooling_model {
            if !self.invoker.supports_tooling_model() {
                return Err(ScenarioConfigError::ToolingModelNotSupported {
                    scenario: self.common.name().to_string(),
                    model: tooling_model.to_string(),
                    invoker: self.invoker.to_string(),
                });
            }
        }

        let common = self.common.build(self.invoker.default_warm_up_count())?;
        if common.warm_up_count() == 0 && self.invoker.reuses_daemon() {
            log::warn!(
                "Scenario {} has no warm-up builds, measurements will include daemon startup",
                common.name()
            );
        }

        Ok(GradleScenarioDefinition {
            common,
            invoker: self.invoker,
            build_configuration: self.build_configuration,
            tooling_model: self.tooling_model,
            cleanup_tasks: self.cleanup_tasks,
            tasks: self.tasks,
            gradle_args: self.gradle_args,
            system_properties: self.system_properties,
        })
    }
}
