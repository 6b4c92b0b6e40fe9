use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use build_profiler_core::prelude::{
    BuildMutatorFactory, BuildTool, GradleBuildConfiguration, Invoker, ScenarioConfigError,
    ScenarioConfigResult, ToolingModel,
};
use serde::Deserialize;

use crate::command_line::CommandLineScenarioDefinitionBuilder;
use crate::definition::ScenarioDefinition;
use crate::gradle::GradleScenarioDefinitionBuilder;
use crate::scenario::Scenario;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    #[serde(default, rename = "scenario")]
    scenarios: Vec<ScenarioSpec>,
}

/// One `[[scenario]]` table as written in a scenario file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ScenarioSpec {
    name: String,
    build_tool: Option<String>,
    run_using: Option<Invoker>,
    #[serde(default)]
    tasks: Vec<String>,
    #[serde(default)]
    cleanup_tasks: Vec<String>,
    #[serde(default)]
    gradle_args: Vec<String>,
    #[serde(default)]
    system_properties: BTreeMap<String, String>,
    tooling_model: Option<String>,
    #[serde(default)]
    versions: Vec<String>,
    #[serde(default)]
    targets: Vec<String>,
    warm_ups: Option<u32>,
    iterations: Option<u32>,
    #[serde(default)]
    mutators: Vec<String>,
}

/// Turns a TOML scenario file into scenario definitions.
///
/// Version detection and mutator implementations live outside this crate, so the loader has to
/// be told which Gradle installations and which mutators are available before loading.
#[derive(Debug)]
pub struct ScenarioLoader {
    output_dir: PathBuf,
    installations: Vec<GradleBuildConfiguration>,
    mutators: HashMap<String, BuildMutatorFactory>,
    tool_homes: HashMap<BuildTool, PathBuf>,
}

impl ScenarioLoader {
    /// Each scenario gets its own directory under `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            installations: Vec::new(),
            mutators: HashMap::new(),
            tool_homes: HashMap::new(),
        }
    }

    /// Make a Gradle installation available. Scenarios that do not list `versions` run against
    /// every installation, in the order they were added.
    pub fn with_installation(mut self, installation: GradleBuildConfiguration) -> Self {
        self.installations.push(installation);
        self
    }

    /// Register a mutator that scenarios can refer to by `key` in their `mutators` list.
    ///
    /// # Panics
    ///
    /// If a mutator is already registered under `key`.
    pub fn with_mutator(mut self, key: &str, factory: BuildMutatorFactory) -> Self {
        if self.mutators.insert(key.to_string(), factory).is_some() {
            panic!("Mutator [{}] is already registered", key);
        }

        self
    }

    pub fn with_tool_home(mut self, build_tool: BuildTool, tool_home: impl Into<PathBuf>) -> Self {
        self.tool_homes.insert(build_tool, tool_home.into());
        self
    }

    pub fn load_from_file(&self, path: impl AsRef<Path>) -> ScenarioConfigResult<Vec<Scenario>> {
        let path = path.as_ref();
        log::debug!("Reading scenario file {}", path.display());

        let content =
            std::fs::read_to_string(path).map_err(|source| ScenarioConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        self.load_from_str(&content)
    }

    /// Definitions are returned in file order, with one Gradle definition per version.
    pub fn load_from_str(&self, content: &str) -> ScenarioConfigResult<Vec<Scenario>> {
        let file: ScenarioFile = toml::from_str(content)?;

        let mut names = HashSet::new();
        let mut scenarios = Vec::new();
        for spec in file.scenarios {
            if !names.insert(spec.name.clone()) {
                return Err(ScenarioConfigError::DuplicateScenario(spec.name));
            }

            scenarios.extend(self.load_scenario(spec)?);
        }

        check_output_dirs(&scenarios)?;

        log::info!("Loaded {} scenario definitions", scenarios.len());
        Ok(scenarios)
    }

    fn load_scenario(&self, spec: ScenarioSpec) -> ScenarioConfigResult<Vec<Scenario>> {
        check_name(&spec.name)?;

        match spec.build_tool.as_deref() {
            None | Some("gradle") => self.load_gradle_scenarios(spec),
            Some(build_tool) => {
                let build_tool = build_tool.parse::<BuildTool>()?;
                Ok(vec![self.load_command_line_scenario(spec, build_tool)?])
            }
        }
    }

    fn load_gradle_scenarios(&self, spec: ScenarioSpec) -> ScenarioConfigResult<Vec<Scenario>> {
        reject_field(&spec, "targets", !spec.targets.is_empty(), "Gradle")?;

        if self.installations.is_empty() {
            return Err(ScenarioConfigError::NoInstallation {
                scenario: spec.name,
            });
        }

        let mut versions = HashSet::new();
        if let Some(version) = spec.versions.iter().find(|version| !versions.insert(*version)) {
            return Err(ScenarioConfigError::DuplicateVersion {
                scenario: spec.name.clone(),
                version: version.clone(),
            });
        }

        let installations = if spec.versions.is_empty() {
            self.installations.iter().collect::<Vec<_>>()
        } else {
            spec.versions
                .iter()
                .map(|version| {
                    self.installations
                        .iter()
                        .find(|installation| installation.version().as_str() == version.as_str())
                        .ok_or_else(|| ScenarioConfigError::UnknownVersion {
                            scenario: spec.name.clone(),
                            version: version.clone(),
                        })
                })
                .collect::<ScenarioConfigResult<Vec<_>>>()?
        };

        let build_mutator = self.build_mutator(&spec)?;
        let tooling_model = spec
            .tooling_model
            .as_deref()
            .map(ToolingModel::new)
            .transpose()?;
        let invoker = spec.run_using.unwrap_or_default();
        let multiple_versions = installations.len() > 1;

        let mut scenarios = Vec::with_capacity(installations.len());
        for installation in installations {
            let mut output_dir = self.output_dir.join(&spec.name);
            if multiple_versions {
                output_dir = output_dir.join(installation.version().as_str());
            }

            let mut builder =
                GradleScenarioDefinitionBuilder::new(&spec.name, invoker, installation.clone())
                    .with_tasks(spec.tasks.iter().cloned())
                    .with_cleanup_tasks(spec.cleanup_tasks.iter().cloned())
                    .with_gradle_args(spec.gradle_args.iter().cloned())
                    .with_system_properties(spec.system_properties.clone())
                    .with_build_mutator(build_mutator.clone())
                    .with_output_dir(output_dir);
            if let Some(tooling_model) = &tooling_model {
                builder = builder.with_tooling_model(tooling_model.clone());
            }
            if let Some(warm_ups) = spec.warm_ups {
                builder = builder.with_warm_up_count(warm_ups);
            }
            if let Some(iterations) = spec.iterations {
                builder = builder.with_build_count(iterations);
            }

            let scenario = builder.build()?;
            log::debug!("Loaded scenario {}", scenario.display_name());
            scenarios.push(Scenario::Gradle(scenario));
        }

        Ok(scenarios)
    }

    fn load_command_line_scenario(
        &self,
        spec: ScenarioSpec,
        build_tool: BuildTool,
    ) -> ScenarioConfigResult<Scenario> {
        let tool = build_tool.to_string();
        reject_field(&spec, "tasks", !spec.tasks.is_empty(), &tool)?;
        reject_field(&spec, "run-using", spec.run_using.is_some(), &tool)?;
        reject_field(
            &spec,
            "cleanup-tasks",
            !spec.cleanup_tasks.is_empty(),
            &tool,
        )?;
        reject_field(&spec, "gradle-args", !spec.gradle_args.is_empty(), &tool)?;
        reject_field(
            &spec,
            "system-properties",
            !spec.system_properties.is_empty(),
            &tool,
        )?;
        reject_field(
            &spec,
            "tooling-model",
            spec.tooling_model.is_some(),
            &tool,
        )?;
        reject_field(&spec, "versions", !spec.versions.is_empty(), &tool)?;

        let mut builder = CommandLineScenarioDefinitionBuilder::new(&spec.name, build_tool)
            .with_targets(spec.targets.iter().cloned())
            .with_build_mutator(self.build_mutator(&spec)?)
            .with_output_dir(self.output_dir.join(&spec.name));
        if let Some(tool_home) = self.tool_homes.get(&build_tool) {
            builder = builder.with_tool_home(tool_home.clone());
        }
        if let Some(warm_ups) = spec.warm_ups {
            builder = builder.with_warm_up_count(warm_ups);
        }
        if let Some(iterations) = spec.iterations {
            builder = builder.with_build_count(iterations);
        }

        let scenario = builder.build()?;
        log::debug!("Loaded scenario {}", scenario.display_name());
        Ok(Scenario::CommandLine(scenario))
    }

    fn build_mutator(&self, spec: &ScenarioSpec) -> ScenarioConfigResult<BuildMutatorFactory> {
        let factories = spec
            .mutators
            .iter()
            .map(|key| {
                self.mutators
                    .get(key)
                    .cloned()
                    .ok_or_else(|| ScenarioConfigError::UnknownMutator {
                        scenario: spec.name.clone(),
                        mutator: key.clone(),
                    })
            })
            .collect::<ScenarioConfigResult<Vec<_>>>()?;

        Ok(BuildMutatorFactory::composite(factories))
    }
}

fn reject_field(
    spec: &ScenarioSpec,
    field: &'static str,
    present: bool,
    build_tool: &str,
) -> ScenarioConfigResult<()> {
    if present {
        return Err(ScenarioConfigError::UnsupportedField {
            scenario: spec.name.clone(),
            field,
            build_tool: build_tool.to_string(),
        });
    }

    Ok(())
}

/// Names become directories under the loader's output dir, so each must be one plain path
/// component.
fn check_name(name: &str) -> ScenarioConfigResult<()> {
    if name.trim().is_empty() {
        return Err(ScenarioConfigError::EmptyName);
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(component)), None) if component == name => Ok(()),
        _ => Err(ScenarioConfigError::InvalidName {
            scenario: name.to_string(),
        }),
    }
}

fn check_output_dirs(scenarios: &[Scenario]) -> ScenarioConfigResult<()> {
    let mut owners: HashMap<&Path, &str> = HashMap::new();
    for scenario in scenarios {
        if let Some(first) = owners.insert(scenario.output_dir(), scenario.name()) {
            return Err(ScenarioConfigError::DuplicateOutputDir {
                first: first.to_string(),
                second: scenario.name().to_string(),
                dir: scenario.output_dir().to_path_buf(),
            });
        }
    }

    Ok(())
}

/// Pick the scenarios to run by name, in the order the names are given.
///
/// All scenarios are returned when no names are given.
pub fn select_scenarios(
    scenarios: &[Scenario],
    names: &[String],
) -> ScenarioConfigResult<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(scenarios.to_vec());
    }

    let mut selected = Vec::new();
    for name in names {
        let before = selected.len();
        selected.extend(
            scenarios
                .iter()
                .filter(|scenario| scenario.name() == name.as_str())
                .cloned(),
        );
        if selected.len() == before {
            return Err(ScenarioConfigError::UnknownScenario(name.clone()));
        }
    }

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maven(name: &str, output_dir: &str) -> Scenario {
        CommandLineScenarioDefinitionBuilder::new(name, BuildTool::Maven)
            .with_output_dir(output_dir)
            .build()
            .unwrap()
            .into()
    }

    #[test]
    fn single_component_names_only() {
        check_name("assemble").unwrap();
        check_name("sync 8.x").unwrap();

        for name in ["/etc", "../victim", "a/b", "..", ".", "a/."] {
            let err = check_name(name).unwrap_err();
            assert!(
                matches!(err, ScenarioConfigError::InvalidName { ref scenario } if scenario == name),
                "{name} should be rejected"
            );
        }

        assert!(matches!(
            check_name(" ").unwrap_err(),
            ScenarioConfigError::EmptyName
        ));
    }

    #[test]
    fn shared_output_dir_rejected() {
        let err = check_output_dirs(&[maven("first", "out/a"), maven("second", "out/a")])
            .unwrap_err();

        assert_eq!(
            "Scenarios 'first' and 'second' share the output directory out/a",
            err.to_string()
        );

        check_output_dirs(&[maven("first", "out/a"), maven("second", "out/b")]).unwrap();
    }
}
