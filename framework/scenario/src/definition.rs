use std::io::Write;
use std::path::{Path, PathBuf};

use build_profiler_core::prelude::{
    BuildMutator, BuildMutatorFactory, MutatorResult, ScenarioConfigError, ScenarioConfigResult,
};
use itertools::Itertools;

/// Number of measured builds when a scenario does not say otherwise.
pub const DEFAULT_BUILD_COUNT: u32 = 10;

/// The part of a scenario definition that every build tool family shares.
///
/// Only constructed through the variant builders, which validate it.
#[derive(Debug, Clone)]
pub struct ScenarioCommon {
    name: String,
    build_mutator_factory: BuildMutatorFactory,
    warm_up_count: u32,
    build_count: u32,
    output_dir: PathBuf,
}

impl ScenarioCommon {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build_mutator_factory(&self) -> &BuildMutatorFactory {
        &self.build_mutator_factory
    }

    pub fn warm_up_count(&self) -> u32 {
        self.warm_up_count
    }

    pub fn build_count(&self) -> u32 {
        self.build_count
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Collects the shared fields for the variant builders.
#[derive(Debug)]
pub(crate) struct ScenarioCommonBuilder {
    name: String,
    build_mutator_factory: Option<BuildMutatorFactory>,
    warm_up_count: Option<u32>,
    build_count: Option<u32>,
    output_dir: Option<PathBuf>,
}

impl ScenarioCommonBuilder {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            build_mutator_factory: None,
            warm_up_count: None,
            build_count: None,
            output_dir: None,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_build_mutator(&mut self, factory: BuildMutatorFactory) {
        self.build_mutator_factory = Some(factory);
    }

    pub(crate) fn set_warm_up_count(&mut self, warm_up_count: u32) {
        self.warm_up_count = Some(warm_up_count);
    }

    pub(crate) fn set_build_count(&mut self, build_count: u32) {
        self.build_count = Some(build_count);
    }

    pub(crate) fn set_output_dir(&mut self, output_dir: PathBuf) {
        self.output_dir = Some(output_dir);
    }

    pub(crate) fn build(self, default_warm_up_count: u32) -> ScenarioConfigResult<ScenarioCommon> {
        if self.name.trim().is_empty() {
            return Err(ScenarioConfigError::EmptyName);
        }

        let build_count = self.build_count.unwrap_or(DEFAULT_BUILD_COUNT);
        if build_count < 1 {
            return Err(ScenarioConfigError::InvalidBuildCount {
                scenario: self.name,
                build_count,
            });
        }

        let output_dir = self
            .output_dir
            .ok_or_else(|| ScenarioConfigError::MissingField {
                scenario: self.name.clone(),
                field: "output-dir",
            })?;

        Ok(ScenarioCommon {
            name: self.name,
            build_mutator_factory: self.build_mutator_factory.unwrap_or_default(),
            warm_up_count: self.warm_up_count.unwrap_or(default_warm_up_count),
            build_count,
            output_dir,
        })
    }
}

/// A fully parameterized benchmark experiment against one build tool.
///
/// Definitions are immutable once built and are queried by the runner for every iteration, so
/// everything here is a cheap read except [ScenarioDefinition::build_mutator].
pub trait ScenarioDefinition: Send + Sync {
    /// The fields shared by every build tool family.
    fn common(&self) -> &ScenarioCommon;

    /// The identifier for this scenario, unique within a run set.
    fn name(&self) -> &str {
        self.common().name()
    }

    /// Label shown to people. Defaults to the name.
    fn display_name(&self) -> String {
        self.name().to_string()
    }

    /// Identifier used in file names and reports.
    ///
    /// Must differ between definitions of the same scenario against different build tool
    /// versions.
    fn profile_name(&self) -> String;

    /// Short label for the build tool, used as a column value in tabular reports.
    fn build_tool_display_name(&self) -> String;

    /// The measured tasks joined by a space, or an empty string when there are none.
    fn tasks_display_name(&self) -> String;

    /// Create a fresh mutator for a run of this scenario.
    ///
    /// Every call produces an independent instance. Errors from the factory are returned as they
    /// are so the runner can decide whether to skip this scenario or abort.
    fn build_mutator(&self) -> MutatorResult<Box<dyn BuildMutator>> {
        let mutator = self.common().build_mutator_factory().create()?;
        log::debug!("Created mutator '{}' for scenario {}", mutator, self.name());
        Ok(mutator)
    }

    fn warm_up_count(&self) -> u32 {
        self.common().warm_up_count()
    }

    fn build_count(&self) -> u32 {
        self.common().build_count()
    }

    fn output_dir(&self) -> &Path {
        self.common().output_dir()
    }

    /// Write the build tool specific lines of the scenario summary.
    ///
    /// Nothing is written by default.
    fn print_detail(&self, _out: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }

    /// Write the full human readable summary of this scenario.
    ///
    /// This creates a mutator to describe it, so fails if the mutator factory does.
    fn print_to(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let mutator = self.build_mutator()?;

        writeln!(out)?;
        writeln!(out, "Scenario: {}", self.display_name())?;
        self.print_detail(out)?;
        writeln!(out, "  Build changes: {}", mutator)?;
        writeln!(out, "  Warm-ups: {}", self.warm_up_count())?;
        writeln!(out, "  Builds: {}", self.build_count())?;

        Ok(())
    }
}

/// Render a sequence the way scenario summaries show lists, e.g. `[clean, build]`.
pub(crate) fn format_list(items: &[String]) -> String {
    format!("[{}]", items.iter().join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_defaults() {
        let mut builder = ScenarioCommonBuilder::new("help");
        builder.set_output_dir(PathBuf::from("out/help"));

        let common = builder.build(3).unwrap();
        assert_eq!("help", common.name());
        assert_eq!(3, common.warm_up_count());
        assert_eq!(DEFAULT_BUILD_COUNT, common.build_count());
        assert_eq!(Path::new("out/help"), common.output_dir());
    }

    #[test]
    fn reject_zero_builds() {
        let mut builder = ScenarioCommonBuilder::new("help");
        builder.set_output_dir(PathBuf::from("out/help"));
        builder.set_build_count(0);

        let err = builder.build(0).unwrap_err();
        assert!(matches!(
            err,
            ScenarioConfigError::InvalidBuildCount { build_count: 0, .. }
        ));
    }

    #[test]
    fn require_output_dir() {
        let err = ScenarioCommonBuilder::new("help").build(0).unwrap_err();
        assert!(matches!(
            err,
            ScenarioConfigError::MissingField {
                field: "output-dir",
                ..
            }
        ));
    }

    #[test]
    fn reject_blank_name() {
        let mut builder = ScenarioCommonBuilder::new(" ");
        builder.set_output_dir(PathBuf::from("out"));
        assert!(matches!(
            builder.build(0),
            Err(ScenarioConfigError::EmptyName)
        ));
    }

    #[test]
    fn format_lists() {
        assert_eq!("[]", format_list(&[]));
        assert_eq!(
            "[clean, build]",
            format_list(&["clean".to_string(), "build".to_string()])
        );
    }
}
