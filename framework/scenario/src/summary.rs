use build_profiler_core::prelude::MutatorResult;
use build_profiler_summary_model::ScenarioSummary;

use crate::definition::ScenarioDefinition;
use crate::scenario::Scenario;

/// Describe a scenario for result reporters.
///
/// A mutator is created to describe the build changes, so this fails when the mutator factory
/// does.
pub fn scenario_summary(scenario: &Scenario) -> MutatorResult<ScenarioSummary> {
    let mut summary = ScenarioSummary::new(
        scenario.name().to_string(),
        scenario.display_name(),
        scenario.profile_name(),
        scenario.build_tool_display_name(),
        scenario.tasks_display_name(),
        scenario.warm_up_count(),
        scenario.build_count(),
    );
    summary.set_build_mutator(scenario.build_mutator()?.to_string());

    if let Some(gradle) = scenario.as_gradle() {
        summary.set_invocation(gradle.invoker().to_string());
        summary.set_build_args(gradle.gradle_args().to_vec());
        for (key, value) in gradle.system_properties() {
            summary.add_system_property(key.clone(), value.clone());
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use build_profiler_core::prelude::{
        BuildTool, BuildToolVersion, GradleBuildConfiguration, Invoker,
    };

    use super::*;
    use crate::command_line::CommandLineScenarioDefinitionBuilder;
    use crate::gradle::GradleScenarioDefinitionBuilder;

    #[test]
    fn summarize_gradle_scenario() {
        let scenario: Scenario = GradleScenarioDefinitionBuilder::new(
            "assemble",
            Invoker::Cli,
            GradleBuildConfiguration::new(BuildToolVersion::new("8.5").unwrap(), "/opt/gradle"),
        )
        .with_tasks(["assemble"])
        .with_gradle_args(["--offline"])
        .add_system_property("org.gradle.caching", "true")
        .with_warm_up_count(2)
        .with_build_count(5)
        .with_output_dir("out/assemble")
        .build()
        .unwrap()
        .into();

        let summary = scenario_summary(&scenario).unwrap();

        assert_eq!("assemble", summary.scenario_name);
        assert_eq!("assemble using 8.5", summary.display_name);
        assert_eq!("assemble-8.5", summary.profile_name);
        assert_eq!("8.5", summary.build_tool);
        assert_eq!("assemble", summary.tasks);
        assert_eq!(2, summary.warm_up_count);
        assert_eq!(5, summary.build_count);
        assert_eq!(Some("`gradle` command".to_string()), summary.invocation);
        assert_eq!(vec!["--offline".to_string()], summary.build_args);
        assert_eq!("true", summary.system_properties["org.gradle.caching"]);
        assert_eq!("none", summary.build_mutator);
    }

    #[test]
    fn summarize_command_line_scenario() {
        let scenario: Scenario = CommandLineScenarioDefinitionBuilder::new("build", BuildTool::Bazel)
            .with_targets(["//..."])
            .with_output_dir("out/build")
            .build()
            .unwrap()
            .into();

        let summary = scenario_summary(&scenario).unwrap();

        assert_eq!("Bazel", summary.build_tool);
        assert_eq!("//...", summary.tasks);
        assert_eq!(None, summary.invocation);
        assert!(summary.build_args.is_empty());
    }
}
