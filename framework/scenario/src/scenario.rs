use std::io::Write;
use std::path::Path;

use build_profiler_core::prelude::{BuildMutator, MutatorResult};

use crate::command_line::CommandLineScenarioDefinition;
use crate::definition::{ScenarioCommon, ScenarioDefinition};
use crate::gradle::GradleScenarioDefinition;

/// Any scenario definition, tagged by build tool family.
#[derive(Debug, Clone)]
pub enum Scenario {
    Gradle(GradleScenarioDefinition),
    CommandLine(CommandLineScenarioDefinition),
}

impl Scenario {
    pub fn definition(&self) -> &dyn ScenarioDefinition {
        match self {
            Scenario::Gradle(definition) => definition,
            Scenario::CommandLine(definition) => definition,
        }
    }

    pub fn as_gradle(&self) -> Option<&GradleScenarioDefinition> {
        match self {
            Scenario::Gradle(definition) => Some(definition),
            _ => None,
        }
    }

    pub fn as_command_line(&self) -> Option<&CommandLineScenarioDefinition> {
        match self {
            Scenario::CommandLine(definition) => Some(definition),
            _ => None,
        }
    }
}

impl From<GradleScenarioDefinition> for Scenario {
    fn from(definition: GradleScenarioDefinition) -> Self {
        Scenario::Gradle(definition)
    }
}

impl From<CommandLineScenarioDefinition> for Scenario {
    fn from(definition: CommandLineScenarioDefinition) -> Self {
        Scenario::CommandLine(definition)
    }
}

impl ScenarioDefinition for Scenario {
    fn common(&self) -> &ScenarioCommon {
        self.definition().common()
    }

    fn display_name(&self) -> String {
        self.definition().display_name()
    }

    fn profile_name(&self) -> String {
        self.definition().profile_name()
    }

    fn build_tool_display_name(&self) -> String {
        self.definition().build_tool_display_name()
    }

    fn tasks_display_name(&self) -> String {
        self.definition().tasks_display_name()
    }

    fn build_mutator(&self) -> MutatorResult<Box<dyn BuildMutator>> {
        self.definition().build_mutator()
    }

    fn output_dir(&self) -> &Path {
        self.definition().output_dir()
    }

    fn print_detail(&self, out: &mut dyn Write) -> std::io::Result<()> {
        self.definition().print_detail(out)
    }
}

#[cfg(test)]
mod tests {
    use build_profiler_core::prelude::{
        BuildTool, BuildToolVersion, GradleBuildConfiguration, Invoker,
    };

    use super::*;
    use crate::command_line::CommandLineScenarioDefinitionBuilder;
    use crate::gradle::GradleScenarioDefinitionBuilder;

    fn gradle_scenario() -> Scenario {
        GradleScenarioDefinitionBuilder::new(
            "assemble",
            Invoker::ToolingApi,
            GradleBuildConfiguration::new(BuildToolVersion::new("8.5").unwrap(), "/opt/gradle"),
        )
        .with_tasks(["assemble"])
        .with_output_dir("out/assemble")
        .build()
        .unwrap()
        .into()
    }

    #[test]
    fn delegates_to_variant() {
        let scenario = gradle_scenario();

        assert_eq!("assemble", scenario.name());
        assert_eq!("assemble using 8.5", scenario.display_name());
        assert_eq!("assemble-8.5", scenario.profile_name());
        assert_eq!("8.5", scenario.build_tool_display_name());
        assert_eq!(Path::new("out/assemble"), scenario.output_dir());
        assert!(scenario.as_gradle().is_some());
        assert!(scenario.as_command_line().is_none());

        let mut out = Vec::new();
        scenario.print_detail(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("  Gradle 8.5"));
    }

    #[test]
    fn command_line_variant() {
        let scenario: Scenario = CommandLineScenarioDefinitionBuilder::new("build", BuildTool::Buck)
            .with_targets(["//:all"])
            .with_output_dir("out/build")
            .build()
            .unwrap()
            .into();

        assert_eq!("build-buck", scenario.profile_name());
        assert_eq!("//:all", scenario.tasks_display_name());
        assert!(scenario.as_command_line().is_some());
    }

    #[test]
    fn read_from_many_threads() {
        let scenario = gradle_scenario();

        std::thread::scope(|s| {
            let handles = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        scenario.build_mutator().unwrap();
                        scenario.display_name()
                    })
                })
                .collect::<Vec<_>>();

            for handle in handles {
                assert_eq!("assemble using 8.5", handle.join().unwrap());
            }
        });
    }
}
