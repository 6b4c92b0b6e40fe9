mod command_line;
mod definition;
mod gradle;
mod loader;
mod scenario;
mod summary;

pub mod prelude {
    pub use crate::command_line::{
        CommandLineScenarioDefinition, CommandLineScenarioDefinitionBuilder,
        DEFAULT_COMMAND_LINE_WARM_UP_COUNT,
    };
    pub use crate::definition::{ScenarioCommon, ScenarioDefinition, DEFAULT_BUILD_COUNT};
    pub use crate::gradle::{GradleScenarioDefinition, GradleScenarioDefinitionBuilder};
    pub use crate::loader::{select_scenarios, ScenarioLoader};
    pub use crate::scenario::Scenario;
    pub use crate::summary::scenario_summary;

    pub use build_profiler_core::prelude::*;
}
