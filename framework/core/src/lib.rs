mod build_configuration;
mod error;
mod invoker;
mod mutator;
mod tooling_model;

pub mod prelude {
    pub use crate::build_configuration::{BuildTool, BuildToolVersion, GradleBuildConfiguration};
    pub use crate::error::{ScenarioConfigError, ScenarioConfigResult};
    pub use crate::invoker::Invoker;
    pub use crate::mutator::{
        BuildContext, BuildMutator, BuildMutatorFactory, CompositeBuildMutator, MutatorResult,
        NoOpBuildMutator, Phase,
    };
    pub use crate::tooling_model::ToolingModel;
}
