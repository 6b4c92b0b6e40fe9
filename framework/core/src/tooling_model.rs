use crate::error::{ScenarioConfigError, ScenarioConfigResult};

/// A typed result model to request from the Tooling API instead of, or alongside, running tasks.
///
/// Identified by the fully qualified name of the model type, for example
/// `org.gradle.tooling.model.idea.IdeaProject`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{type_name}")]
pub struct ToolingModel {
    type_name: String,
}

impl ToolingModel {
    pub fn new(type_name: impl Into<String>) -> ScenarioConfigResult<Self> {
        let type_name = type_name.into();
        if type_name.trim().is_empty() {
            return Err(ScenarioConfigError::EmptyToolingModel);
        }

        Ok(Self { type_name })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The unqualified type name.
    pub fn simple_name(&self) -> &str {
        self.type_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_strips_package() {
        let model = ToolingModel::new("org.gradle.tooling.model.idea.IdeaProject").unwrap();
        assert_eq!("IdeaProject", model.simple_name());
        assert_eq!(
            "org.gradle.tooling.model.idea.IdeaProject",
            model.to_string()
        );

        assert_eq!("Plain", ToolingModel::new("Plain").unwrap().simple_name());
    }

    #[test]
    fn blank_type_name_rejected() {
        assert!(matches!(
            ToolingModel::new(""),
            Err(ScenarioConfigError::EmptyToolingModel)
        ));
        assert!(matches!(
            ToolingModel::new("  "),
            Err(ScenarioConfigError::EmptyToolingModel)
        ));
    }
}
