use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sha3::Digest;
use std::collections::HashMap;
use std::io::{BufRead, Read, Write};
use std::path::PathBuf;

/// Summary of a scenario definition, as recorded next to its results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioSummary {
    /// The name of the scenario
    pub scenario_name: String,
    /// The label shown to people, usually including the build tool version
    pub display_name: String,
    /// The file system safe name used for the scenario's reports
    ///
    /// Unique for each build tool version of the same scenario.
    pub profile_name: String,
    /// The build tool, or build tool version, that the scenario ran against
    pub build_tool: String,
    /// The measured tasks, joined by a space
    pub tasks: String,
    /// The number of warm-up builds
    ///
    /// Warm-ups are measured but excluded from the results.
    pub warm_up_count: u32,
    /// The number of measured builds
    pub build_count: u32,
    /// How the build tool was invoked
    ///
    /// Only set for build tools with more than one way to invoke them.
    pub invocation: Option<String>,
    /// Extra arguments passed to the build tool
    pub build_args: Vec<String>,
    /// System properties set for the build
    pub system_properties: HashMap<String, String>,
    /// Description of the mutator applied between builds
    pub build_mutator: String,
}

impl ScenarioSummary {
    /// Create a new scenario summary
    pub fn new(
        scenario_name: String,
        display_name: String,
        profile_name: String,
        build_tool: String,
        tasks: String,
        warm_up_count: u32,
        build_count: u32,
    ) -> Self {
        Self {
            scenario_name,
            display_name,
            profile_name,
            build_tool,
            tasks,
            warm_up_count,
            build_count,
            invocation: None,
            build_args: Vec::with_capacity(0),
            system_properties: HashMap::with_capacity(0),
            build_mutator: "none".to_string(),
        }
    }

    /// Set how the build tool was invoked
    pub fn set_invocation(&mut self, invocation: String) {
        self.invocation = Some(invocation);
    }

    /// Set the extra build arguments
    pub fn set_build_args(&mut self, build_args: Vec<String>) {
        self.build_args = build_args;
    }

    /// Add a system property
    pub fn add_system_property(&mut self, key: String, value: String) {
        self.system_properties.insert(key, value);
    }

    /// Set the mutator description
    pub fn set_build_mutator(&mut self, build_mutator: String) {
        self.build_mutator = build_mutator;
    }

    /// Compute a fingerprint for this scenario summary
    ///
    /// The fingerprint is intended to identify the experiment, so that results from runs of the
    /// same experiment can be compared. It uses the
    ///     - Scenario name
    ///     - Build tool
    ///     - Tasks
    ///     - Warm-up and build counts
    ///     - Invocation
    ///     - Build arguments
    ///     - System properties
    ///     - Build mutator
    ///
    /// The fingerprint is computed using [sha3::Sha3_256].
    pub fn fingerprint(&self) -> String {
        let mut hasher = sha3::Sha3_256::new();
        Digest::update(&mut hasher, self.scenario_name.as_bytes());
        Digest::update(&mut hasher, self.build_tool.as_bytes());
        Digest::update(&mut hasher, self.tasks.as_bytes());
        Digest::update(&mut hasher, self.warm_up_count.to_le_bytes());
        Digest::update(&mut hasher, self.build_count.to_le_bytes());
        if let Some(invocation) = &self.invocation {
            Digest::update(&mut hasher, invocation.as_bytes());
        }
        self.build_args.iter().for_each(|arg| {
            Digest::update(&mut hasher, arg.as_bytes());
        });
        self.system_properties
            .iter()
            .sorted_by_key(|(k, _)| k.to_owned())
            .for_each(|(k, v)| {
                Digest::update(&mut hasher, k.as_bytes());
                Digest::update(&mut hasher, v.as_bytes());
            });
        Digest::update(&mut hasher, self.build_mutator.as_bytes());

        format!("{:x}", hasher.finalize())
    }
}

/// Append the scenario summary to a file
///
/// The summary will be serialized to JSON and output as a single line followed by a newline. The
/// recommended file extension is `.jsonl`.
pub fn append_scenario_summary(summary: ScenarioSummary, path: PathBuf) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;
    store_scenario_summary(summary, &mut file)?;
    file.write_all("\n".as_bytes())?;
    Ok(())
}

/// Serialize the scenario summary to a writer
pub fn store_scenario_summary<W: Write>(
    summary: ScenarioSummary,
    writer: &mut W,
) -> anyhow::Result<()> {
    serde_json::to_writer(writer, &summary)?;
    Ok(())
}

/// Load a scenario summary from a reader
pub fn load_scenario_summary<R: Read>(reader: R) -> anyhow::Result<ScenarioSummary> {
    let reader = std::io::BufReader::new(reader);
    let summary: ScenarioSummary = serde_json::from_reader(reader)?;
    Ok(summary)
}

/// Load scenario summaries from a file
///
/// The file should contain one JSON object per line. This is the format produced by
/// [append_scenario_summary].
pub fn load_scenario_summaries(path: PathBuf) -> anyhow::Result<Vec<ScenarioSummary>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut summaries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let summary: ScenarioSummary = serde_json::from_str(&line)?;
        summaries.push(summary);
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, build_tool: &str) -> ScenarioSummary {
        ScenarioSummary::new(
            name.to_string(),
            format!("{name} using {build_tool}"),
            format!("{name}-{build_tool}"),
            build_tool.to_string(),
            "assemble".to_string(),
            2,
            5,
        )
    }

    #[test]
    fn fingerprint_is_stable_across_property_order() {
        let mut first = summary("assemble", "8.5");
        first.add_system_property("a".to_string(), "1".to_string());
        first.add_system_property("b".to_string(), "2".to_string());

        let mut second = summary("assemble", "8.5");
        second.add_system_property("b".to_string(), "2".to_string());
        second.add_system_property("a".to_string(), "1".to_string());

        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn fingerprint_changes_with_build_tool() {
        assert_ne!(
            summary("assemble", "8.5").fingerprint(),
            summary("assemble", "8.6").fingerprint()
        );
    }

    #[test]
    fn append_and_load_summaries() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("scenarios.jsonl");

        let mut first = summary("assemble", "8.5");
        first.set_invocation("Tooling API".to_string());
        first.set_build_args(vec!["--parallel".to_string()]);
        let second = summary("assemble", "8.6");

        append_scenario_summary(first.clone(), path.clone()).unwrap();
        append_scenario_summary(second.clone(), path.clone()).unwrap();

        let loaded = load_scenario_summaries(path).unwrap();
        assert_eq!(vec![first, second], loaded);
    }

    #[test]
    fn store_and_load_single_summary() {
        let mut summary = summary("help", "Maven");
        summary.set_build_mutator("touch(Main.java)".to_string());

        let mut buffer = Vec::new();
        store_scenario_summary(summary.clone(), &mut buffer).unwrap();

        let loaded = load_scenario_summary(buffer.as_slice()).unwrap();
        assert_eq!(summary, loaded);
    }
}
