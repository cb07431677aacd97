//! Declarative scenario configuration.
//!
//! One JSON document drives every scenario binary. The wire format is
//! section-per-scenario-family: `deadlock_livelock` (two-resource protocols)
//! and `starvation` (priority protocol), each with a `resources` map and a
//! `processes` list referencing resource keys. Parsing and validation are
//! separate from entity construction: a scenario is only ever built from a
//! section that has already passed [`PairSection::validate`] or
//! [`PrioritySection::validate`], so a bad document fails whole with no
//! partially constructed state.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, ValidationError};

/// Top-level configuration document, one section per scenario family.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Section driving both the deadlock and the livelock scenario.
    #[serde(default)]
    pub deadlock_livelock: Option<PairSection>,
    /// Section driving the starvation scenario.
    #[serde(default)]
    pub starvation: Option<PrioritySection>,
}

impl ConfigFile {
    /// Load and parse a configuration document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!("loaded configuration from '{}'", path.display());
        Self::from_json(&text)
    }

    /// Parse a configuration document from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// A lockable resource definition.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    /// Display name of the resource.
    pub name: String,
}

/// Section for the two-resource protocols (deadlock and livelock).
#[derive(Debug, Clone, Deserialize)]
pub struct PairSection {
    /// Resource definitions keyed by the names processes reference.
    pub resources: BTreeMap<String, ResourceDef>,
    /// Worker definitions, in the order the workers will be constructed.
    pub processes: Vec<PairProcessDef>,
}

impl PairSection {
    /// Check name contracts and referential integrity without building
    /// anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_resources(&self.resources)?;
        for (index, process) in self.processes.iter().enumerate() {
            if process.name.trim().is_empty() {
                return Err(ValidationError::EmptyWorkerName { index }.into());
            }
            for key in [&process.resource1, &process.resource2] {
                if !self.resources.contains_key(key) {
                    return Err(ConfigError::UnknownResource {
                        process: process.name.clone(),
                        key: key.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Worker definition for the deadlock/livelock section.
///
/// The two resource keys are given in the order the worker will acquire
/// them. Opposite orders across workers are what set up the hazard.
#[derive(Debug, Clone, Deserialize)]
pub struct PairProcessDef {
    /// Worker display name.
    pub name: String,
    /// Key of the resource acquired first.
    pub resource1: String,
    /// Key of the resource acquired second.
    pub resource2: String,
}

/// Section for the starvation protocol.
#[derive(Debug, Clone, Deserialize)]
pub struct PrioritySection {
    /// Resource definitions keyed by the names processes reference.
    pub resources: BTreeMap<String, ResourceDef>,
    /// Worker definitions, in the order the workers will be constructed.
    pub processes: Vec<PriorityProcessDef>,
}

impl PrioritySection {
    /// Check name contracts, referential integrity and priority bounds
    /// without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_resources(&self.resources)?;
        for (index, process) in self.processes.iter().enumerate() {
            if process.name.trim().is_empty() {
                return Err(ValidationError::EmptyWorkerName { index }.into());
            }
            if !self.resources.contains_key(&process.resource) {
                return Err(ConfigError::UnknownResource {
                    process: process.name.clone(),
                    key: process.resource.clone(),
                });
            }
            if process.priority < 1 {
                return Err(ValidationError::InvalidPriority {
                    process: process.name.clone(),
                    priority: process.priority,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Worker definition for the starvation section.
#[derive(Debug, Clone, Deserialize)]
pub struct PriorityProcessDef {
    /// Worker display name.
    pub name: String,
    /// Key of the shared resource.
    pub resource: String,
    /// Scheduling priority; 1 is highest, larger values always defer.
    pub priority: u32,
}

fn validate_resources(resources: &BTreeMap<String, ResourceDef>) -> Result<(), ConfigError> {
    for (key, def) in resources {
        if def.name.trim().is_empty() {
            return Err(ValidationError::EmptyResourceName { key: key.clone() }.into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference_document() -> serde_json::Value {
        json!({
            "deadlock_livelock": {
                "resources": {
                    "resource_a": { "name": "Resource A" },
                    "resource_b": { "name": "Resource B" }
                },
                "processes": [
                    { "name": "Process 1", "resource1": "resource_a", "resource2": "resource_b" },
                    { "name": "Process 2", "resource1": "resource_b", "resource2": "resource_a" }
                ]
            },
            "starvation": {
                "resources": {
                    "shared": { "name": "Shared Resource" }
                },
                "processes": [
                    { "name": "High Priority", "resource": "shared", "priority": 1 },
                    { "name": "Low Priority", "resource": "shared", "priority": 2 }
                ]
            }
        })
    }

    #[test]
    fn parses_the_reference_document() {
        let config = ConfigFile::from_json(&reference_document().to_string())
            .expect("reference document parses");

        let pair = config.deadlock_livelock.expect("pair section present");
        assert_eq!(pair.resources.len(), 2);
        assert_eq!(pair.processes.len(), 2);
        assert_eq!(pair.processes[0].resource1, "resource_a");
        pair.validate().expect("reference pair section is valid");

        let starvation = config.starvation.expect("starvation section present");
        assert_eq!(starvation.processes[1].priority, 2);
        starvation
            .validate()
            .expect("reference starvation section is valid");
    }

    #[test]
    fn sections_are_optional_at_parse_time() {
        let config = ConfigFile::from_json("{}").expect("empty document parses");
        assert!(config.deadlock_livelock.is_none());
        assert!(config.starvation.is_none());
    }

    #[test]
    fn missing_required_fields_fail_parse() {
        let text = json!({
            "deadlock_livelock": {
                "resources": { "resource_a": { "name": "Resource A" } },
                "processes": [ { "name": "Process 1", "resource1": "resource_a" } ]
            }
        })
        .to_string();

        let err = ConfigFile::from_json(&text).expect_err("resource2 is required");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn dangling_resource_references_are_rejected() {
        let config = ConfigFile::from_json(
            &json!({
                "deadlock_livelock": {
                    "resources": { "resource_a": { "name": "Resource A" } },
                    "processes": [
                        { "name": "Process 1", "resource1": "resource_a", "resource2": "ghost" }
                    ]
                }
            })
            .to_string(),
        )
        .expect("document parses");

        let err = config
            .deadlock_livelock
            .expect("section present")
            .validate()
            .expect_err("dangling key must be rejected");
        match err {
            ConfigError::UnknownResource { process, key } => {
                assert_eq!(process, "Process 1");
                assert_eq!(key, "ghost");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_names_are_rejected() {
        let config = ConfigFile::from_json(
            &json!({
                "starvation": {
                    "resources": { "shared": { "name": "   " } },
                    "processes": [ { "name": "P", "resource": "shared", "priority": 1 } ]
                }
            })
            .to_string(),
        )
        .expect("document parses");
        let err = config
            .starvation
            .expect("section present")
            .validate()
            .expect_err("blank resource name must be rejected");
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::EmptyResourceName { .. })
        ));

        let config = ConfigFile::from_json(
            &json!({
                "starvation": {
                    "resources": { "shared": { "name": "Shared" } },
                    "processes": [ { "name": "", "resource": "shared", "priority": 1 } ]
                }
            })
            .to_string(),
        )
        .expect("document parses");
        let err = config
            .starvation
            .expect("section present")
            .validate()
            .expect_err("blank process name must be rejected");
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::EmptyWorkerName { index: 0 })
        ));
    }

    #[test]
    fn zero_priority_is_rejected() {
        let config = ConfigFile::from_json(
            &json!({
                "starvation": {
                    "resources": { "shared": { "name": "Shared" } },
                    "processes": [ { "name": "P", "resource": "shared", "priority": 0 } ]
                }
            })
            .to_string(),
        )
        .expect("document parses");

        let err = config
            .starvation
            .expect("section present")
            .validate()
            .expect_err("priority 0 must be rejected");
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::InvalidPriority { priority: 0, .. })
        ));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = ConfigFile::load("/definitely/not/here/config.json")
            .expect_err("missing file must fail");
        match err {
            ConfigError::Io { path, .. } => assert!(path.contains("config.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
