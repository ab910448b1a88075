//! Workspace and project scoped variables
//!
//! A variable's `value` is write-only plaintext. When `encrypted` is set the
//! API answers reads with a one-way hash of the value instead of the value
//! itself, so callers must treat it as an opaque fingerprint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Kind of variable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableType {
    /// Plain key/value pair
    #[default]
    Var,
    /// SSH private key
    SshKey,
    /// File materialized in the pipeline filesystem
    File,
}

impl VariableType {
    /// Wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::Var => "VAR",
            VariableType::SshKey => "SSH_KEY",
            VariableType::File => "FILE",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "VAR" => Ok(VariableType::Var),
            "SSH_KEY" => Ok(VariableType::SshKey),
            "FILE" => Ok(VariableType::File),
            _ => Err(CoreError::InvalidVariableType {
                value: s.to_string(),
            }),
        }
    }
}

/// Request body for creating or updating a workspace variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    pub settable: bool,
    pub encrypted: bool,
    pub description: String,
}

impl VariableSpec {
    /// Create a plain, unencrypted `VAR`
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, var_type: VariableType) -> Self {
        self.var_type = var_type;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn settable(mut self, settable: bool) -> Self {
        self.settable = settable;
        self
    }

    pub fn encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }

    /// Nest this variable under a project
    pub fn in_project(self, project: impl Into<String>) -> ProjectVariableSpec {
        ProjectVariableSpec {
            variable: self,
            project: ProjectRef {
                name: project.into(),
            },
        }
    }
}

/// Variable as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceVariable {
    pub url: String,
    pub id: u64,
    pub key: String,
    /// Plaintext, or a hash of it when `encrypted`
    pub value: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    pub ssh_key: bool,
    pub settable: bool,
    pub encrypted: bool,
    pub description: String,
}

impl WorkspaceVariable {
    /// A zero id means the API reported the variable as absent
    pub fn exists(&self) -> bool {
        self.id != 0
    }
}

/// Project reference used in request bodies (name only)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub name: String,
}

/// Full project descriptor returned by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub url: String,
    pub html_url: String,
    pub name: String,
    pub display_name: String,
    pub status: String,
}

/// Request body for creating or updating a project variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectVariableSpec {
    #[serde(flatten)]
    pub variable: VariableSpec,
    pub project: ProjectRef,
}

/// Project scoped variable as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectVariable {
    #[serde(flatten)]
    pub variable: WorkspaceVariable,
    pub project: Project,
}

impl ProjectVariable {
    pub fn exists(&self) -> bool {
        self.variable.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_type_wire_names() {
        assert_eq!(serde_json::to_string(&VariableType::Var).unwrap(), "\"VAR\"");
        assert_eq!(
            serde_json::to_string(&VariableType::SshKey).unwrap(),
            "\"SSH_KEY\""
        );
        assert_eq!(serde_json::to_string(&VariableType::File).unwrap(), "\"FILE\"");
    }

    #[test]
    fn test_variable_type_from_str() {
        assert_eq!("var".parse::<VariableType>().unwrap(), VariableType::Var);
        assert_eq!("SSH_KEY".parse::<VariableType>().unwrap(), VariableType::SshKey);
        assert!("secret".parse::<VariableType>().is_err());
    }

    #[test]
    fn test_spec_serializes_type_field() {
        let spec = VariableSpec::new("TOKEN", "abc").encrypted(true);
        let json = serde_json::to_value(&spec).unwrap();

        assert_eq!(json["key"], "TOKEN");
        assert_eq!(json["type"], "VAR");
        assert_eq!(json["encrypted"], true);
        assert_eq!(json["description"], "");
    }

    #[test]
    fn test_project_spec_nests_project_name() {
        let spec = VariableSpec::new("KEY", "v").in_project("backend");
        let json = serde_json::to_value(&spec).unwrap();

        assert_eq!(json["key"], "KEY");
        assert_eq!(json["project"], serde_json::json!({ "name": "backend" }));
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let var: WorkspaceVariable =
            serde_json::from_str(r#"{"id": 7, "key": "K", "ssh_key": true}"#).unwrap();

        assert!(var.exists());
        assert!(var.ssh_key);
        assert_eq!(var.var_type, VariableType::Var);
        assert!(!WorkspaceVariable::default().exists());
    }

    #[test]
    fn test_project_variable_decodes_descriptor() {
        let json = r#"{
            "id": 3,
            "key": "K",
            "value": "v",
            "project": {"name": "web", "display_name": "Web", "status": "ACTIVE"}
        }"#;
        let var: ProjectVariable = serde_json::from_str(json).unwrap();

        assert_eq!(var.variable.id, 3);
        assert_eq!(var.project.name, "web");
        assert_eq!(var.project.display_name, "Web");
    }
}
