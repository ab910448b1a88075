//! Composite identifiers

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Identity of a project member: `{project}:{member_id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectMemberId {
    pub project: String,
    pub member_id: u64,
}

impl ProjectMemberId {
    pub fn new(project: impl Into<String>, member_id: u64) -> Self {
        Self {
            project: project.into(),
            member_id,
        }
    }
}

impl fmt::Display for ProjectMemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.project, self.member_id)
    }
}

impl FromStr for ProjectMemberId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidId {
            id: s.to_string(),
            reason: reason.to_string(),
        };

        let (project, member) = s
            .split_once(':')
            .ok_or_else(|| invalid("expected <project>:<member_id>"))?;
        if project.is_empty() {
            return Err(invalid("project name is empty"));
        }
        let member_id = member
            .parse::<u64>()
            .map_err(|_| invalid("member id must be a positive integer"))?;

        Ok(Self::new(project, member_id))
    }
}

/// Parse a numeric resource id
pub fn parse_numeric_id(id: &str) -> Result<u64, CoreError> {
    id.trim().parse::<u64>().map_err(|_| CoreError::InvalidId {
        id: id.to_string(),
        reason: "expected a numeric id".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_display() {
        let id = ProjectMemberId::new("backend", 42);
        assert_eq!(id.to_string(), "backend:42");
        assert_eq!("backend:42".parse::<ProjectMemberId>().unwrap(), id);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("backend".parse::<ProjectMemberId>().is_err());
        assert!(":42".parse::<ProjectMemberId>().is_err());
        assert!("backend:abc".parse::<ProjectMemberId>().is_err());
        assert!("backend:".parse::<ProjectMemberId>().is_err());
    }

    #[test]
    fn test_parse_numeric_id() {
        assert_eq!(parse_numeric_id("17").unwrap(), 17);
        assert_eq!(parse_numeric_id(" 17 ").unwrap(), 17);
        assert!(parse_numeric_id("x17").is_err());
    }
}
