//! Workspace members, project members and permission sets

use serde::{Deserialize, Serialize};

/// Member of a workspace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceMember {
    pub url: String,
    pub html_url: String,
    pub id: u64,
    pub name: String,
    pub avatar_url: String,
    pub title: String,
    pub email: String,
    pub admin: bool,
    pub workspace_owner: bool,
}

impl WorkspaceMember {
    /// A zero id means the API reported the member as absent
    pub fn exists(&self) -> bool {
        self.id != 0
    }

    /// True for the default record returned by a lookup that found nothing
    pub fn is_empty(&self) -> bool {
        self.url.is_empty() && self.id == 0
    }
}

/// Named bundle of repository and pipeline access levels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSet {
    pub url: String,
    pub html_url: String,
    pub id: u64,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub set_type: String,
    pub repository_access_level: String,
    pub pipeline_access_level: String,
}

/// Write-only reference to a permission set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSetRef {
    pub id: u64,
}

impl PermissionSetRef {
    pub fn new(id: u64) -> Self {
        Self { id }
    }
}

/// Workspace member together with the permission set granted on a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMember {
    #[serde(flatten)]
    pub member: WorkspaceMember,
    pub permission_set: PermissionSet,
}

impl ProjectMember {
    pub fn exists(&self) -> bool {
        self.member.exists()
    }
}

/// One page of the workspace member listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberList {
    pub url: String,
    pub html_url: String,
    pub members: Vec<WorkspaceMember>,
}

impl MemberList {
    /// First member whose email matches exactly (case-sensitive)
    pub fn find_by_email(&self, email: &str) -> Option<&WorkspaceMember> {
        self.members.iter().find(|m| m.email == email)
    }
}
