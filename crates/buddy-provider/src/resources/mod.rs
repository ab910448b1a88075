//! Managed Buddy resources and data sources

pub mod member_lookup;
pub mod project_member;
pub mod project_variable;
pub mod workspace_member;
pub mod workspace_variable;

pub use member_lookup::MemberLookup;
pub use project_member::{ProjectMemberConfig, ProjectMemberResource, ProjectMemberState};
pub use project_variable::{ProjectVariableConfig, ProjectVariableResource, ProjectVariableState};
pub use workspace_member::{WorkspaceMemberConfig, WorkspaceMemberResource, WorkspaceMemberState};
pub use workspace_variable::{VariableConfig, VariableState, WorkspaceVariableResource};

use buddy_core::parse_numeric_id;

use crate::error::{ProviderError, Result};

/// Parse the numeric id of a variable or workspace member
pub(crate) fn parse_id(resource: &str, id: &str) -> Result<u64> {
    parse_numeric_id(id).map_err(|e| ProviderError::invalid_id(resource, e))
}
