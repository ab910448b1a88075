//! Buddy Provider - declarative management of Buddy workspace objects
//!
//! This crate provides:
//! - **Resources**: Workspace variables, project variables, workspace members
//!   and project members, each with create/read/update/delete
//! - **Data sources**: Workspace member lookup by email
//! - **Apply**: Create, update in place or replace depending on what changed
//!
//! Every write is followed by a read, so returned state always reflects what
//! the server stored.

pub mod error;
pub mod provider;
pub mod resource;
pub mod resources;

pub use error::{ProviderError, Result};
pub use provider::{Provider, USER_AGENT};
pub use resource::{ApplyAction, Resource, apply};
pub use resources::{
    MemberLookup, ProjectMemberConfig, ProjectMemberResource, ProjectMemberState,
    ProjectVariableConfig, ProjectVariableResource, ProjectVariableState, VariableConfig,
    VariableState, WorkspaceMemberConfig, WorkspaceMemberResource, WorkspaceMemberState,
    WorkspaceVariableResource,
};
