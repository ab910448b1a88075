//! Buddy Core - Core types for the Buddy provider
//!
//! This crate provides the foundational types shared by the API client,
//! the resource provider and the CLI:
//! - `WorkspaceVariable` / `ProjectVariable`: Variables injected into pipeline runs
//! - `WorkspaceMember` / `ProjectMember`: Workspace users and their project grants
//! - `ProjectMemberId`: Composite `project:member` identifier
//! - `ProviderConfig`: Connection settings (file + environment)

pub mod config;
pub mod error;
pub mod id;
pub mod member;
pub mod variable;

pub use config::{ProviderConfig, ENV_BUDDY_TOKEN, ENV_BUDDY_URL, ENV_BUDDY_VERIFY_SSL};
pub use error::{CoreError, Result};
pub use id::{parse_numeric_id, ProjectMemberId};
pub use member::{MemberList, PermissionSet, PermissionSetRef, ProjectMember, WorkspaceMember};
pub use variable::{
    Project, ProjectRef, ProjectVariable, ProjectVariableSpec, VariableSpec, VariableType,
    WorkspaceVariable,
};
