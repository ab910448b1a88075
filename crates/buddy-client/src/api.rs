//! Typed Buddy API operations
//!
//! [`BuddyApi`] is the single capability set consumed by the provider.
//! [`BuddyClient`] implements it over HTTP; every method maps onto exactly
//! one request through the shared transport helpers.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use buddy_core::{
    MemberList, PermissionSetRef, ProjectMember, ProjectVariable, ProjectVariableSpec,
    VariableSpec, WorkspaceMember, WorkspaceVariable,
};

use crate::error::Result;
use crate::http::{ClientConfig, HttpTransport};

/// Page size used when looking a member up by email
pub const MEMBER_LOOKUP_PAGE_SIZE: u32 = 1000;

const VARIABLES: &str = "variables";
const MEMBERS: &str = "members";

/// Operations exposed by the Buddy workspace API
///
/// Read operations return the record's `Default` value when the server
/// answers `404`; callers detect absence with `exists()`.
#[async_trait]
pub trait BuddyApi: Send + Sync {
    // ============ Workspace variables ============

    async fn create_workspace_variable(&self, spec: &VariableSpec) -> Result<WorkspaceVariable>;

    async fn read_workspace_variable(&self, id: u64) -> Result<WorkspaceVariable>;

    async fn update_workspace_variable(
        &self,
        id: u64,
        spec: &VariableSpec,
    ) -> Result<WorkspaceVariable>;

    // ============ Project variables ============

    async fn create_project_variable(&self, spec: &ProjectVariableSpec)
    -> Result<ProjectVariable>;

    async fn read_project_variable(&self, id: u64) -> Result<ProjectVariable>;

    async fn update_project_variable(
        &self,
        id: u64,
        spec: &ProjectVariableSpec,
    ) -> Result<ProjectVariable>;

    /// Delete a variable of either scope
    async fn delete_variable(&self, id: u64) -> Result<()>;

    // ============ Workspace members ============

    /// Invite a user into the workspace by email
    async fn create_workspace_member(&self, email: &str) -> Result<WorkspaceMember>;

    async fn read_workspace_member(&self, id: u64) -> Result<WorkspaceMember>;

    async fn set_admin_right(&self, id: u64, admin: bool) -> Result<WorkspaceMember>;

    async fn delete_workspace_member(&self, id: u64) -> Result<()>;

    /// One page of members, sorted by name
    async fn list_members(&self, page: u32, per_page: u32) -> Result<MemberList>;

    /// Find a member by exact (case-sensitive) email
    ///
    /// Only the first [`MEMBER_LOOKUP_PAGE_SIZE`] members are searched; a
    /// workspace with more members can miss matches on later pages.
    async fn get_user(&self, email: &str) -> Result<WorkspaceMember> {
        let list = self.list_members(1, MEMBER_LOOKUP_PAGE_SIZE).await?;
        if list.members.len() >= MEMBER_LOOKUP_PAGE_SIZE as usize {
            tracing::warn!(
                "member list reached {} entries; members beyond the first page are not searched",
                MEMBER_LOOKUP_PAGE_SIZE
            );
        }
        Ok(list.find_by_email(email).cloned().unwrap_or_default())
    }

    // ============ Project members ============

    async fn create_project_member(
        &self,
        project: &str,
        member_id: u64,
        permission_set_id: u64,
    ) -> Result<ProjectMember>;

    async fn read_project_member(&self, project: &str, member_id: u64) -> Result<ProjectMember>;

    async fn update_project_member(
        &self,
        project: &str,
        member_id: u64,
        permission_set_id: u64,
    ) -> Result<ProjectMember>;

    async fn delete_project_member(&self, project: &str, member_id: u64) -> Result<()>;
}

#[derive(Serialize)]
struct InviteRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct AdminRequest {
    admin: bool,
}

#[derive(Serialize)]
struct ProjectMemberRequest {
    /// The API takes the member id as a string here
    id: String,
    permission_set: PermissionSetRef,
}

#[derive(Serialize)]
struct PermissionSetRequest {
    permission_set: PermissionSetRef,
}

/// HTTP implementation of [`BuddyApi`]
#[derive(Debug, Clone)]
pub struct BuddyClient {
    transport: HttpTransport,
}

impl BuddyClient {
    /// Create a client for one workspace
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(&config)?,
        })
    }

    /// Normalized workspace base URL
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    async fn create<B: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.transport.do_create(path, serde_json::to_vec(body)?).await?;
        Ok(serde_json::from_slice(&response)?)
    }

    async fn read<T: DeserializeOwned + Default + Send>(&self, path: &str) -> Result<T> {
        match self.transport.do_read(path).await? {
            Some(response) => Ok(serde_json::from_slice(&response)?),
            None => Ok(T::default()),
        }
    }

    async fn patch<B: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.transport.do_patch(path, serde_json::to_vec(body)?).await?;
        Ok(serde_json::from_slice(&response)?)
    }
}

fn variable_path(id: u64) -> String {
    format!("{}/{}", VARIABLES, id)
}

fn member_path(id: u64) -> String {
    format!("{}/{}", MEMBERS, id)
}

fn project_members_path(project: &str) -> String {
    format!("projects/{}/members", project)
}

fn project_member_path(project: &str, member_id: u64) -> String {
    format!("projects/{}/members/{}", project, member_id)
}

fn list_members_path(page: u32, per_page: u32) -> String {
    format!(
        "{}?page={}&per_page={}&sort_name=name",
        MEMBERS, page, per_page
    )
}

#[async_trait]
impl BuddyApi for BuddyClient {
    async fn create_workspace_variable(&self, spec: &VariableSpec) -> Result<WorkspaceVariable> {
        self.create(VARIABLES, spec).await
    }

    async fn read_workspace_variable(&self, id: u64) -> Result<WorkspaceVariable> {
        self.read(&variable_path(id)).await
    }

    async fn update_workspace_variable(
        &self,
        id: u64,
        spec: &VariableSpec,
    ) -> Result<WorkspaceVariable> {
        self.patch(&variable_path(id), spec).await
    }

    async fn create_project_variable(
        &self,
        spec: &ProjectVariableSpec,
    ) -> Result<ProjectVariable> {
        self.create(VARIABLES, spec).await
    }

    async fn read_project_variable(&self, id: u64) -> Result<ProjectVariable> {
        self.read(&variable_path(id)).await
    }

    async fn update_project_variable(
        &self,
        id: u64,
        spec: &ProjectVariableSpec,
    ) -> Result<ProjectVariable> {
        self.patch(&variable_path(id), spec).await
    }

    async fn delete_variable(&self, id: u64) -> Result<()> {
        self.transport.do_delete(&variable_path(id)).await
    }

    async fn create_workspace_member(&self, email: &str) -> Result<WorkspaceMember> {
        self.create(MEMBERS, &InviteRequest { email }).await
    }

    async fn read_workspace_member(&self, id: u64) -> Result<WorkspaceMember> {
        self.read(&member_path(id)).await
    }

    async fn set_admin_right(&self, id: u64, admin: bool) -> Result<WorkspaceMember> {
        self.patch(&member_path(id), &AdminRequest { admin }).await
    }

    async fn delete_workspace_member(&self, id: u64) -> Result<()> {
        self.transport.do_delete(&member_path(id)).await
    }

    async fn list_members(&self, page: u32, per_page: u32) -> Result<MemberList> {
        let response = self.transport.do_get(&list_members_path(page, per_page)).await?;
        Ok(serde_json::from_slice(&response)?)
    }

    async fn create_project_member(
        &self,
        project: &str,
        member_id: u64,
        permission_set_id: u64,
    ) -> Result<ProjectMember> {
        let body = ProjectMemberRequest {
            id: member_id.to_string(),
            permission_set: PermissionSetRef::new(permission_set_id),
        };
        self.create(&project_members_path(project), &body).await
    }

    async fn read_project_member(&self, project: &str, member_id: u64) -> Result<ProjectMember> {
        self.read(&project_member_path(project, member_id)).await
    }

    async fn update_project_member(
        &self,
        project: &str,
        member_id: u64,
        permission_set_id: u64,
    ) -> Result<ProjectMember> {
        let body = PermissionSetRequest {
            permission_set: PermissionSetRef::new(permission_set_id),
        };
        self.patch(&project_member_path(project, member_id), &body)
            .await
    }

    async fn delete_project_member(&self, project: &str, member_id: u64) -> Result<()> {
        self.transport
            .do_delete(&project_member_path(project, member_id))
            .await
    }
}
