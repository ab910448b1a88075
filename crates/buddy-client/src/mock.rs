//! In-memory Buddy API for testing
//!
//! Mirrors the observable behavior of the real API closely enough to drive
//! provider logic without a server: ids are assigned on create, encrypted
//! values read back as a hash, reads of missing records return defaults and
//! writes to missing records fail with `404`.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use buddy_core::{
    MemberList, PermissionSet, Project, ProjectMember, ProjectVariable, ProjectVariableSpec,
    VariableSpec, WorkspaceMember, WorkspaceVariable,
};

use crate::api::BuddyApi;
use crate::error::{ApiError, Result};

const MOCK_BASE_URL: &str = "https://buddy.mock/workspaces/mock";

/// In-memory implementation of [`BuddyApi`]
#[derive(Clone, Default)]
pub struct MockBuddyApi {
    state: Arc<RwLock<MockState>>,
    operations: Arc<RwLock<OperationCounts>>,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone)]
pub struct OperationCounts {
    pub creates: usize,
    pub reads: usize,
    pub updates: usize,
    pub deletes: usize,
    pub lists: usize,
}

#[derive(Default)]
struct MockState {
    next_id: u64,
    variables: HashMap<u64, StoredVariable>,
    members: HashMap<u64, WorkspaceMember>,
    project_members: HashMap<(String, u64), u64>,
    permission_sets: HashMap<u64, PermissionSet>,
    pending_failure: Option<(u16, String)>,
}

#[derive(Clone)]
struct StoredVariable {
    spec: VariableSpec,
    project: Option<String>,
}

impl MockState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn variable(&self, id: u64) -> Option<WorkspaceVariable> {
        self.variables.get(&id).map(|stored| render_variable(id, &stored.spec))
    }

    fn project_variable(&self, id: u64) -> Option<ProjectVariable> {
        let stored = self.variables.get(&id)?;
        Some(ProjectVariable {
            variable: render_variable(id, &stored.spec),
            project: stored
                .project
                .as_deref()
                .map(render_project)
                .unwrap_or_default(),
        })
    }

    fn project_member(&self, project: &str, member_id: u64) -> Option<ProjectMember> {
        let set_id = self.project_members.get(&(project.to_string(), member_id))?;
        let member = self.members.get(&member_id)?.clone();
        let permission_set = self
            .permission_sets
            .get(set_id)
            .cloned()
            .unwrap_or_else(|| PermissionSet {
                id: *set_id,
                ..Default::default()
            });
        Some(ProjectMember {
            member,
            permission_set,
        })
    }
}

impl MockBuddyApi {
    /// Create a new empty mock API
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-populated workspace members
    pub fn with_members(members: Vec<WorkspaceMember>) -> Self {
        let api = Self::new();
        {
            let mut state = api.state.write().unwrap();
            for member in members {
                state.next_id = state.next_id.max(member.id);
                state.members.insert(member.id, member);
            }
        }
        api
    }

    /// Register a permission set that project members can be granted
    pub fn add_permission_set(&self, permission_set: PermissionSet) {
        let mut state = self.state.write().unwrap();
        state
            .permission_sets
            .insert(permission_set.id, permission_set);
    }

    /// Make the next operation fail with the given status and body
    pub fn fail_next(&self, status: u16, body: impl Into<String>) {
        let mut state = self.state.write().unwrap();
        state.pending_failure = Some((status, body.into()));
    }

    /// Remove a variable behind the provider's back
    pub fn forget_variable(&self, id: u64) {
        self.state.write().unwrap().variables.remove(&id);
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations.read().unwrap().clone()
    }

    /// Count stored variables
    pub fn variable_count(&self) -> usize {
        self.state.read().unwrap().variables.len()
    }

    /// Count workspace members
    pub fn member_count(&self) -> usize {
        self.state.read().unwrap().members.len()
    }

    fn record(&self, update: impl FnOnce(&mut OperationCounts)) {
        let mut ops = self.operations.write().unwrap();
        update(&mut ops);
    }

    fn take_failure(&self, expected: u16) -> Result<()> {
        let mut state = self.state.write().unwrap();
        match state.pending_failure.take() {
            Some((status, body)) => Err(ApiError::UnexpectedStatus {
                expected,
                status,
                body,
            }),
            None => Ok(()),
        }
    }
}

fn not_found(expected: u16) -> ApiError {
    ApiError::UnexpectedStatus {
        expected,
        status: 404,
        body: r#"{"errors":[{"message":"Not found"}]}"#.to_string(),
    }
}

fn value_fingerprint(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

fn render_variable(id: u64, spec: &VariableSpec) -> WorkspaceVariable {
    let value = if spec.encrypted {
        value_fingerprint(&spec.value)
    } else {
        spec.value.clone()
    };
    WorkspaceVariable {
        url: format!("{}/variables/{}", MOCK_BASE_URL, id),
        id,
        key: spec.key.clone(),
        value,
        var_type: spec.var_type,
        ssh_key: spec.var_type == buddy_core::VariableType::SshKey,
        settable: spec.settable,
        encrypted: spec.encrypted,
        description: spec.description.clone(),
    }
}

fn render_project(name: &str) -> Project {
    Project {
        url: format!("{}/projects/{}", MOCK_BASE_URL, name),
        html_url: format!("https://buddy.mock/mock/{}", name),
        name: name.to_string(),
        display_name: name.to_string(),
        status: "ACTIVE".to_string(),
    }
}

#[async_trait]
impl BuddyApi for MockBuddyApi {
    async fn create_workspace_variable(&self, spec: &VariableSpec) -> Result<WorkspaceVariable> {
        self.record(|ops| ops.creates += 1);
        self.take_failure(201)?;

        let mut state = self.state.write().unwrap();
        let id = state.allocate_id();
        state.variables.insert(
            id,
            StoredVariable {
                spec: spec.clone(),
                project: None,
            },
        );
        Ok(render_variable(id, spec))
    }

    async fn read_workspace_variable(&self, id: u64) -> Result<WorkspaceVariable> {
        self.record(|ops| ops.reads += 1);
        self.take_failure(200)?;

        let state = self.state.read().unwrap();
        Ok(state.variable(id).unwrap_or_default())
    }

    async fn update_workspace_variable(
        &self,
        id: u64,
        spec: &VariableSpec,
    ) -> Result<WorkspaceVariable> {
        self.record(|ops| ops.updates += 1);
        self.take_failure(200)?;

        let mut state = self.state.write().unwrap();
        let stored = state.variables.get_mut(&id).ok_or_else(|| not_found(200))?;
        stored.spec = spec.clone();
        Ok(render_variable(id, spec))
    }

    async fn create_project_variable(
        &self,
        spec: &ProjectVariableSpec,
    ) -> Result<ProjectVariable> {
        self.record(|ops| ops.creates += 1);
        self.take_failure(201)?;

        let mut state = self.state.write().unwrap();
        let id = state.allocate_id();
        state.variables.insert(
            id,
            StoredVariable {
                spec: spec.variable.clone(),
                project: Some(spec.project.name.clone()),
            },
        );
        Ok(ProjectVariable {
            variable: render_variable(id, &spec.variable),
            project: render_project(&spec.project.name),
        })
    }

    async fn read_project_variable(&self, id: u64) -> Result<ProjectVariable> {
        self.record(|ops| ops.reads += 1);
        self.take_failure(200)?;

        let state = self.state.read().unwrap();
        Ok(state.project_variable(id).unwrap_or_default())
    }

    async fn update_project_variable(
        &self,
        id: u64,
        spec: &ProjectVariableSpec,
    ) -> Result<ProjectVariable> {
        self.record(|ops| ops.updates += 1);
        self.take_failure(200)?;

        let mut state = self.state.write().unwrap();
        let stored = state.variables.get_mut(&id).ok_or_else(|| not_found(200))?;
        stored.spec = spec.variable.clone();
        stored.project = Some(spec.project.name.clone());
        Ok(ProjectVariable {
            variable: render_variable(id, &spec.variable),
            project: render_project(&spec.project.name),
        })
    }

    async fn delete_variable(&self, id: u64) -> Result<()> {
        self.record(|ops| ops.deletes += 1);
        self.take_failure(204)?;

        let mut state = self.state.write().unwrap();
        state
            .variables
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(204))
    }

    async fn create_workspace_member(&self, email: &str) -> Result<WorkspaceMember> {
        self.record(|ops| ops.creates += 1);
        self.take_failure(201)?;

        let mut state = self.state.write().unwrap();
        if state.members.values().any(|m| m.email == email) {
            return Err(ApiError::UnexpectedStatus {
                expected: 201,
                status: 400,
                body: format!(
                    r#"{{"errors":[{{"message":"User {} is already a member"}}]}}"#,
                    email
                ),
            });
        }

        let id = state.allocate_id();
        let member = WorkspaceMember {
            url: format!("{}/members/{}", MOCK_BASE_URL, id),
            html_url: format!("https://buddy.mock/mock/-/people/{}", id),
            id,
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            ..Default::default()
        };
        state.members.insert(id, member.clone());
        Ok(member)
    }

    async fn read_workspace_member(&self, id: u64) -> Result<WorkspaceMember> {
        self.record(|ops| ops.reads += 1);
        self.take_failure(200)?;

        let state = self.state.read().unwrap();
        Ok(state.members.get(&id).cloned().unwrap_or_default())
    }

    async fn set_admin_right(&self, id: u64, admin: bool) -> Result<WorkspaceMember> {
        self.record(|ops| ops.updates += 1);
        self.take_failure(200)?;

        let mut state = self.state.write().unwrap();
        let member = state.members.get_mut(&id).ok_or_else(|| not_found(200))?;
        member.admin = admin;
        Ok(member.clone())
    }

    async fn delete_workspace_member(&self, id: u64) -> Result<()> {
        self.record(|ops| ops.deletes += 1);
        self.take_failure(204)?;

        let mut state = self.state.write().unwrap();
        state.members.remove(&id).ok_or_else(|| not_found(204))?;
        state.project_members.retain(|(_, member_id), _| *member_id != id);
        Ok(())
    }

    async fn list_members(&self, page: u32, per_page: u32) -> Result<MemberList> {
        self.record(|ops| ops.lists += 1);
        self.take_failure(200)?;

        let state = self.state.read().unwrap();
        let mut members: Vec<WorkspaceMember> = state.members.values().cloned().collect();
        members.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let skip = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
        Ok(MemberList {
            url: format!("{}/members", MOCK_BASE_URL),
            html_url: "https://buddy.mock/mock/-/people".to_string(),
            members: members
                .into_iter()
                .skip(skip)
                .take(per_page as usize)
                .collect(),
        })
    }

    async fn create_project_member(
        &self,
        project: &str,
        member_id: u64,
        permission_set_id: u64,
    ) -> Result<ProjectMember> {
        self.record(|ops| ops.creates += 1);
        self.take_failure(201)?;

        let mut state = self.state.write().unwrap();
        if !state.members.contains_key(&member_id) {
            return Err(not_found(201));
        }
        state
            .project_members
            .insert((project.to_string(), member_id), permission_set_id);
        state
            .project_member(project, member_id)
            .ok_or_else(|| not_found(201))
    }

    async fn read_project_member(&self, project: &str, member_id: u64) -> Result<ProjectMember> {
        self.record(|ops| ops.reads += 1);
        self.take_failure(200)?;

        let state = self.state.read().unwrap();
        Ok(state.project_member(project, member_id).unwrap_or_default())
    }

    async fn update_project_member(
        &self,
        project: &str,
        member_id: u64,
        permission_set_id: u64,
    ) -> Result<ProjectMember> {
        self.record(|ops| ops.updates += 1);
        self.take_failure(200)?;

        let mut state = self.state.write().unwrap();
        let grant = state
            .project_members
            .get_mut(&(project.to_string(), member_id))
            .ok_or_else(|| not_found(200))?;
        *grant = permission_set_id;
        state
            .project_member(project, member_id)
            .ok_or_else(|| not_found(200))
    }

    async fn delete_project_member(&self, project: &str, member_id: u64) -> Result<()> {
        self.record(|ops| ops.deletes += 1);
        self.take_failure(204)?;

        let mut state = self.state.write().unwrap();
        state
            .project_members
            .remove(&(project.to_string(), member_id))
            .map(|_| ())
            .ok_or_else(|| not_found(204))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: u64, name: &str, email: &str) -> WorkspaceMember {
        WorkspaceMember {
            id,
            name: name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_encrypted_value_reads_back_as_hash() {
        let api = MockBuddyApi::new();
        let spec = VariableSpec::new("SECRET", "hunter2").encrypted(true);

        let created = api.create_workspace_variable(&spec).await.unwrap();
        let read = api.read_workspace_variable(created.id).await.unwrap();

        assert_ne!(read.value, "hunter2");
        assert_eq!(read.value.len(), 64);
        assert!(read.encrypted);
    }

    #[tokio::test]
    async fn test_plain_value_reads_back_verbatim() {
        let api = MockBuddyApi::new();
        let created = api
            .create_workspace_variable(&VariableSpec::new("PLAIN", "hello"))
            .await
            .unwrap();

        let read = api.read_workspace_variable(created.id).await.unwrap();
        assert_eq!(read.value, "hello");
    }

    #[tokio::test]
    async fn test_missing_reads_are_default() {
        let api = MockBuddyApi::new();

        assert!(!api.read_workspace_variable(99).await.unwrap().exists());
        assert!(!api.read_workspace_member(99).await.unwrap().exists());
        assert!(!api.read_project_member("web", 99).await.unwrap().exists());
    }

    #[tokio::test]
    async fn test_writes_to_missing_records_fail() {
        let api = MockBuddyApi::new();

        let err = api.delete_variable(5).await.unwrap_err();
        assert!(err.is_not_found());

        let err = api.set_admin_right(5, true).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fail_next_applies_once() {
        let api = MockBuddyApi::new();
        api.fail_next(500, "internal error");

        let err = api
            .create_workspace_variable(&VariableSpec::new("K", "v"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("internal error"));

        assert!(api
            .create_workspace_variable(&VariableSpec::new("K", "v"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_get_user_uses_single_list_call() {
        let api = MockBuddyApi::with_members(vec![
            member(1, "alice", "a@x.com"),
            member(2, "bob", "b@x.com"),
        ]);

        let found = api.get_user("b@x.com").await.unwrap();
        assert_eq!(found.id, 2);

        let missing = api.get_user("nomatch@example.com").await.unwrap();
        assert!(missing.is_empty());

        assert_eq!(api.operation_counts().lists, 2);
    }

    #[tokio::test]
    async fn test_list_members_paginates_sorted_by_name() {
        let api = MockBuddyApi::with_members(vec![
            member(1, "carol", "c@x.com"),
            member(2, "alice", "a@x.com"),
            member(3, "bob", "b@x.com"),
        ]);

        let first = api.list_members(1, 2).await.unwrap();
        let names: Vec<_> = first.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);

        let second = api.list_members(2, 2).await.unwrap();
        assert_eq!(second.members.len(), 1);
        assert_eq!(second.members[0].name, "carol");
    }

    #[tokio::test]
    async fn test_project_member_lifecycle() {
        let api = MockBuddyApi::with_members(vec![member(7, "dev", "dev@x.com")]);
        api.add_permission_set(PermissionSet {
            id: 3,
            name: "Developer".to_string(),
            ..Default::default()
        });

        let created = api.create_project_member("web", 7, 3).await.unwrap();
        assert_eq!(created.permission_set.name, "Developer");

        let updated = api.update_project_member("web", 7, 4).await.unwrap();
        assert_eq!(updated.permission_set.id, 4);

        api.delete_project_member("web", 7).await.unwrap();
        assert!(!api.read_project_member("web", 7).await.unwrap().exists());
    }

    #[tokio::test]
    async fn test_duplicate_invite_rejected() {
        let api = MockBuddyApi::new();
        api.create_workspace_member("dup@x.com").await.unwrap();

        let err = api.create_workspace_member("dup@x.com").await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(api.member_count(), 1);
    }
}
