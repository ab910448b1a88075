//! `buddy_project_member`
//!
//! Grants an existing workspace member access to a project through a
//! permission set. The resource id is `{project}:{member_id}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use buddy_client::BuddyApi;
use buddy_core::{ProjectMember, ProjectMemberId};

use crate::error::{ProviderError, Result};
use crate::resource::Resource;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMemberConfig {
    pub project_name: String,
    pub member_id: u64,
    pub permission_set_id: u64,
}

impl ProjectMemberConfig {
    pub fn new(project_name: impl Into<String>, member_id: u64, permission_set_id: u64) -> Self {
        Self {
            project_name: project_name.into(),
            member_id,
            permission_set_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMemberState {
    pub id: String,
    pub project_name: String,
    pub member_id: u64,
    pub permission_set_id: u64,
    pub permission_set_name: String,
}

impl ProjectMemberState {
    fn observe(id: &ProjectMemberId, remote: &ProjectMember) -> Self {
        Self {
            id: id.to_string(),
            project_name: id.project.clone(),
            member_id: id.member_id,
            permission_set_id: remote.permission_set.id,
            permission_set_name: remote.permission_set.name.clone(),
        }
    }
}

pub struct ProjectMemberResource {
    api: Arc<dyn BuddyApi>,
}

impl ProjectMemberResource {
    pub fn new(api: Arc<dyn BuddyApi>) -> Self {
        Self { api }
    }

    async fn fetch(&self, id: &ProjectMemberId) -> Result<Option<ProjectMemberState>> {
        let remote = self
            .api
            .read_project_member(&id.project, id.member_id)
            .await?;
        if !remote.exists() {
            return Ok(None);
        }
        Ok(Some(ProjectMemberState::observe(id, &remote)))
    }

    async fn read_back(&self, id: &ProjectMemberId) -> Result<ProjectMemberState> {
        self.fetch(id)
            .await?
            .ok_or_else(|| ProviderError::gone(Self::TYPE_NAME, id))
    }
}

#[async_trait]
impl Resource for ProjectMemberResource {
    type Config = ProjectMemberConfig;
    type State = ProjectMemberState;

    const TYPE_NAME: &'static str = "buddy_project_member";

    async fn create(&self, config: &ProjectMemberConfig) -> Result<ProjectMemberState> {
        let id = ProjectMemberId::new(&config.project_name, config.member_id);
        tracing::info!(
            resource = Self::TYPE_NAME,
            %id,
            permission_set = config.permission_set_id,
            "adding project member"
        );
        self.api
            .create_project_member(&id.project, id.member_id, config.permission_set_id)
            .await?;
        self.read_back(&id).await
    }

    async fn read(
        &self,
        id: &str,
        _prior: Option<&ProjectMemberState>,
    ) -> Result<Option<ProjectMemberState>> {
        let id: ProjectMemberId = id
            .parse()
            .map_err(|e| ProviderError::invalid_id(Self::TYPE_NAME, e))?;
        let state = self.fetch(&id).await?;
        if state.is_none() {
            tracing::info!(resource = Self::TYPE_NAME, %id, "project member no longer exists");
        }
        Ok(state)
    }

    async fn update(
        &self,
        state: &ProjectMemberState,
        config: &ProjectMemberConfig,
    ) -> Result<ProjectMemberState> {
        if state.project_name != config.project_name {
            return Err(ProviderError::replacement(Self::TYPE_NAME, "project_name"));
        }
        if state.member_id != config.member_id {
            return Err(ProviderError::replacement(Self::TYPE_NAME, "member_id"));
        }

        let id = ProjectMemberId::new(&state.project_name, state.member_id);
        tracing::info!(
            resource = Self::TYPE_NAME,
            %id,
            permission_set = config.permission_set_id,
            "changing permission set"
        );
        self.api
            .update_project_member(&id.project, id.member_id, config.permission_set_id)
            .await?;
        self.read_back(&id).await
    }

    async fn delete(&self, state: &ProjectMemberState) -> Result<()> {
        tracing::info!(resource = Self::TYPE_NAME, id = %state.id, "removing project member");
        self.api
            .delete_project_member(&state.project_name, state.member_id)
            .await?;
        Ok(())
    }

    fn requires_replacement(&self, state: &ProjectMemberState, config: &ProjectMemberConfig) -> bool {
        state.project_name != config.project_name || state.member_id != config.member_id
    }
}
