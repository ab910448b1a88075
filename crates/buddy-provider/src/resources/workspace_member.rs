//! `buddy_workspace_member`
//!
//! Members are invited by email. The admin flag is the only attribute that
//! can change in place.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use buddy_client::BuddyApi;
use buddy_core::WorkspaceMember;

use crate::error::{ProviderError, Result};
use crate::resource::Resource;
use crate::resources::parse_id;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMemberConfig {
    pub email: String,
    /// `None` leaves the admin flag unmanaged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
}

impl WorkspaceMemberConfig {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            admin: None,
        }
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = Some(admin);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMemberState {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub title: String,
    pub admin: bool,
    pub workspace_owner: bool,
}

impl From<&WorkspaceMember> for WorkspaceMemberState {
    fn from(member: &WorkspaceMember) -> Self {
        Self {
            id: member.id,
            email: member.email.clone(),
            name: member.name.clone(),
            title: member.title.clone(),
            admin: member.admin,
            workspace_owner: member.workspace_owner,
        }
    }
}

pub struct WorkspaceMemberResource {
    api: Arc<dyn BuddyApi>,
}

impl WorkspaceMemberResource {
    pub fn new(api: Arc<dyn BuddyApi>) -> Self {
        Self { api }
    }

    async fn read_back(&self, id: u64) -> Result<WorkspaceMemberState> {
        let remote = self.api.read_workspace_member(id).await?;
        if !remote.exists() {
            return Err(ProviderError::gone(Self::TYPE_NAME, id));
        }
        Ok(WorkspaceMemberState::from(&remote))
    }
}

#[async_trait]
impl Resource for WorkspaceMemberResource {
    type Config = WorkspaceMemberConfig;
    type State = WorkspaceMemberState;

    const TYPE_NAME: &'static str = "buddy_workspace_member";

    async fn create(&self, config: &WorkspaceMemberConfig) -> Result<WorkspaceMemberState> {
        tracing::info!(resource = Self::TYPE_NAME, email = %config.email, "inviting member");
        let invited = self.api.create_workspace_member(&config.email).await?;

        if config.admin == Some(true) {
            if let Err(err) = self.api.set_admin_right(invited.id, true).await {
                // No state reaches the caller, so the invite must not outlive the failure
                tracing::warn!(resource = Self::TYPE_NAME, id = invited.id, error = %err, "granting admin failed, withdrawing invite");
                if let Err(cleanup) = self.api.delete_workspace_member(invited.id).await {
                    tracing::warn!(resource = Self::TYPE_NAME, id = invited.id, error = %cleanup, "failed to withdraw invite");
                }
                return Err(err.into());
            }
        }

        self.read_back(invited.id).await
    }

    async fn read(
        &self,
        id: &str,
        _prior: Option<&WorkspaceMemberState>,
    ) -> Result<Option<WorkspaceMemberState>> {
        let id = parse_id(Self::TYPE_NAME, id)?;
        let remote = self.api.read_workspace_member(id).await?;
        if !remote.exists() {
            tracing::info!(resource = Self::TYPE_NAME, id, "member no longer exists");
            return Ok(None);
        }
        Ok(Some(WorkspaceMemberState::from(&remote)))
    }

    async fn update(
        &self,
        state: &WorkspaceMemberState,
        config: &WorkspaceMemberConfig,
    ) -> Result<WorkspaceMemberState> {
        if state.email != config.email {
            return Err(ProviderError::replacement(Self::TYPE_NAME, "email"));
        }

        match config.admin {
            Some(admin) if admin != state.admin => {
                tracing::info!(resource = Self::TYPE_NAME, id = state.id, admin, "changing admin right");
                self.api.set_admin_right(state.id, admin).await?;
            }
            _ => {}
        }

        self.read_back(state.id).await
    }

    async fn delete(&self, state: &WorkspaceMemberState) -> Result<()> {
        tracing::info!(resource = Self::TYPE_NAME, id = state.id, "removing member");
        self.api.delete_workspace_member(state.id).await?;
        Ok(())
    }

    fn requires_replacement(
        &self,
        state: &WorkspaceMemberState,
        config: &WorkspaceMemberConfig,
    ) -> bool {
        state.email != config.email
    }
}
