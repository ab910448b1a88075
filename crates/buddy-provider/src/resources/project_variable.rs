//! `buddy_project_variable`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use buddy_client::BuddyApi;
use buddy_core::ProjectVariableSpec;

use crate::error::{ProviderError, Result};
use crate::resource::Resource;
use crate::resources::parse_id;
use crate::resources::workspace_variable::{VariableConfig, VariableState};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectVariableConfig {
    /// Project name (the URL handle, not the display name)
    pub project: String,
    #[serde(flatten)]
    pub variable: VariableConfig,
}

impl ProjectVariableConfig {
    pub fn new(project: impl Into<String>, variable: VariableConfig) -> Self {
        Self {
            project: project.into(),
            variable,
        }
    }

    fn to_spec(&self) -> ProjectVariableSpec {
        self.variable.to_spec().in_project(&self.project)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectVariableState {
    pub project: String,
    #[serde(flatten)]
    pub variable: VariableState,
}

/// Project scoped variable
pub struct ProjectVariableResource {
    api: Arc<dyn BuddyApi>,
}

impl ProjectVariableResource {
    pub fn new(api: Arc<dyn BuddyApi>) -> Self {
        Self { api }
    }

    async fn fetch(&self, id: u64, known_value: Option<&str>) -> Result<Option<ProjectVariableState>> {
        let remote = self.api.read_project_variable(id).await?;
        if !remote.exists() {
            return Ok(None);
        }
        Ok(Some(ProjectVariableState {
            project: remote.project.name.clone(),
            variable: VariableState::observe(&remote.variable, known_value),
        }))
    }
}

#[async_trait]
impl Resource for ProjectVariableResource {
    type Config = ProjectVariableConfig;
    type State = ProjectVariableState;

    const TYPE_NAME: &'static str = "buddy_project_variable";

    async fn create(&self, config: &ProjectVariableConfig) -> Result<ProjectVariableState> {
        tracing::info!(
            resource = Self::TYPE_NAME,
            project = %config.project,
            key = %config.variable.key,
            "creating variable"
        );
        let created = self.api.create_project_variable(&config.to_spec()).await?;
        let id = created.variable.id;
        self.fetch(id, Some(&config.variable.value))
            .await?
            .ok_or_else(|| ProviderError::gone(Self::TYPE_NAME, id))
    }

    async fn read(
        &self,
        id: &str,
        prior: Option<&ProjectVariableState>,
    ) -> Result<Option<ProjectVariableState>> {
        let id = parse_id(Self::TYPE_NAME, id)?;
        let state = self
            .fetch(id, prior.map(|p| p.variable.value.as_str()))
            .await?;
        if state.is_none() {
            tracing::info!(resource = Self::TYPE_NAME, id, "variable no longer exists");
        }
        Ok(state)
    }

    async fn update(
        &self,
        state: &ProjectVariableState,
        config: &ProjectVariableConfig,
    ) -> Result<ProjectVariableState> {
        if state.variable.key != config.variable.key {
            return Err(ProviderError::replacement(Self::TYPE_NAME, "key"));
        }
        if state.project != config.project {
            return Err(ProviderError::replacement(Self::TYPE_NAME, "project"));
        }

        let id = state.variable.id;
        tracing::info!(resource = Self::TYPE_NAME, id, "updating variable");
        self.api
            .update_project_variable(id, &config.to_spec())
            .await?;
        self.fetch(id, Some(&config.variable.value))
            .await?
            .ok_or_else(|| ProviderError::gone(Self::TYPE_NAME, id))
    }

    async fn delete(&self, state: &ProjectVariableState) -> Result<()> {
        tracing::info!(
            resource = Self::TYPE_NAME,
            id = state.variable.id,
            "deleting variable"
        );
        self.api.delete_variable(state.variable.id).await?;
        Ok(())
    }

    fn requires_replacement(
        &self,
        state: &ProjectVariableState,
        config: &ProjectVariableConfig,
    ) -> bool {
        state.variable.key != config.variable.key || state.project != config.project
    }
}
