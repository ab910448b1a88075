//! `buddy_workspace_variable`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use buddy_client::BuddyApi;
use buddy_core::{VariableSpec, VariableType, WorkspaceVariable};

use crate::error::{ProviderError, Result};
use crate::resource::Resource;
use crate::resources::parse_id;

/// Desired configuration of a variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub key: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub var_type: VariableType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub settable: bool,
    #[serde(default)]
    pub encrypted: bool,
}

impl VariableConfig {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub(crate) fn to_spec(&self) -> VariableSpec {
        VariableSpec::new(&self.key, &self.value)
            .with_type(self.var_type)
            .with_description(&self.description)
            .settable(self.settable)
            .encrypted(self.encrypted)
    }
}

/// Observed state of a variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableState {
    pub id: u64,
    pub key: String,
    /// Plaintext as last configured; for encrypted variables the API never
    /// returns it, so it is carried over from configuration
    pub value: String,
    /// Value exactly as returned by the API (a hash when encrypted)
    pub value_hash: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    pub description: String,
    pub settable: bool,
    pub encrypted: bool,
    pub ssh_key: bool,
}

impl VariableState {
    /// Build state from a server record
    ///
    /// `known_value` is the plaintext the caller holds, used in place of the
    /// server value when the variable is encrypted.
    pub(crate) fn observe(remote: &WorkspaceVariable, known_value: Option<&str>) -> Self {
        let value = if remote.encrypted {
            known_value.unwrap_or_default().to_string()
        } else {
            remote.value.clone()
        };

        Self {
            id: remote.id,
            key: remote.key.clone(),
            value,
            value_hash: remote.value.clone(),
            var_type: remote.var_type,
            description: remote.description.clone(),
            settable: remote.settable,
            encrypted: remote.encrypted,
            ssh_key: remote.ssh_key,
        }
    }
}

/// Workspace scoped variable
pub struct WorkspaceVariableResource {
    api: Arc<dyn BuddyApi>,
}

impl WorkspaceVariableResource {
    pub fn new(api: Arc<dyn BuddyApi>) -> Self {
        Self { api }
    }

    async fn read_back(&self, id: u64, known_value: &str) -> Result<VariableState> {
        let remote = self.api.read_workspace_variable(id).await?;
        if !remote.exists() {
            return Err(ProviderError::gone(Self::TYPE_NAME, id));
        }
        Ok(VariableState::observe(&remote, Some(known_value)))
    }
}

#[async_trait]
impl Resource for WorkspaceVariableResource {
    type Config = VariableConfig;
    type State = VariableState;

    const TYPE_NAME: &'static str = "buddy_workspace_variable";

    async fn create(&self, config: &VariableConfig) -> Result<VariableState> {
        tracing::info!(resource = Self::TYPE_NAME, key = %config.key, "creating variable");
        let created = self
            .api
            .create_workspace_variable(&config.to_spec())
            .await?;
        self.read_back(created.id, &config.value).await
    }

    async fn read(&self, id: &str, prior: Option<&VariableState>) -> Result<Option<VariableState>> {
        let id = parse_id(Self::TYPE_NAME, id)?;
        let remote = self.api.read_workspace_variable(id).await?;
        if !remote.exists() {
            tracing::info!(resource = Self::TYPE_NAME, id, "variable no longer exists");
            return Ok(None);
        }
        Ok(Some(VariableState::observe(
            &remote,
            prior.map(|p| p.value.as_str()),
        )))
    }

    async fn update(&self, state: &VariableState, config: &VariableConfig) -> Result<VariableState> {
        if state.key != config.key {
            return Err(ProviderError::replacement(Self::TYPE_NAME, "key"));
        }
        tracing::info!(resource = Self::TYPE_NAME, id = state.id, "updating variable");
        self.api
            .update_workspace_variable(state.id, &config.to_spec())
            .await?;
        self.read_back(state.id, &config.value).await
    }

    async fn delete(&self, state: &VariableState) -> Result<()> {
        tracing::info!(resource = Self::TYPE_NAME, id = state.id, "deleting variable");
        self.api.delete_variable(state.id).await?;
        Ok(())
    }

    fn requires_replacement(&self, state: &VariableState, config: &VariableConfig) -> bool {
        state.key != config.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ApplyAction, apply};
    use buddy_client::MockBuddyApi;

    fn resource() -> (MockBuddyApi, WorkspaceVariableResource) {
        let mock = MockBuddyApi::new();
        let resource = WorkspaceVariableResource::new(Arc::new(mock.clone()));
        (mock, resource)
    }

    #[test]
    fn test_config_defaults() {
        let config: VariableConfig =
            serde_json::from_value(serde_json::json!({ "key": "K", "value": "v" })).unwrap();
        assert_eq!(config.var_type, VariableType::Var);
        assert_eq!(config.description, "");
        assert!(!config.settable);
        assert!(!config.encrypted);
    }

    #[tokio::test]
    async fn test_create_reads_back() {
        let (mock, resource) = resource();
        let mut config = VariableConfig::new("DEPLOY_ENV", "staging");
        config.description = "target".to_string();
        config.settable = true;

        let state = resource.create(&config).await.unwrap();

        assert!(state.id > 0);
        assert_eq!(state.key, "DEPLOY_ENV");
        assert_eq!(state.value, "staging");
        assert_eq!(state.value_hash, "staging");
        assert!(state.settable);
        assert_eq!(state.description, "target");

        let ops = mock.operation_counts();
        assert_eq!(ops.creates, 1);
        assert_eq!(ops.reads, 1);
    }

    #[tokio::test]
    async fn test_encrypted_keeps_plaintext_and_hash() {
        let (_mock, resource) = resource();
        let mut config = VariableConfig::new("SECRET", "hunter2");
        config.encrypted = true;

        let state = resource.create(&config).await.unwrap();
        assert_eq!(state.value, "hunter2");
        assert_ne!(state.value_hash, "hunter2");
        assert!(!state.value_hash.is_empty());

        let refreshed = resource
            .read(&state.id.to_string(), Some(&state))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(refreshed.value, "hunter2");
        assert_eq!(refreshed.value_hash, state.value_hash);
    }

    #[tokio::test]
    async fn test_import_encrypted_has_no_plaintext() {
        let (_mock, resource) = resource();
        let mut config = VariableConfig::new("SECRET", "hunter2");
        config.encrypted = true;
        let state = resource.create(&config).await.unwrap();

        let imported = resource
            .read(&state.id.to_string(), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(imported.value, "");
        assert_eq!(imported.value_hash, state.value_hash);
    }

    #[tokio::test]
    async fn test_read_missing_returns_none() {
        let (mock, resource) = resource();
        let state = resource
            .create(&VariableConfig::new("K", "v"))
            .await
            .unwrap();
        mock.forget_variable(state.id);

        let read = resource.read(&state.id.to_string(), Some(&state)).await.unwrap();
        assert!(read.is_none());
    }

    #[tokio::test]
    async fn test_read_rejects_bad_id() {
        let (_mock, resource) = resource();
        let err = resource.read("abc", None).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidId { .. }));
    }

    #[tokio::test]
    async fn test_update_in_place() {
        let (mock, resource) = resource();
        let state = resource
            .create(&VariableConfig::new("K", "v1"))
            .await
            .unwrap();

        let updated = resource
            .update(&state, &VariableConfig::new("K", "v2"))
            .await
            .unwrap();

        assert_eq!(updated.id, state.id);
        assert_eq!(updated.value, "v2");
        assert_eq!(mock.operation_counts().updates, 1);
    }

    #[tokio::test]
    async fn test_key_change_requires_replacement() {
        let (mock, resource) = resource();
        let state = resource
            .create(&VariableConfig::new("OLD", "v"))
            .await
            .unwrap();
        let renamed = VariableConfig::new("NEW", "v");

        assert!(resource.requires_replacement(&state, &renamed));
        let err = resource.update(&state, &renamed).await.unwrap_err();
        assert!(matches!(err, ProviderError::RequiresReplacement { .. }));
        assert_eq!(mock.operation_counts().updates, 0);

        let (replaced, action) = apply(&resource, Some(&state), &renamed).await.unwrap();
        assert_eq!(action, ApplyAction::Replaced);
        assert_ne!(replaced.id, state.id);
        assert_eq!(replaced.key, "NEW");
        assert_eq!(mock.variable_count(), 1);
    }

    #[tokio::test]
    async fn test_create_failure_propagates() {
        let (mock, resource) = resource();
        mock.fail_next(500, "boom");

        let err = resource
            .create(&VariableConfig::new("K", "v"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
        assert_eq!(mock.variable_count(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let (mock, resource) = resource();
        let state = resource
            .create(&VariableConfig::new("K", "v"))
            .await
            .unwrap();

        resource.delete(&state).await.unwrap();
        assert_eq!(mock.variable_count(), 0);
        assert!(resource.delete(&state).await.unwrap_err().is_not_found());
    }
}
