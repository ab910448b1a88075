//! Provider entry point

use std::sync::Arc;

use buddy_client::{BuddyApi, BuddyClient, ClientConfig};
use buddy_core::ProviderConfig;

use crate::error::Result;
use crate::resources::{
    MemberLookup, ProjectMemberResource, ProjectVariableResource, WorkspaceMemberResource,
    WorkspaceVariableResource,
};

/// User agent the provider identifies itself with
pub const USER_AGENT: &str = concat!("buddy-provider/", env!("CARGO_PKG_VERSION"));

/// A configured connection to one Buddy workspace
///
/// Resources handed out by the provider share its API handle.
#[derive(Clone)]
pub struct Provider {
    api: Arc<dyn BuddyApi>,
}

impl Provider {
    /// Validate the settings and build an HTTP client from them
    pub fn configure(config: ProviderConfig) -> Result<Self> {
        config.validate()?;
        let client =
            BuddyClient::new(ClientConfig::from(&config).with_user_agent(USER_AGENT))?;
        tracing::info!(url = %client.base_url(), verify_ssl = config.verify_ssl, "provider configured");
        Ok(Self::with_api(Arc::new(client)))
    }

    /// Configure from `BUDDY_URL`, `BUDDY_TOKEN` and `BUDDY_VERIFY_SSL`
    pub fn from_env() -> Result<Self> {
        Self::configure(ProviderConfig::default().with_env_overrides()?)
    }

    /// Use an existing API implementation
    pub fn with_api(api: Arc<dyn BuddyApi>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &Arc<dyn BuddyApi> {
        &self.api
    }

    pub fn workspace_variables(&self) -> WorkspaceVariableResource {
        WorkspaceVariableResource::new(self.api.clone())
    }

    pub fn project_variables(&self) -> ProjectVariableResource {
        ProjectVariableResource::new(self.api.clone())
    }

    pub fn workspace_members(&self) -> WorkspaceMemberResource {
        WorkspaceMemberResource::new(self.api.clone())
    }

    pub fn project_members(&self) -> ProjectMemberResource {
        ProjectMemberResource::new(self.api.clone())
    }

    pub fn member_lookup(&self) -> MemberLookup {
        MemberLookup::new(self.api.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::resource::{ApplyAction, Resource, apply};
    use crate::resources::{VariableConfig, WorkspaceMemberConfig};
    use buddy_client::MockBuddyApi;
    use buddy_core::CoreError;

    #[test]
    fn test_user_agent() {
        assert!(USER_AGENT.starts_with("buddy-provider/"));
    }

    #[test]
    fn test_configure_rejects_missing_token() {
        let err = Provider::configure(ProviderConfig::new("https://api.buddy.works/workspaces/acme", ""))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ProviderError::Core(CoreError::MissingField { ref field }) if field == "token"
        ));
    }

    #[test]
    fn test_configure_rejects_bad_scheme() {
        let result = Provider::configure(ProviderConfig::new("ftp://buddy.example.com", "t"));
        assert!(matches!(
            result,
            Err(ProviderError::Core(CoreError::InvalidUrl { .. }))
        ));
    }

    #[test]
    fn test_configure_builds_client() {
        let mut config = ProviderConfig::new("https://buddy.example.com/workspaces/acme/", "t");
        config.verify_ssl = false;
        assert!(Provider::configure(config).is_ok());
    }

    #[tokio::test]
    async fn test_resources_share_api() {
        let mock = MockBuddyApi::new();
        let provider = Provider::with_api(Arc::new(mock.clone()));

        let member = provider
            .workspace_members()
            .create(&WorkspaceMemberConfig::new("dev@x.com"))
            .await
            .unwrap();
        let found = provider.member_lookup().lookup("dev@x.com").await.unwrap();
        assert_eq!(found.id, member.id);

        let (state, action) = apply(
            &provider.workspace_variables(),
            None,
            &VariableConfig::new("K", "v"),
        )
        .await
        .unwrap();
        assert_eq!(action, ApplyAction::Created);

        let (_, action) = apply(
            &provider.workspace_variables(),
            Some(&state),
            &VariableConfig::new("K", "v2"),
        )
        .await
        .unwrap();
        assert_eq!(action, ApplyAction::Updated);
        assert_eq!(mock.variable_count(), 1);
    }
}
