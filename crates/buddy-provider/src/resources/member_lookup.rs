//! Data source `buddy_workspace_member`: find a member by email

use std::sync::Arc;

use buddy_client::BuddyApi;

use crate::error::{ProviderError, Result};
use crate::resources::workspace_member::WorkspaceMemberState;

pub struct MemberLookup {
    api: Arc<dyn BuddyApi>,
}

impl MemberLookup {
    pub const TYPE_NAME: &'static str = "buddy_workspace_member";

    pub fn new(api: Arc<dyn BuddyApi>) -> Self {
        Self { api }
    }

    /// Resolve an email to a member; the match is exact and case-sensitive
    pub async fn lookup(&self, email: &str) -> Result<WorkspaceMemberState> {
        tracing::info!(data_source = Self::TYPE_NAME, email, "looking up member");
        let member = self.api.get_user(email).await?;
        if member.is_empty() {
            return Err(ProviderError::UserNotFound {
                email: email.to_string(),
            });
        }
        Ok(WorkspaceMemberState::from(&member))
    }
}
