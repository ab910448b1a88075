//! Resource lifecycle contract

use async_trait::async_trait;

use crate::error::Result;

/// A Buddy object managed through create/read/update/delete
///
/// `Config` is the desired configuration, `State` what was last observed
/// remotely. Every write is followed by a read so returned state always
/// reflects the server.
#[async_trait]
pub trait Resource: Send + Sync {
    type Config: Send + Sync;
    type State: Send + Sync;

    /// Resource type name, e.g. `buddy_workspace_variable`
    const TYPE_NAME: &'static str;

    async fn create(&self, config: &Self::Config) -> Result<Self::State>;

    /// Refresh from the server
    ///
    /// `prior` carries the previously stored state (or `None` when
    /// importing). Returns `Ok(None)` when the object no longer exists.
    async fn read(&self, id: &str, prior: Option<&Self::State>) -> Result<Option<Self::State>>;

    async fn update(&self, state: &Self::State, config: &Self::Config) -> Result<Self::State>;

    async fn delete(&self, state: &Self::State) -> Result<()>;

    /// Whether moving from `state` to `config` needs delete + create
    fn requires_replacement(&self, state: &Self::State, config: &Self::Config) -> bool;
}

/// Outcome of [`apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyAction {
    Created,
    Updated,
    Replaced,
}

/// Converge one resource onto `config`
///
/// Creates when there is no prior state, replaces when an immutable field
/// changed, and updates in place otherwise.
pub async fn apply<R: Resource>(
    resource: &R,
    prior: Option<&R::State>,
    config: &R::Config,
) -> Result<(R::State, ApplyAction)> {
    match prior {
        None => Ok((resource.create(config).await?, ApplyAction::Created)),
        Some(state) if resource.requires_replacement(state, config) => {
            tracing::info!(resource = R::TYPE_NAME, "replacing resource");
            resource.delete(state).await?;
            Ok((resource.create(config).await?, ApplyAction::Replaced))
        }
        Some(state) => Ok((resource.update(state, config).await?, ApplyAction::Updated)),
    }
}
