//! Buddy API Client
//!
//! HTTP adapter for the Buddy workspace REST API. It covers:
//!
//! - **Variables**: Workspace and project scoped, sharing one endpoint
//! - **Workspace members**: Invitation by email, admin flag, removal
//! - **Project members**: Permission set grants keyed by project and member
//! - **Member lookup**: Exact email match over the member listing
//!
//! ## Example
//!
//! ```rust,no_run
//! use buddy_client::{BuddyApi, BuddyClient, ClientConfig};
//! use buddy_core::VariableSpec;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BuddyClient::new(ClientConfig::new(
//!     "https://api.buddy.works/workspaces/acme",
//!     "personal-access-token",
//! ))?;
//!
//! let created = client
//!     .create_workspace_variable(&VariableSpec::new("DEPLOY_ENV", "staging"))
//!     .await?;
//!
//! let read = client.read_workspace_variable(created.id).await?;
//! assert!(read.exists());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Model
//!
//! - Reads answer `404` with the record's default value, not an error
//! - Any other unexpected status becomes [`ApiError::UnexpectedStatus`]
//!   carrying the status code and the raw response body
//! - Nothing is retried

pub mod api;
pub mod error;
pub mod http;
pub mod mock;

// Re-exports for convenience
pub use api::{BuddyApi, BuddyClient, MEMBER_LOOKUP_PAGE_SIZE};
pub use error::{ApiError, Result};
pub use http::{ClientConfig, DEFAULT_USER_AGENT, HttpTransport};
pub use mock::{MockBuddyApi, OperationCounts};
