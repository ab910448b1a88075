//! HTTP transport shared by every typed operation
//!
//! All requests go through [`HttpTransport::execute`], which attaches the
//! bearer token and user agent, checks the single expected status code and
//! returns the raw response body.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};

use crate::error::{ApiError, Result};

/// User agent sent when the caller does not provide one
pub const DEFAULT_USER_AGENT: &str = concat!("buddy-client/", env!("CARGO_PKG_VERSION"));

/// Settings for building a client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Workspace API base URL (a trailing slash is stripped)
    pub base_url: String,
    /// Bearer token
    pub token: String,
    /// Verify the server certificate against the system trust store
    pub verify_ssl: bool,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            verify_ssl: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl From<&buddy_core::ProviderConfig> for ClientConfig {
    fn from(config: &buddy_core::ProviderConfig) -> Self {
        ClientConfig::new(&config.buddy_url, &config.token).with_verify_ssl(config.verify_ssl)
    }
}

/// Expected outcome of a request
#[derive(Debug, Clone, Copy)]
struct Expect {
    status: StatusCode,
    absent_on_not_found: bool,
}

impl Expect {
    fn status(status: StatusCode) -> Self {
        Self {
            status,
            absent_on_not_found: false,
        }
    }

    fn or_absent(mut self) -> Self {
        self.absent_on_not_found = true;
        self
    }
}

/// Authenticated HTTP transport bound to one workspace URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    /// Build the transport and its underlying TLS client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ApiError::InvalidConfig {
                message: "base URL is empty".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| ApiError::InvalidConfig {
                message: e.to_string(),
            })?;

        if !config.verify_ssl {
            tracing::warn!(
                "TLS certificate verification disabled for {}",
                config.base_url
            );
        }

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.base_url),
            token: config.token.clone(),
        })
    }

    /// Normalized base URL (no trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base URL
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST a JSON body, expecting `201 Created`
    pub async fn do_create(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        self.execute(Method::POST, path, Some(body), Expect::status(StatusCode::CREATED))
            .await
            .map(Option::unwrap_or_default)
    }

    /// GET a resource, expecting `200 OK`; `404` yields `None`
    pub async fn do_read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        self.execute(Method::GET, path, None, Expect::status(StatusCode::OK).or_absent())
            .await
    }

    /// GET a collection, expecting `200 OK`; `404` is an error here
    pub async fn do_get(&self, path: &str) -> Result<Vec<u8>> {
        self.execute(Method::GET, path, None, Expect::status(StatusCode::OK))
            .await
            .map(Option::unwrap_or_default)
    }

    /// PATCH a JSON body, expecting `200 OK`
    pub async fn do_patch(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        self.execute(Method::PATCH, path, Some(body), Expect::status(StatusCode::OK))
            .await
            .map(Option::unwrap_or_default)
    }

    /// DELETE a resource, expecting `204 No Content`
    pub async fn do_delete(&self, path: &str) -> Result<()> {
        self.execute(Method::DELETE, path, None, Expect::status(StatusCode::NO_CONTENT))
            .await
            .map(|_| ())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        expect: Expect,
    ) -> Result<Option<Vec<u8>>> {
        let url = self.url_for(path);
        tracing::debug!(%method, %url, "sending request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(%method, %url, status = status.as_u16(), "received response");

        if expect.absent_on_not_found && status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::BodyRead {
                status: status.as_u16(),
                source,
            })?;

        if status != expect.status {
            return Err(ApiError::UnexpectedStatus {
                expected: expect.status.as_u16(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(Some(bytes.to_vec()))
    }
}

/// Strip a single trailing slash from the base URL
fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    url.strip_suffix('/').unwrap_or(url).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.buddy.works/workspaces/acme/"),
            "https://api.buddy.works/workspaces/acme"
        );
        assert_eq!(
            normalize_base_url("https://api.buddy.works/workspaces/acme"),
            "https://api.buddy.works/workspaces/acme"
        );
    }

    #[test]
    fn test_url_for() {
        let transport =
            HttpTransport::new(&ClientConfig::new("https://buddy.example.com/ws/", "t")).unwrap();

        assert_eq!(transport.base_url(), "https://buddy.example.com/ws");
        assert_eq!(
            transport.url_for("variables/12"),
            "https://buddy.example.com/ws/variables/12"
        );
        assert_eq!(
            transport.url_for("/members"),
            "https://buddy.example.com/ws/members"
        );
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let result = HttpTransport::new(&ClientConfig::new("  ", "t"));
        assert!(matches!(result, Err(ApiError::InvalidConfig { .. })));
    }

    #[test]
    fn test_insecure_client_builds() {
        let config = ClientConfig::new("https://self-signed.example.com", "t")
            .with_verify_ssl(false)
            .with_user_agent("buddy-test/1.0");
        assert!(HttpTransport::new(&config).is_ok());
    }

    #[test]
    fn test_default_user_agent() {
        assert!(DEFAULT_USER_AGENT.starts_with("buddy-client/"));
        assert_eq!(
            ClientConfig::new("https://x.example.com", "t").user_agent,
            DEFAULT_USER_AGENT
        );
    }
}
