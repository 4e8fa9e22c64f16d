//! User directory client
//!
//! Resolves an email address to the identifier of a user held by the
//! external user service (`GET <base>users/filter?email=<email>`).

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::{AppConfig, ConfigError};

const USERS_FILTER_PATH: &str = "users/filter";

/// Identifier of a user in the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// True when the id is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors returned by a user lookup.
#[derive(Debug, Error)]
pub enum UserLookupError {
    #[error("HTTP error: user API responded with status {status}")]
    Http { status: u16 },
    #[error("Failed to connect to the user API: {0}")]
    Connect(#[source] reqwest::Error),
    #[error("Request to the user API timed out")]
    Timeout(#[source] reqwest::Error),
    #[error("Error reaching the user API: {0}")]
    Request(#[source] reqwest::Error),
    #[error("Malformed user API response: {details}")]
    MalformedResponse { details: String },
    #[error("No user found for {email}")]
    UserNotFound { email: String },
    #[error("Invalid user API base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl UserLookupError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else if err.is_connect() {
            Self::Connect(err)
        } else {
            Self::Request(err)
        }
    }

    /// Short machine-friendly name of the failure, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Connect(_) => "connect",
            Self::Timeout(_) => "timeout",
            Self::Request(_) => "request",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::UserNotFound { .. } => "user_not_found",
            Self::InvalidBaseUrl { .. } => "invalid_base_url",
            Self::Config(_) => "config",
        }
    }
}

/// Lookup of users by email.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Return the id of the first user registered with `email`.
    async fn fetch_user_id(&self, email: &str) -> Result<UserId, UserLookupError>;
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Text(String),
    Number(i64),
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: RawUserId,
}

impl From<RawUserId> for UserId {
    fn from(raw: RawUserId) -> Self {
        match raw {
            RawUserId::Text(id) => UserId(id),
            RawUserId::Number(id) => UserId(id.to_string()),
        }
    }
}

/// HTTP client for the user directory service.
#[derive(Debug, Clone)]
pub struct UserDirectoryClient {
    http_client: Client,
    endpoint: Url,
}

impl UserDirectoryClient {
    /// Build a client for the directory rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UserLookupError> {
        let endpoint = Self::endpoint_for(base_url)?;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UserLookupError::Request)?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// Build a client from `user_service_api` and `user_service_timeout_secs`.
    pub fn from_config(config: &AppConfig) -> Result<Self, UserLookupError> {
        let base_url = config.require_user_service_api()?;
        Self::new(base_url, config.user_service_timeout())
    }

    /// Full lookup endpoint (`<base>users/filter`).
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn endpoint_for(base_url: &str) -> Result<Url, UserLookupError> {
        let invalid = |reason: String| UserLookupError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        base.join(USERS_FILTER_PATH)
            .map_err(|e| invalid(e.to_string()))
    }
}

#[async_trait]
impl UserDirectory for UserDirectoryClient {
    async fn fetch_user_id(&self, email: &str) -> Result<UserId, UserLookupError> {
        let response = self
            .http_client
            .get(self.endpoint.clone())
            .query(&[("email", email)])
            .send()
            .await
            .map_err(UserLookupError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UserLookupError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(UserLookupError::from_transport)?;
        let records: Vec<UserRecord> =
            serde_json::from_str(&body).map_err(|e| UserLookupError::MalformedResponse {
                details: e.to_string(),
            })?;

        let user_id = records
            .into_iter()
            .next()
            .map(|record| UserId::from(record.id))
            .ok_or_else(|| UserLookupError::UserNotFound {
                email: email.to_string(),
            })?;

        if user_id.is_blank() {
            return Err(UserLookupError::MalformedResponse {
                details: "user record has an empty id".to_string(),
            });
        }
        Ok(user_id)
    }
}

/// Resolve the operator's user id, logging and discarding any failure.
///
/// A blank id counts as no user.
pub async fn resolve_operator(directory: &dyn UserDirectory, email: &str) -> Option<UserId> {
    match directory.fetch_user_id(email).await {
        Ok(user_id) if user_id.is_blank() => {
            tracing::warn!(email = %email, "User lookup returned an empty id");
            None
        }
        Ok(user_id) => Some(user_id),
        Err(err) => {
            tracing::warn!(
                email = %email,
                error_kind = err.kind(),
                error = %err,
                "User lookup failed"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const OPERATOR: &str = "ccrowder@capsuleio.com";

    fn client_for(server: &MockServer) -> UserDirectoryClient {
        UserDirectoryClient::new(&format!("{}/api/", server.uri()), Duration::from_secs(5))
            .unwrap()
    }

    async fn mount(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api/users/filter"))
            .and(query_param("email", OPERATOR))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[test]
    fn endpoint_appends_missing_slash() {
        let with_slash =
            UserDirectoryClient::new("http://users.local/api/", Duration::from_secs(1)).unwrap();
        let without_slash =
            UserDirectoryClient::new("http://users.local/api", Duration::from_secs(1)).unwrap();

        assert_eq!(
            with_slash.endpoint().as_str(),
            "http://users.local/api/users/filter"
        );
        assert_eq!(with_slash.endpoint(), without_slash.endpoint());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        for base in ["not a url", "ftp://users.local/"] {
            assert!(matches!(
                UserDirectoryClient::new(base, Duration::from_secs(1)),
                Err(UserLookupError::InvalidBaseUrl { .. })
            ));
        }
    }

    #[test]
    fn from_config_requires_user_service_api() {
        let config = AppConfig::default();
        assert!(matches!(
            UserDirectoryClient::from_config(&config),
            Err(UserLookupError::Config(ConfigError::MissingUserServiceApi))
        ));
    }

    #[tokio::test]
    async fn returns_first_string_id() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!([
                {"id": "u-42", "email": OPERATOR},
                {"id": "u-43", "email": OPERATOR}
            ])),
        )
        .await;

        let user_id = client_for(&server).fetch_user_id(OPERATOR).await.unwrap();
        assert_eq!(user_id, UserId::new("u-42"));
    }

    #[tokio::test]
    async fn accepts_numeric_id() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!([{"id": 42}])),
        )
        .await;

        let user_id = client_for(&server).fetch_user_id(OPERATOR).await.unwrap();
        assert_eq!(user_id.as_str(), "42");
    }

    #[tokio::test]
    async fn server_error_maps_to_http() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(503)).await;

        let err = client_for(&server)
            .fetch_user_id(OPERATOR)
            .await
            .unwrap_err();
        assert!(matches!(err, UserLookupError::Http { status: 503 }));
    }

    #[tokio::test]
    async fn empty_array_is_user_not_found() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;

        let err = client_for(&server)
            .fetch_user_id(OPERATOR)
            .await
            .unwrap_err();
        assert!(matches!(err, UserLookupError::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn unexpected_shapes_are_malformed() {
        for body in [json!({"id": "u-42"}), json!([{"name": "no id"}]), json!([{"id": null}])] {
            let server = MockServer::start().await;
            mount(&server, ResponseTemplate::new(200).set_body_json(body)).await;

            let err = client_for(&server)
                .fetch_user_id(OPERATOR)
                .await
                .unwrap_err();
            assert!(
                matches!(err, UserLookupError::MalformedResponse { .. }),
                "unexpected error: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn blank_id_is_malformed() {
        for body in [json!([{"id": ""}]), json!([{"id": "   "}])] {
            let server = MockServer::start().await;
            mount(&server, ResponseTemplate::new(200).set_body_json(body)).await;

            let client = client_for(&server);
            let err = client.fetch_user_id(OPERATOR).await.unwrap_err();
            assert!(
                matches!(err, UserLookupError::MalformedResponse { .. }),
                "unexpected error: {err:?}"
            );
            assert_eq!(resolve_operator(&client, OPERATOR).await, None);
        }
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": "u-42"}]))
                .set_delay(Duration::from_secs(2)),
        )
        .await;

        let client = UserDirectoryClient::new(
            &format!("{}/api/", server.uri()),
            Duration::from_millis(100),
        )
        .unwrap();

        let err = client.fetch_user_id(OPERATOR).await.unwrap_err();
        assert!(matches!(err, UserLookupError::Timeout(_)), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn closed_port_is_connect_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client =
            UserDirectoryClient::new(&format!("http://127.0.0.1:{port}/"), Duration::from_secs(2))
                .unwrap();

        let err = client.fetch_user_id(OPERATOR).await.unwrap_err();
        assert!(matches!(err, UserLookupError::Connect(_)), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn resolve_operator_collapses_errors() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(500)).await;

        assert_eq!(resolve_operator(&client_for(&server), OPERATOR).await, None);
    }
}
