//! HTTP client for the remote document store.

use std::time::Duration;

use super::error::RemoteError;
use super::protocol::{DocumentList, MeResponse, UserDataDocument, USERS_COLLECTION};
use crate::config::SyncConfig;
use crate::models::UserData;

/// How long the health check waits before giving up.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// The signed-in user, as reported by the server's `/me` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: String,
}

/// Whole-aggregate access to the user's document in the remote store.
///
/// Holds no mutable state; every call is an independent request.
#[derive(Debug, Clone)]
pub struct RemoteRepository {
    http: reqwest::Client,
    server_url: String,
    api_key: String,
    identity: Identity,
}

impl RemoteRepository {
    /// Resolves the signed-in user via `/me` and builds a repository for them.
    pub async fn connect(config: &SyncConfig) -> Result<Self, RemoteError> {
        let server_url = config
            .server_url
            .clone()
            .ok_or(RemoteError::NotConfigured)?;
        let api_key = config.api_key.clone().ok_or(RemoteError::NotConfigured)?;

        let http = reqwest::Client::new();
        let response = http
            .get(build_http_url(&server_url, "/me"))
            .bearer_auth(&api_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(RemoteError::NotAuthenticated);
        }
        let me: MeResponse = check_status(response).await?.json().await?;

        Self::build(http, server_url, api_key, Identity { user_id: me.user_id })
    }

    /// Builds a repository for an already known identity.
    ///
    /// An empty user id means nobody is signed in, which is a precondition
    /// failure rather than something to retry.
    pub fn with_identity(
        server_url: String,
        api_key: String,
        identity: Identity,
    ) -> Result<Self, RemoteError> {
        Self::build(reqwest::Client::new(), server_url, api_key, identity)
    }

    fn build(
        http: reqwest::Client,
        server_url: String,
        api_key: String,
        identity: Identity,
    ) -> Result<Self, RemoteError> {
        if identity.user_id.is_empty() {
            return Err(RemoteError::NotAuthenticated);
        }
        Ok(Self {
            http,
            server_url,
            api_key,
            identity,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Fetches the first document of the users collection.
    ///
    /// `Ok(None)` when the query succeeds but the collection is empty;
    /// transport and status failures are errors.
    // TODO: filter the query by the signed-in user id once existing documents are migrated.
    pub async fn get_user_data(&self) -> Result<Option<UserData>, RemoteError> {
        let url = build_http_url(
            &self.server_url,
            &format!("/collections/{}/documents?limit=1", USERS_COLLECTION),
        );
        let response = self.http.get(url).bearer_auth(&self.api_key).send().await?;
        let list: DocumentList = check_status(response).await?.json().await?;

        let Some(record) = list.documents.into_iter().next() else {
            tracing::debug!("remote users collection is empty");
            return Ok(None);
        };

        let document: UserDataDocument = serde_json::from_value(record.data)
            .map_err(|e| RemoteError::Decode(e.into()))?;
        Ok(Some(document.decode()?))
    }

    /// Writes `data` as the signed-in user's document. Failures are logged
    /// and returned; nothing is retried.
    pub async fn update_user_data(&self, data: &UserData) -> Result<(), RemoteError> {
        let result = self.put_user_data(data).await;
        if let Err(e) = &result {
            tracing::warn!(user_id = %self.identity.user_id, "remote update failed: {}", e);
        }
        result
    }

    async fn put_user_data(&self, data: &UserData) -> Result<(), RemoteError> {
        let document = UserDataDocument::encode(data, &self.identity.user_id)?;
        let url = build_http_url(
            &self.server_url,
            &format!(
                "/collections/{}/documents/{}",
                USERS_COLLECTION,
                urlencoding::encode(&self.identity.user_id)
            ),
        );

        let response = self
            .http
            .put(url)
            .bearer_auth(&self.api_key)
            .json(&document)
            .send()
            .await?;
        check_status(response).await?;

        tracing::debug!(last_updated = data.last_updated, "pushed user data");
        Ok(())
    }
}

impl super::RemoteUserData for RemoteRepository {
    async fn get_user_data(&self) -> Result<Option<UserData>, RemoteError> {
        RemoteRepository::get_user_data(self).await
    }

    async fn update_user_data(&self, data: &UserData) -> Result<(), RemoteError> {
        RemoteRepository::update_user_data(self, data).await
    }
}

/// Returns true if the server answers its health endpoint in time.
pub async fn check_server(server_url: &str) -> bool {
    let client = match reqwest::Client::builder().timeout(HEALTH_TIMEOUT).build() {
        Ok(c) => c,
        Err(_) => return false,
    };
    match client.get(build_http_url(server_url, "/health")).send().await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status(status.as_u16(), body))
}

/// Joins a server URL and a path, defaulting to http for bare hosts.
fn build_http_url(server_url: &str, path: &str) -> String {
    let base_url = if server_url.starts_with("http://") || server_url.starts_with("https://") {
        server_url.to_string()
    } else {
        format!("http://{}", server_url)
    };

    format!("{}{}", base_url.trim_end_matches('/'), path)
}
