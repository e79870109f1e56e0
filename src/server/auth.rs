//! Bearer-token authentication for the document store server.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::AppState;

/// API key entry in the server config file
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeyEntry {
    pub key: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ServerConfigFile {
    #[serde(default)]
    api_keys: Vec<ApiKeyEntry>,
}

/// Authenticated user info, added to request extensions after auth
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: String,
}

/// Maps API key -> user
#[derive(Debug, Clone, Default)]
pub struct ApiKeyStore {
    keys: HashMap<String, AuthUser>,
}

impl ApiKeyStore {
    pub fn from_entries(entries: impl IntoIterator<Item = ApiKeyEntry>) -> Self {
        let keys = entries
            .into_iter()
            .map(|entry| {
                (
                    entry.key,
                    AuthUser {
                        user_id: entry.user_id,
                    },
                )
            })
            .collect();
        Self { keys }
    }

    /// Load API keys from a YAML config file.
    ///
    /// A missing or unparseable file yields an empty store, so every
    /// authenticated request is rejected.
    pub fn load(config_path: &Path) -> Self {
        let contents = match std::fs::read_to_string(config_path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
                tracing::warn!("No API keys loaded - all authenticated requests will fail");
                return Self::default();
            }
        };

        match serde_yaml::from_str::<ServerConfigFile>(&contents) {
            Ok(config) => {
                let store = Self::from_entries(config.api_keys);
                tracing::info!("Loaded {} API key(s)", store.len());
                store
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file: {}", e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn validate(&self, key: &str) -> Option<AuthUser> {
        self.keys.get(key).cloned()
    }
}

#[derive(Serialize)]
struct AuthError {
    error: &'static str,
    message: &'static str,
}

fn unauthorized(error: &'static str, message: &'static str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(AuthError { error, message })).into_response()
}

/// Rejects requests without a known bearer token; otherwise stores the
/// [`AuthUser`] in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let api_key = match auth_header {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(key) => key,
            None => {
                return unauthorized(
                    "invalid_auth",
                    "Authorization header must use Bearer scheme",
                )
            }
        },
        None => return unauthorized("missing_auth", "Authorization header required"),
    };

    match state.api_keys.validate(api_key) {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => unauthorized("invalid_key", "Invalid API key"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_api_keys() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "api_keys:").unwrap();
        writeln!(file, "  - key: secret-1").unwrap();
        writeln!(file, "    user_id: alice").unwrap();
        writeln!(file, "  - key: secret-2").unwrap();
        writeln!(file, "    user_id: bob").unwrap();

        let store = ApiKeyStore::load(&path);
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.validate("secret-2"),
            Some(AuthUser {
                user_id: "bob".to_string()
            })
        );
        assert!(store.validate("nope").is_none());
    }

    #[test]
    fn test_missing_config_yields_empty_store() {
        let temp_dir = tempdir().unwrap();
        let store = ApiKeyStore::load(&temp_dir.path().join("missing.yaml"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_config_yields_empty_store() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "api_keys: [").unwrap();

        assert!(ApiKeyStore::load(&path).is_empty());
    }
}
