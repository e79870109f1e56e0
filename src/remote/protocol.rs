//! JSON shapes exchanged with the document store server.

use serde::{Deserialize, Serialize};

use crate::db::codec::{self, CodecError};
use crate::models::UserData;

/// Collection holding one `UserDataDocument` per user.
pub const USERS_COLLECTION: &str = "users";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentList {
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
}

/// Remote representation of `UserData`: a flat document whose collection
/// fields are JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataDocument {
    pub user_preferences: String,
    pub hives: String,
    /// Absent in documents written before tasks were synced.
    #[serde(default)]
    pub tasks: Option<String>,
    pub last_updated: i64,
    pub user_id: String,
    #[serde(default)]
    pub is_user_premium: bool,
}

impl UserDataDocument {
    /// Encodes `data` for the given owner, who replaces whatever `data.user_id` holds.
    pub fn encode(data: &UserData, user_id: &str) -> Result<Self, CodecError> {
        Ok(Self {
            user_preferences: codec::encode(&data.user_preferences)?,
            hives: codec::encode(&data.hives)?,
            tasks: Some(codec::encode(&data.tasks)?),
            last_updated: data.last_updated,
            user_id: user_id.to_string(),
            is_user_premium: data.is_user_premium,
        })
    }

    pub fn decode(self) -> Result<UserData, CodecError> {
        let tasks = match self.tasks.as_deref() {
            None | Some("") => Vec::new(),
            Some(text) => codec::decode(text)?,
        };
        Ok(UserData {
            user_preferences: codec::decode(&self.user_preferences)?,
            hives: codec::decode(&self.hives)?,
            tasks,
            last_updated: self.last_updated,
            user_id: self.user_id,
            is_user_premium: self.is_user_premium,
        })
    }
}
