//! The cloud copy of the user's data.
//!
//! The remote store is a document database reached over HTTP. Sync happens
//! at the granularity of the whole [`UserData`] aggregate.

mod client;
mod error;
pub mod protocol;

pub use client::{check_server, Identity, RemoteRepository};
pub use error::RemoteError;

use crate::models::UserData;

/// The remote half of reconciliation.
#[allow(async_fn_in_trait)]
pub trait RemoteUserData {
    /// `Ok(None)` means the remote store has no copy yet.
    async fn get_user_data(&self) -> Result<Option<UserData>, RemoteError>;

    async fn update_user_data(&self, data: &UserData) -> Result<(), RemoteError>;
}
