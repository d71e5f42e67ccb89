use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use shared::domain::RoutePath;
use shared::protocol::{AuthToken, BillCreated, BillUpdate, RawBill};

pub mod auth;
pub mod bills;
pub mod format;
pub mod http_store;
pub mod new_bill;
pub mod session;

pub use auth::{AuthError, LoginFlow};
pub use bills::{sort_latest_first, BillList, BillListError};
pub use http_store::HttpRemoteStore;
pub use new_bill::{BillDraft, ChosenFile, NewBillForm, PendingUpload, SubmissionState};
pub use session::{session_identity, MemorySessionStore};

/// Multipart payload of the proof-of-purchase upload: the file itself plus
/// the submitting employee's email.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
    pub email: String,
}

/// Bill sub-capability of the Remote Store Client.
///
/// `create` is the upload call: the service stores the file and allocates
/// the bill's identifier in the same round trip.
#[async_trait]
pub trait BillsService: Send + Sync {
    async fn list(&self) -> Result<Vec<RawBill>>;
    async fn create(&self, upload: FileUpload) -> Result<BillCreated>;
    async fn update(&self, update: BillUpdate) -> Result<()>;
}

/// Account sub-capability of the Remote Store Client. The payload is
/// caller-serialized JSON.
#[async_trait]
pub trait UsersService: Send + Sync {
    async fn create(&self, payload_json: &str) -> Result<()>;
}

/// Abstract capability over the backing persistence/authentication service.
/// Units hold it as `Option<Arc<dyn RemoteStore>>`; an absent store is a
/// supported configuration, not an error.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    fn bills(&self) -> Arc<dyn BillsService>;
    fn users(&self) -> Arc<dyn UsersService>;
    async fn login(&self, credentials_json: &str) -> Result<AuthToken>;
}

/// Key/value persistence for the logged-in user's identity. Values are
/// opaque strings to the store; last write wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>>;
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// Navigation dispatch. Fire-and-forget; routing itself belongs to the host.
pub trait Navigator: Send + Sync {
    fn on_navigate(&self, route: RoutePath);
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
