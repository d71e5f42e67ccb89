use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use shared::domain::{SessionIdentity, SESSION_USER_KEY};

use crate::SessionStore;

/// Reads and decodes the persisted session identity. Malformed contents are
/// an error for the caller to report, not a panic.
pub async fn session_identity(session: &dyn SessionStore) -> Result<Option<SessionIdentity>> {
    let Some(raw) = session.get_item(SESSION_USER_KEY).await? else {
        return Ok(None);
    };
    let identity =
        serde_json::from_str(&raw).with_context(|| format!("malformed session identity '{raw}'"))?;
    Ok(Some(identity))
}

#[async_trait]
impl SessionStore for storage::SessionDb {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        storage::SessionDb::get_item(self, key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        storage::SessionDb::set_item(self, key, value).await
    }
}

/// In-memory Session Store for hosts without durable storage.
#[derive(Default)]
pub struct MemorySessionStore {
    items: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.lock().await.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
