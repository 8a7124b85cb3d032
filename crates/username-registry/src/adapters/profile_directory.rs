//! Profile directory adapters
//!
//! The real profile store lives outside this crate. `InMemoryProfileDirectory`
//! keeps the latest display name per identity so the node and tests can
//! observe what was sent.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::ProfileError;
use crate::ports::ProfileDirectory;

/// Display names keyed by identity
#[derive(Default)]
pub struct InMemoryProfileDirectory {
    names: RwLock<HashMap<String, String>>,
}

impl InMemoryProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest display name recorded for `identity`
    pub async fn display_name(&self, identity: &str) -> Option<String> {
        self.names.read().await.get(identity).cloned()
    }
}

#[async_trait]
impl ProfileDirectory for InMemoryProfileDirectory {
    async fn set_display_name(
        &self,
        identity: &str,
        display_name: &str,
    ) -> Result<(), ProfileError> {
        debug!(identity, display_name, "Recording display name");
        self.names
            .write()
            .await
            .insert(identity.to_string(), display_name.to_string());
        Ok(())
    }
}
