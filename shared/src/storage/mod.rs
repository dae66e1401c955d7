//! Object storage for raw snapshots.

pub mod archive;
pub mod azure;
pub mod local;

pub use archive::RawArchiver;
pub use azure::AzureBlobStore;
pub use local::LocalStore;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;

/// A key/value blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn name(&self) -> &str;

    /// Write `payload` under `container/key`. With `overwrite == false` an
    /// existing object is an error.
    async fn put(&self, container: &str, key: &str, payload: Vec<u8>, overwrite: bool) -> Result<()>;
}

/// Azure Blob Storage when a connection string is configured, else the local
/// archive directory.
pub fn store_from_config(config: &Config) -> Result<Arc<dyn ObjectStore>> {
    match &config.blob_connection_string {
        Some(conn) => {
            let store = AzureBlobStore::from_connection_string(conn)?;
            info!("Raw snapshots go to Azure Blob Storage account {}", store.account_name());
            Ok(Arc::new(store))
        }
        None => {
            warn!(
                "AZURE_STORAGE_CONNECTION_STRING not set, raw snapshots go to {}",
                config.raw_archive_dir.display()
            );
            Ok(Arc::new(LocalStore::new(config.raw_archive_dir.clone())))
        }
    }
}
