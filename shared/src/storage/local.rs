use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

use super::ObjectStore;
use crate::error::{IngestError, Result};

/// Filesystem-backed store: `{root}/{container}/{key}`.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, container: &str, key: &str) -> Result<PathBuf> {
        let relative = Path::new(container).join(key);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(IngestError::Archive(format!(
                "refusing to write outside the archive root: {}/{}",
                container, key
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn put(&self, container: &str, key: &str, payload: Vec<u8>, overwrite: bool) -> Result<()> {
        let path = self.object_path(container, key)?;
        if !overwrite && tokio::fs::try_exists(&path).await? {
            return Err(IngestError::Archive(format!("{} already exists", path.display())));
        }
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, payload).await?;
        Ok(())
    }
}
