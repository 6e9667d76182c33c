use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

use crate::error::{Error, Result};

/// Obtains a fresh working copy of a repository under a scratch directory.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetch `clone_url` into the workspace derived from `name`, returning
    /// the workspace root. Any pre-existing workspace for that name is
    /// removed first so a retry always starts clean.
    async fn fetch(&self, clone_url: &str, name: &str) -> Result<PathBuf>;
}

/// Fetches by shelling out to the `git` CLI.
pub struct GitCliFetcher {
    scratch_dir: PathBuf,
}

impl GitCliFetcher {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
        }
    }

    fn workspace_path(&self, name: &str) -> PathBuf {
        self.scratch_dir.join(name)
    }
}

#[async_trait]
impl SourceFetcher for GitCliFetcher {
    async fn fetch(&self, clone_url: &str, name: &str) -> Result<PathBuf> {
        let dest = self.workspace_path(name);

        if dest.exists() {
            tracing::debug!("Removing stale workspace: {}", dest.display());
            tokio::fs::remove_dir_all(&dest).await?;
        }
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::debug!("Cloning {} into {}", clone_url, dest.display());
        let output = Command::new("git")
            .arg("clone")
            .arg(clone_url)
            .arg(&dest)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Fetch(format!(
                "git clone of {} exited with {}: {}",
                clone_url,
                output.status,
                stderr.trim()
            )));
        }

        Ok(dest)
    }
}
