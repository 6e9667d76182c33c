use serde::{Deserialize, Serialize};

/// One entry from the GitHub repository-listing endpoint. Only the fields
/// the pipeline consumes are kept; everything else in the response is
/// ignored during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub id: u64,
    pub name: String,
    pub clone_url: String,
    pub html_url: String,
}

/// Row written to the durable store for every repository, before any fetch
/// is attempted for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub repo_id: u64,
    pub name: String,
    pub html_url: String,
}

impl From<&RepositoryDescriptor> for RepositoryRecord {
    fn from(repo: &RepositoryDescriptor) -> Self {
        Self {
            repo_id: repo.id,
            name: repo.name.clone(),
            html_url: repo.html_url.clone(),
        }
    }
}
