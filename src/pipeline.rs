use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::github::RepositoryLister;
use crate::models::{RepositoryDescriptor, RepositoryRecord, SignalRecord};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::scan::{walk_workspace, SignalExtractor};
use crate::source::SourceFetcher;
use crate::storage::SignalSink;

/// Totals for one completed run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    pub repositories: usize,
    pub repositories_failed: usize,
    pub files_scanned: usize,
}

/// Sequential per-account batch run: list once, then for each repository
/// record it, fetch it, scan its files, and clean up before moving on.
pub struct ScanPipeline {
    lister: Arc<dyn RepositoryLister>,
    fetcher: Arc<dyn SourceFetcher>,
    sink: Arc<dyn SignalSink>,
    progress: Arc<dyn ProgressSink>,
    extractor: SignalExtractor,
    config: PipelineConfig,
}

impl ScanPipeline {
    pub fn new(
        lister: impl RepositoryLister + 'static,
        fetcher: impl SourceFetcher + 'static,
        sink: impl SignalSink + 'static,
        progress: impl ProgressSink + 'static,
        config: PipelineConfig,
    ) -> Self {
        Self {
            lister: Arc::new(lister),
            fetcher: Arc::new(fetcher),
            sink: Arc::new(sink),
            progress: Arc::new(progress),
            extractor: SignalExtractor::new(),
            config,
        }
    }

    pub async fn scan_account(&self, account: &str) -> Result<ScanSummary> {
        let repos = self.lister.list_repositories(account).await?;
        self.progress.report(ProgressEvent::RepositoriesListed {
            account: account.to_string(),
            count: repos.len(),
        });

        let mut summary = ScanSummary {
            repositories: repos.len(),
            ..Default::default()
        };

        for repo in &repos {
            // The repository row is written before any fetch is attempted,
            // so a failed clone still leaves a record of the repository.
            self.sink.record_repository(&RepositoryRecord::from(repo))?;
            self.progress.report(ProgressEvent::RepositoryStarted {
                name: repo.name.clone(),
            });

            match self.scan_repository(repo).await {
                Ok(files_scanned) => {
                    summary.files_scanned += files_scanned;
                    self.progress.report(ProgressEvent::RepositoryCompleted {
                        name: repo.name.clone(),
                        files_scanned,
                    });
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    summary.repositories_failed += 1;
                    tracing::warn!("Skipping {}: {}", repo.name, e);
                    self.progress.report(ProgressEvent::RepositoryFailed {
                        name: repo.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(summary)
    }

    /// Fetch, walk, extract, and persist one repository. Returns the number
    /// of files scanned. The workspace is removed on success; on failure it
    /// is left in place unless the config says otherwise.
    async fn scan_repository(&self, repo: &RepositoryDescriptor) -> Result<usize> {
        let workspace = self.fetcher.fetch(&repo.clone_url, &repo.name).await?;

        let result = self.scan_workspace(repo, &workspace);

        match &result {
            Ok(_) => tokio::fs::remove_dir_all(&workspace).await?,
            Err(_) if !self.config.keep_failed_workspaces => {
                if let Err(e) = tokio::fs::remove_dir_all(&workspace).await {
                    tracing::warn!(
                        "Failed to remove workspace {}: {}",
                        workspace.display(),
                        e
                    );
                }
            }
            Err(_) => {}
        }

        result
    }

    fn scan_workspace(&self, repo: &RepositoryDescriptor, workspace: &Path) -> Result<usize> {
        let mut files_scanned = 0;

        for file in walk_workspace(workspace) {
            // A file that cannot be read degrades to an empty record; the
            // scan itself never aborts on a single file.
            let signals = match self.extractor.extract(&file.absolute) {
                Ok(signals) => signals,
                Err(e) => {
                    tracing::debug!("Unreadable file {}: {}", file.absolute.display(), e);
                    Default::default()
                }
            };

            let file_name = file.relative.to_string_lossy().into_owned();
            let record = SignalRecord::new(repo.id, file_name.clone(), signals);
            self.sink.record_file(&record)?;
            files_scanned += 1;

            self.progress.report(ProgressEvent::FileScanned {
                file_name,
                env_count: record.signals.env_assignments.len(),
                port_count: record.signals.port_references.len(),
                frameworks: record.signals.frameworks.iter().cloned().collect(),
            });
        }

        Ok(files_scanned)
    }
}
