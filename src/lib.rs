pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod pipeline;
pub mod progress;
pub mod scan;
pub mod source;
pub mod storage;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use github::{GitHubClient, RepositoryLister};
pub use pipeline::{ScanPipeline, ScanSummary};
pub use progress::{ChannelSink, NullSink, ProgressEvent, ProgressSink};
pub use source::{GitCliFetcher, SourceFetcher};
pub use storage::{SignalSink, Storage};
