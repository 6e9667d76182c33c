use std::fmt;

/// One unit of work completed by the pipeline, reported synchronously as it
/// happens. Presentation layers render these however they like; the
/// pipeline only sees the `ProgressSink` trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    RepositoriesListed {
        account: String,
        count: usize,
    },
    RepositoryStarted {
        name: String,
    },
    FileScanned {
        file_name: String,
        env_count: usize,
        port_count: usize,
        frameworks: Vec<String>,
    },
    RepositoryCompleted {
        name: String,
        files_scanned: usize,
    },
    RepositoryFailed {
        name: String,
        reason: String,
    },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::RepositoriesListed { account, count } => {
                write!(f, "found {} repositories for {}", count, account)
            }
            ProgressEvent::RepositoryStarted { name } => write!(f, "analyzing {}", name),
            ProgressEvent::FileScanned {
                file_name,
                env_count,
                port_count,
                frameworks,
            } => write!(
                f,
                "{}: env={} ports={} frameworks=[{}]",
                file_name,
                env_count,
                port_count,
                frameworks.join(", ")
            ),
            ProgressEvent::RepositoryCompleted {
                name,
                files_scanned,
            } => write!(f, "{}: {} files scanned", name, files_scanned),
            ProgressEvent::RepositoryFailed { name, reason } => {
                write!(f, "{} failed: {}", name, reason)
            }
        }
    }
}

/// Receives progress events from the pipeline. Implementations must be
/// cheap and must never influence the pipeline's outcome.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Forwards events to a tokio mpsc channel. Send errors are ignored: a
/// consumer that has gone away must not fail the run.
pub struct ChannelSink {
    tx: tokio::sync::mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new(tx: tokio::sync::mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelSink {
    fn report(&self, event: ProgressEvent) {
        let _ = self.tx.send(event);
    }
}

/// Discards all events.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&self, _event: ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_render_human_readable_lines() {
        let event = ProgressEvent::FileScanned {
            file_name: "app/.env".to_string(),
            env_count: 2,
            port_count: 1,
            frameworks: vec!["Flask".to_string()],
        };
        assert_eq!(event.to_string(), "app/.env: env=2 ports=1 frameworks=[Flask]");

        let event = ProgressEvent::RepositoriesListed {
            account: "octocat".to_string(),
            count: 0,
        };
        assert_eq!(event.to_string(), "found 0 repositories for octocat");
    }

    #[test]
    fn channel_sink_survives_a_dropped_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        ChannelSink::new(tx).report(ProgressEvent::RepositoryStarted {
            name: "demo".to_string(),
        });
    }
}
