use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub database_path: String,
    pub scratch_dir: PathBuf,
    pub keep_failed_workspaces: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());

        let database_path = env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "reposcan.db".to_string());

        let scratch_dir = env::var("SCRATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("tmp"));

        let keep_failed_workspaces = match env::var("KEEP_FAILED_WORKSPACES") {
            Ok(raw) => match raw.to_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => {
                    return Err(Error::Config(format!(
                        "KEEP_FAILED_WORKSPACES must be true or false, got {:?}",
                        raw
                    )))
                }
            },
            Err(_) => true,
        };

        Ok(Self {
            github_token,
            database_path,
            scratch_dir,
            keep_failed_workspaces,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Leave a failed repository's workspace on disk for inspection. When
    /// false, workspaces are removed on failure as well as on success.
    pub keep_failed_workspaces: bool,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            keep_failed_workspaces: config.keep_failed_workspaces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so no other reader of these variables runs concurrently.
    #[test]
    fn from_env_reads_overrides_and_rejects_malformed_flags() {
        env::set_var("DATABASE_PATH", "custom.db");
        env::set_var("SCRATCH_DIR", "/var/scratch");
        env::set_var("KEEP_FAILED_WORKSPACES", "false");

        let config = Config::from_env().unwrap();
        assert_eq!(config.database_path, "custom.db");
        assert_eq!(config.scratch_dir, PathBuf::from("/var/scratch"));
        assert!(!config.keep_failed_workspaces);

        env::set_var("KEEP_FAILED_WORKSPACES", "sometimes");
        assert!(matches!(Config::from_env(), Err(Error::Config(_))));

        env::remove_var("DATABASE_PATH");
        env::remove_var("SCRATCH_DIR");
        env::remove_var("KEEP_FAILED_WORKSPACES");

        let config = Config::from_env().unwrap();
        assert_eq!(config.database_path, "reposcan.db");
        assert_eq!(config.scratch_dir, PathBuf::from("tmp"));
        assert!(config.keep_failed_workspaces);
    }
}
