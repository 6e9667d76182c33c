use async_trait::async_trait;
use reqwest::{header, Client};

use crate::error::{Error, Result};
use crate::models::RepositoryDescriptor;

/// Lists every repository owned by an account on the hosting platform.
#[async_trait]
pub trait RepositoryLister: Send + Sync {
    async fn list_repositories(&self, account: &str) -> Result<Vec<RepositoryDescriptor>>;
}

pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("reposcan/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: "https://api.github.com".to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl RepositoryLister for GitHubClient {
    /// Single unpaginated listing call. A non-success status degrades to an
    /// empty list so the run proceeds with zero repositories; only
    /// transport-level failures surface as errors.
    async fn list_repositories(&self, account: &str) -> Result<Vec<RepositoryDescriptor>> {
        let url = format!("{}/users/{}/repos", self.base_url, account);
        tracing::info!("Fetching repositories for: {}", account);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(
                "Repository listing for {} returned {}, treating as empty",
                account,
                status
            );
            return Ok(Vec::new());
        }

        response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("unexpected listing payload: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Serves a single canned HTTP response on a local port and returns the
    /// base URL to point the client at.
    async fn serve_once(status_line: &str, body: &str) -> String {
        let response = format!(
            "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn non_success_listing_degrades_to_an_empty_list() {
        let base = serve_once("HTTP/1.1 404 Not Found", "{}").await;
        let client = GitHubClient::new(None).unwrap().with_base_url(base);

        let repos = client.list_repositories("ghost").await.unwrap();
        assert!(repos.is_empty());
    }

    #[tokio::test]
    async fn successful_listing_deserializes_descriptors() {
        let body = r#"[{"id":1,"name":"demo","clone_url":"https://example.com/demo.git","html_url":"https://example.com/demo","extra_field":"ignored"}]"#;
        let base = serve_once("HTTP/1.1 200 OK", body).await;
        let client = GitHubClient::new(None).unwrap().with_base_url(base);

        let repos = client.list_repositories("octocat").await.unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].id, 1);
        assert_eq!(repos[0].name, "demo");
        assert_eq!(repos[0].clone_url, "https://example.com/demo.git");
    }

    #[tokio::test]
    async fn malformed_listing_payload_is_an_api_error() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"not":"an array"}"#).await;
        let client = GitHubClient::new(None).unwrap().with_base_url(base);

        let err = client.list_repositories("octocat").await.unwrap_err();
        assert!(matches!(err, Error::GitHubApi(_)));
    }
}
