//! Fetches the unified diff of a single commit.
//!
//! GitHub serves the diff of any commit page at `<commit url>.diff`, so no API
//! token or JSON decoding is involved.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("unexpected response for {url}: {status}")]
    UnexpectedStatus { url: String, status: StatusCode },

    #[error("failed to fetch {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Diff URL for a commit page URL
pub fn diff_url(commit_url: &str) -> String {
    format!("{}.diff", commit_url)
}

/// HTTP client for diff downloads, created per request and dropped with it.
pub struct DiffClient {
    client: reqwest::Client,
}

impl DiffClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("commitmail/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// GET `url` and return the body; any final status >= 300 is an error.
    pub async fn fetch(&self, url: &str) -> Result<String, DiffError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DiffError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.as_u16() >= 300 {
            return Err(DiffError::UnexpectedStatus {
                url: response.url().to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| DiffError::Request {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[test]
    fn test_diff_url() {
        assert_eq!(
            diff_url("https://github.com/python/cpython/commit/2fe2b1f"),
            "https://github.com/python/cpython/commit/2fe2b1f.diff"
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_body() -> Result<()> {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/commit/abc.diff")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("+x\n-y\n")
            .create_async()
            .await;

        let client = DiffClient::new()?;
        let diff = client
            .fetch(&diff_url(&format!("{}/commit/abc", server.url())))
            .await?;

        mock.assert_async().await;
        assert_eq!(diff, "+x\n-y\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_rejects_error_status() -> Result<()> {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/commit/missing.diff")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/commit/missing.diff", server.url());
        let err = DiffClient::new()?.fetch(&url).await.unwrap_err();

        match &err {
            DiffError::UnexpectedStatus { status, .. } => {
                assert_eq!(*status, StatusCode::NOT_FOUND)
            }
            other => panic!("Expected UnexpectedStatus, got {:?}", other),
        }
        assert!(err.to_string().contains(&url));
        assert!(err.to_string().contains("404"));
        Ok(())
    }
}
