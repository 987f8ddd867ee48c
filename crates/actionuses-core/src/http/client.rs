//! GitHub REST API client for repository contents
//!
//! Binds exactly two endpoints:
//! - `GET /repos/{owner}/{repo}/contents/{path}`
//! - `PUT /repos/{owner}/{repo}/contents/{path}`

use crate::error::{Error, Result};
use crate::traits::ContentStore;
use crate::types::{Committer, CommitDescriptor, RemoteFile, RepoCoordinates, WriteReceipt};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Default API root when `GITHUB_API_URL` is not set
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub API response for a single file
#[derive(Debug, Deserialize)]
struct GitHubContent {
    /// Blob SHA
    sha: String,
    /// Base64 content, wrapped at 60 columns; empty for files over 1 MB
    #[serde(default)]
    content: String,
}

/// Request body for create-or-update
#[derive(Debug, Serialize)]
struct PutContentsBody<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    committer: Committer<'a>,
}

/// GitHub API response for create-or-update
#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    content: PutContentsFile,
}

#[derive(Debug, Deserialize)]
struct PutContentsFile {
    sha: String,
}

/// Decode contents API base64, which embeds line breaks
pub(crate) fn decode_content(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(STANDARD.decode(compact)?)
}

/// GitHub contents API client
pub struct GitHubApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for GitHubApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubApiClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl GitHubApiClient {
    /// Create a new GitHub API client
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("action-uses/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            base_url,
            token: token.into(),
        }
    }

    /// Build the contents URL, percent-encoding every path segment
    pub fn contents_url(&self, repo: &RepoCoordinates, path: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid GitHub API URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid GitHub API URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.repo.as_str(), "contents"])
            .extend(path.split('/').filter(|s| !s.is_empty()));

        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: reqwest::Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .bearer_auth(&self.token)
    }

    /// Map rate limiting responses; other statuses pass through
    fn check_rate_limit(response: &reqwest::Response) -> Result<()> {
        let status = response.status();
        if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
            return Ok(());
        }

        let remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok());

        match remaining {
            Some("0") => Err(Error::RateLimitExceeded(
                "GitHub API rate limit exceeded. Remaining: 0".to_string(),
            )),
            _ if status == StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimitExceeded(
                "GitHub API secondary rate limit hit".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Fetch a file; `Ok(None)` when it does not exist
    pub async fn fetch_file(
        &self,
        repo: &RepoCoordinates,
        path: &str,
    ) -> Result<Option<RemoteFile>> {
        let url = self.contents_url(repo, path)?;

        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Failed to fetch {}: {}", path, e.without_url())))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::check_rate_limit(&response)?;

        if !response.status().is_success() {
            return Err(Error::Http(format!(
                "GitHub API returned error for {}: {}",
                path,
                response.status()
            )));
        }

        let file: GitHubContent = response.json().await.map_err(|e| {
            Error::Http(format!(
                "Failed to parse contents response for {}: {}",
                path,
                e.without_url()
            ))
        })?;

        Ok(Some(RemoteFile {
            content: decode_content(&file.content)?,
            sha: file.sha,
        }))
    }

    /// Create or update a file
    pub async fn put_file(&self, commit: &CommitDescriptor<'_>) -> Result<WriteReceipt> {
        let url = self.contents_url(commit.repo, commit.path)?;

        let body = PutContentsBody {
            message: commit.message,
            content: STANDARD.encode(commit.content),
            sha: commit.sha,
            committer: commit.committer,
        };

        let response = self
            .request(reqwest::Method::PUT, url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                Error::Http(format!(
                    "Failed to write {}: {}",
                    commit.path,
                    e.without_url()
                ))
            })?;

        Self::check_rate_limit(&response)?;

        let status = response.status();
        if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(Error::Conflict(format!(
                "{} was modified concurrently or the version identifier is missing ({})",
                commit.path, status
            )));
        }

        if !status.is_success() {
            return Err(Error::Http(format!(
                "GitHub API returned error for {}: {}",
                commit.path, status
            )));
        }

        let written: PutContentsResponse = response.json().await.map_err(|e| {
            Error::Http(format!(
                "Failed to parse write response for {}: {}",
                commit.path,
                e.without_url()
            ))
        })?;

        Ok(WriteReceipt {
            sha: written.content.sha,
        })
    }
}

impl ContentStore for GitHubApiClient {
    fn get_content<'a>(
        &'a self,
        repo: &'a RepoCoordinates,
        path: &'a str,
    ) -> impl Future<Output = Result<Option<RemoteFile>>> + Send + 'a {
        self.fetch_file(repo, path)
    }

    fn create_or_update_file_contents<'a>(
        &'a self,
        commit: &'a CommitDescriptor<'a>,
    ) -> impl Future<Output = Result<WriteReceipt>> + Send + 'a {
        self.put_file(commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn repo() -> RepoCoordinates {
        RepoCoordinates::new("octo", "reports")
    }

    #[test]
    fn test_github_client_creation() {
        let client = GitHubApiClient::new("https://api.github.com/", "test_token");
        assert_eq!(client.base_url, "https://api.github.com");
        assert_eq!(client.token, "test_token");
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = GitHubApiClient::new(DEFAULT_API_URL, "ghp_secret");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("ghp_secret"));
    }

    #[test]
    fn test_contents_url() {
        let client = GitHubApiClient::new(DEFAULT_API_URL, "t");
        let url = client.contents_url(&repo(), "reports/out.csv").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octo/reports/contents/reports/out.csv"
        );
    }

    #[test]
    fn test_contents_url_enterprise_server_prefix() {
        let client = GitHubApiClient::new("https://ghe.example.com/api/v3", "t");
        let url = client.contents_url(&repo(), "out.md").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/octo/reports/contents/out.md"
        );
    }

    #[test]
    fn test_contents_url_encodes_segments() {
        let client = GitHubApiClient::new(DEFAULT_API_URL, "t");
        let url = client.contents_url(&repo(), "my reports/a#b.csv").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octo/reports/contents/my%20reports/a%23b.csv"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let client = GitHubApiClient::new("not a url", "t");
        assert!(client.contents_url(&repo(), "x").is_err());
    }

    #[test]
    fn test_decode_content_with_line_breaks() {
        // GitHub wraps base64 at 60 columns
        let encoded = "YSxiCjEs\nMgo=\n";
        assert_eq!(decode_content(encoded).unwrap(), b"a,b\n1,2\n");
    }

    #[test]
    fn test_decode_content_empty() {
        assert_eq!(decode_content("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_content_invalid() {
        assert!(decode_content("@@@").is_err());
    }

    #[test]
    fn test_put_body_omits_missing_sha() {
        let body = PutContentsBody {
            message: "msg",
            content: STANDARD.encode(b"a,b\n"),
            sha: None,
            committer: Committer::ACTIONS_BOT,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sha").is_none());
        assert_eq!(json["content"], "YSxiCg==");
        assert_eq!(json["committer"]["name"], "github-actions[bot]");
    }

    #[test]
    fn test_put_body_includes_sha() {
        let body = PutContentsBody {
            message: "msg",
            content: String::new(),
            sha: Some("abc123"),
            committer: Committer::ACTIONS_BOT,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["sha"], "abc123");
    }

    #[test]
    fn test_content_response_parsing() {
        let json = r#"{"type":"file","sha":"3d21ec5","content":"YSxiCg==\n","encoding":"base64"}"#;
        let file: GitHubContent = serde_json::from_str(json).unwrap();
        assert_eq!(file.sha, "3d21ec5");
        assert_eq!(decode_content(&file.content).unwrap(), b"a,b\n");
    }

    /// Serve one canned HTTP response on a loopback port.
    ///
    /// Returns the base URL and a handle resolving to the raw request text.
    async fn serve_once(
        status: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n",
            status,
            body.len()
        );
        for (name, value) in headers {
            response.push_str(&format!("{}: {}\r\n", name, value));
        }
        response.push_str("\r\n");
        response.push_str(body);

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
                    let length = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    fn commit<'a>(repo: &'a RepoCoordinates, sha: Option<&'a str>) -> CommitDescriptor<'a> {
        CommitDescriptor {
            repo,
            path: "reports/out.csv",
            message: "msg",
            content: b"a,b\n",
            sha,
            committer: Committer::ACTIONS_BOT,
        }
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_none() {
        let (url, server) = serve_once("404 Not Found", &[], r#"{"message":"Not Found"}"#).await;
        let client = GitHubApiClient::new(url, "ghs_token");

        let file = client.fetch_file(&repo(), "reports/out.csv").await.unwrap();
        assert!(file.is_none());

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /repos/octo/reports/contents/reports/out.csv "));
        let lower = request.to_ascii_lowercase();
        assert!(lower.contains("authorization: bearer ghs_token"));
        assert!(lower.contains("x-github-api-version: 2022-11-28"));
    }

    #[tokio::test]
    async fn test_fetch_decodes_wrapped_content() {
        let body = r#"{"type":"file","sha":"3d21ec5","content":"YSxiCjEs\nMgo=\n","encoding":"base64"}"#;
        let (url, _server) = serve_once("200 OK", &[], body).await;
        let client = GitHubApiClient::new(url, "t");

        let file = client.fetch_file(&repo(), "out.csv").await.unwrap().unwrap();
        assert_eq!(file.sha, "3d21ec5");
        assert_eq!(file.content, b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_fetch_rate_limited() {
        let (url, _server) = serve_once(
            "403 Forbidden",
            &[("x-ratelimit-remaining", "0")],
            r#"{"message":"API rate limit exceeded"}"#,
        )
        .await;
        let client = GitHubApiClient::new(url, "t");

        let result = client.fetch_file(&repo(), "out.csv").await;
        assert_matches!(result, Err(Error::RateLimitExceeded(_)));
    }

    #[tokio::test]
    async fn test_fetch_forbidden_without_rate_limit_is_http_error() {
        let (url, _server) = serve_once(
            "403 Forbidden",
            &[("x-ratelimit-remaining", "4999")],
            r#"{"message":"Resource not accessible by integration"}"#,
        )
        .await;
        let client = GitHubApiClient::new(url, "t");

        let result = client.fetch_file(&repo(), "out.csv").await;
        assert_matches!(result, Err(Error::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_http_error() {
        let (url, _server) = serve_once("502 Bad Gateway", &[], "{}").await;
        let client = GitHubApiClient::new(url, "t");

        let result = client.fetch_file(&repo(), "out.csv").await;
        assert_matches!(result, Err(Error::Http(ref msg)) if msg.contains("502"));
    }

    #[tokio::test]
    async fn test_put_created_returns_new_sha() {
        let (url, server) =
            serve_once("201 Created", &[], r#"{"content":{"sha":"95b966a"},"commit":{}}"#).await;
        let client = GitHubApiClient::new(url, "t");
        let repo = repo();

        let receipt = client.put_file(&commit(&repo, None)).await.unwrap();
        assert_eq!(receipt.sha, "95b966a");

        let request = server.await.unwrap();
        assert!(request.starts_with("PUT /repos/octo/reports/contents/reports/out.csv "));
        assert!(request.contains(r#""content":"YSxiCg==""#));
        assert!(request.contains(r#""name":"github-actions[bot]""#));
        assert!(!request.contains(r#""sha":"#));
    }

    #[tokio::test]
    async fn test_put_sends_version_identifier() {
        let (url, server) =
            serve_once("200 OK", &[], r#"{"content":{"sha":"new"},"commit":{}}"#).await;
        let client = GitHubApiClient::new(url, "t");
        let repo = repo();

        client.put_file(&commit(&repo, Some("old"))).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.contains(r#""sha":"old""#));
    }

    #[tokio::test]
    async fn test_put_conflict_statuses() {
        for status in ["409 Conflict", "422 Unprocessable Entity"] {
            let (url, _server) = serve_once(status, &[], r#"{"message":"sha mismatch"}"#).await;
            let client = GitHubApiClient::new(url, "t");
            let repo = repo();

            let result = client.put_file(&commit(&repo, Some("stale"))).await;
            assert!(
                matches!(result, Err(Error::Conflict(_))),
                "{} should map to a conflict",
                status
            );
        }
    }

    #[tokio::test]
    async fn test_put_server_error_is_http_error() {
        let (url, _server) = serve_once("500 Internal Server Error", &[], "{}").await;
        let client = GitHubApiClient::new(url, "t");
        let repo = repo();

        let result = client.put_file(&commit(&repo, None)).await;
        assert_matches!(result, Err(Error::Http(_)));
    }
}
