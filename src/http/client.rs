//! HTTP client for index downloads.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use std::time::Duration;

use super::status::classify_error;

/// Upper bound for a whole index request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Upper bound for establishing the connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

const GZIP_CONTENT_TYPE: &str = "application/gzip";

/// Thin wrapper around a reqwest Client that fetches index archives.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client with the index request timeouts and the given User-Agent.
    pub fn build(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client))
    }

    /// Performs a GET request for a gzip archive and returns the full body.
    /// `basic_auth` is sent as an HTTP Basic `Authorization` header when given.
    #[tracing::instrument(skip(self, basic_auth))]
    pub async fn get_bytes(&self, url: &str, basic_auth: Option<(&str, &str)>) -> Result<Vec<u8>> {
        debug!("GET {}...", url);

        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static(GZIP_CONTENT_TYPE));
        if let Some((user, password)) = basic_auth {
            request = request.basic_auth(user, Some(password));
        }

        let response = request.send().await.context("Failed to send request")?;
        let response = response.error_for_status().map_err(classify_error)?;

        let body = response
            .bytes()
            .await
            .context("Failed to read response body")?;
        debug!("Downloaded {} bytes from {}", body.len(), url);

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpFailure;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_get_bytes_success() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/os/x86_64/APKINDEX.tar.gz")
            .match_header("accept", "application/gzip")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("archive bytes")
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let body = client
            .get_bytes(&format!("{}/os/x86_64/APKINDEX.tar.gz", url), None)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body, b"archive bytes");
    }

    #[tokio::test]
    async fn test_get_bytes_with_basic_auth() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/APKINDEX.tar.gz")
            .match_header("authorization", "Basic dXNlcjp0b2tlbg==")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let body = client
            .get_bytes(
                &format!("{}/APKINDEX.tar.gz", url),
                Some(("user", "token")),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_get_bytes_sends_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/")
            .match_header(
                "user-agent",
                Matcher::Regex("^wolfi-package-status/test ".to_string()),
            )
            .with_status(200)
            .create_async()
            .await;

        let client = HttpClient::build("wolfi-package-status/test (linux; x86_64)").unwrap();
        client.get_bytes(&format!("{}/", url), None).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_bytes_not_found() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let err = client
            .get_bytes(&format!("{}/missing", url), None)
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.downcast_ref::<HttpFailure>(), Some(&HttpFailure::NotFound));
    }

    #[tokio::test]
    async fn test_get_bytes_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _m = server
            .mock("GET", "/private")
            .with_status(401)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let err = client
            .get_bytes(&format!("{}/private", url), Some(("user", "bad")))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Authentication failed"));
    }

    #[tokio::test]
    async fn test_get_bytes_connection_refused() {
        // Bind then drop to get a port with nothing listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = HttpClient::new(Client::new());
        let result = client
            .get_bytes(&format!("http://127.0.0.1:{}/APKINDEX.tar.gz", port), None)
            .await;
        assert!(result.is_err());
    }
}
