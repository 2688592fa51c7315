//! Classification of HTTP status failures into readable errors.

use reqwest::StatusCode;

/// An index request answered with an error status.
#[derive(Debug, PartialEq, Eq)]
pub enum HttpFailure {
    /// HTTP 401
    AuthenticationFailed,
    /// HTTP 403
    Forbidden,
    /// HTTP 404
    NotFound,
    /// Other 4xx statuses
    ClientError(u16),
    /// 5xx statuses
    ServerError(u16),
}

impl std::fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpFailure::AuthenticationFailed => {
                write!(
                    f,
                    "Authentication failed (HTTP 401). Check the token passed with --auth-token or HTTP_AUTH."
                )
            }
            HttpFailure::Forbidden => {
                write!(
                    f,
                    "Access forbidden (HTTP 403). The token may lack access to this repository."
                )
            }
            HttpFailure::NotFound => write!(f, "Index not found (HTTP 404)"),
            HttpFailure::ClientError(code) => write!(f, "Request error: HTTP {}", code),
            HttpFailure::ServerError(code) => write!(f, "Server error: HTTP {}", code),
        }
    }
}

impl std::error::Error for HttpFailure {}

impl HttpFailure {
    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::UNAUTHORIZED => Some(HttpFailure::AuthenticationFailed),
            StatusCode::FORBIDDEN => Some(HttpFailure::Forbidden),
            StatusCode::NOT_FOUND => Some(HttpFailure::NotFound),
            s if s.is_client_error() => Some(HttpFailure::ClientError(s.as_u16())),
            s if s.is_server_error() => Some(HttpFailure::ServerError(s.as_u16())),
            _ => None,
        }
    }
}

/// Classifies an error from `error_for_status()`.
/// Returns the original error when it carries no status (connection errors, timeouts).
pub fn classify_error(error: reqwest::Error) -> anyhow::Error {
    match error.status().and_then(HttpFailure::from_status) {
        Some(failure) => anyhow::Error::from(failure),
        None => anyhow::Error::from(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_failure_display() {
        let err = HttpFailure::AuthenticationFailed;
        assert!(err.to_string().contains("Authentication"));
        assert!(err.to_string().contains("HTTP_AUTH"));

        assert!(HttpFailure::Forbidden.to_string().contains("forbidden"));
        assert!(HttpFailure::NotFound.to_string().contains("404"));
        assert!(HttpFailure::ClientError(400).to_string().contains("HTTP 400"));
        assert!(HttpFailure::ServerError(502).to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_from_status() {
        assert_eq!(
            HttpFailure::from_status(StatusCode::UNAUTHORIZED),
            Some(HttpFailure::AuthenticationFailed)
        );
        assert_eq!(
            HttpFailure::from_status(StatusCode::FORBIDDEN),
            Some(HttpFailure::Forbidden)
        );
        assert_eq!(
            HttpFailure::from_status(StatusCode::NOT_FOUND),
            Some(HttpFailure::NotFound)
        );
        assert_eq!(
            HttpFailure::from_status(StatusCode::TOO_MANY_REQUESTS),
            Some(HttpFailure::ClientError(429))
        );
        assert_eq!(
            HttpFailure::from_status(StatusCode::BAD_GATEWAY),
            Some(HttpFailure::ServerError(502))
        );
        assert_eq!(HttpFailure::from_status(StatusCode::OK), None);
    }

    #[tokio::test]
    async fn test_classify_error_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(401)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let response = client.get(server.url()).send().await.unwrap();
        let err = classify_error(response.error_for_status().unwrap_err());

        assert_eq!(
            err.downcast_ref::<HttpFailure>(),
            Some(&HttpFailure::AuthenticationFailed)
        );
    }

    #[tokio::test]
    async fn test_classify_error_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(503)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let response = client.get(server.url()).send().await.unwrap();
        let err = classify_error(response.error_for_status().unwrap_err());

        assert_eq!(
            err.downcast_ref::<HttpFailure>(),
            Some(&HttpFailure::ServerError(503))
        );
    }
}
