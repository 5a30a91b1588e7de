//! Transport trait and implementations.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{PushError, Result};

/// One outgoing push request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Target URL.
    pub url: String,
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// JSON body.
    pub body: String,
}

/// Raw answer from the push service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status.
    pub status: u16,
    /// Response body.
    pub body: String,
}

/// Delivers a request to the push service.
///
/// Implementations perform exactly one attempt and report network-level
/// failures as [`PushError::Transport`]. Non-2xx statuses are not errors
/// at this level; the service reports its own errors in the body.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// POST the request and return the raw response.
    async fn post(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// HTTPS transport backed by reqwest.
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport.
    pub fn new(config: &crate::PushConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone());

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if config.danger_accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for push requests");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| PushError::Configuration(e.to_string()))?;

        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl PushTransport for HttpTransport {
    async fn post(&self, request: TransportRequest) -> Result<TransportResponse> {
        let response = self
            .client
            .post(&request.url)
            .header(reqwest::header::AUTHORIZATION, &request.authorization)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}

/// In-memory transport for testing.
///
/// Records every request and answers with queued responses; when the queue
/// is empty it answers `200 {"sendno":"0","msg_id":"0"}`.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    requests: Arc<Mutex<Vec<TransportRequest>>>,
    responses: Arc<Mutex<VecDeque<Result<TransportResponse>>>>,
}

impl MemoryTransport {
    /// Create a new memory transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub async fn respond(&self, status: u16, body: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(TransportResponse {
            status,
            body: body.into(),
        }));
    }

    /// Queue a transport failure.
    pub async fn fail(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .await
            .push_back(Err(PushError::Transport(message.into())));
    }

    /// Get all recorded requests.
    pub async fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of recorded requests.
    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl PushTransport for MemoryTransport {
    async fn post(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.requests.lock().await.push(request);
        self.responses.lock().await.pop_front().unwrap_or_else(|| {
            Ok(TransportResponse {
                status: 200,
                body: r#"{"sendno":"0","msg_id":"0"}"#.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TransportRequest {
        TransportRequest {
            url: "https://api.jpush.cn/v3/push".into(),
            authorization: "Basic a2V5OnNlY3JldA==".into(),
            body: "{}".into(),
        }
    }

    #[tokio::test]
    async fn test_memory_transport() {
        let transport = MemoryTransport::new();
        transport.respond(400, r#"{"error":{"code":1003}}"#).await;
        transport.fail("connection refused").await;

        let first = transport.post(request()).await.unwrap();
        assert_eq!(first.status, 400);

        let second = transport.post(request()).await;
        assert_eq!(second, Err(PushError::Transport("connection refused".into())));

        let third = transport.post(request()).await.unwrap();
        assert_eq!(third.status, 200);

        assert_eq!(transport.request_count().await, 3);
        assert_eq!(transport.requests().await[0], request());
    }

    #[cfg(feature = "http")]
    mod http {
        use super::*;
        use crate::PushConfig;
        use wiremock::matchers::{body_string, header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        #[tokio::test]
        async fn test_http_transport_posts_with_auth() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/v3/push"))
                .and(header("authorization", "Basic a2V5OnNlY3JldA=="))
                .and(header("content-type", "application/json"))
                .and(body_string("{}"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_string(r#"{"sendno":"0","msg_id":"7"}"#),
                )
                .expect(1)
                .mount(&server)
                .await;

            let config = PushConfig::new("key", "secret").unwrap();
            let transport = HttpTransport::new(&config).unwrap();
            let response = transport
                .post(TransportRequest {
                    url: format!("{}/v3/push", server.uri()),
                    ..request()
                })
                .await
                .unwrap();

            assert_eq!(response.status, 200);
            assert!(response.body.contains("\"msg_id\":\"7\""));
        }

        #[tokio::test]
        async fn test_http_transport_keeps_error_statuses() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(
                    ResponseTemplate::new(401).set_body_string(r#"{"error":{"code":1004}}"#),
                )
                .mount(&server)
                .await;

            let config = PushConfig::new("key", "secret").unwrap();
            let transport = HttpTransport::new(&config).unwrap();
            let response = transport
                .post(TransportRequest {
                    url: format!("{}/v3/push", server.uri()),
                    ..request()
                })
                .await
                .unwrap();

            assert_eq!(response.status, 401);
        }

        #[tokio::test]
        async fn test_http_transport_connect_failure() {
            // nothing listens on port 1
            let config = PushConfig::new("key", "secret").unwrap();
            let transport = HttpTransport::new(&config).unwrap();
            let result = transport
                .post(TransportRequest {
                    url: "http://127.0.0.1:1/v3/push".into(),
                    ..request()
                })
                .await;

            assert!(matches!(result, Err(PushError::Transport(_))));
        }
    }
}
