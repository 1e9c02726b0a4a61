//! Shared test doubles.

use std::future::Future;
use std::sync::Arc;

use chrono::TimeDelta;
use http::StatusCode;
use http::header::CONTENT_TYPE;
use tokio::sync::Mutex;
use url::Url;

use crate::client::{AuthorizationProvider, ClientCredentials, OAuth2Client};
use crate::http_client::HttpClient;

/// An [`HttpClient`] that returns one queued response and records the
/// request it was sent.
#[derive(Clone, Default)]
pub(crate) struct MockClient {
    response: Arc<Mutex<Option<http::Response<Vec<u8>>>>>,
    sent: Arc<Mutex<Option<http::Request<Vec<u8>>>>>,
}

impl MockClient {
    pub(crate) async fn respond(&self, response: http::Response<Vec<u8>>) {
        *self.response.lock().await = Some(response);
    }

    pub(crate) async fn sent(&self) -> Option<http::Request<Vec<u8>>> {
        self.sent.lock().await.take()
    }
}

impl HttpClient for MockClient {
    type Error = std::convert::Infallible;

    fn send_http(
        &self,
        request: http::Request<Vec<u8>>,
    ) -> impl Future<Output = core::result::Result<http::Response<Vec<u8>>, Self::Error>> + Send
    {
        let response = self.response.clone();
        let sent = self.sent.clone();
        async move {
            *sent.lock().await = Some(request);
            Ok(response.lock().await.take().expect("no response queued"))
        }
    }
}

pub(crate) fn json_response(status: StatusCode, body: &str) -> http::Response<Vec<u8>> {
    http::Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(body.as_bytes().to_vec())
        .unwrap()
}

pub(crate) fn test_client() -> OAuth2Client {
    OAuth2Client::new(
        AuthorizationProvider::new(
            Url::parse("http://auth.example.com/authorize").unwrap(),
            Url::parse("http://auth.example.com/token").unwrap(),
            TimeDelta::seconds(3600),
        ),
        ClientCredentials::new("abcd", "secret"),
        "http://localhost:1234",
    )
}
