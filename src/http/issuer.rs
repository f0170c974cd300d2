use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder, Url};
use tokio::time::Instant;
use tracing::debug;

use crate::args::{DEFAULT_USER_AGENT, PayloadKind};
use crate::error::{HttpError, NetworkError};

use super::{Payload, Target};

/// Multipart form field that carries the payload.
const MULTIPART_FIELD: &str = "file";

/// Result of one request that reached the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuedResponse {
    pub status: u16,
    pub latency: Duration,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// Sends one request carrying `payload` and waits for the full response.
///
/// Implementations must not retry: one call is one iteration's request.
#[async_trait]
pub trait RequestIssuer: Send + Sync {
    async fn send(&self, payload: &Payload) -> Result<IssuedResponse, NetworkError>;
}

#[derive(Debug, Clone, Copy)]
pub struct ClientSettings {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

/// `RequestIssuer` that POSTs to the target with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpIssuer {
    client: Client,
    url: Url,
}

impl HttpIssuer {
    /// Build the HTTP client for `target`.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be built or the payload's
    /// content type is not a valid header / MIME value.
    pub fn new(
        target: &Target,
        settings: &ClientSettings,
        payload: &Payload,
    ) -> Result<Self, HttpError> {
        validate_content_type(payload)?;
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|err| HttpError::BuildClient { source: err })?;
        Ok(Self {
            client,
            url: target.url().clone(),
        })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    fn build_request(&self, payload: &Payload) -> Result<RequestBuilder, NetworkError> {
        let request = self.client.post(self.url.clone());
        match payload.kind() {
            PayloadKind::Binary => Ok(request
                .header(CONTENT_TYPE, payload.content_type())
                .body(payload.bytes().clone())),
            PayloadKind::Multipart => {
                let part =
                    Part::stream_with_length(Body::from(payload.bytes().clone()), payload.len())
                        .file_name(payload.file_name().to_owned())
                        .mime_str(payload.content_type())
                        .map_err(|err| {
                            debug!("Failed to build multipart part: {}", err);
                            NetworkError::Request
                        })?;
                Ok(request.multipart(Form::new().part(MULTIPART_FIELD, part)))
            }
        }
    }
}

#[async_trait]
impl RequestIssuer for HttpIssuer {
    async fn send(&self, payload: &Payload) -> Result<IssuedResponse, NetworkError> {
        let request = self.build_request(payload)?;
        let start = Instant::now();
        let response = request.send().await.map_err(|err| {
            debug!("Request to {} failed: {}", self.url, err);
            NetworkError::classify(&err)
        })?;
        let status = response.status().as_u16();
        let bytes_received = drain_response_body(response).await.map_err(|err| {
            debug!("Failed to read response body from {}: {}", self.url, err);
            NetworkError::classify(&err)
        })?;
        Ok(IssuedResponse {
            status,
            latency: start.elapsed(),
            bytes_sent: payload.len(),
            bytes_received,
        })
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

fn validate_content_type(payload: &Payload) -> Result<(), HttpError> {
    match payload.kind() {
        PayloadKind::Binary => HeaderValue::from_str(payload.content_type())
            .map(drop)
            .map_err(|_invalid| HttpError::InvalidContentType {
                content_type: payload.content_type().to_owned(),
            }),
        PayloadKind::Multipart => Part::bytes(Vec::new())
            .mime_str(payload.content_type())
            .map(drop)
            .map_err(|err| HttpError::InvalidPartMime {
                content_type: payload.content_type().to_owned(),
                source: err,
            }),
    }
}
