//! HTTP client for the missing-person recognition backend.
//!
//! Provides a minimal client with generic GET / multipart POST / DELETE helpers that
//! map every failure onto [`ClientError`], domain methods for each backend endpoint,
//! the [`RecognitionBackend`] trait the coordinators are written against, and the
//! decoder for the binary-plus-headers search response.

pub mod api;
pub mod backend;
pub mod decode;

use bytes::Bytes;
use mpi_core::{ClientConfig, ClientError};
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use api::{HealthStatus, PersonSearchHistory};
pub use backend::RecognitionBackend;
pub use decode::{decode_search_response, extract_detail, RawResponse};

/// HTTP client for the recognition backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// `timeout` of `None` leaves requests to run until the transport gives up.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config.api_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }

    /// Turn a non-success response into an application error carrying the server's
    /// `detail` message.
    async fn into_application_error(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        let detail = extract_detail(&body)
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
        ClientError::Application {
            status: status.as_u16(),
            detail,
        }
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        if !response.status().is_success() {
            return Err(Self::into_application_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("Failed to parse response as JSON: {}", e)))
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.build_url(path);
        tracing::debug!(%url, "GET");
        let response = self.send(self.client.get(&url)).await?;
        Self::read_json(response).await
    }

    /// GET request returning the body untouched. Fails on non-success status.
    pub async fn get_bytes(&self, path: &str) -> Result<RawResponse, ClientError> {
        let url = self.build_url(path);
        tracing::debug!(%url, "GET (binary)");
        let response = self.send(self.client.get(&url)).await?;
        if !response.status().is_success() {
            return Err(Self::into_application_error(response).await);
        }
        Self::read_raw(response).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ClientError> {
        let url = self.build_url(path);
        tracing::debug!(%url, "POST multipart");
        let response = self.send(self.client.post(&url).multipart(form)).await?;
        Self::read_json(response).await
    }

    /// POST multipart form and hand back status, headers and body whatever the status.
    pub async fn post_multipart_raw(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<RawResponse, ClientError> {
        let url = self.build_url(path);
        tracing::debug!(%url, "POST multipart (raw)");
        let response = self.send(self.client.post(&url).multipart(form)).await?;
        Self::read_raw(response).await
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = self.build_url(path);
        tracing::debug!(%url, "DELETE");
        let response = self.send(self.client.delete(&url)).await?;
        if !response.status().is_success() {
            return Err(Self::into_application_error(response).await);
        }
        Ok(())
    }

    async fn read_raw(response: reqwest::Response) -> Result<RawResponse, ClientError> {
        let status: StatusCode = response.status();
        let headers: HeaderMap = response.headers().clone();
        let body: Bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read response body: {}", e)))?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
