//! HTTP client for the mock-server admin API

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when communicating with the admin API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx answer; the body is deliberately not interpreted
    #[error("HTTP {0}")]
    Status(u16),
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Connection failed: {0}")]
    Connection(String),
}

/// Response wrapper for the request journal
#[derive(Debug, Deserialize)]
struct RequestsResponse {
    #[serde(default)]
    requests: Vec<Value>,
}

/// Response wrapper for the mapping collection
#[derive(Debug, Deserialize)]
struct MappingsResponse {
    #[serde(default)]
    mappings: Vec<Value>,
}

/// Operations the UI needs from the admin API.
///
/// Entries and mappings travel as raw JSON: their shape is owned by the
/// server and normalized by [`crate::entry`] and [`crate::mapping`].
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `GET /requests`
    async fn list_requests(&self) -> Result<Vec<Value>, ApiError>;

    /// `DELETE /requests`
    async fn reset_requests(&self) -> Result<(), ApiError>;

    /// `GET /mappings`
    async fn list_mappings(&self) -> Result<Vec<Value>, ApiError>;

    /// `POST /mappings`, returns whatever the server echoed back (may be `Null`)
    async fn create_mapping(&self, mapping: &Value) -> Result<Value, ApiError>;

    /// `PUT /mappings/{id}`
    async fn update_mapping(&self, id: &str, mapping: &Value) -> Result<Value, ApiError>;

    /// `DELETE /mappings/{id}`
    async fn delete_mapping(&self, id: &str) -> Result<(), ApiError>;

    /// `POST /mappings/save`: flush the in-memory collection to durable storage
    async fn persist_mappings(&self) -> Result<(), ApiError>;
}

/// HTTP client for the admin API
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// `api_prefix` is appended to `admin_url` (`/api` for the web backend,
    /// `/__admin` when talking to the mock server directly).
    pub fn new(admin_url: &str, api_prefix: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = format!(
            "{}/{}",
            admin_url.trim_end_matches('/'),
            api_prefix.trim_matches('/')
        );

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL, prefix included
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn mapping_endpoint(&self, id: &str) -> String {
        self.endpoint(&format!("/mappings/{}", urlencoding::encode(id)))
    }

    /// Turn transport failures into [`ApiError`], keeping refused connections distinct
    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_connect() {
            ApiError::Connection(format!("Cannot connect to {}", self.base_url))
        } else {
            ApiError::Request(err)
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, ApiError> {
        let resp = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        debug!("Admin API answered {} for {}", status, resp.url());
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(resp)
    }

    async fn json_body<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Bodies of mutating calls carry no contract; anything unparsable becomes `Null`
    async fn loose_body(resp: Response) -> Result<Value, ApiError> {
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
    }
}

#[async_trait]
impl AdminApi for ApiClient {
    async fn list_requests(&self) -> Result<Vec<Value>, ApiError> {
        let resp = self.send(self.client.get(self.endpoint("/requests"))).await?;
        let body: RequestsResponse = Self::json_body(resp).await?;
        Ok(body.requests)
    }

    async fn reset_requests(&self) -> Result<(), ApiError> {
        self.send(self.client.delete(self.endpoint("/requests")))
            .await?;
        Ok(())
    }

    async fn list_mappings(&self) -> Result<Vec<Value>, ApiError> {
        let resp = self.send(self.client.get(self.endpoint("/mappings"))).await?;
        let body: MappingsResponse = Self::json_body(resp).await?;
        Ok(body.mappings)
    }

    async fn create_mapping(&self, mapping: &Value) -> Result<Value, ApiError> {
        let resp = self
            .send(self.client.post(self.endpoint("/mappings")).json(mapping))
            .await?;
        Self::loose_body(resp).await
    }

    async fn update_mapping(&self, id: &str, mapping: &Value) -> Result<Value, ApiError> {
        let resp = self
            .send(self.client.put(self.mapping_endpoint(id)).json(mapping))
            .await?;
        Self::loose_body(resp).await
    }

    async fn delete_mapping(&self, id: &str) -> Result<(), ApiError> {
        self.send(self.client.delete(self.mapping_endpoint(id)))
            .await?;
        Ok(())
    }

    async fn persist_mappings(&self) -> Result<(), ApiError> {
        self.send(self.client.post(self.endpoint("/mappings/save")))
            .await?;
        Ok(())
    }
}
