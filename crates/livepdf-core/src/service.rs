//! Rendering service abstraction
//!
//! The orchestrator never talks HTTP directly; it goes through
//! [`RenderService`], which has one production implementation
//! ([`HttpRenderService`]) and is easy to fake in tests.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::style::StyleSettings;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

/// Request body for `POST /convert`: content plus every style field, flat.
#[derive(Debug, Clone, Serialize)]
pub struct RenderRequest {
    pub content: String,
    #[serde(flatten)]
    pub style: StyleSettings,
}

/// What the service answered, once the exchange itself succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderReply {
    /// Rendered; carries the base64 transport encoding.
    Rendered { pdf_base64: String },
    /// The service declined, optionally saying why.
    Declined { message: Option<String> },
}

/// Raw JSON shape of a `/convert` response.
#[derive(Debug, Deserialize)]
struct WireResponse {
    success: bool,
    #[serde(default)]
    pdf_base64: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// FastAPI error body (`HTTPException`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl RenderReply {
    /// Decode a response body into a closed reply shape.
    ///
    /// `success: true` without a non-empty payload is malformed rather than
    /// a success.
    pub fn from_json(body: &[u8]) -> Result<Self, ConversionError> {
        let wire: WireResponse = serde_json::from_slice(body)
            .map_err(|e| ConversionError::Malformed(e.to_string()))?;

        if !wire.success {
            return Ok(RenderReply::Declined {
                message: wire.message,
            });
        }

        match wire.pdf_base64 {
            Some(pdf_base64) if !pdf_base64.trim().is_empty() => {
                Ok(RenderReply::Rendered { pdf_base64 })
            }
            _ => Err(ConversionError::Malformed(
                "success reported without a PDF payload".to_string(),
            )),
        }
    }
}

/// Pull a human readable `detail` out of an error body, if there is one.
fn error_detail(body: &[u8]) -> Option<String> {
    let body: ErrorBody = serde_json::from_slice(body).ok()?;
    match body.detail {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Unified rendering backend interface
#[async_trait]
pub trait RenderService: Send + Sync {
    /// Perform one render exchange.
    ///
    /// Transport-level problems (connection errors, non-success statuses,
    /// unreadable bodies) are errors; a service that answered but declined
    /// to render is `Ok(RenderReply::Declined)`.
    async fn render(&self, request: &RenderRequest) -> Result<RenderReply, ConversionError>;

    /// Short name for logs.
    fn service_name(&self) -> &str;
}

/// Rendering service reached over HTTP.
pub struct HttpRenderService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRenderService {
    /// Create a client for the service at `base_url` (e.g.
    /// `http://localhost:8000`).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn convert_url(&self) -> String {
        format!("{}/convert", self.base_url)
    }

    /// Probe `GET /health`.
    pub async fn check_health(&self) -> Result<()> {
        #[derive(Deserialize)]
        struct Health {
            status: String,
        }

        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Rendering service unreachable at {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Health check failed: HTTP {}",
                response.status().as_u16()
            ));
        }

        let health: Health = response
            .json()
            .await
            .context("Invalid health check response")?;
        if health.status != "healthy" {
            return Err(anyhow::anyhow!("Service reports status '{}'", health.status));
        }

        Ok(())
    }
}

#[async_trait]
impl RenderService for HttpRenderService {
    async fn render(&self, request: &RenderRequest) -> Result<RenderReply, ConversionError> {
        tracing::debug!(
            url = %self.convert_url(),
            content_len = request.content.len(),
            "Sending render request"
        );

        let response = self
            .client
            .post(self.convert_url())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The status is reported even when the error body cannot be read.
            let body = response.bytes().await.ok();
            return Err(ConversionError::Status {
                status: status.as_u16(),
                detail: body.as_deref().and_then(error_detail),
            });
        }

        let body = response.bytes().await?;
        RenderReply::from_json(&body)
    }

    fn service_name(&self) -> &str {
        &self.base_url
    }
}
