//! Conversion client: one render exchange, classified into a result.

use std::sync::Arc;

use crate::document::Document;
use crate::error::ConversionError;
use crate::service::{RenderReply, RenderRequest, RenderService};
use crate::state::{Artifact, ConversionResult, ResultMachine};

/// Reason shown when the service declines without saying why.
pub const FALLBACK_FAILURE_MESSAGE: &str = "PDF conversion failed";

/// What a call to [`ConversionClient::convert`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Nothing to convert; no request was made and the state is untouched.
    Skipped,
    /// The exchange resolved the state machine with this result.
    Applied(ConversionResult),
    /// A newer exchange started while this one was in flight; its result
    /// was discarded.
    Superseded,
}

/// Turn a service reply (or exchange error) into a terminal result.
pub fn classify(reply: Result<RenderReply, ConversionError>) -> ConversionResult {
    let artifact = reply.and_then(|reply| match reply {
        RenderReply::Rendered { pdf_base64 } => Artifact::from_base64(pdf_base64),
        RenderReply::Declined { message } => Err(ConversionError::Service {
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_FAILURE_MESSAGE.to_string()),
        }),
    });
    ConversionResult::from(artifact)
}

/// Performs render exchanges and is the only writer of the result machine.
pub struct ConversionClient {
    service: Arc<dyn RenderService>,
    results: Arc<ResultMachine>,
}

impl ConversionClient {
    pub fn new(service: Arc<dyn RenderService>, results: Arc<ResultMachine>) -> Self {
        Self { service, results }
    }

    pub fn results(&self) -> &Arc<ResultMachine> {
        &self.results
    }

    /// Convert `document`.
    ///
    /// Whitespace-only content is skipped without touching the state.
    /// Otherwise the machine enters `Pending` before the request goes out,
    /// and the reply is applied only if no newer conversion has begun.
    pub async fn convert(&self, document: &Document) -> ConversionOutcome {
        if !document.has_content() {
            tracing::debug!("Empty content, skipping conversion");
            return ConversionOutcome::Skipped;
        }

        let request = RenderRequest {
            content: document.content.clone(),
            style: document.settings.clone(),
        };

        let ticket = self.results.begin();
        let generation = ticket.generation();

        let reply = self.service.render(&request).await;
        if let Err(e) = &reply {
            tracing::warn!(
                generation,
                service = self.service.service_name(),
                error = %e,
                "Render exchange failed"
            );
        }
        let result = classify(reply);

        if self.results.resolve(ticket, result.clone()) {
            if let ConversionResult::Success(artifact) = &result {
                tracing::info!(generation, bytes = artifact.len(), "PDF rendered");
            }
            ConversionOutcome::Applied(result)
        } else {
            ConversionOutcome::Superseded
        }
    }
}
