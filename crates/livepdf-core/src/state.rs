//! Conversion result state machine.
//!
//! ```text
//! Idle ──► Pending ──► Success(artifact) ──► Pending ──► …
//!              │
//!              └─────► Failure(reason)   ──► Pending ──► …
//! ```
//!
//! Every exchange is tagged with a generation number when it enters
//! `Pending`. Only the exchange holding the newest generation may resolve
//! the machine; resolutions from superseded exchanges are dropped.

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};
use bytes::Bytes;
use tokio::sync::watch;

use crate::error::ConversionError;

pub const PDF_MIME: &str = "application/pdf";

/// A rendered document: the base64 transport encoding as received, plus
/// the decoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    encoded: String,
    bytes: Bytes,
}

impl Artifact {
    /// Decode a standard base64 payload.
    pub fn from_base64(encoded: impl Into<String>) -> Result<Self, ConversionError> {
        let encoded = encoded.into();
        let bytes = BASE64_STD.decode(encoded.trim())?;
        Ok(Self {
            encoded,
            bytes: Bytes::from(bytes),
        })
    }

    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:` URI suitable for embedding the artifact inline.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", PDF_MIME, self.encoded.trim())
    }
}

/// Observable state of the conversion pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConversionResult {
    /// No conversion has started yet.
    #[default]
    Idle,
    /// A conversion is in flight.
    Pending,
    Success(Artifact),
    Failure(String),
}

impl ConversionResult {
    pub fn is_pending(&self) -> bool {
        matches!(self, ConversionResult::Pending)
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            ConversionResult::Success(artifact) => Some(artifact),
            _ => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ConversionResult::Failure(reason) => Some(reason),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionResult::Idle => "idle",
            ConversionResult::Pending => "pending",
            ConversionResult::Success(_) => "success",
            ConversionResult::Failure(_) => "failure",
        }
    }
}

impl From<Result<Artifact, ConversionError>> for ConversionResult {
    fn from(result: Result<Artifact, ConversionError>) -> Self {
        match result {
            Ok(artifact) => ConversionResult::Success(artifact),
            Err(e) => ConversionResult::Failure(e.to_string()),
        }
    }
}

/// A coherent view of the state machine: the result together with the
/// generation of the exchange that produced it (0 before any exchange).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultSnapshot {
    pub generation: u64,
    pub result: ConversionResult,
}

/// Proof that the holder started the exchange with this generation.
///
/// Only [`ResultMachine::begin`] hands these out.
#[derive(Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Holds the current [`ResultSnapshot`] and publishes every transition to
/// subscribers.
///
/// Generation bookkeeping happens inside the watch channel's write lock, so
/// issuing a ticket and checking a resolution against the newest one are
/// atomic with the state change itself.
pub struct ResultMachine {
    tx: watch::Sender<ResultSnapshot>,
}

impl ResultMachine {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ResultSnapshot::default());
        Self { tx }
    }

    /// Enter `Pending` for a new exchange.
    pub(crate) fn begin(&self) -> Ticket {
        let mut generation = 0;
        self.tx.send_modify(|snapshot| {
            snapshot.generation += 1;
            snapshot.result = ConversionResult::Pending;
            generation = snapshot.generation;
        });
        tracing::debug!(generation, "Conversion pending");
        Ticket { generation }
    }

    /// Resolve the exchange identified by `ticket`.
    ///
    /// Returns `false` and leaves the state untouched when a newer exchange
    /// has started since the ticket was issued.
    pub(crate) fn resolve(&self, ticket: Ticket, result: ConversionResult) -> bool {
        debug_assert!(!result.is_pending());
        let kind = result.kind();
        let mut newest = 0;
        let applied = self.tx.send_if_modified(|snapshot| {
            newest = snapshot.generation;
            if snapshot.generation != ticket.generation {
                return false;
            }
            snapshot.result = result;
            true
        });

        if applied {
            tracing::debug!(generation = ticket.generation, result = kind, "Conversion resolved");
        } else {
            tracing::debug!(
                generation = ticket.generation,
                newest,
                result = kind,
                "Discarding stale conversion result"
            );
        }
        applied
    }

    pub fn snapshot(&self) -> ResultSnapshot {
        self.tx.borrow().clone()
    }

    pub fn current(&self) -> ConversionResult {
        self.tx.borrow().result.clone()
    }

    pub fn generation(&self) -> u64 {
        self.tx.borrow().generation
    }

    pub fn subscribe(&self) -> watch::Receiver<ResultSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for ResultMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    fn artifact(raw: &[u8]) -> Artifact {
        Artifact::from_base64(BASE64_STD.encode(raw)).unwrap()
    }

    #[test]
    fn test_starts_idle() {
        let machine = ResultMachine::new();
        assert_eq!(machine.current(), ConversionResult::Idle);
        assert_eq!(machine.generation(), 0);
    }

    #[test]
    fn test_begin_then_resolve() {
        let machine = ResultMachine::new();
        let ticket = machine.begin();
        assert_eq!(ticket.generation(), 1);
        assert_eq!(machine.current(), ConversionResult::Pending);

        assert!(machine.resolve(ticket, ConversionResult::Success(artifact(b"%PDF-1.7"))));
        let snapshot = machine.snapshot();
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.result.artifact().unwrap().bytes().as_ref(), b"%PDF-1.7");
    }

    #[test]
    fn test_stale_resolution_is_discarded() {
        let machine = ResultMachine::new();
        let older = machine.begin();
        let newer = machine.begin();

        assert!(machine.resolve(newer, ConversionResult::Failure("newer".to_string())));
        assert!(!machine.resolve(older, ConversionResult::Success(artifact(b"old"))));

        assert_eq!(machine.current(), ConversionResult::Failure("newer".to_string()));
        assert_eq!(machine.generation(), 2);
    }

    #[test]
    fn test_stale_resolution_does_not_clobber_pending() {
        let machine = ResultMachine::new();
        let older = machine.begin();
        let _newer = machine.begin();

        assert!(!machine.resolve(older, ConversionResult::Failure("late".to_string())));
        assert!(machine.current().is_pending());
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let machine = ResultMachine::new();
        let mut rx = machine.subscribe();

        let ticket = machine.begin();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().result.is_pending());

        machine.resolve(ticket, ConversionResult::Failure("boom".to_string()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().result.failure_reason(), Some("boom"));
    }

    #[test]
    fn test_artifact_data_uri() {
        let a = Artifact::from_base64("JVBERi0xLjQK").unwrap();
        assert_eq!(a.data_uri(), "data:application/pdf;base64,JVBERi0xLjQK");
        assert_eq!(a.bytes().as_ref(), b"%PDF-1.4\n");
    }

    #[test]
    fn test_artifact_rejects_invalid_base64() {
        let err = Artifact::from_base64("not base64!").unwrap_err();
        assert!(matches!(err, ConversionError::Decode(_)));
    }
}
