//! The orchestrator owns the document and the conversion state.
//!
//! ```text
//! set_content / update_style
//!         │
//!         ▼
//!    Debouncer (quiet period, latest edit wins)
//!         │
//!         ▼
//!  ConversionClient::convert(latest document)
//!         │
//!         ▼
//!    ResultMachine ──► subscribe() / preview() / export()
//! ```
//!
//! Edits mutate the document in place and re-arm the debounce timer. When
//! the timer fires, the conversion reads the document as it is at that
//! moment, not as it was when the timer was armed.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use crate::client::{ConversionClient, ConversionOutcome};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::document::Document;
use crate::export::{self, ExportControl, ExportFile};
use crate::preview::Preview;
use crate::service::RenderService;
use crate::state::{ConversionResult, ResultMachine, ResultSnapshot};
use crate::style::{StyleField, StyleSettings, StyleStore};

/// Mutable editing state behind the orchestrator's lock.
struct Editor {
    content: String,
    style: StyleStore,
}

impl Editor {
    fn document(&self) -> Document {
        Document::new(self.content.clone(), self.style.current().clone())
    }
}

pub struct Orchestrator {
    config: Config,
    editor: Arc<RwLock<Editor>>,
    client: Arc<ConversionClient>,
    results: Arc<ResultMachine>,
    debouncer: Debouncer,
}

impl Orchestrator {
    /// Create an orchestrator around `document` without scheduling anything.
    pub fn new(config: Config, service: Arc<dyn RenderService>, document: Document) -> Self {
        let results = Arc::new(ResultMachine::new());
        let client = Arc::new(ConversionClient::new(service, results.clone()));
        let debouncer = Debouncer::new(config.debounce);

        Self {
            config,
            editor: Arc::new(RwLock::new(Editor {
                content: document.content,
                style: StyleStore::new(document.settings),
            })),
            client,
            results,
            debouncer,
        }
    }

    /// Create an orchestrator with the sample document and schedule its
    /// first conversion. Must be called from within a Tokio runtime.
    pub fn start(config: Config, service: Arc<dyn RenderService>) -> Self {
        let orchestrator = Self::new(config, service, Document::default());
        tracing::info!(
            quiet_ms = orchestrator.config.debounce.as_millis() as u64,
            "Orchestrator started"
        );
        orchestrator.request_conversion();
        orchestrator
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the document content. Re-arms the debounce timer when the
    /// content actually changed; returns whether it did.
    pub async fn set_content(&self, content: impl Into<String>) -> bool {
        let content = content.into();
        let changed = {
            let mut editor = self.editor.write().await;
            if editor.content == content {
                false
            } else {
                editor.content = content;
                true
            }
        };

        if changed {
            tracing::debug!("Content edited");
            self.request_conversion();
        }
        changed
    }

    /// Apply a raw value to one style field. Invalid values are dropped by
    /// the store; the debounce timer is only re-armed on an actual change.
    pub async fn update_style(&self, field: StyleField, raw: &str) -> StyleSettings {
        let (before, after) = {
            let mut editor = self.editor.write().await;
            let before = editor.style.current().clone();
            let after = editor.style.update(field, raw);
            (before, after)
        };

        if before != after {
            tracing::debug!(field = %field, value = raw, "Style updated");
            self.request_conversion();
        }
        after
    }

    /// Arm (or re-arm) the debounced conversion.
    pub fn request_conversion(&self) {
        let editor = self.editor.clone();
        let client = self.client.clone();
        self.debouncer.notify(move || async move {
            let document = editor.read().await.document();
            client.convert(&document).await;
        });
    }

    /// Skip the quiet period: cancel any armed timer and convert now.
    pub async fn convert_now(&self) -> ConversionOutcome {
        self.debouncer.cancel();
        let document = self.document().await;
        self.client.convert(&document).await
    }

    /// Copy of the current document.
    pub async fn document(&self) -> Document {
        self.editor.read().await.document()
    }

    pub fn result(&self) -> ConversionResult {
        self.results.current()
    }

    pub fn snapshot(&self) -> ResultSnapshot {
        self.results.snapshot()
    }

    /// Receive every state transition.
    pub fn subscribe(&self) -> watch::Receiver<ResultSnapshot> {
        self.results.subscribe()
    }

    pub fn preview(&self) -> Preview {
        Preview::project(&self.results.current())
    }

    pub fn export_control(&self) -> ExportControl {
        ExportControl::project(&self.results.current())
    }

    /// The last successful render as a file, if the current state allows
    /// exporting.
    pub fn export(&self) -> Option<ExportFile> {
        export::export(&self.results.current())
    }

    /// Whether a debounced conversion is waiting to fire.
    pub fn is_conversion_scheduled(&self) -> bool {
        self.debouncer.is_armed()
    }

    /// Cancel any pending conversion and stop accepting new ones. In-flight
    /// exchanges still resolve.
    pub fn shutdown(&self) {
        self.debouncer.shutdown();
        tracing::info!("Orchestrator shut down");
    }
}
