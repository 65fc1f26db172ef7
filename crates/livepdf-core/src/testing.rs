//! In-process fakes for [`RenderService`].

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{oneshot, Notify};

use crate::error::ConversionError;
use crate::service::{RenderReply, RenderRequest, RenderService};

type Reply = Result<RenderReply, ConversionError>;

/// Base64 of `%PDF-1.4\n`.
pub(crate) const TINY_PDF_BASE64: &str = "JVBERi0xLjQK";

pub(crate) fn rendered() -> Reply {
    Ok(RenderReply::Rendered {
        pdf_base64: TINY_PDF_BASE64.to_string(),
    })
}

/// Answers from a script, then with a fallback reply once the script runs
/// out. Records every request body.
pub(crate) struct ScriptedService {
    script: Mutex<VecDeque<Reply>>,
    fallback: Option<Reply>,
    delay: Duration,
    requests: Mutex<Vec<serde_json::Value>>,
}

impl ScriptedService {
    pub(crate) fn new(script: Vec<Reply>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn always(reply: Reply) -> Self {
        Self {
            fallback: Some(reply),
            ..Self::new(Vec::new())
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RenderService for ScriptedService {
    async fn render(&self, request: &RenderRequest) -> Reply {
        self.requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(request).unwrap());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        next.or_else(|| self.fallback.clone())
            .unwrap_or_else(|| Err(ConversionError::Transport("no scripted reply".to_string())))
    }

    fn service_name(&self) -> &str {
        "scripted"
    }
}

/// Holds every exchange open until the test releases it, so tests can
/// choose the order in which overlapping exchanges resolve.
pub(crate) struct GatedService {
    gates: Mutex<Vec<Option<oneshot::Sender<Reply>>>>,
    requests: Mutex<Vec<serde_json::Value>>,
    arrived: Notify,
}

impl GatedService {
    pub(crate) fn new() -> Self {
        Self {
            gates: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            arrived: Notify::new(),
        }
    }

    /// Wait until at least `count` requests have arrived.
    pub(crate) async fn wait_for_requests(&self, count: usize) {
        loop {
            let notified = self.arrived.notified();
            if self.gates.lock().unwrap().len() >= count {
                return;
            }
            notified.await;
        }
    }

    /// Answer the `index`-th request (0-based, in arrival order).
    pub(crate) fn release(&self, index: usize, reply: Reply) {
        let gate = self.gates.lock().unwrap()[index]
            .take()
            .expect("request already released");
        let _ = gate.send(reply);
    }

    pub(crate) fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RenderService for GatedService {
    async fn render(&self, request: &RenderRequest) -> Reply {
        let (tx, rx) = oneshot::channel();
        self.requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(request).unwrap());
        self.gates.lock().unwrap().push(Some(tx));
        self.arrived.notify_waiters();

        rx.await
            .unwrap_or_else(|_| Err(ConversionError::Transport("gate dropped".to_string())))
    }

    fn service_name(&self) -> &str {
        "gated"
    }
}
