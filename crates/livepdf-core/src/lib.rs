//! livepdf core - conversion orchestration for live PDF previews
//!
//! This crate contains everything between an editing surface and a remote
//! rendering service:
//! - Style settings with per-field validation
//! - Debounced conversion triggers
//! - The render exchange and its classification
//! - A result state machine that drops stale responses
//! - Preview and export projections of the current result
//!
//! No UI and no CLI live here; see the `livepdf` app crate for a host.

pub mod client;
pub mod config;
pub mod debounce;
pub mod document;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod preview;
pub mod service;
pub mod state;
pub mod style;

#[cfg(test)]
mod testing;

pub use client::{ConversionClient, ConversionOutcome};
pub use config::Config;
pub use debounce::Debouncer;
pub use document::Document;
pub use error::{ConversionError, StyleError};
pub use export::{ExportControl, ExportFile, ExportNotice};
pub use orchestrator::Orchestrator;
pub use preview::Preview;
pub use service::{HttpRenderService, RenderReply, RenderRequest, RenderService};
pub use state::{Artifact, ConversionResult, ResultMachine, ResultSnapshot};
pub use style::{FontFamily, HexColor, StyleField, StyleSettings, StyleStore};
