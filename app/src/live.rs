//! Live mode: follow a Markdown file on disk and re-render on every save.
//!
//! The file is polled for modification; each change goes through the
//! orchestrator's debounce, so an editor that writes several times in a row
//! still produces a single render. Every state transition is logged and each
//! successful render is saved to the export directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use anyhow::Context;
use livepdf_core::export::{self, ExportNotice};
use livepdf_core::{Config, Document, ExportControl, HttpRenderService, Orchestrator, Preview};
use livepdf_core::ConversionResult;
use tokio::time::MissedTickBehavior;

use crate::cli::read_markdown;
use crate::style_from_assignments;

pub async fn run(
    config: Config,
    file: PathBuf,
    set: Vec<String>,
    poll: Duration,
) -> anyhow::Result<()> {
    let style = style_from_assignments(&set)?;
    let content = read_markdown(&file).await?;
    let mut last_modified = modified_at(&file).await;
    config
        .ensure_dirs()
        .with_context(|| format!("Failed to create {:?}", config.export_dir))?;

    let service = HttpRenderService::new(&config.service_url, config.request_timeout)?;
    if let Err(e) = service.check_health().await {
        // Keep going; the service may come up later and edits will retry.
        tracing::warn!("{:#}", e);
    }

    let orchestrator = Orchestrator::new(
        config.clone(),
        Arc::new(service),
        Document::new(content, style),
    );
    let mut rx = orchestrator.subscribe();
    orchestrator.request_conversion();

    tracing::info!(
        "Watching {:?}, saving to {:?}. Press Ctrl+C to stop.",
        file,
        config.export_dir
    );

    let mut ticker = tokio::time::interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                tracing::info!("Shutting down...");
                break;
            }

            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                tracing::info!(generation = snapshot.generation, "{}", describe(&snapshot.result));

                if let Some(pdf) = export::export(&snapshot.result) {
                    if let Err(e) = pdf.save_in(&config.export_dir).await {
                        tracing::error!(error = %e, "Failed to save PDF");
                    }
                }
            }

            _ = ticker.tick() => {
                let modified = modified_at(&file).await;
                if modified != last_modified {
                    last_modified = modified;
                    match read_markdown(&file).await {
                        Ok(content) => {
                            if orchestrator.set_content(content).await {
                                tracing::debug!("File changed, conversion scheduled");
                            }
                        }
                        Err(e) => tracing::warn!("{:#}", e),
                    }
                }
            }
        }
    }

    orchestrator.shutdown();
    Ok(())
}

/// One-line summary of what the preview and the export control show.
fn describe(result: &ConversionResult) -> String {
    let preview = Preview::project(result);
    match ExportControl::project(result).notice {
        Some(notice @ ExportNotice::Ready) => format!("{} - {}", preview, notice),
        Some(ExportNotice::Error(_)) | None => preview.to_string(),
    }
}

async fn modified_at(file: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(file).await.ok()?.modified().ok()
}
