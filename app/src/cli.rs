use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use livepdf_core::{
    Config, ConversionOutcome, ConversionResult, Document, HttpRenderService, Orchestrator,
};

use crate::style_from_assignments;

/// Convert a Markdown file once and save the PDF into the export directory.
pub async fn convert(config: Config, file: PathBuf, set: Vec<String>) -> anyhow::Result<PathBuf> {
    let style = style_from_assignments(&set)?;
    let content = read_markdown(&file).await?;

    let service = HttpRenderService::new(&config.service_url, config.request_timeout)?;
    let orchestrator = Orchestrator::new(
        config.clone(),
        Arc::new(service),
        Document::new(content, style),
    );

    tracing::info!("Converting {:?} via {}", file, config.service_url);

    match orchestrator.convert_now().await {
        ConversionOutcome::Skipped => bail!("{} is empty, nothing to convert", file.display()),
        ConversionOutcome::Superseded => bail!("Conversion was superseded"),
        ConversionOutcome::Applied(ConversionResult::Failure(reason)) => {
            bail!("Conversion failed: {}", reason)
        }
        ConversionOutcome::Applied(_) => {}
    }

    let export = orchestrator
        .export()
        .context("Conversion finished without a PDF")?;
    export
        .save_in(&config.export_dir)
        .await
        .with_context(|| format!("Failed to save PDF to {:?}", config.export_dir))
}

/// Probe the rendering service.
pub async fn health(config: Config) -> anyhow::Result<()> {
    let service = HttpRenderService::new(&config.service_url, config.request_timeout)?;
    service.check_health().await?;
    tracing::info!("Rendering service at {} is healthy", config.service_url);
    Ok(())
}

pub(crate) async fn read_markdown(file: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {:?}", file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(temp_dir: &Path) -> Config {
        // Nothing listens here; these tests never reach the network.
        Config::load_or_default()
            .with_service_url("http://127.0.0.1:9")
            .with_export_dir(temp_dir.join("out"))
    }

    #[tokio::test]
    async fn test_convert_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = convert(
            test_config(temp_dir.path()),
            temp_dir.path().join("missing.md"),
            vec![],
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[tokio::test]
    async fn test_convert_empty_file_is_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("empty.md");
        std::fs::write(&file, "  \n").unwrap();

        let err = convert(test_config(temp_dir.path()), file, vec![])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nothing to convert"));
        assert!(!temp_dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_convert_rejects_unknown_style_field() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("doc.md");
        std::fs::write(&file, "# Title").unwrap();

        let err = convert(
            test_config(temp_dir.path()),
            file,
            vec!["colour=#fff".to_string()],
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("unknown style field"));
    }
}
