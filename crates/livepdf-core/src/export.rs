//! Export of the last successful render as a local file.

use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::state::{ConversionResult, PDF_MIME};

pub const EXPORT_FILENAME: &str = "document.pdf";

/// A file ready to be handed to the host's save mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: &'static str,
    pub mime: &'static str,
    pub bytes: Bytes,
}

impl ExportFile {
    /// Write the file into `dir`, returning the full path.
    pub async fn save_in(&self, dir: &Path) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(self.filename);
        tokio::fs::write(&path, &self.bytes).await?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "Saved PDF");
        Ok(path)
    }
}

/// Package the artifact of a successful result.
///
/// Returns `None` for every other state, including `Pending`.
pub fn export(result: &ConversionResult) -> Option<ExportFile> {
    // The transport encoding was decoded once, when the artifact was built.
    let artifact = result.artifact()?;
    Some(ExportFile {
        filename: EXPORT_FILENAME,
        mime: PDF_MIME,
        bytes: artifact.bytes().clone(),
    })
}

/// Status line next to the export control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportNotice {
    Ready,
    Error(String),
}

impl std::fmt::Display for ExportNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportNotice::Ready => f.write_str("PDF ready to download"),
            ExportNotice::Error(reason) => f.write_str(reason),
        }
    }
}

/// State of the download control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportControl {
    pub enabled: bool,
    pub label: &'static str,
    pub notice: Option<ExportNotice>,
}

impl ExportControl {
    pub fn project(result: &ConversionResult) -> Self {
        let label = if result.is_pending() {
            "Converting..."
        } else {
            "Download PDF"
        };
        let notice = match result {
            ConversionResult::Success(_) => Some(ExportNotice::Ready),
            ConversionResult::Failure(reason) => Some(ExportNotice::Error(reason.clone())),
            ConversionResult::Idle | ConversionResult::Pending => None,
        };
        Self {
            enabled: matches!(result, ConversionResult::Success(_)),
            label,
            notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Artifact;
    use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};

    #[test]
    fn test_export_disabled_unless_success() {
        for result in [
            ConversionResult::Idle,
            ConversionResult::Pending,
            ConversionResult::Failure("render timeout".to_string()),
        ] {
            assert!(export(&result).is_none());
            assert!(!ExportControl::project(&result).enabled);
        }
    }

    #[test]
    fn test_export_decodes_transport_encoding() {
        let raw: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let encoded = BASE64_STD.encode(&raw);
        let result = ConversionResult::Success(Artifact::from_base64(encoded).unwrap());

        let file = export(&result).unwrap();
        assert_eq!(file.filename, "document.pdf");
        assert_eq!(file.mime, "application/pdf");
        assert_eq!(file.bytes.as_ref(), raw.as_slice());
    }

    #[test]
    fn test_export_control_projection() {
        let pending = ExportControl::project(&ConversionResult::Pending);
        assert_eq!(pending.label, "Converting...");
        assert_eq!(pending.notice, None);

        let failed = ExportControl::project(&ConversionResult::Failure("boom".to_string()));
        assert_eq!(failed.label, "Download PDF");
        assert_eq!(failed.notice, Some(ExportNotice::Error("boom".to_string())));

        let ready = ExportControl::project(&ConversionResult::Success(
            Artifact::from_base64("JVBERi0xLjQK").unwrap(),
        ));
        assert!(ready.enabled);
        assert_eq!(ready.notice, Some(ExportNotice::Ready));
        assert_eq!(ExportNotice::Ready.to_string(), "PDF ready to download");
    }

    #[test]
    fn test_error_notice_shows_reason_verbatim() {
        let reason = crate::ConversionError::Transport("connection refused".to_string()).to_string();
        let control = ExportControl::project(&ConversionResult::Failure(reason));
        assert_eq!(
            control.notice.unwrap().to_string(),
            "Error: connection refused"
        );
        assert_eq!(
            ExportNotice::Error("render timeout".to_string()).to_string(),
            "render timeout"
        );
    }

    #[tokio::test]
    async fn test_save_in_writes_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = ConversionResult::Success(Artifact::from_base64("JVBERi0xLjQK").unwrap());
        let file = export(&result).unwrap();

        let path = file.save_in(&temp_dir.path().join("out")).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "document.pdf");
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4\n");
    }
}
