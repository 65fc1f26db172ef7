//! Projects the conversion state into what a preview pane should show.

use std::fmt;

use crate::state::ConversionResult;

/// Exactly one of these is shown at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Nothing rendered yet.
    Placeholder,
    /// A conversion is running.
    Loading,
    /// The last conversion failed; no stale document is shown.
    Error { reason: String },
    /// Embed the rendered document from this `data:` URI.
    Embedded { data_uri: String, byte_len: usize },
}

impl Preview {
    pub fn project(result: &ConversionResult) -> Self {
        match result {
            ConversionResult::Idle => Preview::Placeholder,
            ConversionResult::Pending => Preview::Loading,
            ConversionResult::Failure(reason) => Preview::Error {
                reason: reason.clone(),
            },
            ConversionResult::Success(artifact) => Preview::Embedded {
                data_uri: artifact.data_uri(),
                byte_len: artifact.len(),
            },
        }
    }
}

impl From<&ConversionResult> for Preview {
    fn from(result: &ConversionResult) -> Self {
        Self::project(result)
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preview::Placeholder => write!(f, "PDF will appear here"),
            Preview::Loading => write!(f, "Generating PDF..."),
            Preview::Error { reason } => write!(f, "PDF generation failed: {}", reason),
            Preview::Embedded { byte_len, .. } => write!(f, "PDF preview ready ({} bytes)", byte_len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Artifact;

    #[test]
    fn test_projection_per_state() {
        assert_eq!(Preview::project(&ConversionResult::Idle), Preview::Placeholder);
        assert_eq!(Preview::project(&ConversionResult::Pending), Preview::Loading);
        assert_eq!(
            Preview::project(&ConversionResult::Failure("render timeout".to_string())),
            Preview::Error {
                reason: "render timeout".to_string()
            }
        );

        let artifact = Artifact::from_base64("JVBERi0xLjQK").unwrap();
        assert_eq!(
            Preview::project(&ConversionResult::Success(artifact)),
            Preview::Embedded {
                data_uri: "data:application/pdf;base64,JVBERi0xLjQK".to_string(),
                byte_len: 9,
            }
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Preview::Loading.to_string(), "Generating PDF...");
        assert_eq!(
            Preview::Error {
                reason: "HTTP error! status: 500".to_string()
            }
            .to_string(),
            "PDF generation failed: HTTP error! status: 500"
        );
    }
}
