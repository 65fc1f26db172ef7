//! The editable document: Markdown content plus its style settings.

use crate::style::StyleSettings;

/// Sample shown when a session starts.
pub const SAMPLE_CONTENT: &str = r#"# Welcome to the Markdown to PDF Converter

This is a **sample** document that shows what the converter can do.

## Features

- Markdown to PDF conversion
- Live style adjustments
- Preview of the result
- Download of the finished PDF

### Code sample

```javascript
function hello() {
    console.log("Hello, World!");
}
```

### Checklist

1. Write your text in Markdown
2. Adjust the styles
3. Download the PDF

> This is a quote to demonstrate the styles.

**Bold text** and *italics* are supported too."#;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub content: String,
    pub settings: StyleSettings,
}

impl Document {
    pub fn new(content: impl Into<String>, settings: StyleSettings) -> Self {
        Self {
            content: content.into(),
            settings,
        }
    }

    /// Whether there is anything worth rendering.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(SAMPLE_CONTENT, StyleSettings::default())
    }
}
