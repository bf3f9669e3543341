//! JSON output for load summaries (made by FontLab https://www.fontlab.com/)

use std::io::Write;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::font::{FaceInfo, Font};

/// What one requested name turned into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSummary {
    pub name: String,
    pub path: String,
    pub faces: Vec<FaceInfo>,
    /// Whether the primary face covers the requested sample text, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covers_text: Option<bool>,
}

impl FontSummary {
    pub fn new(name: &str, path: &str, font: &Font) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            faces: font.faces().to_vec(),
            covers_text: None,
        }
    }

    pub fn with_sample(mut self, font: &Font, text: Option<&str>) -> Self {
        self.covers_text = text.map(|t| font.covers_text(t));
        self
    }
}

/// JSON encodings for a batch of summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonStyle {
    /// One indented array.
    Array,
    /// One compact object per line (NDJSON).
    Lines,
}

/// Encode `summaries` to `w`; both styles end with a newline.
pub fn write_summaries(
    summaries: &[FontSummary],
    style: JsonStyle,
    mut w: impl Write,
) -> Result<()> {
    match style {
        JsonStyle::Array => {
            serde_json::to_writer_pretty(&mut w, summaries)?;
            writeln!(w)?;
        }
        JsonStyle::Lines => {
            for summary in summaries {
                serde_json::to_writer(&mut w, summary)?;
                writeln!(w)?;
            }
        }
    }
    Ok(())
}
