//! Output format identifiers and input-format derivation.

use std::fmt;

/// Target formats the engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Docx,
    Odt,
    Html,
}

impl OutputFormat {
    /// The format identifier passed to the engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
            OutputFormat::Odt => "odt",
            OutputFormat::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the input format from a file name's extension.
///
/// Returns the lower-cased substring after the final `.`, or an empty
/// string when the name has no extension. The engine accepts the empty
/// string and falls back to content sniffing.
pub fn input_format_from_name(name: &str) -> String {
    name.rfind('.')
        .map(|i| name[i + 1..].to_ascii_lowercase())
        .unwrap_or_default()
}
