use serde::{Deserialize, Serialize};

/// One rendered line of a generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportLine {
    Heading1(String),
    Heading2(String),
    ListItem(String),
    Text(String),
    Blank,
}

impl ReportLine {
    /// Classify a single line by its prefix.
    pub fn classify(line: &str) -> Self {
        if let Some(rest) = line.strip_prefix("# ") {
            ReportLine::Heading1(rest.to_string())
        } else if let Some(rest) = line.strip_prefix("## ") {
            ReportLine::Heading2(rest.to_string())
        } else if let Some(rest) = line.strip_prefix("- ") {
            ReportLine::ListItem(rest.to_string())
        } else if line.trim().is_empty() {
            ReportLine::Blank
        } else {
            ReportLine::Text(line.to_string())
        }
    }
}
