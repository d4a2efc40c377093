use std::collections::HashMap;

use tracing::{info, warn};

use crate::models::period::Period;
use crate::models::report::ReportLine;
use crate::providers::traits::TradingBackend;

/// Text stored when the backend returned an empty report.
pub const EMPTY_REPORT_PLACEHOLDER: &str = "The report is empty.";

/// Fetches generated reports and keeps the latest text per period.
///
/// A failed request never raises: the failure message is cached in place of
/// the report so the view always has something to show.
#[derive(Debug, Default)]
pub struct ReportService {
    reports: HashMap<Period, String>,
}

impl ReportService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a fresh report for `period` and cache the outcome.
    pub async fn fetch_report(&mut self, backend: &dyn TradingBackend, period: Period) -> &str {
        let text = match backend.generate_report(period).await {
            Ok(report) if report.trim().is_empty() => {
                warn!(%period, "backend returned an empty report");
                EMPTY_REPORT_PLACEHOLDER.to_string()
            }
            Ok(report) => {
                info!(%period, chars = report.len(), "report received");
                report
            }
            Err(e) => {
                warn!(%period, error = %e, "report generation failed");
                failure_message(&e.to_string())
            }
        };
        self.reports.insert(period, text);
        self.reports.get(&period).map(String::as_str).unwrap_or_default()
    }

    pub fn cached(&self, period: Period) -> Option<&str> {
        self.reports.get(&period).map(String::as_str)
    }

    /// Cached report for `period`, classified line by line.
    pub fn formatted(&self, period: Period) -> Vec<ReportLine> {
        self.cached(period).map(format_report).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.reports.clear();
    }
}

pub fn failure_message(cause: &str) -> String {
    format!("Report generation failed\n\nCause: {cause}")
}

/// Line-based rendering of report text. Not a markdown parser: only the
/// `# `, `## ` and `- ` prefixes are recognised.
pub fn format_report(text: &str) -> Vec<ReportLine> {
    text.lines().map(ReportLine::classify).collect()
}
