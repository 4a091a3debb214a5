//! Run summary and report text
//!
//! A [`RunSummary`] records what happened to each layer, in processing
//! order, plus whether the hazard symbology was refreshed. Its report is
//! the body of the summary email.

use chrono::{DateTime, Local};
use std::fmt;

/// Result of one layer's pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerOutcome {
    /// Number of features the hosted layer reports as added
    Loaded(usize),
    /// Retries exhausted
    Failed,
}

impl LayerOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LayerOutcome::Loaded(_))
    }
}

impl fmt::Display for LayerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerOutcome::Loaded(count) => write!(f, "{count}"),
            LayerOutcome::Failed => f.write_str("error"),
        }
    }
}

/// Summary of one sync run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Application name used in the report title
    pub name: String,

    pub started_at: DateTime<Local>,

    pub finished_at: DateTime<Local>,

    /// Layer name and outcome, in processing order
    pub outcomes: Vec<(String, LayerOutcome)>,

    pub symbology_updated: bool,
}

impl RunSummary {
    /// Start an empty summary
    pub fn new(name: impl Into<String>, started_at: DateTime<Local>) -> Self {
        Self {
            name: name.into(),
            started_at,
            finished_at: started_at,
            outcomes: Vec::new(),
            symbology_updated: false,
        }
    }

    /// Record a layer's outcome
    pub fn record(&mut self, layer: impl Into<String>, outcome: LayerOutcome) {
        self.outcomes.push((layer.into(), outcome));
    }

    /// Close the summary
    pub fn finish(&mut self, symbology_updated: bool, finished_at: DateTime<Local>) {
        self.symbology_updated = symbology_updated;
        self.finished_at = finished_at;
    }

    pub fn outcome(&self, layer: &str) -> Option<LayerOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == layer)
            .map(|(_, outcome)| *outcome)
    }

    /// Names of layers that failed
    pub fn failed_layers(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_loaded())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Every layer loaded and the symbology was updated
    pub fn is_successful(&self) -> bool {
        self.failed_layers().is_empty() && self.symbology_updated
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Render the plain-text report
    pub fn render_report(&self) -> String {
        let mut lines = vec![
            format!("{} update {}", self.name, self.started_at.format("%Y-%m-%d")),
            "=".repeat(20),
            String::new(),
            format!("Start time: {}", self.started_at.format("%H:%M:%S")),
            format!("End time: {}", self.finished_at.format("%H:%M:%S")),
            format!("Duration: {}", format_duration(self.duration())),
            "Update Counts:".to_string(),
        ];
        lines.extend(
            self.outcomes
                .iter()
                .map(|(name, outcome)| format!("{name}: {outcome}")),
        );
        lines.push(format!(
            "Hazard Area Symbology Updated: {}",
            self.symbology_updated
        ));
        lines.join("\n")
    }

    /// Log the summary
    pub fn log_summary(&self) {
        let failed = self.failed_layers();
        tracing::info!(
            layers = self.outcomes.len(),
            failed = failed.len(),
            symbology_updated = self.symbology_updated,
            duration_secs = self.duration().num_seconds(),
            "Sync completed"
        );
        if !failed.is_empty() {
            tracing::warn!(layers = ?failed, "Sync completed with failed layers");
        }
    }
}

/// `H:MM:SS`, whole seconds
pub fn format_duration(duration: chrono::Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!(
        "{}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 18, h, m, s).unwrap()
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(LayerOutcome::Loaded(42).to_string(), "42");
        assert_eq!(LayerOutcome::Loaded(0).to_string(), "0");
        assert_eq!(LayerOutcome::Failed.to_string(), "error");
    }

    #[test]
    fn test_render_report() {
        let mut summary = RunSummary::new("nfhl_sync", at(2, 0, 0));
        summary.record("S_LOMR", LayerOutcome::Loaded(42));
        summary.record("S_FIRM_Pan", LayerOutcome::Failed);
        summary.finish(true, at(2, 14, 7));

        let expected = "nfhl_sync update 2026-10-18\n\
                        ====================\n\
                        \n\
                        Start time: 02:00:00\n\
                        End time: 02:14:07\n\
                        Duration: 0:14:07\n\
                        Update Counts:\n\
                        S_LOMR: 42\n\
                        S_FIRM_Pan: error\n\
                        Hazard Area Symbology Updated: true";
        assert_eq!(summary.render_report(), expected);
    }

    #[test]
    fn test_success_requires_layers_and_symbology() {
        let mut summary = RunSummary::new("nfhl_sync", at(2, 0, 0));
        summary.record("S_LOMR", LayerOutcome::Loaded(1));
        summary.finish(true, at(2, 0, 1));
        assert!(summary.is_successful());

        summary.finish(false, at(2, 0, 1));
        assert!(!summary.is_successful());

        summary.finish(true, at(2, 0, 1));
        summary.record("S_XS", LayerOutcome::Failed);
        assert!(!summary.is_successful());
        assert_eq!(summary.failed_layers(), vec!["S_XS"]);
        assert_eq!(summary.outcome("S_LOMR"), Some(LayerOutcome::Loaded(1)));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(chrono::Duration::seconds(0)), "0:00:00");
        assert_eq!(format_duration(chrono::Duration::seconds(3725)), "1:02:05");
        assert_eq!(format_duration(chrono::Duration::seconds(-5)), "0:00:00");
    }
}
