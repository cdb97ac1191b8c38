//! Shared configuration for the CPU scope.

use std::time::Duration;

use crate::data::datasets::DatasetKind;

/// Top-level configuration for the CPU scope app and the live simulator.
#[derive(Debug, Clone)]
pub struct CpuScopeConfig {
    // ── Live simulation ──────────────────────────────────────────────────────
    /// Sliding window length while live.
    pub window_len: usize,
    /// Period between synthesized live samples.
    pub tick_period: Duration,
    /// Core ids the synthesizer reports (the aggregate is added on top).
    pub core_ids: Vec<String>,
    /// Server name stamped on synthesized samples.
    pub server: String,

    // ── Window / chrome ──────────────────────────────────────────────────────
    /// Native window and chart title.
    pub title: String,

    // ── Chart ────────────────────────────────────────────────────────────────
    /// Upper bound of the primary percentage axis.
    pub y_max: f64,
    /// Render stack total labels above each column group.
    pub show_stack_labels: bool,
    pub show_legend: bool,
    /// Dataset shown on startup.
    pub initial_dataset: DatasetKind,
}

impl Default for CpuScopeConfig {
    fn default() -> Self {
        Self {
            window_len: 20,
            tick_period: Duration::from_millis(3_000),
            core_ids: vec![
                "0".to_string(),
                "1".to_string(),
                "2".to_string(),
                "3".to_string(),
            ],
            server: "CTS02".to_string(),

            title: "CPU Core Usage (%)".to_string(),

            y_max: 100.0,
            show_stack_labels: true,
            show_legend: true,
            initial_dataset: DatasetKind::TwelveHours,
        }
    }
}
