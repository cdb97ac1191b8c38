//! cpuscope crate root: re-exports and module wiring.
//!
//! An interactive CPU utilization chart built on egui/eframe: stacked
//! per-core columns plus a database server CPU line, switchable between five
//! canned historical datasets and a simulated live stream.
//!
//! Module map:
//! - `data`: raw samples, the sliding window, and the dataset registry
//! - `series`: pure transform from samples to named chart series
//! - `live`: sample synthesis, the periodic producer, and the Idle/Live state
//! - `chart`: the chart seam (upsert/redraw), reconciliation, and options
//! - `config`: shared configuration
//! - `app`: the eframe UI and run helper

pub mod app;
pub mod chart;
pub mod config;
pub mod data;
pub mod live;
pub mod series;

// Public re-exports for a compact external API
pub use app::{run_cpuscope, CpuScopeApp};
pub use chart::{reconcile, ChartOptions, ChartSurface, EguiChart};
pub use config::CpuScopeConfig;
pub use data::{CoreReading, CpuSample, DatasetError, DatasetKind, DatasetStore, SampleError,
    SampleWindow, AGGREGATE_CORE_ID};
pub use live::{synth_sample, LiveFeed, Mode, ScopeState};
pub use series::{build_series, build_series_lossy, NamedSeries, SeriesKind, AUX_SERIES_NAME};
