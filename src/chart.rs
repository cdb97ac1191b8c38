//! Chart seam: the narrow surface the core talks to, series reconciliation,
//! and the configuration object handed to the renderer.
//!
//! The plot widget itself stays an external collaborator. The core only ever
//! calls [`ChartSurface::upsert_series`] and [`ChartSurface::redraw`];
//! [`EguiChart`] is the egui-backed implementation used by the app.

use std::collections::HashMap;

use chrono::TimeZone;
use egui::Color32;

use crate::series::{NamedSeries, SeriesKind};

/// Minimal mutation interface offered by a chart backend.
pub trait ChartSurface {
    /// Update the series with this name in place, or add it if unseen.
    fn upsert_series(&mut self, series: &NamedSeries);
    /// Repaint once after a batch of upserts.
    fn redraw(&mut self);
}

/// Reconcile a freshly computed series set against the chart.
///
/// Each series is upserted by name (update-in-place keeps the visual identity
/// of existing series, e.g. assigned colors), then exactly one redraw is
/// triggered for the whole batch. Series already on the chart but absent from
/// `series` are left untouched; stale series are never removed.
pub fn reconcile<C: ChartSurface + ?Sized>(chart: &mut C, series: &[NamedSeries]) {
    for s in series {
        chart.upsert_series(s);
    }
    chart.redraw();
}

// ─────────────────────────────────────────────────────────────────────────────
// Chart options
// ─────────────────────────────────────────────────────────────────────────────

/// One axis of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisDef {
    pub label: Option<String>,
    /// Fixed bounds, or `None` to fit the data.
    pub range: Option<(f64, f64)>,
    /// Rendered opposite the primary axis.
    pub opposite: bool,
}

/// Configuration object consumed by the renderer: axis definitions plus the
/// computed series list.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    /// Percentage axis for the stacked core columns, fixed to 0..=100.
    pub primary_axis: AxisDef,
    /// Unlabeled-range axis for the auxiliary line.
    pub secondary_axis: AxisDef,
    pub series: Vec<NamedSeries>,
}

impl ChartOptions {
    pub fn new<S: Into<String>>(title: S, series: Vec<NamedSeries>) -> Self {
        Self {
            title: title.into(),
            primary_axis: AxisDef {
                label: Some("Value".to_string()),
                range: Some((0.0, 100.0)),
                opposite: false,
            },
            secondary_axis: AxisDef {
                label: Some(crate::series::AUX_SERIES_NAME.to_string()),
                range: None,
                opposite: true,
            },
            series,
        }
    }
}

/// Stack total label, e.g. `"87.50 %"`.
pub fn format_stack_label(total: f64) -> String {
    format!("{total:.2} %")
}

/// Shared tooltip line: series name, value, and a localized timestamp.
pub fn format_tooltip(name: &str, millis: i64, value: f64) -> String {
    let when = chrono::Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%b %e, %Y %H:%M").to_string())
        .unwrap_or_default();
    format!("{name}: {value} %\n{when}")
}

/// Sum the stacked-column values per timestamp, in first-occurrence order.
///
/// Feeds the stack total labels rendered above each column group.
pub fn stack_totals(series: &[NamedSeries]) -> Vec<(i64, f64)> {
    let mut totals: Vec<(i64, f64)> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();
    for s in series.iter().filter(|s| s.kind == SeriesKind::StackedColumn) {
        for &(t, v) in &s.points {
            match index.get(&t) {
                Some(&i) => totals[i].1 += v,
                None => {
                    index.insert(t, totals.len());
                    totals.push((t, v));
                }
            }
        }
    }
    totals
}

/// Column width in milliseconds for the given series set.
///
/// Uses the smallest positive gap between consecutive column timestamps so
/// adjacent stacks never overlap, with a small padding factor.
pub fn column_width_millis(series: &[NamedSeries]) -> f64 {
    let mut min_gap = f64::INFINITY;
    for s in series.iter().filter(|s| s.kind == SeriesKind::StackedColumn) {
        for pair in s.points.windows(2) {
            let gap = (pair[1].0 - pair[0].0) as f64;
            if gap > 0.0 && gap < min_gap {
                min_gap = gap;
            }
        }
    }
    if min_gap.is_finite() {
        min_gap * 0.6
    } else {
        // Single column (or none): fall back to the live tick period.
        3_000.0 * 0.6
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Egui-backed surface
// ─────────────────────────────────────────────────────────────────────────────

/// The visual presentation of a rendered series.
#[derive(Debug, Clone)]
pub struct SeriesLook {
    pub color: Color32,
    pub line_width: f32,
}

impl SeriesLook {
    /// Create a look with a color allocated from the trace index.
    pub fn new(index: usize) -> Self {
        Self {
            color: Self::alloc_color(index),
            line_width: 1.5,
        }
    }

    /// Allocate a distinct color for the given series index.
    pub fn alloc_color(index: usize) -> Color32 {
        const PALETTE: [Color32; 10] = [
            Color32::from_rgb(31, 119, 180),
            Color32::from_rgb(255, 127, 14),
            Color32::from_rgb(44, 160, 44),
            Color32::from_rgb(214, 39, 40),
            Color32::from_rgb(148, 103, 189),
            Color32::from_rgb(140, 86, 75),
            Color32::from_rgb(227, 119, 194),
            Color32::from_rgb(127, 127, 127),
            Color32::from_rgb(188, 189, 34),
            Color32::from_rgb(23, 190, 207),
        ];
        PALETTE[index % PALETTE.len()]
    }
}

/// A series held by [`EguiChart`]: the data plus its stable look.
#[derive(Debug, Clone)]
pub struct RenderedSeries {
    pub series: NamedSeries,
    pub look: SeriesLook,
}

/// Retained series state for the egui renderer.
///
/// Keyed by series name with first-insertion draw order. Updates replace the
/// data but keep the allocated look, so a live-mode refresh does not recolor
/// the chart.
#[derive(Debug, Default)]
pub struct EguiChart {
    series: HashMap<String, RenderedSeries>,
    order: Vec<String>,
    pending_redraw: bool,
    redraws: u64,
}

impl EguiChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Series in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &RenderedSeries> {
        self.order.iter().filter_map(|name| self.series.get(name))
    }

    pub fn get(&self, name: &str) -> Option<&RenderedSeries> {
        self.series.get(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of batched redraws triggered so far.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Consume the pending-redraw flag; the app repaints when this is true.
    pub fn take_pending_redraw(&mut self) -> bool {
        std::mem::take(&mut self.pending_redraw)
    }
}

impl ChartSurface for EguiChart {
    fn upsert_series(&mut self, series: &NamedSeries) {
        match self.series.get_mut(&series.name) {
            Some(existing) => {
                existing.series = series.clone();
            }
            None => {
                let look = SeriesLook::new(self.order.len());
                self.order.push(series.name.clone());
                self.series.insert(
                    series.name.clone(),
                    RenderedSeries {
                        series: series.clone(),
                        look,
                    },
                );
            }
        }
    }

    fn redraw(&mut self) {
        self.pending_redraw = true;
        self.redraws += 1;
    }
}
