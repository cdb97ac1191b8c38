//! The CPU scope app: dataset buttons on top, stacked per-core columns plus
//! the database server CPU line below.

use std::ops::RangeInclusive;
use std::time::Duration;

use chrono::TimeZone;
use eframe::egui;
use egui::{Align2, Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Text};

use crate::chart::{self, ChartOptions, EguiChart};
use crate::config::CpuScopeConfig;
use crate::data::datasets::{DatasetKind, DatasetStore};
use crate::live::{Mode, ScopeState};
use crate::series::{build_series_lossy, SeriesKind};

/// Stack total labels overlap beyond this many column groups.
const MAX_STACK_LABELS: usize = 48;

pub struct CpuScopeApp {
    store: DatasetStore,
    config: CpuScopeConfig,
    state: ScopeState,
    chart: EguiChart,
    options: ChartOptions,
    skipped: usize,
    last_error: Option<String>,
}

impl CpuScopeApp {
    pub fn new(store: DatasetStore, config: CpuScopeConfig) -> Self {
        let mut state = ScopeState::new(&config);
        let mut last_error = None;
        if let Err(e) = state.select(config.initial_dataset, &store) {
            log::error!("initial dataset unavailable: {e}");
            last_error = Some(e.to_string());
        }
        let options = ChartOptions::new(config.title.clone(), Vec::new());
        Self {
            store,
            config,
            state,
            chart: EguiChart::new(),
            options,
            skipped: 0,
            last_error,
        }
    }

    /// Recompute the series set from the current window and reconcile the
    /// chart. Runs only when the window actually changed.
    fn rebuild_series(&mut self) {
        let (series, errors) = build_series_lossy(self.state.samples());
        self.skipped = errors.len();
        for e in &errors {
            log::warn!("skipping sample: {e}");
        }
        chart::reconcile(&mut self.chart, &series);
        self.options = ChartOptions::new(self.config.title.clone(), series);
    }

    fn select(&mut self, kind: DatasetKind) {
        match self.state.select(kind, &self.store) {
            Ok(()) => self.last_error = None,
            Err(e) => {
                log::error!("cannot select {kind:?}: {e}");
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn buttons_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for kind in DatasetKind::ALL {
                let selected = self.state.selected() == Some(kind);
                if ui.selectable_label(selected, kind.label()).clicked() {
                    self.select(kind);
                }
            }
        });
        if self.skipped > 0 {
            ui.colored_label(
                Color32::from_rgb(0xCC, 0x88, 0x00),
                format!("{} sample(s) skipped: malformed per-core payload", self.skipped),
            );
        }
        if let Some(err) = &self.last_error {
            ui.colored_label(Color32::LIGHT_RED, err);
        }
    }

    fn plot(&self, ui: &mut egui::Ui) {
        let width = chart::column_width_millis(&self.options.series);

        // Each stacked column series sits on top of all previously built ones.
        let mut bar_charts: Vec<BarChart> = Vec::new();
        let mut lines: Vec<(String, Vec<[f64; 2]>, Color32, f32)> = Vec::new();
        for rendered in self.chart.iter() {
            let s = &rendered.series;
            match s.kind {
                SeriesKind::StackedColumn => {
                    let bars: Vec<Bar> = s
                        .points
                        .iter()
                        .map(|&(t, v)| Bar::new(t as f64, v).width(width))
                        .collect();
                    let mut bc = BarChart::new(s.name.clone(), bars).color(rendered.look.color);
                    {
                        let below: Vec<&BarChart> = bar_charts.iter().collect();
                        bc = bc.stack_on(&below);
                    }
                    bar_charts.push(bc);
                }
                SeriesKind::Line => {
                    let pts: Vec<[f64; 2]> = s.points.iter().map(|&(t, v)| [t as f64, v]).collect();
                    lines.push((
                        s.name.clone(),
                        pts,
                        rendered.look.color,
                        rendered.look.line_width,
                    ));
                }
            }
        }

        let totals = if self.config.show_stack_labels {
            chart::stack_totals(&self.options.series)
        } else {
            Vec::new()
        };

        let mut plot = Plot::new("cpu_scope")
            .include_y(0.0)
            .include_y(self.config.y_max)
            .x_axis_formatter(|mark, range| x_axis_label(mark.value, range))
            .label_formatter(|name, point| {
                if name.is_empty() {
                    String::new()
                } else {
                    chart::format_tooltip(name, point.x as i64, point.y)
                }
            });
        if self.config.show_legend {
            plot = plot.legend(Legend::default());
        }

        plot.show(ui, |plot_ui| {
            for bc in bar_charts {
                plot_ui.bar_chart(bc);
            }
            for (name, pts, color, w) in lines {
                let points: PlotPoints = pts.into();
                plot_ui.line(Line::new(name, points).color(color).width(w));
            }
            if totals.len() <= MAX_STACK_LABELS {
                for (t, total) in totals {
                    plot_ui.text(
                        Text::new(
                            format!("total_{t}"),
                            PlotPoint::new(t as f64, total + 2.0),
                            RichText::new(chart::format_stack_label(total)).size(10.0),
                        )
                        .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            }
        });
    }
}

impl eframe::App for CpuScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.pump();
        if self.state.take_dirty() {
            self.rebuild_series();
        }
        if self.chart.take_pending_redraw() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.heading(&self.config.title);
            self.buttons_row(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.plot(ui);
        });

        // While live, wake up without input events so pending samples drain.
        if self.state.mode() == Mode::Live {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}

fn x_axis_label(millis: f64, range: &RangeInclusive<f64>) -> String {
    let span_millis = range.end() - range.start();
    let fmt = if span_millis > 2.0 * 24.0 * 3_600_000.0 {
        "%m-%d"
    } else {
        "%H:%M"
    };
    chrono::Local
        .timestamp_millis_opt(millis as i64)
        .single()
        .map(|dt| dt.format(fmt).to_string())
        .unwrap_or_default()
}

/// Run the CPU scope as a native window until closed.
pub fn run_cpuscope(store: DatasetStore, config: CpuScopeConfig) -> eframe::Result<()> {
    let title = config.title.clone();
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default().with_inner_size([1280.0, 720.0]);
    eframe::run_native(
        &title,
        native_options,
        Box::new(|_cc| Ok(Box::new(CpuScopeApp::new(store, config)))),
    )
}
