//! Live mode: sample synthesis, the periodic producer, and the Idle/Live
//! state machine owning the active dataset.
//!
//! The producer runs on its own thread and only ever communicates through an
//! mpsc channel. All window mutation happens on the caller's thread when
//! draining ([`ScopeState::pump`]), so a dataset replacement can never
//! interleave with an append: after [`ScopeState::select`] drops the feed,
//! nothing is left that could deliver another tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;

use crate::config::CpuScopeConfig;
use crate::data::datasets::{DatasetError, DatasetKind, DatasetStore};
use crate::data::sample::{CpuSample, AGGREGATE_CORE_ID};
use crate::data::window::SampleWindow;

/// Upper bound (inclusive) of synthesized per-core percentages.
pub const CORE_VALUE_MAX: u32 = 50;
/// Upper bound (inclusive) of the synthesized aggregate reading.
pub const AGGREGATE_VALUE_MAX: u32 = 200;
/// Upper bound (inclusive) of the synthesized auxiliary metric.
pub const AUX_VALUE_MAX: u32 = 50;

/// Simulator state: historical display or periodic synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Live,
}

fn roll<R: Rng>(rng: &mut R, max: u32) -> f64 {
    rng.random_range(1..=max) as f64
}

/// Synthesize one sample with uniform random values in the documented ranges:
/// per-core in `[1, CORE_VALUE_MAX]`, aggregate in `[1, AGGREGATE_VALUE_MAX]`,
/// auxiliary in `[1, AUX_VALUE_MAX]`.
pub fn synth_sample<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    core_ids: &[String],
    server: &str,
) -> CpuSample {
    let mut payload: Vec<serde_json::Value> = Vec::with_capacity(core_ids.len() + 1);
    for id in core_ids {
        payload.push(serde_json::json!({ "Core": id, "Value": roll(rng, CORE_VALUE_MAX) }));
    }
    payload.push(
        serde_json::json!({ "Core": AGGREGATE_CORE_ID, "Value": roll(rng, AGGREGATE_VALUE_MAX) }),
    );

    CpuSample {
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        server: server.to_string(),
        per_core: serde_json::Value::Array(payload).to_string(),
        sql_server_cpu: roll(rng, AUX_VALUE_MAX),
    }
}

/// Handle to the live producer thread.
///
/// Dropping the handle requests a stop and closes the channel; the thread
/// exits at its next wakeup, and any sample it was about to send lands in a
/// channel nobody reads.
pub struct LiveFeed {
    rx: Receiver<CpuSample>,
    stop: Arc<AtomicBool>,
}

impl LiveFeed {
    /// Spawn the producer: one synthesized sample per `period`.
    pub fn spawn(period: Duration, core_ids: Vec<String>, server: String) -> Self {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        log::info!("live feed started (period {period:?})");
        std::thread::spawn(move || {
            let mut rng = rand::rng();
            loop {
                std::thread::sleep(period);
                if flag.load(Ordering::Relaxed) {
                    break;
                }
                let sample = synth_sample(&mut rng, Utc::now(), &core_ids, &server);
                if tx.send(sample).is_err() {
                    break;
                }
            }
            log::debug!("live feed stopped");
        });
        Self { rx, stop }
    }

    /// Take the next pending sample, if any.
    pub fn try_recv(&self) -> Option<CpuSample> {
        self.rx.try_recv().ok()
    }

    /// Ask the producer thread to exit at its next wakeup.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Owned scope state: selected dataset, active window, and live feed.
///
/// All methods run on one thread (the UI thread in the app); the state is
/// only ever mutated through [`select`](Self::select) and
/// [`pump`](Self::pump).
pub struct ScopeState {
    mode: Mode,
    selected: Option<DatasetKind>,
    window: SampleWindow,
    feed: Option<LiveFeed>,
    tick_period: Duration,
    core_ids: Vec<String>,
    server: String,
    dirty: bool,
}

impl ScopeState {
    pub fn new(config: &CpuScopeConfig) -> Self {
        Self {
            mode: Mode::Idle,
            selected: None,
            window: SampleWindow::new(config.window_len),
            feed: None,
            tick_period: config.tick_period,
            core_ids: config.core_ids.clone(),
            server: config.server.clone(),
            dirty: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected(&self) -> Option<DatasetKind> {
        self.selected
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    pub fn samples(&self) -> impl Iterator<Item = &CpuSample> {
        self.window.iter()
    }

    /// Select a dataset: replace the window wholesale and switch modes.
    ///
    /// Any running feed is stopped first (its channel is dropped with it, so
    /// no pending tick can reach the window afterwards). Selecting
    /// [`DatasetKind::Live`] seeds the window from the live seed dataset,
    /// clamped to the window bound, and spawns a fresh producer.
    pub fn select(&mut self, kind: DatasetKind, store: &DatasetStore) -> Result<(), DatasetError> {
        let samples = store.samples(kind)?.to_vec();
        self.feed = None;
        if kind.is_live() {
            self.window.seed_live(samples);
            self.feed = Some(LiveFeed::spawn(
                self.tick_period,
                self.core_ids.clone(),
                self.server.clone(),
            ));
            self.mode = Mode::Live;
        } else {
            self.window.replace(samples);
            self.mode = Mode::Idle;
        }
        self.selected = Some(kind);
        self.dirty = true;
        log::info!("selected dataset {kind:?} ({} samples)", self.window.len());
        Ok(())
    }

    /// Drain pending live samples into the window. Returns the append count.
    pub fn pump(&mut self) -> usize {
        let mut appended = 0;
        if let Some(feed) = &self.feed {
            while let Some(sample) = feed.try_recv() {
                self.window.push(sample);
                appended += 1;
            }
        }
        if appended > 0 {
            self.dirty = true;
        }
        appended
    }

    /// Whether the window changed since the last call; consumed on read.
    ///
    /// The series builder reruns exactly when this returns `true`.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
