//! Demo binary: synthesize the six canned datasets and run the scope.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use cpuscope::config::CpuScopeConfig;
use cpuscope::data::datasets::{DatasetKind, DatasetStore};
use cpuscope::data::sample::CpuSample;
use cpuscope::live::synth_sample;

/// One demo dataset: `count` samples ending at `end`, spaced `step` apart.
fn demo_dataset(
    rng: &mut StdRng,
    config: &CpuScopeConfig,
    end: DateTime<Utc>,
    count: usize,
    step: ChronoDuration,
) -> Vec<CpuSample> {
    (0..count)
        .map(|i| {
            let t = end - step * ((count - 1 - i) as i32);
            synth_sample(rng, t, &config.core_ids, &config.server)
        })
        .collect()
}

fn demo_datasets(config: &CpuScopeConfig) -> DatasetStore {
    // Seeded so restarting the demo shows the same historical charts.
    let mut rng = StdRng::seed_from_u64(0x6370_7573);
    let now = Utc::now();

    let mut store = DatasetStore::new();
    store.insert(
        DatasetKind::Live,
        demo_dataset(&mut rng, config, now, config.window_len, ChronoDuration::seconds(3)),
    );
    store.insert(
        DatasetKind::TwelveHours,
        demo_dataset(&mut rng, config, now, 144, ChronoDuration::minutes(5)),
    );
    store.insert(
        DatasetKind::OneDay,
        demo_dataset(&mut rng, config, now, 144, ChronoDuration::minutes(10)),
    );
    store.insert(
        DatasetKind::FifteenDays,
        demo_dataset(&mut rng, config, now, 120, ChronoDuration::hours(3)),
    );
    store.insert(
        DatasetKind::OneMonth,
        demo_dataset(&mut rng, config, now, 124, ChronoDuration::hours(6)),
    );
    store.insert(
        DatasetKind::FourMonths,
        demo_dataset(&mut rng, config, now, 123, ChronoDuration::hours(24)),
    );
    store
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = CpuScopeConfig::default();
    let store = demo_datasets(&config);
    cpuscope::run_cpuscope(store, config)
}
