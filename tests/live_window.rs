use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cpuscope::config::CpuScopeConfig;
use cpuscope::data::datasets::{DatasetError, DatasetKind, DatasetStore};
use cpuscope::data::sample::{CpuSample, AGGREGATE_CORE_ID};
use cpuscope::data::window::SampleWindow;
use cpuscope::live::{
    synth_sample, LiveFeed, Mode, ScopeState, AGGREGATE_VALUE_MAX, AUX_VALUE_MAX, CORE_VALUE_MAX,
};

fn sample(ts: &str) -> CpuSample {
    CpuSample {
        timestamp: ts.to_string(),
        server: "CTS02".to_string(),
        per_core: r#"[{"Core":"0","Value":10.0}]"#.to_string(),
        sql_server_cpu: 5.0,
    }
}

fn seed(n: usize) -> Vec<CpuSample> {
    (0..n)
        .map(|i| sample(&format!("2024-06-10T12:00:{i:02}Z")))
        .collect()
}

fn test_config() -> CpuScopeConfig {
    let mut config = CpuScopeConfig::default();
    config.window_len = 5;
    config.tick_period = Duration::from_millis(20);
    config
}

#[test]
fn full_window_keeps_its_length_on_append() {
    let mut window = SampleWindow::new(5);
    window.seed_live(seed(5));

    let mut rng = StdRng::seed_from_u64(7);
    let core_ids: Vec<String> = (0..4).map(|i| i.to_string()).collect();
    let fresh = synth_sample(&mut rng, Utc::now(), &core_ids, "CTS02");
    window.push(fresh.clone());

    assert_eq!(window.len(), 5, "append to a full window evicts the oldest");
    assert_eq!(window.back(), Some(&fresh));
    assert!(
        window.iter().all(|s| s.timestamp != "2024-06-10T12:00:00Z"),
        "the oldest seed entry is gone"
    );
}

#[test]
fn synthesized_values_stay_in_their_ranges() {
    let mut rng = StdRng::seed_from_u64(42);
    let core_ids: Vec<String> = (0..4).map(|i| i.to_string()).collect();

    for _ in 0..200 {
        let s = synth_sample(&mut rng, Utc::now(), &core_ids, "CTS02");
        assert!(s.timestamp_millis().is_ok(), "timestamp must be RFC 3339");

        let readings = s.core_readings().unwrap();
        assert_eq!(readings.len(), core_ids.len() + 1);
        for r in &readings {
            if r.core == AGGREGATE_CORE_ID {
                assert!(r.value >= 1.0 && r.value <= AGGREGATE_VALUE_MAX as f64);
            } else {
                assert!(r.value >= 1.0 && r.value <= CORE_VALUE_MAX as f64);
            }
        }
        assert!(s.sql_server_cpu >= 1.0 && s.sql_server_cpu <= AUX_VALUE_MAX as f64);
    }
}

#[test]
fn live_seed_is_clamped_to_the_bound() {
    let mut window = SampleWindow::new(5);
    window.seed_live(seed(8));
    assert_eq!(window.len(), 5);
    // Newest entries are the ones kept
    assert_eq!(window.back().unwrap().timestamp, "2024-06-10T12:00:07Z");
}

#[test]
fn historical_replace_is_not_bounded() {
    let mut window = SampleWindow::new(5);
    window.replace(seed(8));
    assert_eq!(window.len(), 8, "historical datasets display in full");
}

#[test]
fn selecting_live_starts_the_feed_and_pump_appends() {
    let config = test_config();
    let mut store = DatasetStore::new();
    store.insert(DatasetKind::Live, seed(5));

    let mut state = ScopeState::new(&config);
    state.select(DatasetKind::Live, &store).unwrap();
    assert_eq!(state.mode(), Mode::Live);
    assert!(state.take_dirty());

    std::thread::sleep(Duration::from_millis(120));
    let appended = state.pump();
    assert!(appended > 0, "ticks must arrive while live");
    assert!(state.window().len() <= config.window_len);
    assert!(state.take_dirty());
}

#[test]
fn leaving_live_mode_stops_all_appends() {
    let config = test_config();
    let mut store = DatasetStore::new();
    store.insert(DatasetKind::Live, seed(5));
    store.insert(DatasetKind::TwelveHours, seed(12));

    let mut state = ScopeState::new(&config);
    state.select(DatasetKind::Live, &store).unwrap();
    std::thread::sleep(Duration::from_millis(60));

    state.select(DatasetKind::TwelveHours, &store).unwrap();
    assert_eq!(state.mode(), Mode::Idle);
    assert_eq!(state.window().len(), 12);

    // Wait past several tick periods: nothing may land in the window.
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(state.pump(), 0);
    assert_eq!(state.window().len(), 12);
}

#[test]
fn selecting_a_historical_dataset_replaces_wholesale() {
    let config = test_config();
    let mut store = DatasetStore::new();
    store.insert(DatasetKind::TwelveHours, seed(12));
    store.insert(DatasetKind::OneDay, seed(3));

    let mut state = ScopeState::new(&config);
    state.select(DatasetKind::TwelveHours, &store).unwrap();
    assert_eq!(state.window().len(), 12);
    assert_eq!(state.selected(), Some(DatasetKind::TwelveHours));

    state.select(DatasetKind::OneDay, &store).unwrap();
    assert_eq!(state.window().len(), 3);
    assert_eq!(state.selected(), Some(DatasetKind::OneDay));
    assert_eq!(state.mode(), Mode::Idle);
}

#[test]
fn selecting_a_missing_dataset_fails_and_leaves_state_alone() {
    let config = test_config();
    let mut store = DatasetStore::new();
    store.insert(DatasetKind::TwelveHours, seed(12));

    let mut state = ScopeState::new(&config);
    state.select(DatasetKind::TwelveHours, &store).unwrap();
    let _ = state.take_dirty();

    let err = state.select(DatasetKind::OneMonth, &store).unwrap_err();
    assert!(matches!(err, DatasetError::Missing(DatasetKind::OneMonth)));
    assert_eq!(state.selected(), Some(DatasetKind::TwelveHours));
    assert_eq!(state.window().len(), 12);
    assert!(!state.take_dirty());
}

#[test]
fn stopping_a_feed_is_sticky() {
    let feed = LiveFeed::spawn(
        Duration::from_millis(20),
        vec!["0".to_string()],
        "CTS02".to_string(),
    );
    assert!(!feed.stop_requested());
    feed.stop();
    assert!(feed.stop_requested());
}

#[test]
fn dataset_store_round_trips_json() {
    let json = serde_json::to_string(&seed(3)).unwrap();
    let mut store = DatasetStore::new();
    store.insert_json(DatasetKind::FourMonths, &json).unwrap();
    assert_eq!(store.samples(DatasetKind::FourMonths).unwrap().len(), 3);

    let err = store.insert_json(DatasetKind::OneDay, "not json").unwrap_err();
    assert!(matches!(err, DatasetError::Decode(_)));
}
