use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use vectorplay_core::{seconds_per_frame, Player, PlayerConfig, PlayerError};
use vectorplay_test_fixtures::{animations, EngineLog, MockEngine, MockEngineFactory, RecordingBackend};

type TestPlayer = Player<MockEngine, RecordingBackend>;

fn load(name: &str, config: &PlayerConfig) -> (TestPlayer, Rc<RefCell<EngineLog>>) {
    let mut factory = MockEngineFactory::new();
    let log = factory.log();
    let json = animations::json(name).expect("fixture");
    let player = Player::load_from_memory(&mut factory, RecordingBackend::new(), &json, config)
        .expect("load should succeed");
    (player, log)
}

fn walk_spf() -> f32 {
    seconds_per_frame(61.0 / 30.0, 61)
}

#[test]
fn catalog_is_time_ordered_with_stable_ties() {
    let (player, _) = load("walk-cycle", &PlayerConfig::default());
    let names: Vec<&str> = (0..player.marker_count())
        .filter_map(|i| player.marker_name(i))
        .collect();
    assert_eq!(names, ["Idle", "Blink", "Wave", "Run"]);
    assert_eq!(player.marker_name(4), None);
}

#[test]
fn marker_durations_derive_from_frame_rate() {
    let (player, _) = load("walk-cycle", &PlayerConfig::default());
    let idle = player.markers().get(0).unwrap();
    assert_eq!(idle.frame_count, 20.0);
    assert_abs_diff_eq!(idle.duration_seconds, walk_spf() * 19.0, epsilon = 1e-6);

    let blink = player.markers().get(1).unwrap();
    assert_eq!(blink.frame_count, 1.0);
    assert_abs_diff_eq!(blink.duration_seconds, walk_spf(), epsilon = 1e-6);
}

#[test]
fn activation_is_case_insensitive_and_resets_time() {
    let (mut player, log) = load("walk-cycle", &PlayerConfig::default());
    player.play();
    player.update(0.5);
    assert!(player.current_time() > 0.0);

    player.set_marker("idle").expect("Idle exists");
    assert_eq!(player.current_time(), 0.0);
    assert_abs_diff_eq!(player.duration(), walk_spf() * 19.0, epsilon = 1e-6);
    assert_eq!(player.active_marker().map(|m| m.name.as_str()), Some("Idle"));

    player.set_marker("RUN").expect("Run exists");
    player.update(0.0);
    assert_eq!(log.borrow().last_frame(), Some(40.0));
    assert_eq!(player.segment().start_frame, 40.0);
    assert_eq!(player.segment().frame_count, 21.0);
}

#[test]
fn marker_window_maps_progress_onto_its_frames() {
    let (mut player, log) = load("walk-cycle", &PlayerConfig::default().with_loop(false));
    player.set_marker("Wave").unwrap();
    player.play();
    player.update(10.0);
    assert_abs_diff_eq!(log.borrow().last_frame().unwrap(), 30.0, epsilon = 1e-4);
}

#[test]
fn unknown_marker_leaves_state_untouched() {
    let (mut player, _) = load("walk-cycle", &PlayerConfig::default());
    player.set_marker("Wave").unwrap();
    player.seek(0.1);
    let before = *player.segment();

    let err = player.set_marker("Sprint").unwrap_err();
    assert!(matches!(err, PlayerError::MarkerNotFound { ref name } if name == "Sprint"));
    assert!(err.is_recoverable());
    assert_eq!(*player.segment(), before);
    assert_eq!(player.current_time(), 0.1);
    assert_eq!(player.active_marker().map(|m| m.name.as_str()), Some("Wave"));
}

#[test]
fn empty_name_reverts_to_full_timeline() {
    let (mut player, _) = load("walk-cycle", &PlayerConfig::default());
    player.set_marker("Run").unwrap();
    player.set_marker("").unwrap();
    assert!(player.active_marker().is_none());
    assert_eq!(player.segment().start_frame, 0.0);
    assert_eq!(player.segment().frame_count, 61.0);
    assert_abs_diff_eq!(player.duration(), 61.0 / 30.0, epsilon = 1e-6);
}

#[test]
fn initial_marker_from_config_is_applied() {
    let config = PlayerConfig::default().with_marker("run");
    let (player, _) = load("walk-cycle", &config);
    assert_eq!(player.active_marker().map(|m| m.name.as_str()), Some("Run"));
    assert_eq!(player.segment().start_frame, 40.0);
}

#[test]
fn missing_initial_marker_still_loads() {
    let config = PlayerConfig::default().with_marker("nope");
    let (player, _) = load("walk-cycle", &config);
    assert!(player.active_marker().is_none());
    assert_eq!(player.segment().frame_count, 61.0);
}

#[test]
fn asset_without_markers_has_empty_catalog() {
    let (mut player, _) = load("no-markers", &PlayerConfig::default());
    assert_eq!(player.marker_count(), 0);
    assert!(player.markers().is_empty());
    assert!(player.set_marker("anything").is_err());
}

#[test]
fn single_frame_asset_always_renders_frame_zero() {
    let (mut player, log) = load("single-frame", &PlayerConfig::default());
    player.set_marker("still").unwrap();
    player.play();
    for _ in 0..5 {
        player.update(0.013);
        assert_eq!(log.borrow().last_frame(), Some(0.0));
    }
}
