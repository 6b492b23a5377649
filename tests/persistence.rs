mod common;

use std::fs;

use approx::assert_abs_diff_eq;
use common::{engine, init_test_env, latest_elo, temp_path};
use whr_processor::{
    error::WhrError,
    model::structures::outcome::Outcome,
    persistence::{records::ObservationRecord, RatingReport, SavedBase},
    utils::test_utils::generate_records
};

#[test]
fn test_saved_base_survives_disk() {
    let mut original = engine();
    original.load_records(generate_records(6, 80, 5, 4)).unwrap();
    original
        .submit_observation("competitor-0", "competitor-1", Outcome::BWins, 9, 25.0)
        .unwrap();
    let path = temp_path("saved-base");

    SavedBase::from_engine(&original).write(&path).unwrap();
    let mut restored = SavedBase::read(&path).unwrap().into_engine().unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(restored.observations().len(), original.observations().len());
    assert_eq!(restored.config().w2, original.config().w2);

    original.iterate(30).unwrap();
    restored.iterate(30).unwrap();
    for chain in original.competitors() {
        assert_abs_diff_eq!(
            latest_elo(&original, chain.name()),
            latest_elo(&restored, chain.name()),
            epsilon = 1e-9
        );
    }
}

#[test]
fn test_saved_base_reads_handwritten_json() {
    init_test_env();
    let path = temp_path("handwritten");
    fs::write(
        &path,
        r#"{
            "w2": 14.0,
            "observations": [
                { "home": "ohio", "away": "michigan", "winner": "home", "time_step": 2 },
                { "home": "iowa", "away": "ohio", "winner": "A", "time_step": 1, "handicap": 3.5 }
            ]
        }"#
    )
    .unwrap();

    let base = SavedBase::read(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(base.w2, 14.0);
    assert_eq!(base.observations[0], ObservationRecord::new("ohio", "michigan", Outcome::AWins, 2));
    assert_eq!(base.observations[1].handicap, 3.5);

    let engine = base.into_engine().unwrap();
    assert_eq!(engine.competitor("ohio").unwrap().len(), 2);
}

#[test]
fn test_saved_base_rejects_draws() {
    init_test_env();
    let path = temp_path("draw");
    fs::write(
        &path,
        r#"{ "w2": 14.0, "observations": [{ "home": "a", "away": "b", "winner": "D", "time_step": 1 }] }"#
    )
    .unwrap();

    let result = SavedBase::read(&path);
    fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(WhrError::Serialization(_))));
}

#[test]
fn test_missing_file_is_an_io_error() {
    init_test_env();

    assert!(matches!(SavedBase::read(temp_path("missing")), Err(WhrError::Io(_))));
}

#[test]
fn test_report_accumulates_metrics() {
    let mut offense = engine();
    let mut defense = engine();
    for (home, away, time_step) in [("ohio", "michigan", 0), ("ohio", "iowa", 1), ("iowa", "michigan", 2)] {
        offense.submit_observation(home, away, Outcome::AWins, time_step, 0.0).unwrap();
        defense.submit_observation(home, away, Outcome::BWins, time_step, 0.0).unwrap();
    }
    offense.iterate(20).unwrap();
    defense.iterate(20).unwrap();

    let mut report = RatingReport::new();
    report.record_metric("offense", &offense);
    report.record_metric("defense", &defense);
    let path = temp_path("report");
    report.write(&path).unwrap();
    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(report.len(), 3);
    assert!(report.get("ohio", "offense").unwrap() > report.get("michigan", "offense").unwrap());
    assert!(report.get("ohio", "defense").unwrap() < report.get("michigan", "defense").unwrap());
    assert_eq!(written["ohio"]["offense"].as_i64(), report.get("ohio", "offense"));
    assert_eq!(written["michigan"]["defense"].as_i64(), report.get("michigan", "defense"));
}
