mod common;

use std::time::Duration;

use approx::assert_abs_diff_eq;
use common::{engine, init_test_env, latest_elo};
use whr_processor::{
    error::WhrError,
    model::{
        rating_engine::RatingEngine,
        structures::{engine_config::EngineConfig, outcome::Outcome, update_schedule::UpdateSchedule}
    },
    utils::test_utils::{competitor_name, generate_records}
};

#[test]
fn test_opposite_results_in_either_order_agree() {
    let mut first = engine();
    first.submit_observation("A", "B", Outcome::AWins, 1, 0.0).unwrap();
    first.submit_observation("A", "B", Outcome::BWins, 1, 0.0).unwrap();

    let mut second = engine();
    second.submit_observation("A", "B", Outcome::BWins, 1, 0.0).unwrap();
    second.submit_observation("A", "B", Outcome::AWins, 1, 0.0).unwrap();

    first.iterate(50).unwrap();
    second.iterate(50).unwrap();

    for name in ["A", "B"] {
        assert_abs_diff_eq!(latest_elo(&first, name), latest_elo(&second, name), epsilon = 1e-9);
    }
    // One win each on the same time step
    assert_abs_diff_eq!(latest_elo(&first, "A"), 0.0, epsilon = 1e-6);
}

#[test]
fn test_single_observation_one_iteration() {
    let mut engine = engine();
    engine.submit_observation("A", "B", Outcome::AWins, 1, 0.0).unwrap();

    engine.iterate(1).unwrap();

    // A holds two wins and one loss against gamma 1, so f' = 1/2 and f'' = -3/4
    let a = engine.competitor("A").unwrap().latest().unwrap().r();
    assert_abs_diff_eq!(a, 2.0 / 3.0, epsilon = 1e-12);
    let b = engine.competitor("B").unwrap().latest().unwrap().r();
    assert!(b < 0.0);
}

#[test]
fn test_repeated_loser_stays_stable_and_below_opponents() {
    let mut engine = engine();
    let opponents: Vec<String> = (0..8).map(|i| format!("opponent-{}", i)).collect();
    for (i, opponent) in opponents.iter().enumerate() {
        engine
            .submit_observation("loser", opponent, Outcome::BWins, i as i64 * 40, 0.0)
            .unwrap();
    }

    let result = engine.iterate(100);

    assert!(result.is_ok(), "Expected no instability, got {:?}", result);
    let loser = latest_elo(&engine, "loser");
    for opponent in &opponents {
        assert!(loser < latest_elo(&engine, opponent));
    }
    assert_eq!(engine.ordered_ratings(true)[0].name, "loser");
}

#[test]
fn test_uncertainty_after_iterating() {
    init_test_env();
    for schedule in [UpdateSchedule::Sequential, UpdateSchedule::Simultaneous] {
        let mut engine = RatingEngine::new(EngineConfig {
            schedule,
            ..EngineConfig::default()
        });
        engine.load_records(generate_records(12, 150, 10, 21)).unwrap();
        engine.submit_observation("newcomer", "competitor-0", Outcome::AWins, 20, 0.0).unwrap();

        engine.iterate(5).unwrap();

        for chain in engine.competitors() {
            for node in chain.nodes() {
                let uncertainty = node.uncertainty().unwrap();
                assert!(uncertainty.is_finite());
                assert!(uncertainty >= 0.0);
            }
        }
        assert_eq!(engine.competitor("newcomer").unwrap().len(), 1);
    }
}

#[test]
fn test_auto_iterate_without_time_runs_one_batch() {
    let mut engine = engine();
    engine.load_records(generate_records(20, 400, 12, 8)).unwrap();

    let (iterations, converged) = engine.auto_iterate(Duration::ZERO, 1e-3).unwrap();

    assert_eq!(iterations, 10);
    assert!(!converged);
}

#[test]
fn test_winner_ranked_above_loser_and_unit_strength() {
    let mut engine = engine();
    engine.submit_observation("winner", "loser", Outcome::AWins, 0, 0.0).unwrap();

    engine.iterate(10).unwrap();
    let ratings = engine.ordered_ratings(true);

    assert_eq!(ratings.len(), 2);
    assert_eq!(ratings[0].name, "loser");
    assert_eq!(ratings[1].name, "winner");
    assert!(ratings[1].elo[0] > 0.0);
    assert!(ratings[0].elo[0] < ratings[1].elo[0]);

    let (p_winner, p_unknown) = engine.probability_of_future_match("winner", "nobody").unwrap();
    assert!(p_winner > 0.5);
    assert_abs_diff_eq!(p_winner + p_unknown, 1.0, epsilon = 1e-12);
}

#[test]
fn test_recovers_strength_order() {
    let mut engine = engine();
    // Every higher-numbered competitor wins three of four games against every lower one
    for time_step in 0..3 {
        for weaker in 0..4 {
            for stronger in weaker + 1..4 {
                let (home, away) = (competitor_name(stronger), competitor_name(weaker));
                for outcome in [Outcome::AWins, Outcome::AWins, Outcome::BWins, Outcome::AWins] {
                    engine.submit_observation(&home, &away, outcome, time_step, 0.0).unwrap();
                }
            }
        }
    }

    engine.auto_iterate(Duration::from_secs(30), 1e-3).unwrap();

    let order: Vec<String> = engine.ordered_ratings(true).into_iter().map(|r| r.name).collect();
    assert_eq!(order, (0..4).map(competitor_name).collect::<Vec<_>>());
}

#[test]
fn test_handicap_shifts_ratings() {
    let mut plain = engine();
    plain.submit_observation("A", "B", Outcome::AWins, 0, 0.0).unwrap();
    let mut handicapped = engine();
    handicapped.submit_observation("A", "B", Outcome::AWins, 0, 100.0).unwrap();

    plain.iterate(20).unwrap();
    handicapped.iterate(20).unwrap();

    // A winning with a home advantage is less informative
    assert!(latest_elo(&handicapped, "A") < latest_elo(&plain, "A"));
}

#[test]
fn test_rejected_submissions_file_nothing() {
    let mut engine = engine();
    engine.submit_observation("A", "B", Outcome::AWins, 5, 0.0).unwrap();

    assert!(matches!(
        engine.submit_observation("B", "C", Outcome::AWins, 4, 0.0),
        Err(WhrError::OutOfOrder { .. })
    ));
    assert!(matches!(
        engine.submit_observation("A", "A", Outcome::AWins, 6, 0.0),
        Err(WhrError::SelfObservation { .. })
    ));

    assert_eq!(engine.observations().len(), 1);
    assert_eq!(engine.competitor("B").unwrap().len(), 1);
    assert!(engine.competitor("C").is_none());
}

#[test]
fn test_far_apart_time_steps_iterate() {
    let mut engine = engine();
    engine.submit_observation("A", "B", Outcome::AWins, i64::MIN, 0.0).unwrap();
    engine.submit_observation("A", "B", Outcome::BWins, i64::MAX, 0.0).unwrap();

    engine.iterate(10).unwrap();

    assert_eq!(engine.competitor("A").unwrap().len(), 2);
    assert!(engine.ratings_for_competitor("A").unwrap().iter().all(|r| r.elo.is_finite()));
}
