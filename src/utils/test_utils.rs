use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{model::structures::outcome::Outcome, persistence::records::ObservationRecord};

pub fn competitor_name(index: usize) -> String {
    format!("competitor-{}", index)
}

/// Latent Elo of each generated competitor, reproducible for a given seed.
pub fn latent_elos(n_competitors: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n_competitors).map(|_| rng.random_range(-300.0..=300.0)).collect()
}

/// Generates `n_observations` random records between `n_competitors`
/// competitors spread over `n_time_steps` time steps.
///
/// Winners are drawn from each competitor's latent Elo (see [`latent_elos`]),
/// so stronger competitors win more often. Records are returned unsorted.
pub fn generate_records(
    n_competitors: usize,
    n_observations: usize,
    n_time_steps: i64,
    seed: u64
) -> Vec<ObservationRecord> {
    if n_competitors < 2 {
        panic!("At least two competitors are needed to generate observations");
    }
    if n_time_steps < 1 {
        panic!("Number of time steps must be at least 1");
    }

    let elos = latent_elos(n_competitors, seed);
    // Offset the seed so match drawing does not replay the latent Elo stream
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let mut records = Vec::with_capacity(n_observations);

    for _ in 0..n_observations {
        let home = rng.random_range(0..n_competitors);
        let mut away = rng.random_range(0..n_competitors - 1);
        if away >= home {
            away += 1;
        }

        let p_home = 1.0 / (1.0 + 10f64.powf((elos[away] - elos[home]) / 400.0));
        let outcome = if rng.random_bool(p_home) {
            Outcome::AWins
        } else {
            Outcome::BWins
        };

        records.push(ObservationRecord::new(
            &competitor_name(home),
            &competitor_name(away),
            outcome,
            rng.random_range(0..n_time_steps)
        ));
    }

    records
}

#[cfg(test)]
mod tests {
    use crate::utils::test_utils::{generate_records, latent_elos};

    #[test]
    fn test_generate_records_is_reproducible() {
        assert_eq!(generate_records(5, 40, 3, 9), generate_records(5, 40, 3, 9));
        assert_ne!(generate_records(5, 40, 3, 9), generate_records(5, 40, 3, 10));
    }

    #[test]
    fn test_generate_records_shape() {
        let records = generate_records(4, 100, 5, 1);

        assert_eq!(records.len(), 100);
        for record in &records {
            assert_ne!(record.home, record.away);
            assert!((0..5).contains(&record.time_step));
            assert_eq!(record.handicap, 0.0);
        }
    }

    #[test]
    fn test_latent_elos_in_range() {
        for elo in latent_elos(50, 2) {
            assert!((-300.0..=300.0).contains(&elo));
        }
    }
}
