use rand::Rng;

use crate::constants::{HIGHER_SEED_HOME, SERIES_WINS_NEEDED};
use crate::ratings::Ratings;
use crate::team::SeededTeam;
use crate::win_prob::{expected_home_win_probability, EloParams};

/// Outcome of one simulated best-of-seven series.
#[derive(Clone, Copy, Debug)]
pub struct SeriesResult<'a> {
    pub winner: &'a SeededTeam,
    pub loser: &'a SeededTeam,

    /// Always [`SERIES_WINS_NEEDED`]
    pub winner_wins: u8,
    pub loser_wins: u8,
}

impl SeriesResult<'_> {
    pub fn games_played(&self) -> u8 {
        self.winner_wins + self.loser_wins
    }
}

/// Simulate a best-of-seven series game by game.
///
/// `higher` hosts games 1, 2, 5 and 7; `lower` hosts games 3, 4 and 6. Seed
/// numbers are not consulted: the caller decides which side holds home court.
/// Every game draws one uniform value (home wins iff it falls below the home
/// win probability) and updates both ratings in place, so rating drift
/// carries into whatever the caller simulates next.
///
/// # Arguments
/// * `higher` - Team holding home court
/// * `lower` - Opponent
/// * `ratings` - Ratings for this trial, mutated by every game played
/// * `rng` - Source of game draws
/// * `params` - K-factor and home-court advantage
///
/// # Returns
/// The series winner and loser with the final game score
pub fn simulate_series<'a, R: Rng>(
    higher: &'a SeededTeam,
    lower: &'a SeededTeam,
    ratings: &mut Ratings,
    rng: &mut R,
    params: &EloParams,
) -> SeriesResult<'a> {
    let mut higher_wins = 0u8;
    let mut lower_wins = 0u8;

    for &higher_is_home in HIGHER_SEED_HOME.iter() {
        if higher_wins == SERIES_WINS_NEEDED || lower_wins == SERIES_WINS_NEEDED {
            break;
        }

        let (home, away) = if higher_is_home { (higher, lower) } else { (lower, higher) };

        let home_prob = expected_home_win_probability(
            ratings.get(home.team_id),
            ratings.get(away.team_id),
            params.home_court_adv,
        );
        let home_won = rng.gen::<f64>() < home_prob;

        ratings.apply_game(home.team_id, away.team_id, home_won, params);

        if home_won == higher_is_home {
            higher_wins += 1;
        } else {
            lower_wins += 1;
        }
    }

    if higher_wins == SERIES_WINS_NEEDED {
        SeriesResult {
            winner: higher,
            loser: lower,
            winner_wins: higher_wins,
            loser_wins: lower_wins,
        }
    } else {
        SeriesResult {
            winner: lower,
            loser: higher,
            winner_wins: lower_wins,
            loser_wins: higher_wins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::Conference;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn make_teams() -> (SeededTeam, SeededTeam) {
        (
            SeededTeam::new(1, "Boston", Conference::East, 1),
            SeededTeam::new(8, "Miami", Conference::East, 8),
        )
    }

    #[test]
    fn test_series_length_and_winner_wins() {
        let (high, low) = make_teams();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..500 {
            let mut ratings = Ratings::new();
            let result = simulate_series(&high, &low, &mut ratings, &mut rng, &EloParams::default());
            assert_eq!(result.winner_wins, 4);
            assert!(result.loser_wins < 4);
            assert!(result.games_played() >= 4 && result.games_played() <= 7);
            assert_ne!(result.winner.team_id, result.loser.team_id);
        }
    }

    #[test]
    fn test_ratings_drift_and_conserve() {
        let (high, low) = make_teams();
        let mut ratings: Ratings = [(1, 1560.0), (8, 1440.0)].into_iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        simulate_series(&high, &low, &mut ratings, &mut rng, &EloParams::default());

        assert!((ratings.get(1) + ratings.get(8) - 3000.0).abs() < 1e-8);
        assert_ne!(ratings.get(1), 1560.0, "Ratings should move during the series");
    }

    #[test]
    fn test_unknown_teams_enter_map() {
        let (high, low) = make_teams();
        let mut ratings = Ratings::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        simulate_series(&high, &low, &mut ratings, &mut rng, &EloParams::default());
        assert!(ratings.contains(1) && ratings.contains(8));
    }

    #[test]
    fn test_much_stronger_team_usually_wins() {
        let (high, low) = make_teams();
        let base: Ratings = [(1, 1500.0), (8, 1100.0)].into_iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);

        let trials = 2000;
        let mut favorite_wins = 0;
        for _ in 0..trials {
            let mut ratings = base.clone();
            // Favorite without home court, so the edge comes from rating alone.
            let result = simulate_series(&low, &high, &mut ratings, &mut rng, &EloParams::default());
            if result.winner.team_id == 1 {
                favorite_wins += 1;
            }
        }

        let freq = favorite_wins as f64 / trials as f64;
        assert!(freq > 0.9, "Favorite won only {:.3} of series", freq);
    }

    #[test]
    fn test_same_seed_same_series() {
        let (high, low) = make_teams();
        let run = |seed| {
            let mut ratings = Ratings::new();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let result = simulate_series(&high, &low, &mut ratings, &mut rng, &EloParams::default());
            (result.winner.team_id, result.loser_wins, ratings)
        };
        assert_eq!(run(77), run(77));
    }
}
