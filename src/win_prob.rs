use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HOME_COURT_ADV, DEFAULT_K_FACTOR, ELO_SCALE};

/// Rating-model constants shared by every simulated or replayed game.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EloParams {
    /// Rating points moved by a fully unexpected result
    pub k_factor: f64,

    /// Rating points added to the home team before computing odds
    pub home_court_adv: f64,
}

impl EloParams {
    pub fn new(k_factor: f64, home_court_adv: f64) -> Self {
        EloParams {
            k_factor,
            home_court_adv,
        }
    }
}

impl Default for EloParams {
    fn default() -> Self {
        EloParams::new(DEFAULT_K_FACTOR, DEFAULT_HOME_COURT_ADV)
    }
}

/// Calculate the probability of the home team winning.
///
/// Logistic curve on the rating difference, with `home_court_adv` added to
/// the home side:
/// `1 / (1 + 10^((away - (home + adv)) / 400))`
///
/// # Arguments
/// * `home_rating` - Current rating of the home team
/// * `away_rating` - Current rating of the away team
/// * `home_court_adv` - Rating-point bonus for playing at home
///
/// # Returns
/// Probability of the home team winning, in (0, 1)
pub fn expected_home_win_probability(home_rating: f64, away_rating: f64, home_court_adv: f64) -> f64 {
    let exponent = (away_rating - (home_rating + home_court_adv)) / ELO_SCALE;
    1.0 / (1.0 + 10f64.powf(exponent))
}

/// Apply one game result to both ratings.
///
/// The adjustment is zero-sum: whatever the home team gains the away team
/// loses, so `new_home + new_away == home_rating + away_rating`.
///
/// # Returns
/// `(new_home_rating, new_away_rating)`
pub fn update_rating(
    home_rating: f64,
    away_rating: f64,
    home_won: bool,
    k_factor: f64,
    home_court_adv: f64,
) -> (f64, f64) {
    let expected_home = expected_home_win_probability(home_rating, away_rating, home_court_adv);
    let actual_home = if home_won { 1.0 } else { 0.0 };

    let delta = k_factor * (actual_home - expected_home);
    (home_rating + delta, away_rating - delta)
}
