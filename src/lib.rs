//! Playoff Odds - postseason forecasting from Elo ratings and Monte Carlo
//! bracket simulation.
//!
//! Ratings are replayed from a season's game log, the top eight teams of each
//! conference are seeded into a fixed bracket, and the bracket is played out
//! series by series many times over to estimate championship, conference and
//! finals-matchup odds. Python bindings are available with the `python`
//! feature.

pub mod config;
pub mod constants;
pub mod error;
pub mod loader;
pub mod logging;
pub mod monte_carlo;
pub mod pipeline;
pub mod ratings;
pub mod report;
pub mod seeding;
pub mod series;
pub mod team;
pub mod tournament;
pub mod win_prob;

#[cfg(feature = "python")]
pub mod python;

pub use config::SimulationConfig;
pub use constants::{DEFAULT_HOME_COURT_ADV, DEFAULT_K_FACTOR, DEFAULT_RATING, DEFAULT_SEED, DEFAULT_SIMULATIONS};
pub use error::{OddsError, Result};
pub use monte_carlo::{run_monte_carlo, run_monte_carlo_with_cancel, MatchupOdds, OddsReport, TeamOdds};
pub use pipeline::{run_forecast, Forecast, RunMetadata};
pub use ratings::Ratings;
pub use seeding::{build_playoff_field, standings_from_games, PlayoffField};
pub use series::{simulate_series, SeriesResult};
pub use team::{Conference, GameResult, SeededTeam, Standing, TeamId};
pub use tournament::{resolve_home_court, PlayoffOutcome, PlayoffSimulator};
pub use win_prob::{expected_home_win_probability, update_rating, EloParams};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module definition
#[cfg(feature = "python")]
#[pymodule]
fn playoff_odds(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Rating model
    m.add_function(wrap_pyfunction!(python::py_expected_home_win_probability, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_update_rating, m)?)?;

    // Seeding and simulation
    m.add_function(wrap_pyfunction!(python::py_build_playoff_field, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_run_monte_carlo, m)?)?;

    // Constants
    m.add("DEFAULT_RATING", DEFAULT_RATING)?;
    m.add("DEFAULT_K_FACTOR", DEFAULT_K_FACTOR)?;
    m.add("DEFAULT_HOME_COURT_ADV", DEFAULT_HOME_COURT_ADV)?;
    m.add("DEFAULT_SIMULATIONS", DEFAULT_SIMULATIONS)?;
    m.add("DEFAULT_SEED", DEFAULT_SEED)?;

    Ok(())
}
