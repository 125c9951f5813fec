//! Python bindings, built with `--features python`.
//!
//! Plain tuples and dicts cross the boundary so the Python side needs no
//! wrapper classes:
//! - standings: `(season, team_id, team_name, conference, wins, losses)`
//! - seeded team: `(team_id, team_name, seed)`
//! - team odds: `(team_id, team_name, probability)`

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::config::SimulationConfig;
use crate::constants::{DEFAULT_HOME_COURT_ADV, DEFAULT_K_FACTOR, DEFAULT_SEED};
use crate::error::OddsError;
use crate::monte_carlo::{run_monte_carlo, TeamOdds};
use crate::ratings::Ratings;
use crate::seeding::{build_playoff_field, PlayoffField};
use crate::team::{Conference, SeededTeam, Standing, TeamId};
use crate::win_prob::{expected_home_win_probability, update_rating};

type StandingTuple = (i32, TeamId, String, String, u32, u32);
type SeededTuple = (TeamId, String, u8);
type OddsTuple = (TeamId, String, f64);

impl From<OddsError> for PyErr {
    fn from(err: OddsError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn odds_tuples(odds: &[TeamOdds]) -> Vec<OddsTuple> {
    odds.iter()
        .map(|o| (o.team_id, o.team_name.clone(), o.probability))
        .collect()
}

fn field_from_py(field: HashMap<String, Vec<SeededTuple>>) -> Result<PlayoffField, OddsError> {
    let mut sides: HashMap<Conference, Vec<SeededTeam>> = HashMap::new();
    for (label, teams) in field {
        let conference = Conference::normalize(&label)
            .ok_or_else(|| OddsError::InvalidField(format!("unknown conference {:?}", label)))?;
        let mut seeded: Vec<SeededTeam> = teams
            .into_iter()
            .map(|(team_id, team_name, seed)| SeededTeam::new(team_id, team_name, conference, seed))
            .collect();
        seeded.sort_by_key(|t| t.seed);
        sides.insert(conference, seeded);
    }

    let east = sides.remove(&Conference::East).unwrap_or_default();
    let west = sides.remove(&Conference::West).unwrap_or_default();
    PlayoffField::new(east, west)
}

fn field_to_py(field: &PlayoffField) -> HashMap<String, Vec<SeededTuple>> {
    Conference::ALL
        .iter()
        .map(|&conference| {
            let teams = field
                .conference(conference)
                .iter()
                .map(|t| (t.team_id, t.team_name.clone(), t.seed))
                .collect();
            (conference.to_string(), teams)
        })
        .collect()
}

/// Home win probability for one game.
#[pyfunction]
#[pyo3(name = "expected_home_win_probability", signature = (home_rating, away_rating, home_court_adv = DEFAULT_HOME_COURT_ADV))]
pub fn py_expected_home_win_probability(home_rating: f64, away_rating: f64, home_court_adv: f64) -> f64 {
    expected_home_win_probability(home_rating, away_rating, home_court_adv)
}

/// Ratings after one game, as `(new_home, new_away)`.
#[pyfunction]
#[pyo3(name = "update_rating", signature = (home_rating, away_rating, home_won, k_factor = DEFAULT_K_FACTOR, home_court_adv = DEFAULT_HOME_COURT_ADV))]
pub fn py_update_rating(
    home_rating: f64,
    away_rating: f64,
    home_won: bool,
    k_factor: f64,
    home_court_adv: f64,
) -> (f64, f64) {
    update_rating(home_rating, away_rating, home_won, k_factor, home_court_adv)
}

/// Seed both conferences from standings tuples.
#[pyfunction]
#[pyo3(name = "build_playoff_field")]
pub fn py_build_playoff_field(standings: Vec<StandingTuple>) -> PyResult<HashMap<String, Vec<SeededTuple>>> {
    let standings: Vec<Standing> = standings
        .into_iter()
        .map(|(season, team_id, team_name, conference, wins, losses)| Standing {
            season,
            team_id,
            team_name,
            conference,
            wins,
            losses,
        })
        .collect();
    let field = build_playoff_field(&standings)?;
    Ok(field_to_py(&field))
}

/// Run the Monte Carlo aggregation with the GIL released.
///
/// Returns `(championship, conference, finals)` where `conference` maps
/// `"East"`/`"West"` to team odds and `finals` is a list of
/// `(matchup, probability)`.
#[pyfunction]
#[pyo3(name = "run_monte_carlo", signature = (
    playoff_field,
    base_ratings,
    n_simulations,
    k_factor = DEFAULT_K_FACTOR,
    home_court_adv = DEFAULT_HOME_COURT_ADV,
    seed = DEFAULT_SEED
))]
#[allow(clippy::type_complexity)]
pub fn py_run_monte_carlo(
    py: Python<'_>,
    playoff_field: HashMap<String, Vec<SeededTuple>>,
    base_ratings: HashMap<TeamId, f64>,
    n_simulations: usize,
    k_factor: f64,
    home_court_adv: f64,
    seed: u64,
) -> PyResult<(Vec<OddsTuple>, HashMap<String, Vec<OddsTuple>>, Vec<(String, f64)>)> {
    let field = field_from_py(playoff_field)?;
    let ratings = Ratings::from(base_ratings);
    let config = SimulationConfig {
        k_factor,
        home_court_adv,
        simulations: n_simulations,
        seed,
    };

    let report = py.allow_threads(|| run_monte_carlo(&field, &ratings, &config))?;

    let conference = report
        .conference
        .iter()
        .map(|(c, odds)| (c.to_string(), odds_tuples(odds)))
        .collect();
    let finals = report
        .finals
        .iter()
        .map(|m| (m.matchup.clone(), m.probability))
        .collect();

    Ok((odds_tuples(&report.championship), conference, finals))
}
