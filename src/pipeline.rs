//! End-to-end forecast: game log and standings in, odds and run metadata out.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::monte_carlo::{run_monte_carlo, OddsReport};
use crate::ratings::Ratings;
use crate::seeding::{build_playoff_field, PlayoffField};
use crate::team::{GameResult, Standing};

/// Parameters of one forecast run, kept alongside its outputs so a run can
/// be reproduced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunMetadata {
    pub season: i32,
    pub run_ts: DateTime<Utc>,
    pub k_factor: f64,
    pub home_court_adv: f64,
    pub simulations: usize,
    pub seed: u64,
}

impl RunMetadata {
    pub fn new(season: i32, run_ts: DateTime<Utc>, config: &SimulationConfig) -> Self {
        RunMetadata {
            season,
            run_ts,
            k_factor: config.k_factor,
            home_court_adv: config.home_court_adv,
            simulations: config.simulations,
            seed: config.seed,
        }
    }
}

/// Everything one forecast run produces.
#[derive(Clone, Debug)]
pub struct Forecast {
    pub metadata: RunMetadata,
    pub field: PlayoffField,
    pub ratings: Ratings,
    pub odds: OddsReport,
}

/// Replay `games` into baseline ratings, seed the field from `standings`
/// and run the Monte Carlo aggregation.
///
/// Rows from any other season are ignored.
pub fn run_forecast(
    season: i32,
    standings: &[Standing],
    games: &[GameResult],
    config: &SimulationConfig,
) -> Result<Forecast> {
    config.validate()?;
    let params = config.elo_params();

    let standings: Vec<Standing> = standings.iter().filter(|s| s.season == season).cloned().collect();
    let games: Vec<GameResult> = games.iter().filter(|g| g.season == season).cloned().collect();
    tracing::debug!(season, standings = standings.len(), games = games.len(), "selected season rows");

    let ratings = Ratings::from_games(&games, &params);
    let top = ratings.ranked().first().copied();
    tracing::info!(season, games = games.len(), teams = ratings.len(), top = ?top, "built baseline ratings");

    let field = build_playoff_field(&standings)?;
    tracing::info!(season, standings = standings.len(), "seeded playoff field");

    let odds = run_monte_carlo(&field, &ratings, config)?;
    let metadata = RunMetadata::new(season, Utc::now(), config);
    tracing::info!(season, trials = odds.trials, "forecast complete");

    Ok(Forecast {
        metadata,
        field,
        ratings,
        odds,
    })
}
