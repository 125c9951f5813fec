use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::config::SimulationConfig;
use crate::constants::{FINALS_MATCHUP_LIMIT, TRIAL_SEED_MAX};
use crate::error::{OddsError, Result};
use crate::ratings::Ratings;
use crate::seeding::PlayoffField;
use crate::team::{Conference, TeamId};
use crate::tournament::{PlayoffOutcome, PlayoffSimulator};

/// Probability of one team reaching an outcome.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamOdds {
    pub team_id: TeamId,
    pub team_name: String,
    pub probability: f64,
}

/// Probability of one East-vs-West finals pairing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchupOdds {
    /// `"<East team> vs <West team>"`
    pub matchup: String,
    pub probability: f64,
}

/// Aggregated Monte Carlo results.
///
/// Team lists hold only teams that reached the outcome at least once, best
/// odds first (ties by team id). `finals` holds at most
/// [`FINALS_MATCHUP_LIMIT`] pairings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OddsReport {
    /// Trials actually completed; the denominator of every probability
    pub trials: usize,
    pub championship: Vec<TeamOdds>,
    pub conference: BTreeMap<Conference, Vec<TeamOdds>>,
    pub finals: Vec<MatchupOdds>,
}

impl OddsReport {
    pub fn championship_probability(&self, team_id: TeamId) -> f64 {
        lookup(&self.championship, team_id)
    }

    pub fn conference_probability(&self, conference: Conference, team_id: TeamId) -> f64 {
        self.conference
            .get(&conference)
            .map(|odds| lookup(odds, team_id))
            .unwrap_or(0.0)
    }
}

fn lookup(odds: &[TeamOdds], team_id: TeamId) -> f64 {
    odds.iter()
        .find(|o| o.team_id == team_id)
        .map(|o| o.probability)
        .unwrap_or(0.0)
}

/// Outcome counters. Merging is plain integer addition, so any split of the
/// trials across threads sums to the same tally.
#[derive(Clone, Debug, Default)]
struct Tally {
    trials: usize,
    champions: HashMap<TeamId, usize>,
    conference: BTreeMap<Conference, HashMap<TeamId, usize>>,
    finals: HashMap<(TeamId, TeamId), usize>,
}

impl Tally {
    fn record(&mut self, outcome: &PlayoffOutcome<'_>) {
        self.trials += 1;
        *self.champions.entry(outcome.champion.team_id).or_insert(0) += 1;
        for conference in Conference::ALL {
            let champ = outcome.conference_champion(conference);
            *self
                .conference
                .entry(conference)
                .or_default()
                .entry(champ.team_id)
                .or_insert(0) += 1;
        }
        *self
            .finals
            .entry((outcome.east_champion.team_id, outcome.west_champion.team_id))
            .or_insert(0) += 1;
    }

    fn merge(mut self, other: Tally) -> Tally {
        self.trials += other.trials;
        for (team, count) in other.champions {
            *self.champions.entry(team).or_insert(0) += count;
        }
        for (conference, counts) in other.conference {
            let target = self.conference.entry(conference).or_default();
            for (team, count) in counts {
                *target.entry(team).or_insert(0) += count;
            }
        }
        for (pair, count) in other.finals {
            *self.finals.entry(pair).or_insert(0) += count;
        }
        self
    }

    fn into_report(self, field: &PlayoffField) -> OddsReport {
        let trials = self.trials;
        let name = |team_id: TeamId| {
            field
                .find(team_id)
                .map(|t| t.team_name.clone())
                .unwrap_or_else(|| format!("Team {}", team_id))
        };

        let team_odds = |counts: HashMap<TeamId, usize>| {
            let mut ranked: Vec<(TeamId, usize)> = counts.into_iter().collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            ranked
                .into_iter()
                .map(|(team_id, count)| TeamOdds {
                    team_id,
                    team_name: name(team_id),
                    probability: count as f64 / trials as f64,
                })
                .collect::<Vec<_>>()
        };

        let championship = team_odds(self.champions);
        let conference = self
            .conference
            .into_iter()
            .map(|(conference, counts)| (conference, team_odds(counts)))
            .collect();

        // Pairings are reported by display name, so franchises sharing a
        // name collapse into one row.
        let mut by_matchup: HashMap<String, usize> = HashMap::new();
        for ((east, west), count) in self.finals {
            *by_matchup
                .entry(format!("{} vs {}", name(east), name(west)))
                .or_insert(0) += count;
        }
        let mut finals: Vec<(String, usize)> = by_matchup.into_iter().collect();
        finals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        finals.truncate(FINALS_MATCHUP_LIMIT);
        let finals = finals
            .into_iter()
            .map(|(matchup, count)| MatchupOdds {
                matchup,
                probability: count as f64 / trials as f64,
            })
            .collect();

        OddsReport {
            trials,
            championship,
            conference,
            finals,
        }
    }
}

/// Seed for trial `index` of a run seeded with `seed`.
///
/// Each index reads its own stream of the parent generator, so trial `i`
/// gets the same seed whatever the total count or the thread schedule.
pub fn trial_seed(seed: u64, index: usize) -> u64 {
    let mut parent = ChaCha8Rng::seed_from_u64(seed);
    parent.set_stream(index as u64);
    parent.gen_range(0..=TRIAL_SEED_MAX)
}

/// Play trials `0..simulations` in parallel, skipping every trial for which
/// `stop(index)` is true when it comes up.
fn tally_trials<F>(simulator: &PlayoffSimulator, base_ratings: &Ratings, seed: u64, simulations: usize, stop: F) -> Tally
where
    F: Fn(usize) -> bool + Sync,
{
    (0..simulations)
        .into_par_iter()
        .fold(Tally::default, |mut tally, index| {
            if stop(index) {
                return tally;
            }
            let outcome = simulator.simulate_seeded(base_ratings, trial_seed(seed, index));
            tally.record(&outcome);
            tally
        })
        .reduce(Tally::default, Tally::merge)
}

/// Run `config.simulations` independent postseasons and tally the odds.
///
/// # Errors
/// [`OddsError::InvalidSimulationCount`] when `config.simulations` is zero;
/// [`OddsError::Config`] for non-finite rating parameters.
pub fn run_monte_carlo(field: &PlayoffField, base_ratings: &Ratings, config: &SimulationConfig) -> Result<OddsReport> {
    run_monte_carlo_with_cancel(field, base_ratings, config, &AtomicBool::new(false))
}

/// [`run_monte_carlo`] with cooperative cancellation.
///
/// `cancel` is checked before each trial. Trials already running finish;
/// no further trials start once it is set. Probabilities are computed over
/// completed trials only.
///
/// # Errors
/// As [`run_monte_carlo`], plus [`OddsError::Cancelled`] when no trial
/// completed.
pub fn run_monte_carlo_with_cancel(
    field: &PlayoffField,
    base_ratings: &Ratings,
    config: &SimulationConfig,
    cancel: &AtomicBool,
) -> Result<OddsReport> {
    config.validate()?;

    let start = Instant::now();
    let simulator = PlayoffSimulator::new(field.clone(), config.elo_params());

    tracing::info!(
        simulations = config.simulations,
        seed = config.seed,
        k_factor = config.k_factor,
        home_court_adv = config.home_court_adv,
        "running Monte Carlo"
    );

    let tally = tally_trials(&simulator, base_ratings, config.seed, config.simulations, |_| {
        cancel.load(Ordering::Relaxed)
    });

    if tally.trials == 0 {
        return Err(OddsError::Cancelled);
    }
    if tally.trials < config.simulations {
        tracing::warn!(
            completed = tally.trials,
            requested = config.simulations,
            "Monte Carlo cancelled early"
        );
    }

    let report = tally.into_report(&simulator.field);
    tracing::info!(
        trials = report.trials,
        elapsed_ms = start.elapsed().as_millis() as u64,
        favorite = report.championship.first().map(|o| o.team_name.as_str()).unwrap_or(""),
        "Monte Carlo complete"
    );
    Ok(report)
}
