//! Simulation configuration.
//!
//! Everything the engine needs is carried in [`SimulationConfig`] and passed
//! explicitly; nothing is read from global state once a config is built.
//! `from_env` reads `ELO_K_FACTOR`, `ELO_HOME_COURT_ADV`, `MONTE_CARLO_SIMS`
//! and `MONTE_CARLO_SEED` on top of the defaults.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{DEFAULT_HOME_COURT_ADV, DEFAULT_K_FACTOR, DEFAULT_SEED, DEFAULT_SIMULATIONS};
use crate::error::{OddsError, Result};
use crate::win_prob::EloParams;

pub const ENV_K_FACTOR: &str = "ELO_K_FACTOR";
pub const ENV_HOME_COURT_ADV: &str = "ELO_HOME_COURT_ADV";
pub const ENV_SIMULATIONS: &str = "MONTE_CARLO_SIMS";
pub const ENV_SEED: &str = "MONTE_CARLO_SEED";

/// Rating-model and Monte Carlo parameters for one forecast run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub k_factor: f64,
    pub home_court_adv: f64,
    pub simulations: usize,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            k_factor: DEFAULT_K_FACTOR,
            home_court_adv: DEFAULT_HOME_COURT_ADV,
            simulations: DEFAULT_SIMULATIONS,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationConfig {
    /// Defaults overlaid with any values set in the environment.
    ///
    /// A variable that is set but does not parse is an error rather than a
    /// silent fallback.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SimulationConfig::default();
        if let Some(v) = parse_var(&lookup, ENV_K_FACTOR)? {
            config.k_factor = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_HOME_COURT_ADV)? {
            config.home_court_adv = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_SIMULATIONS)? {
            config.simulations = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_SEED)? {
            config.seed = v;
        }
        Ok(config)
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.simulations == 0 {
            return Err(OddsError::InvalidSimulationCount(self.simulations));
        }
        if !self.k_factor.is_finite() {
            return Err(OddsError::Config(format!("k_factor must be finite, got {}", self.k_factor)));
        }
        if !self.home_court_adv.is_finite() {
            return Err(OddsError::Config(format!(
                "home_court_adv must be finite, got {}",
                self.home_court_adv
            )));
        }
        Ok(())
    }

    pub fn elo_params(&self) -> EloParams {
        EloParams::new(self.k_factor, self.home_court_adv)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| OddsError::Config(format!("{}={:?} is not a valid value", key, raw))),
    }
}

/// Season year for a date: seasons start in October and are named by the
/// year they end in.
pub fn infer_season(today: NaiveDate) -> i32 {
    if today.month() < 10 {
        today.year()
    } else {
        today.year() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.k_factor, 20.0);
        assert_eq!(config.home_court_adv, 65.0);
        assert_eq!(config.simulations, 10_000);
        assert_eq!(config.seed, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lookup_overrides() {
        let config = SimulationConfig::from_lookup(lookup_from(&[
            (ENV_K_FACTOR, "25.5"),
            (ENV_SIMULATIONS, " 500 "),
        ]))
        .unwrap();
        assert_eq!(config.k_factor, 25.5);
        assert_eq!(config.simulations, 500);
        assert_eq!(config.home_court_adv, 65.0);
    }

    #[test]
    fn test_bad_value_is_error() {
        let result = SimulationConfig::from_lookup(lookup_from(&[(ENV_SEED, "seven")]));
        assert!(matches!(result, Err(OddsError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_sims() {
        let config = SimulationConfig {
            simulations: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(OddsError::InvalidSimulationCount(0))));

        let config = SimulationConfig {
            k_factor: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(OddsError::Config(_))));
    }

    #[test]
    fn test_infer_season() {
        assert_eq!(infer_season(NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()), 2025);
        assert_eq!(infer_season(NaiveDate::from_ymd_opt(2025, 10, 22).unwrap()), 2026);
    }
}
