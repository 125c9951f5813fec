use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::DEFAULT_RATING;
use crate::team::{GameResult, TeamId};
use crate::win_prob::{update_rating, EloParams};

/// Team ratings lookup.
///
/// Teams without an entry read as [`DEFAULT_RATING`]; a missing team is a data
/// gap, not an error. Cloning gives a fully independent map, which is what
/// each Monte Carlo trial starts from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ratings {
    ratings: HashMap<TeamId, f64>,
}

impl Ratings {
    pub fn new() -> Self {
        Ratings {
            ratings: HashMap::new(),
        }
    }

    /// Current rating for a team, or the neutral default.
    pub fn get(&self, team_id: TeamId) -> f64 {
        self.ratings.get(&team_id).copied().unwrap_or(DEFAULT_RATING)
    }

    pub fn set(&mut self, team_id: TeamId, rating: f64) {
        self.ratings.insert(team_id, rating);
    }

    pub fn contains(&self, team_id: TeamId) -> bool {
        self.ratings.contains_key(&team_id)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TeamId, f64)> + '_ {
        self.ratings.iter().map(|(&id, &rating)| (id, rating))
    }

    /// Apply one game result to both teams in place.
    pub fn apply_game(&mut self, home_id: TeamId, away_id: TeamId, home_won: bool, params: &EloParams) {
        let (new_home, new_away) = update_rating(
            self.get(home_id),
            self.get(away_id),
            home_won,
            params.k_factor,
            params.home_court_adv,
        );
        self.set(home_id, new_home);
        self.set(away_id, new_away);
    }

    /// Build baseline ratings by replaying a season's game log.
    ///
    /// Games are applied in ascending `(game_date, game_id)` order regardless
    /// of input order. Postseason games are skipped.
    pub fn from_games(games: &[GameResult], params: &EloParams) -> Self {
        let mut ordered: Vec<&GameResult> = games.iter().filter(|g| !g.postseason).collect();
        ordered.sort_by(|a, b| a.game_date.cmp(&b.game_date).then(a.game_id.cmp(&b.game_id)));

        let mut ratings = Ratings::new();
        for game in ordered {
            ratings.apply_game(game.home_team_id, game.away_team_id, game.home_won(), params);
        }

        tracing::debug!(games = games.len(), teams = ratings.len(), "replayed game log into ratings");
        ratings
    }

    /// Teams sorted by rating, best first. Equal ratings fall back to team id.
    pub fn ranked(&self) -> Vec<(TeamId, f64)> {
        let mut ranked: Vec<(TeamId, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

impl From<HashMap<TeamId, f64>> for Ratings {
    fn from(ratings: HashMap<TeamId, f64>) -> Self {
        Ratings { ratings }
    }
}

impl FromIterator<(TeamId, f64)> for Ratings {
    fn from_iter<I: IntoIterator<Item = (TeamId, f64)>>(iter: I) -> Self {
        Ratings {
            ratings: iter.into_iter().collect(),
        }
    }
}
