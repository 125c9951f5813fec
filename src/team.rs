use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Team identifier as issued by the upstream data feed.
pub type TeamId = i64;

/// Playoff conference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Conference {
    East,
    West,
}

impl Conference {
    pub const ALL: [Conference; 2] = [Conference::East, Conference::West];

    /// Parse a free-text conference label.
    ///
    /// Surrounding whitespace and letter case are ignored. Anything other than
    /// east/west is not a playoff conference and yields `None`.
    pub fn normalize(raw: &str) -> Option<Conference> {
        let label = raw.trim();
        if label.eq_ignore_ascii_case("east") {
            Some(Conference::East)
        } else if label.eq_ignore_ascii_case("west") {
            Some(Conference::West)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Conference::East => "East",
            Conference::West => "West",
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A team placed in a conference bracket.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeededTeam {
    pub team_id: TeamId,
    pub team_name: String,
    pub conference: Conference,

    /// Rank within the conference field, 1 (best) to 8
    pub seed: u8,
}

impl SeededTeam {
    pub fn new(team_id: TeamId, team_name: impl Into<String>, conference: Conference, seed: u8) -> Self {
        SeededTeam {
            team_id,
            team_name: team_name.into(),
            conference,
            seed,
        }
    }
}

impl fmt::Display for SeededTeam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {} [{}]", self.seed, self.team_name, self.conference)
    }
}

/// Regular-season record for one team.
///
/// `conference` is kept as the raw label; the seeder normalizes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub season: i32,
    pub team_id: TeamId,
    pub team_name: String,
    pub conference: String,
    pub wins: u32,
    pub losses: u32,
}

impl Standing {
    /// Fraction of games won, 0.0 when no games were played.
    pub fn win_pct(&self) -> f64 {
        let total = self.wins + self.losses;
        if total == 0 {
            0.0
        } else {
            self.wins as f64 / total as f64
        }
    }
}

/// A completed game, as replayed to build baseline ratings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub game_id: i64,
    pub season: i32,
    pub game_date: DateTime<Utc>,
    pub home_team_id: TeamId,
    pub home_team_name: String,
    pub away_team_id: TeamId,
    pub away_team_name: String,
    pub home_score: u32,
    pub away_score: u32,
    #[serde(default)]
    pub postseason: bool,
}

impl GameResult {
    pub fn home_won(&self) -> bool {
        self.home_score > self.away_score
    }
}
