//! Playoff field construction from regular-season standings.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::constants::FIELD_SIZE;
use crate::error::{OddsError, Result};
use crate::team::{Conference, GameResult, SeededTeam, Standing, TeamId};

/// Both conference brackets, each holding exactly eight teams in seed order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayoffField {
    east: Vec<SeededTeam>,
    west: Vec<SeededTeam>,
}

impl PlayoffField {
    /// Assemble a field from already-seeded teams.
    ///
    /// Each side must hold exactly eight teams of its own conference, seeded
    /// 1..8 in order, and no team may appear twice across the field.
    pub fn new(east: Vec<SeededTeam>, west: Vec<SeededTeam>) -> Result<Self> {
        for (conference, teams) in [(Conference::East, &east), (Conference::West, &west)] {
            if teams.len() < FIELD_SIZE {
                return Err(OddsError::InsufficientTeams {
                    conference,
                    found: teams.len(),
                });
            }
            if teams.len() > FIELD_SIZE {
                return Err(OddsError::InvalidField(format!(
                    "{} has {} teams, expected {}",
                    conference,
                    teams.len(),
                    FIELD_SIZE
                )));
            }
            for (i, team) in teams.iter().enumerate() {
                if team.conference != conference {
                    return Err(OddsError::InvalidField(format!(
                        "{} listed in the {} bracket",
                        team, conference
                    )));
                }
                if usize::from(team.seed) != i + 1 {
                    return Err(OddsError::InvalidField(format!(
                        "{} bracket position {} holds seed {}",
                        conference,
                        i + 1,
                        team.seed
                    )));
                }
            }
        }

        let mut seen = HashSet::new();
        for team in east.iter().chain(west.iter()) {
            if !seen.insert(team.team_id) {
                return Err(OddsError::InvalidField(format!(
                    "team {} appears more than once",
                    team.team_id
                )));
            }
        }

        Ok(PlayoffField { east, west })
    }

    /// Teams of one conference, seed 1 first.
    pub fn conference(&self, conference: Conference) -> &[SeededTeam] {
        match conference {
            Conference::East => &self.east,
            Conference::West => &self.west,
        }
    }

    /// Look up a team by seed (1-based).
    pub fn by_seed(&self, conference: Conference, seed: u8) -> Option<&SeededTeam> {
        let index = usize::from(seed).checked_sub(1)?;
        self.conference(conference).get(index)
    }

    /// All sixteen teams, East first.
    pub fn teams(&self) -> impl Iterator<Item = &SeededTeam> {
        self.east.iter().chain(self.west.iter())
    }

    pub fn find(&self, team_id: TeamId) -> Option<&SeededTeam> {
        self.teams().find(|t| t.team_id == team_id)
    }
}

/// Total seeding order: win pct desc, wins desc, losses asc, name asc, id asc.
fn seeding_order(a: &Standing, b: &Standing) -> Ordering {
    b.win_pct()
        .total_cmp(&a.win_pct())
        .then(b.wins.cmp(&a.wins))
        .then(a.losses.cmp(&b.losses))
        .then_with(|| a.team_name.cmp(&b.team_name))
        .then(a.team_id.cmp(&b.team_id))
}

/// Seed the two conference brackets from one season's standings.
///
/// Rows whose conference is not East or West are ignored. The top eight of
/// each conference are seeded 1..8.
///
/// # Errors
/// [`OddsError::InsufficientTeams`] when either conference has fewer than
/// eight qualifying teams.
pub fn build_playoff_field(standings: &[Standing]) -> Result<PlayoffField> {
    let mut groups: BTreeMap<Conference, Vec<&Standing>> = BTreeMap::new();
    for row in standings {
        match Conference::normalize(&row.conference) {
            Some(conference) => groups.entry(conference).or_default().push(row),
            None => tracing::debug!(
                team_id = row.team_id,
                conference = %row.conference,
                "skipping standing outside East/West"
            ),
        }
    }

    let mut seed_conference = |conference: Conference| -> Result<Vec<SeededTeam>> {
        let mut rows = groups.remove(&conference).unwrap_or_default();
        if rows.len() < FIELD_SIZE {
            return Err(OddsError::InsufficientTeams {
                conference,
                found: rows.len(),
            });
        }
        rows.sort_by(|a, b| seeding_order(a, b));

        Ok(rows
            .into_iter()
            .take(FIELD_SIZE)
            .enumerate()
            .map(|(i, s)| SeededTeam::new(s.team_id, s.team_name.clone(), conference, (i + 1) as u8))
            .collect())
    };

    let east = seed_conference(Conference::East)?;
    let west = seed_conference(Conference::West)?;

    let field = PlayoffField::new(east, west)?;
    tracing::debug!(
        east_top = %field.conference(Conference::East)[0].team_name,
        west_top = %field.conference(Conference::West)[0].team_name,
        "seeded playoff field"
    );
    Ok(field)
}

/// Derive standings from a game log.
///
/// Counts wins and losses from regular-season final scores; a tied score
/// counts for neither side. Team names come from the game rows and the
/// conference from `conferences`. Teams with no known playoff conference are
/// left out. Output is ordered by team id.
pub fn standings_from_games(
    games: &[GameResult],
    season: i32,
    conferences: &HashMap<TeamId, Conference>,
) -> Vec<Standing> {
    let mut rows: BTreeMap<TeamId, Standing> = BTreeMap::new();

    for game in games.iter().filter(|g| !g.postseason) {
        for (team_id, team_name) in [
            (game.home_team_id, &game.home_team_name),
            (game.away_team_id, &game.away_team_name),
        ] {
            let Some(conference) = conferences.get(&team_id) else {
                continue;
            };
            rows.entry(team_id).or_insert_with(|| Standing {
                season,
                team_id,
                team_name: team_name.clone(),
                conference: conference.to_string(),
                wins: 0,
                losses: 0,
            });
        }

        let (winner, loser) = match game.home_score.cmp(&game.away_score) {
            Ordering::Greater => (game.home_team_id, game.away_team_id),
            Ordering::Less => (game.away_team_id, game.home_team_id),
            Ordering::Equal => continue,
        };
        if let Some(row) = rows.get_mut(&winner) {
            row.wins += 1;
        }
        if let Some(row) = rows.get_mut(&loser) {
            row.losses += 1;
        }
    }

    rows.into_values().collect()
}
