//! CSV input for already-cleaned standings and game rows.
//!
//! Headers must match the field names of [`Standing`] and [`GameResult`];
//! game dates are RFC 3339 timestamps. A conference map is a
//! `team_id,conference` file.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::{OddsError, Result};
use crate::team::{Conference, GameResult, Standing, TeamId};

#[derive(Debug, Deserialize)]
struct ConferenceRow {
    team_id: TeamId,
    conference: String,
}

fn read_rows<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

pub fn read_standings_from<R: Read>(reader: R) -> Result<Vec<Standing>> {
    read_rows(reader)
}

pub fn read_games_from<R: Read>(reader: R) -> Result<Vec<GameResult>> {
    read_rows(reader)
}

/// Team-to-conference map, used to derive standings from a game log.
pub fn read_conferences_from<R: Read>(reader: R) -> Result<HashMap<TeamId, Conference>> {
    let rows: Vec<ConferenceRow> = read_rows(reader)?;
    rows.into_iter()
        .map(|row| {
            Conference::normalize(&row.conference)
                .map(|conference| (row.team_id, conference))
                .ok_or_else(|| {
                    OddsError::InvalidField(format!(
                        "team {} has unknown conference {:?}",
                        row.team_id, row.conference
                    ))
                })
        })
        .collect()
}

pub fn read_standings(path: &Path) -> Result<Vec<Standing>> {
    let rows = read_standings_from(std::fs::File::open(path)?)?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "loaded standings");
    Ok(rows)
}

pub fn read_games(path: &Path) -> Result<Vec<GameResult>> {
    let rows = read_games_from(std::fs::File::open(path)?)?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "loaded games");
    Ok(rows)
}

pub fn read_conferences(path: &Path) -> Result<HashMap<TeamId, Conference>> {
    let map = read_conferences_from(std::fs::File::open(path)?)?;
    tracing::debug!(path = %path.display(), teams = map.len(), "loaded conference map");
    Ok(map)
}
