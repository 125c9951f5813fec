//! Export of a forecast to CSV and JSON files.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::monte_carlo::OddsReport;
use crate::pipeline::{Forecast, RunMetadata};
use crate::team::{Conference, TeamId};

pub const CHAMPIONSHIP_FILE: &str = "championship_odds.csv";
pub const CONFERENCE_FILE: &str = "conference_odds.csv";
pub const FINALS_FILE: &str = "finals_matchups_top10.csv";
pub const METADATA_FILE: &str = "run_metadata.json";
pub const LAST_UPDATED_FILE: &str = "last_updated.txt";

#[derive(Serialize)]
struct ChampionshipRow<'a> {
    team_id: TeamId,
    team_name: &'a str,
    championship_odds: f64,
}

#[derive(Serialize)]
struct ConferenceRow<'a> {
    conference: Conference,
    team_id: TeamId,
    team_name: &'a str,
    conference_odds: f64,
}

#[derive(Serialize)]
struct FinalsRow<'a> {
    matchup: &'a str,
    probability: f64,
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the three odds tables into `dir`.
pub fn write_odds(dir: &Path, odds: &OddsReport) -> Result<()> {
    write_rows(
        &dir.join(CHAMPIONSHIP_FILE),
        odds.championship.iter().map(|o| ChampionshipRow {
            team_id: o.team_id,
            team_name: &o.team_name,
            championship_odds: o.probability,
        }),
    )?;

    write_rows(
        &dir.join(CONFERENCE_FILE),
        odds.conference.iter().flat_map(|(&conference, teams)| {
            teams.iter().map(move |o| ConferenceRow {
                conference,
                team_id: o.team_id,
                team_name: &o.team_name,
                conference_odds: o.probability,
            })
        }),
    )?;

    write_rows(
        &dir.join(FINALS_FILE),
        odds.finals.iter().map(|m| FinalsRow {
            matchup: &m.matchup,
            probability: m.probability,
        }),
    )
}

/// Write run metadata as JSON plus a plain `last_updated.txt` timestamp.
pub fn write_metadata(dir: &Path, metadata: &RunMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata)?;
    fs::write(dir.join(METADATA_FILE), json)?;
    fs::write(dir.join(LAST_UPDATED_FILE), metadata.run_ts.to_rfc3339())?;
    Ok(())
}

/// Write every output of a forecast into `dir`, creating it if needed.
///
/// # Returns
/// Paths of the files written
pub fn write_outputs(dir: &Path, forecast: &Forecast) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    write_odds(dir, &forecast.odds)?;
    write_metadata(dir, &forecast.metadata)?;

    let written: Vec<PathBuf> = [
        CHAMPIONSHIP_FILE,
        CONFERENCE_FILE,
        FINALS_FILE,
        METADATA_FILE,
        LAST_UPDATED_FILE,
    ]
    .iter()
    .map(|f| dir.join(f))
    .collect();
    tracing::info!(dir = %dir.display(), files = written.len(), "wrote forecast outputs");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monte_carlo::{MatchupOdds, TeamOdds};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn sample_odds() -> OddsReport {
        let odds = |team_id, name: &str, probability| TeamOdds {
            team_id,
            team_name: name.to_string(),
            probability,
        };
        let mut conference = BTreeMap::new();
        conference.insert(Conference::East, vec![odds(1, "Boston", 0.7), odds(2, "New York", 0.3)]);
        conference.insert(Conference::West, vec![odds(3, "Denver", 1.0)]);

        OddsReport {
            trials: 10,
            championship: vec![odds(3, "Denver", 0.6), odds(1, "Boston", 0.4)],
            conference,
            finals: vec![
                MatchupOdds {
                    matchup: "Boston vs Denver".to_string(),
                    probability: 0.7,
                },
                MatchupOdds {
                    matchup: "New York vs Denver".to_string(),
                    probability: 0.3,
                },
            ],
        }
    }

    #[test]
    fn test_write_odds_tables() {
        let dir = tempfile::tempdir().unwrap();
        write_odds(dir.path(), &sample_odds()).unwrap();

        let champ = fs::read_to_string(dir.path().join(CHAMPIONSHIP_FILE)).unwrap();
        let mut lines = champ.lines();
        assert_eq!(lines.next(), Some("team_id,team_name,championship_odds"));
        assert_eq!(lines.next(), Some("3,Denver,0.6"));

        let conf = fs::read_to_string(dir.path().join(CONFERENCE_FILE)).unwrap();
        assert_eq!(conf.lines().count(), 4);
        assert!(conf.lines().nth(1).unwrap().starts_with("East,1,Boston"));

        let finals = fs::read_to_string(dir.path().join(FINALS_FILE)).unwrap();
        assert_eq!(finals.lines().nth(1), Some("Boston vs Denver,0.7"));
    }

    #[test]
    fn test_write_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = RunMetadata {
            season: 2025,
            run_ts: Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap(),
            k_factor: 20.0,
            home_court_adv: 65.0,
            simulations: 10_000,
            seed: 7,
        };
        write_metadata(dir.path(), &metadata).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(METADATA_FILE)).unwrap()).unwrap();
        assert_eq!(json["season"], 2025);
        assert_eq!(json["simulations"], 10_000);

        let stamp = fs::read_to_string(dir.path().join(LAST_UPDATED_FILE)).unwrap();
        assert_eq!(stamp, "2025-04-01T12:00:00+00:00");
    }
}
