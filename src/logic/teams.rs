//! Team reference data from CSV (`id,name,seed,region,logo_url`).

use crate::models::{BracketError, Region, Team};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;

#[derive(Deserialize)]
struct TeamRow {
    id: String,
    name: String,
    seed: u8,
    region: String,
    #[serde(default)]
    logo_url: Option<String>,
}

/// Read teams from CSV with a header row. Seeds must be 1..=16, regions one of the four
/// known regions, ids unique.
pub fn load_teams_csv<R: Read>(reader: R) -> Result<Vec<Team>, BracketError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut teams = Vec::new();
    let mut ids = HashSet::new();
    for (line, row) in rdr.deserialize::<TeamRow>().enumerate() {
        let row = row.map_err(|e| BracketError::InvalidTeamData(e.to_string()))?;
        let region: Region = row.region.parse().map_err(|_| {
            BracketError::InvalidTeamData(format!("row {}: unknown region '{}'", line + 1, row.region))
        })?;
        let team = Team {
            id: row.id,
            name: row.name,
            seed: row.seed,
            region,
            logo_url: row.logo_url.filter(|url| !url.is_empty()),
        };
        if !team.has_valid_seed() {
            return Err(BracketError::InvalidTeamData(format!(
                "row {}: seed {} is outside {}..={}",
                line + 1,
                team.seed,
                Team::MIN_SEED,
                Team::MAX_SEED
            )));
        }
        if !ids.insert(team.id.clone()) {
            return Err(BracketError::InvalidTeamData(format!("row {}: duplicate team id '{}'", line + 1, team.id)));
        }
        teams.push(team);
    }
    log::debug!("loaded {} team(s)", teams.len());
    Ok(teams)
}
