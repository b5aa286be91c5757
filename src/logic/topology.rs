//! Builders for the seeded bracket layout.
//!
//! Round 1 lists each region's games in seed order, region after region. Game `g` of round
//! `r > 1` is fed by games `2g - 1` and `2g` of round `r - 1`, so regional champions meet in
//! region order once the regional rounds run out.

use crate::models::{
    BracketError, GameSlot, RoundConfig, SlotRef, SlotSource, Team, TeamId, TournamentConfig,
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Seed order of a regional field of `size` teams (a power of two), e.g. for 4: 1, 4, 2, 3.
/// Consecutive pairs are the first-round matchups.
pub fn seed_order(size: u32) -> Vec<u32> {
    let mut order = vec![1];
    while (order.len() as u32) < size {
        let n = order.len() as u32 * 2;
        order = order.iter().flat_map(|&s| [s, n + 1 - s]).collect();
    }
    order
}

const DEFAULT_START: NaiveDate = match NaiveDate::from_ymd_opt(2026, 3, 19) {
    Some(date) => date,
    None => panic!("invalid default season start"),
};

const DEFAULT_END: NaiveDate = match NaiveDate::from_ymd_opt(2026, 4, 6) {
    Some(date) => date,
    None => panic!("invalid default season end"),
};

impl TournamentConfig {
    /// Build the seeded layout. With an empty `teams` list the first-round entrants are left
    /// open and come from submissions.
    pub fn standard(
        regions: Vec<String>,
        teams: &[Team],
        rounds: Vec<RoundConfig>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, BracketError> {
        let games_per_region = rounds.first().map(|r| r.games_per_region).unwrap_or(0);
        let total_teams = u32::try_from(regions.len())
            .ok()
            .and_then(|n| games_per_region.checked_mul(2)?.checked_mul(n))
            .ok_or_else(|| {
                BracketError::InvalidConfig(format!(
                    "{} games per region over {} regions is too large a field",
                    games_per_region,
                    regions.len()
                ))
            })?;
        let mut config = Self {
            regions,
            rounds,
            total_teams,
            start_date,
            end_date,
            tie_breaker_required: true,
            slots: Vec::new(),
        };
        config.check_shape()?;
        config.slots = config.open_slots();

        if !teams.is_empty() {
            let by_region_seed = index_teams(&config.regions, teams)?;
            let seeds = seed_order(games_per_region * 2);
            for slot in config.slots.iter_mut().filter(|s| s.round == 1) {
                let region_idx = ((slot.game_number - 1) / games_per_region) as usize;
                let k = ((slot.game_number - 1) % games_per_region) as usize;
                let entrant = |seed: u32| -> Result<Option<TeamId>, BracketError> {
                    by_region_seed
                        .get(&(region_idx, seed))
                        .map(|id| Some(id.clone()))
                        .ok_or_else(|| {
                            BracketError::InvalidTeamData(format!(
                                "no {} seed {} in the field",
                                config.regions[region_idx], seed
                            ))
                        })
                };
                slot.source = SlotSource::Seeded {
                    team1: entrant(seeds[2 * k])?,
                    team2: entrant(seeds[2 * k + 1])?,
                };
            }
        }

        config.check()?;
        Ok(config)
    }

    /// 64-team, four-region men's tournament without fixed entrants. Used when no season
    /// config has been provided.
    pub fn ncaa_default() -> Self {
        let mut config = Self {
            regions: ["East", "West", "South", "Midwest"].map(String::from).to_vec(),
            rounds: vec![
                RoundConfig::new("First Round", 8, 1),
                RoundConfig::new("Second Round", 4, 2),
                RoundConfig::new("Sweet 16", 2, 4),
                RoundConfig::new("Elite Eight", 1, 8),
                RoundConfig::new("Final Four", 0, 16),
                RoundConfig::new("Championship", 0, 32),
            ],
            total_teams: 64,
            start_date: DEFAULT_START,
            end_date: DEFAULT_END,
            tie_breaker_required: true,
            slots: Vec::new(),
        };
        config.slots = config.open_slots();
        config
    }

    /// Every slot of the layout, first-round entrants left open. Expects a shape that passed
    /// `check_shape`.
    fn open_slots(&self) -> Vec<GameSlot> {
        let mut slots = Vec::new();
        let games_per_region = self.rounds.first().map(|r| r.games_per_region).unwrap_or(0);
        for (region_idx, region) in self.regions.iter().enumerate() {
            for k in 0..games_per_region {
                slots.push(GameSlot {
                    round: 1,
                    game_number: region_idx as u32 * games_per_region + k + 1,
                    label: None,
                    region: Some(region.clone()),
                    source: SlotSource::Seeded { team1: None, team2: None },
                });
            }
        }

        let region_count = self.regions.len() as u32;
        for round in 2..=self.rounds.len() as u32 {
            let games = self.games_in_round(round);
            for game_number in 1..=games {
                let region = if games >= region_count {
                    let per_region = games / region_count;
                    self.regions.get(((game_number - 1) / per_region) as usize).cloned()
                } else {
                    None
                };
                slots.push(GameSlot {
                    round,
                    game_number,
                    label: None,
                    region,
                    source: SlotSource::Fed {
                        team1: SlotRef::new(round - 1, 2 * game_number - 1),
                        team2: SlotRef::new(round - 1, 2 * game_number),
                    },
                });
            }
        }
        slots
    }
}

/// Map (region index, seed) to team id, rejecting teams outside the configured regions and
/// duplicate seeds.
fn index_teams(regions: &[String], teams: &[Team]) -> Result<HashMap<(usize, u32), TeamId>, BracketError> {
    let mut index = HashMap::new();
    for team in teams {
        let region_idx = regions
            .iter()
            .position(|r| r.eq_ignore_ascii_case(team.region.name()))
            .ok_or_else(|| {
                BracketError::InvalidTeamData(format!("{} plays in {}, which is not a region", team.id, team.region))
            })?;
        if index.insert((region_idx, team.seed as u32), team.id.clone()).is_some() {
            return Err(BracketError::InvalidTeamData(format!(
                "two teams share {} seed {}",
                team.region, team.seed
            )));
        }
    }
    Ok(index)
}
