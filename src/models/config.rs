//! Season configuration: tournament shape and explicit bracket topology, plus the site
//! settings read by the submission gate.

use crate::models::error::BracketError;
use crate::models::game::SlotRef;
use crate::models::team::TeamId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One round of the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub name: String,
    /// Zero for national rounds played after the regions are decided.
    pub games_per_region: u32,
    /// Points awarded for each correct pick in this round.
    pub points: u32,
}

impl RoundConfig {
    pub fn new(name: impl Into<String>, games_per_region: u32, points: u32) -> Self {
        Self {
            name: name.into(),
            games_per_region,
            points,
        }
    }
}

/// Where the two teams of a slot come from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotSource {
    /// First-round game; entrants are fixed by seeding when known.
    Seeded {
        #[serde(default)]
        team1: Option<TeamId>,
        #[serde(default)]
        team2: Option<TeamId>,
    },
    /// Later-round game; each side is the winner of a previous-round game.
    Fed { team1: SlotRef, team2: SlotRef },
}

/// One game slot in the bracket topology.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameSlot {
    pub round: u32,
    pub game_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub source: SlotSource,
}

impl GameSlot {
    pub fn slot(&self) -> SlotRef {
        SlotRef::new(self.round, self.game_number)
    }

    /// "round 2 game 1" or "round 2 game 1 (C)" when labelled.
    pub fn describe(&self) -> String {
        match &self.label {
            Some(label) => format!("{} ({})", self.slot(), label),
            None => self.slot().to_string(),
        }
    }

    pub fn feeders(&self) -> Option<[SlotRef; 2]> {
        match self.source {
            SlotSource::Fed { team1, team2 } => Some([team1, team2]),
            SlotSource::Seeded { .. } => None,
        }
    }
}

/// Static season parameters and the bracket topology.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub regions: Vec<String>,
    pub rounds: Vec<RoundConfig>,
    pub total_teams: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Whether the championship pick must carry predicted scores.
    #[serde(default)]
    pub tie_breaker_required: bool,
    pub slots: Vec<GameSlot>,
}

impl TournamentConfig {
    /// Number of games in the first round, or 0 when there are no rounds or the count does
    /// not fit in a `u32`.
    pub fn first_round_games(&self) -> u32 {
        self.checked_first_round_games().unwrap_or(0)
    }

    fn checked_first_round_games(&self) -> Option<u32> {
        let regions = u32::try_from(self.regions.len()).ok()?;
        self.rounds.first()?.games_per_region.checked_mul(regions)
    }

    /// Number of games in round `round` (1-based); each round halves the previous one.
    pub fn games_in_round(&self, round: u32) -> u32 {
        if round == 0 || round as usize > self.rounds.len() {
            return 0;
        }
        self.first_round_games().checked_shr(round - 1).unwrap_or(0)
    }

    pub fn round(&self, round: u32) -> Option<&RoundConfig> {
        round.checked_sub(1).and_then(|i| self.rounds.get(i as usize))
    }

    pub fn round_points(&self, round: u32) -> u32 {
        self.round(round).map(|r| r.points).unwrap_or(0)
    }

    pub fn slot(&self, slot: SlotRef) -> Option<&GameSlot> {
        self.slots.iter().find(|s| s.slot() == slot)
    }

    /// Slots in (round, game_number) order.
    pub fn ordered_slots(&self) -> Vec<&GameSlot> {
        let mut slots: Vec<&GameSlot> = self.slots.iter().collect();
        slots.sort_by_key(|s| s.slot());
        slots
    }

    /// The final game.
    pub fn championship(&self) -> SlotRef {
        SlotRef::new(self.rounds.len() as u32, 1)
    }

    /// Check the structural invariants. A failing config is a caller contract violation.
    pub fn check(&self) -> Result<(), BracketError> {
        let invalid = |msg: String| Err(BracketError::InvalidConfig(msg));
        self.check_shape()?;
        let last_round = self.rounds.len() as u32;

        let mut seen = HashSet::new();
        for slot in &self.slots {
            let r = slot.slot();
            if r.game_number == 0 || r.game_number > self.games_in_round(r.round) {
                return invalid(format!("{} is outside the bracket", r));
            }
            if !seen.insert(r) {
                return invalid(format!("{} is defined twice", r));
            }
        }
        for round in 1..=last_round {
            for game_number in 1..=self.games_in_round(round) {
                let r = SlotRef::new(round, game_number);
                if !seen.contains(&r) {
                    return invalid(format!("{} has no slot", r));
                }
            }
        }

        let mut fed: HashMap<SlotRef, SlotRef> = HashMap::new();
        for slot in &self.slots {
            match (&slot.source, slot.round) {
                (SlotSource::Seeded { .. }, 1) => {}
                (SlotSource::Seeded { .. }, _) => {
                    return invalid(format!("{} is seeded but is not a first-round game", slot.slot()));
                }
                (SlotSource::Fed { .. }, 1) => {
                    return invalid(format!("{} is a first-round game with feeders", slot.slot()));
                }
                (SlotSource::Fed { team1, team2 }, round) => {
                    if team1 == team2 {
                        return invalid(format!("{} is fed twice by {}", slot.slot(), team1));
                    }
                    for feeder in [team1, team2] {
                        if feeder.round != round - 1
                            || feeder.game_number == 0
                            || feeder.game_number > self.games_in_round(feeder.round)
                        {
                            return invalid(format!(
                                "{} is fed by {}, which is not in the previous round",
                                slot.slot(),
                                feeder
                            ));
                        }
                        if let Some(other) = fed.insert(*feeder, slot.slot()) {
                            return invalid(format!("{} feeds both {} and {}", feeder, other, slot.slot()));
                        }
                    }
                }
            }
        }
        // Every game before the final feeds exactly one later slot.
        let feeding_games = self.slots.iter().filter(|s| s.round < last_round).count();
        if fed.len() != feeding_games {
            return invalid("some games do not feed a later round".to_string());
        }
        Ok(())
    }

    /// Counts only: regions, rounds, field size and dates. Slots are not looked at.
    pub(crate) fn check_shape(&self) -> Result<(), BracketError> {
        let invalid = |msg: String| Err(BracketError::InvalidConfig(msg));

        if self.regions.is_empty() {
            return invalid("no regions".to_string());
        }
        if self.rounds.is_empty() {
            return invalid("no rounds".to_string());
        }
        let Some(first) = self.checked_first_round_games() else {
            return invalid(format!(
                "{} games per region over {} regions is too large a field",
                self.rounds[0].games_per_region,
                self.regions.len()
            ));
        };
        if first == 0 {
            return invalid("first round has no games".to_string());
        }
        if first.checked_mul(2) != Some(self.total_teams) {
            return invalid(format!(
                "total_teams is {} but first round seats {} teams",
                self.total_teams,
                u64::from(first) * 2
            ));
        }
        let last_round = self.rounds.len();
        if last_round > 31 || first != 1 << (last_round - 1) {
            return invalid(format!(
                "{} first-round games cannot be halved into a single final over {} rounds",
                first, last_round
            ));
        }
        if self.end_date < self.start_date {
            return invalid("end_date is before start_date".to_string());
        }
        Ok(())
    }
}

/// Admin-controlled submission settings.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub stop_submit_toggle: bool,
    #[serde(default)]
    pub stop_submit_date_time: Option<DateTime<Utc>>,
}
