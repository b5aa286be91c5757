//! Game (one bracket slot, real or predicted) and the pick a player submits for it.

use crate::models::error::BracketError;
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stored game.
pub type GameId = Uuid;

/// Position of a game in the bracket: round (1 = first round) and 1-based number within it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SlotRef {
    pub round: u32,
    pub game_number: u32,
}

impl SlotRef {
    pub fn new(round: u32, game_number: u32) -> Self {
        Self { round, game_number }
    }
}

impl std::fmt::Display for SlotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "round {} game {}", self.round, self.game_number)
    }
}

/// A game as stored: either a real tournament game or one game of a player's bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub round: u32,
    pub game_number: u32,
    pub team1: Option<TeamId>,
    pub team2: Option<TeamId>,
    /// None until picked (bracket) or played (real result).
    pub winner: Option<TeamId>,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub date: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl Game {
    pub fn new(slot: SlotRef, team1: Option<TeamId>, team2: Option<TeamId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            round: slot.round,
            game_number: slot.game_number,
            team1,
            team2,
            winner: None,
            score1: None,
            score2: None,
            date: None,
            completed: false,
        }
    }

    /// Build a stored game from a submitted pick (fresh id, not completed).
    pub fn from_pick(pick: &GamePick) -> Self {
        Self {
            id: Uuid::new_v4(),
            round: pick.round,
            game_number: pick.game_number,
            team1: pick.team1.clone(),
            team2: pick.team2.clone(),
            winner: pick.winner.clone(),
            score1: pick.score1,
            score2: pick.score2,
            date: pick.date,
            completed: false,
        }
    }

    pub fn slot(&self) -> SlotRef {
        SlotRef::new(self.round, self.game_number)
    }

    pub fn has_team(&self, team: &str) -> bool {
        self.team1.as_deref() == Some(team) || self.team2.as_deref() == Some(team)
    }

    /// Record the final result. The winner must be one of the two teams.
    pub fn complete(
        &mut self,
        winner: &str,
        score1: Option<u32>,
        score2: Option<u32>,
    ) -> Result<(), BracketError> {
        if !self.has_team(winner) {
            return Err(BracketError::InvalidWinner {
                round: self.round,
                game_number: self.game_number,
                team: winner.to_string(),
            });
        }
        self.winner = Some(winner.to_string());
        self.score1 = score1;
        self.score2 = score2;
        self.completed = true;
        Ok(())
    }

    /// Back to unplayed, keeping the teams.
    pub fn reset(&mut self) {
        self.winner = None;
        self.score1 = None;
        self.score2 = None;
        self.completed = false;
    }

    /// Combined score, when both sides are known and the sum fits in a `u32`.
    pub fn total_score(&self) -> Option<u32> {
        self.score1?.checked_add(self.score2?)
    }
}

/// One entry of a submission: a game without `id` / `completed`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GamePick {
    pub round: u32,
    pub game_number: u32,
    #[serde(default)]
    pub team1: Option<TeamId>,
    #[serde(default)]
    pub team2: Option<TeamId>,
    #[serde(default)]
    pub winner: Option<TeamId>,
    /// Predicted scores; on the championship game they act as the tie-breaker.
    #[serde(default)]
    pub score1: Option<u32>,
    #[serde(default)]
    pub score2: Option<u32>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl GamePick {
    pub fn new(round: u32, game_number: u32) -> Self {
        Self {
            round,
            game_number,
            ..Self::default()
        }
    }

    pub fn teams(mut self, team1: impl Into<TeamId>, team2: impl Into<TeamId>) -> Self {
        self.team1 = Some(team1.into());
        self.team2 = Some(team2.into());
        self
    }

    pub fn winner(mut self, team: impl Into<TeamId>) -> Self {
        self.winner = Some(team.into());
        self
    }

    pub fn scores(mut self, score1: u32, score2: u32) -> Self {
        self.score1 = Some(score1);
        self.score2 = Some(score2);
        self
    }

    pub fn slot(&self) -> SlotRef {
        SlotRef::new(self.round, self.game_number)
    }
}
