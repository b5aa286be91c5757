//! Bracket, BracketSubmission and BracketValidationResult.

use crate::models::error::BracketError;
use crate::models::game::{Game, GamePick, SlotRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stored bracket.
pub type BracketId = Uuid;

/// Unvalidated payload a player posts.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketSubmission {
    pub player_name: String,
    pub player_email: String,
    pub games: Vec<GamePick>,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

fn default_is_public() -> bool {
    true
}

impl BracketSubmission {
    pub fn new(player_name: impl Into<String>, player_email: impl Into<String>, games: Vec<GamePick>) -> Self {
        Self {
            player_name: player_name.into(),
            player_email: player_email.into(),
            games,
            is_public: true,
        }
    }

    /// Parse a JSON body. A body of the wrong shape is a caller contract violation.
    pub fn from_json(body: &str) -> Result<Self, BracketError> {
        serde_json::from_str(body).map_err(|e| BracketError::MalformedSubmission(e.to_string()))
    }
}

/// Outcome of validating a submission. `is_valid` is true iff `errors` is empty.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl BracketValidationResult {
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// A player's stored bracket. One per player email per season.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bracket {
    pub id: BracketId,
    pub player_name: String,
    pub player_email: String,
    pub submitted_at: DateTime<Utc>,
    pub games: Vec<Game>,
    /// Derived by scoring; never set from a submission.
    pub total_points: u32,
    pub is_complete: bool,
    pub is_public: bool,
}

impl Bracket {
    /// Accept a submission: assign ids and mark every game as not completed.
    pub fn from_submission(submission: &BracketSubmission, submitted_at: DateTime<Utc>) -> Self {
        let mut games: Vec<Game> = submission.games.iter().map(Game::from_pick).collect();
        games.sort_by_key(Game::slot);
        let is_complete = games.iter().all(|g| g.winner.is_some());
        Self {
            id: Uuid::new_v4(),
            player_name: submission.player_name.trim().to_string(),
            player_email: submission.player_email.trim().to_string(),
            submitted_at,
            games,
            total_points: 0,
            is_complete,
            is_public: submission.is_public,
        }
    }

    pub fn game(&self, slot: SlotRef) -> Option<&Game> {
        self.games.iter().find(|g| g.slot() == slot)
    }

    /// Predicted winner for a slot.
    pub fn pick(&self, slot: SlotRef) -> Option<&str> {
        self.game(slot).and_then(|g| g.winner.as_deref())
    }
}
