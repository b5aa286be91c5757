//! Errors returned by library operations.
//!
//! Validation findings are never errors; they are reported inside
//! [`BracketValidationResult`](crate::models::BracketValidationResult). These variants
//! cover broken caller contracts and rejected mutations.

use uuid::Uuid;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// Tournament configuration violates one of its structural invariants.
    InvalidConfig(String),
    /// Submission payload could not be parsed into a submission at all.
    MalformedSubmission(String),
    /// Team reference data could not be read.
    InvalidTeamData(String),
    /// No game at this round / position.
    GameNotFound { round: u32, game_number: u32 },
    /// Chosen winner is not one of the game's two teams.
    InvalidWinner { round: u32, game_number: u32, team: String },
    /// A bracket for this email already exists.
    DuplicatePlayer(String),
    /// No stored bracket has this id.
    BracketNotFound(Uuid),
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InvalidConfig(msg) => write!(f, "Invalid tournament configuration: {}", msg),
            BracketError::MalformedSubmission(msg) => write!(f, "Malformed bracket submission: {}", msg),
            BracketError::InvalidTeamData(msg) => write!(f, "Invalid team data: {}", msg),
            BracketError::GameNotFound { round, game_number } => {
                write!(f, "No game {} in round {}", game_number, round)
            }
            BracketError::InvalidWinner { round, game_number, team } => write!(
                f,
                "Team '{}' is not playing in round {} game {}",
                team, round, game_number
            ),
            BracketError::DuplicatePlayer(_) => write!(f, "A bracket has already been submitted for this email"),
            BracketError::BracketNotFound(_) => write!(f, "Bracket not found"),
        }
    }
}

impl std::error::Error for BracketError {}
