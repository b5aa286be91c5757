//! Data structures for the bracket contest: teams, games, brackets, season configuration.

mod bracket;
mod config;
mod error;
mod game;
mod team;

pub use bracket::{Bracket, BracketId, BracketSubmission, BracketValidationResult};
pub use config::{GameSlot, RoundConfig, SiteConfig, SlotSource, TournamentConfig};
pub use error::BracketError;
pub use game::{Game, GameId, GamePick, SlotRef};
pub use team::{Region, Team, TeamId};
