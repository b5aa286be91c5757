//! Bracket contest web app: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    apply_scores, build_results, check_submission_allowed, check_submission_allowed_at,
    is_valid_email, load_teams_csv, reconcile_config, record_result, score_bracket, seed_order,
    standings, validate_bracket_submission, Clock, ConfigChange, FixedClock, StandingsEntry,
    SubmissionStatus, SystemClock, TtlCache, MAX_PREDICTED_SCORE,
};
pub use models::{
    Bracket, BracketError, BracketId, BracketSubmission, BracketValidationResult, Game, GameId,
    GamePick, GameSlot, Region, RoundConfig, SiteConfig, SlotRef, SlotSource, Team, TeamId,
    TournamentConfig,
};
