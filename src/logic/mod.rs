//! Contest business logic: validation, submission gate, scoring, topology, team data.

mod cache;
mod clock;
mod gate;
mod scoring;
mod teams;
mod topology;
mod validation;

pub use cache::TtlCache;
pub use clock::{Clock, FixedClock, SystemClock};
pub use gate::{check_submission_allowed, check_submission_allowed_at, SubmissionStatus};
pub use scoring::{
    apply_scores, build_results, reconcile_config, record_result, score_bracket, standings, ConfigChange,
    StandingsEntry,
};
pub use teams::load_teams_csv;
pub use topology::seed_order;
pub use validation::{is_valid_email, validate_bracket_submission, MAX_PREDICTED_SCORE};
