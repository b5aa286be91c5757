//! Submission gate: whether new brackets are accepted right now.

use crate::logic::clock::Clock;
use crate::models::SiteConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Gate outcome. `reason` is only set when submissions are blocked.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SubmissionStatus {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Check the admin toggle and deadline against the clock's current time.
pub fn check_submission_allowed(site: &SiteConfig, clock: &impl Clock) -> SubmissionStatus {
    check_submission_allowed_at(site, clock.now())
}

/// Either trigger blocks on its own. The manual toggle is reported first when both apply.
pub fn check_submission_allowed_at(site: &SiteConfig, now: DateTime<Utc>) -> SubmissionStatus {
    if site.stop_submit_toggle {
        return SubmissionStatus {
            allowed: false,
            reason: Some("Bracket submissions have been manually disabled by the administrator".to_string()),
        };
    }
    if let Some(deadline) = site.stop_submit_date_time {
        if now >= deadline {
            return SubmissionStatus {
                allowed: false,
                reason: Some(format!(
                    "The submission deadline ({}) has passed",
                    deadline.format("%Y-%m-%d %H:%M UTC")
                )),
            };
        }
    }
    SubmissionStatus {
        allowed: true,
        reason: None,
    }
}
