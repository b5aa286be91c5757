//! Structural validation of a bracket submission against the season's topology.

use crate::models::{
    BracketError, BracketSubmission, BracketValidationResult, GamePick, GameSlot, SlotRef,
    SlotSource, TeamId, TournamentConfig,
};
use std::collections::{BTreeSet, HashMap};

/// The two teams a slot is played between, as far as they can be resolved.
type Matchup = (Option<TeamId>, Option<TeamId>);

/// Highest predicted score per team accepted without a warning.
pub const MAX_PREDICTED_SCORE: u32 = 250;

/// Validate every pick of a submission.
///
/// Problems with the submission are returned as `errors` (reject) or `warnings` (advisory);
/// the function only fails when `config` itself is broken. Slots are checked in
/// (round, game_number) order so output is deterministic.
///
/// Teams of a later-round slot are the winners picked in its feeder games. When a submitted
/// team disagrees with its feeder, the feeder's pick is used for the rest of the checks so a
/// single bad pick is reported once.
pub fn validate_bracket_submission(
    config: &TournamentConfig,
    submission: &BracketSubmission,
) -> Result<BracketValidationResult, BracketError> {
    config.check()?;

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    check_player(submission, &mut errors);

    let mut entries: HashMap<SlotRef, &GamePick> = HashMap::new();
    for pick in &submission.games {
        let slot = pick.slot();
        match config.slot(slot) {
            None => errors.push(format!("Unknown game {}: not part of this tournament", slot)),
            Some(s) => {
                if entries.contains_key(&slot) {
                    errors.push(format!("Duplicate entry for {}", s.describe()));
                } else {
                    entries.insert(slot, pick);
                }
            }
        }
    }

    let mut matchups: HashMap<SlotRef, Matchup> = HashMap::new();
    for slot in config.ordered_slots() {
        let Some(pick) = entries.get(&slot.slot()).copied() else {
            errors.push(format!("Missing pick for {}", slot.describe()));
            continue;
        };

        let matchup = match &slot.source {
            SlotSource::Seeded { team1, team2 } => (
                seeded_side(slot, "team1", &pick.team1, team1, &mut errors),
                seeded_side(slot, "team2", &pick.team2, team2, &mut errors),
            ),
            SlotSource::Fed { team1, team2 } => (
                fed_side(config, &entries, slot, "team1", &pick.team1, *team1, &mut errors),
                fed_side(config, &entries, slot, "team2", &pick.team2, *team2, &mut errors),
            ),
        };

        match (&pick.winner, &matchup) {
            (None, _) => errors.push(format!("No winner picked for {}", slot.describe())),
            (Some(winner), (Some(t1), Some(t2))) if winner != t1 && winner != t2 => {
                match eliminated_in(config, &entries, &matchups, slot, winner) {
                    Some(lost) => errors.push(format!(
                        "{} picks '{}', but '{}' was eliminated in {} where '{}' was picked",
                        slot.describe(),
                        winner,
                        winner,
                        lost.describe(),
                        entries
                            .get(&lost.slot())
                            .and_then(|p| p.winner.as_deref())
                            .unwrap_or("nobody")
                    )),
                    None => errors.push(format!(
                        "{} picks '{}', who is not playing ('{}' vs '{}')",
                        slot.describe(),
                        winner,
                        t1,
                        t2
                    )),
                }
            }
            (Some(winner), (t1, t2)) if t1.is_none() || t2.is_none() => {
                let mut contenders = BTreeSet::new();
                if collect_contenders(config, &matchups, slot, &matchup, &mut contenders)
                    && !contenders.contains(winner)
                {
                    match eliminated_in(config, &entries, &matchups, slot, winner) {
                        Some(lost) => errors.push(format!(
                            "{} picks '{}', but '{}' was eliminated in {}",
                            slot.describe(),
                            winner,
                            winner,
                            lost.describe()
                        )),
                        None => errors.push(format!(
                            "{} picks '{}', who cannot reach this game (possible: {})",
                            slot.describe(),
                            winner,
                            contenders.iter().map(|t| format!("'{}'", t)).collect::<Vec<_>>().join(", ")
                        )),
                    }
                }
            }
            _ => {}
        }

        check_predicted_score(slot, pick, &matchup, &mut warnings);
        matchups.insert(slot.slot(), matchup);
    }

    if config.tie_breaker_required {
        if let Some(final_pick) = entries.get(&config.championship()) {
            if final_pick.score1.is_none() || final_pick.score2.is_none() {
                warnings.push(format!(
                    "Tie-breaker: no predicted final score for the championship ({})",
                    config.championship()
                ));
            }
        }
    }

    log::debug!(
        "validated bracket for {}: {} error(s), {} warning(s)",
        submission.player_email,
        errors.len(),
        warnings.len()
    );
    Ok(BracketValidationResult::new(errors, warnings))
}

fn check_player(submission: &BracketSubmission, errors: &mut Vec<String>) {
    if submission.player_name.trim().is_empty() {
        errors.push("Player name is required".to_string());
    }
    let email = submission.player_email.trim();
    if email.is_empty() {
        errors.push("Player email is required".to_string());
    } else if !is_valid_email(email) {
        errors.push(format!("Player email '{}' is not a valid email address", email));
    }
}

/// Basic `local@domain.tld` shape: no whitespace, one `@`, dotted domain without empty labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// First-round side: a configured entrant is authoritative.
fn seeded_side(
    slot: &GameSlot,
    side: &str,
    submitted: &Option<TeamId>,
    entrant: &Option<TeamId>,
    errors: &mut Vec<String>,
) -> Option<TeamId> {
    match (submitted, entrant) {
        (Some(team), Some(seeded)) if team != seeded => {
            errors.push(format!(
                "{}: {} '{}' is not the seeded entrant '{}'",
                slot.describe(),
                side,
                team,
                seeded
            ));
            Some(seeded.clone())
        }
        (None, None) => {
            errors.push(format!("{}: {} is missing", slot.describe(), side));
            None
        }
        (Some(team), _) => Some(team.clone()),
        (None, Some(seeded)) => Some(seeded.clone()),
    }
}

/// Later-round side: must be the winner picked in the feeder game.
fn fed_side(
    config: &TournamentConfig,
    entries: &HashMap<SlotRef, &GamePick>,
    slot: &GameSlot,
    side: &str,
    submitted: &Option<TeamId>,
    feeder: SlotRef,
    errors: &mut Vec<String>,
) -> Option<TeamId> {
    let feeder_winner = entries.get(&feeder).and_then(|p| p.winner.clone());
    match (submitted, feeder_winner) {
        (Some(team), Some(expected)) if *team != expected => {
            let feeder_name = config
                .slot(feeder)
                .map(GameSlot::describe)
                .unwrap_or_else(|| feeder.to_string());
            errors.push(format!(
                "{}: {} '{}' does not match '{}', the winner picked in {}",
                slot.describe(),
                side,
                team,
                expected,
                feeder_name
            ));
            Some(expected)
        }
        (_, Some(expected)) => Some(expected),
        (Some(team), None) => Some(team.clone()),
        (None, None) => None,
    }
}

/// Earliest-reached feeder game (walking back from `slot`) in which `team` played and was
/// not picked to win.
fn eliminated_in<'a>(
    config: &'a TournamentConfig,
    entries: &HashMap<SlotRef, &GamePick>,
    matchups: &HashMap<SlotRef, Matchup>,
    slot: &GameSlot,
    team: &str,
) -> Option<&'a GameSlot> {
    for feeder in slot.feeders()? {
        let feeder_slot = config.slot(feeder)?;
        let played = matchups
            .get(&feeder)
            .map(|(t1, t2)| t1.as_deref() == Some(team) || t2.as_deref() == Some(team))
            .unwrap_or(false);
        if played {
            let picked = entries.get(&feeder).and_then(|p| p.winner.as_deref());
            if picked != Some(team) {
                return Some(feeder_slot);
            }
        } else if let Some(found) = eliminated_in(config, entries, matchups, feeder_slot, team) {
            return Some(found);
        }
    }
    None
}

/// Every team that can still arrive in `slot`: the resolved sides of its matchup, and for an
/// open side, everyone who can reach the feeder game. Returns false when an open first-round
/// side leaves the field unknown.
fn collect_contenders(
    config: &TournamentConfig,
    matchups: &HashMap<SlotRef, Matchup>,
    slot: &GameSlot,
    matchup: &Matchup,
    teams: &mut BTreeSet<TeamId>,
) -> bool {
    let feeders = slot.feeders();
    for (i, side) in [&matchup.0, &matchup.1].into_iter().enumerate() {
        match (side, feeders) {
            (Some(team), _) => {
                teams.insert(team.clone());
            }
            (None, Some(feeders)) => {
                let Some(feeder_slot) = config.slot(feeders[i]) else {
                    return false;
                };
                let feeder_matchup = match (matchups.get(&feeders[i]), &feeder_slot.source) {
                    (Some(m), _) => m.clone(),
                    (None, SlotSource::Seeded { team1, team2 }) => (team1.clone(), team2.clone()),
                    (None, SlotSource::Fed { .. }) => (None, None),
                };
                if !collect_contenders(config, matchups, feeder_slot, &feeder_matchup, teams) {
                    return false;
                }
            }
            (None, None) => return false,
        }
    }
    true
}

/// Advisory: predicted scores should be plausible and favour the picked winner.
fn check_predicted_score(slot: &GameSlot, pick: &GamePick, matchup: &Matchup, warnings: &mut Vec<String>) {
    for score in [pick.score1, pick.score2].into_iter().flatten() {
        if score > MAX_PREDICTED_SCORE {
            warnings.push(format!(
                "{}: predicted score {} is above {} points",
                slot.describe(),
                score,
                MAX_PREDICTED_SCORE
            ));
        }
    }
    let (Some(s1), Some(s2), Some(winner)) = (pick.score1, pick.score2, pick.winner.as_deref()) else {
        return;
    };
    let (picked, other) = if matchup.0.as_deref() == Some(winner) {
        (s1, s2)
    } else if matchup.1.as_deref() == Some(winner) {
        (s2, s1)
    } else {
        return;
    };
    if picked <= other {
        warnings.push(format!(
            "{}: predicted score {}-{} does not favour the picked winner '{}'",
            slot.describe(),
            s1,
            s2,
            winner
        ));
    }
}
