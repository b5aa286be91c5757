//! Real results, bracket scoring and standings.

use crate::models::{Bracket, BracketError, BracketId, Game, SlotRef, SlotSource, TournamentConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One row of the leaderboard.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingsEntry {
    /// Competition rank: tied entries share a rank and the next rank is skipped.
    pub rank: usize,
    pub bracket_id: BracketId,
    pub player_name: String,
    pub total_points: u32,
    /// Points still reachable: current points plus undecided games whose pick is still alive.
    pub max_possible_points: u32,
    /// Distance between the predicted and real championship total, once the final is played.
    pub tie_breaker_diff: Option<u32>,
    pub submitted_at: DateTime<Utc>,
}

/// Real tournament games for every slot, with first-round entrants from seeding.
pub fn build_results(config: &TournamentConfig) -> Vec<Game> {
    config
        .ordered_slots()
        .into_iter()
        .map(|slot| match &slot.source {
            SlotSource::Seeded { team1, team2 } => Game::new(slot.slot(), team1.clone(), team2.clone()),
            SlotSource::Fed { .. } => Game::new(slot.slot(), None, None),
        })
        .collect()
}

/// Record a real result and move the winner into the slot it feeds.
///
/// Correcting a result can change who plays a later game. A completed later game whose
/// matchup changes is reset to unplayed, and so is every completed game after it that the
/// reset game had fed.
pub fn record_result(
    config: &TournamentConfig,
    results: &mut [Game],
    slot: SlotRef,
    winner: &str,
    score1: Option<u32>,
    score2: Option<u32>,
) -> Result<(), BracketError> {
    let not_found = || BracketError::GameNotFound {
        round: slot.round,
        game_number: slot.game_number,
    };
    results
        .iter_mut()
        .find(|g| g.slot() == slot)
        .ok_or_else(not_found)?
        .complete(winner, score1, score2)?;
    log::info!("Recorded result for {}: {} wins", slot, winner);

    let mut feeder = slot;
    let mut advancing = Some(winner.to_string());
    while let Some((next_slot, first_side)) = fed_slot(config, feeder) {
        let Some(game) = results.iter_mut().find(|g| g.slot() == next_slot) else {
            break;
        };
        let side = if first_side { &mut game.team1 } else { &mut game.team2 };
        if *side == advancing {
            break;
        }
        *side = advancing.clone();
        if !game.completed {
            break;
        }
        log::warn!(
            "Result for {} ({} won) reset: its matchup changed",
            next_slot,
            game.winner.as_deref().unwrap_or("no winner")
        );
        game.reset();
        feeder = next_slot;
        advancing = None;
    }
    Ok(())
}

/// The slot `feeder` sends its winner to, and whether it lands on the `team1` side.
fn fed_slot(config: &TournamentConfig, feeder: SlotRef) -> Option<(SlotRef, bool)> {
    config.slots.iter().find_map(|s| match s.source {
        SlotSource::Fed { team1, .. } if team1 == feeder => Some((s.slot(), true)),
        SlotSource::Fed { team2, .. } if team2 == feeder => Some((s.slot(), false)),
        _ => None,
    })
}

/// What happened when a reloaded season config was offered to a running contest.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigChange {
    /// Identical to the active config.
    Unchanged,
    /// Same slots; dates or round points changed and brackets were rescored.
    Updated,
    /// New slots, adopted with fresh results because nothing was recorded against the old ones.
    Rebuilt,
    /// New slots, ignored: results or brackets already follow the active layout.
    Rejected,
}

/// Keep `results` built from the same slots as `active` when the season config is reloaded.
pub fn reconcile_config(
    active: &mut TournamentConfig,
    results: &mut Vec<Game>,
    brackets: &mut [Bracket],
    fresh: TournamentConfig,
) -> ConfigChange {
    if fresh == *active {
        return ConfigChange::Unchanged;
    }
    if fresh.slots == active.slots {
        *active = fresh;
        apply_scores(active, brackets, results.as_slice());
        log::info!("Tournament config reloaded; brackets rescored");
        return ConfigChange::Updated;
    }
    if !brackets.is_empty() || results.iter().any(|g| g.completed) {
        log::warn!(
            "Ignoring reloaded tournament layout ({} slots): {} bracket(s) and recorded results use the active one",
            fresh.slots.len(),
            brackets.len()
        );
        return ConfigChange::Rejected;
    }
    *results = build_results(&fresh);
    *active = fresh;
    log::info!("Tournament layout replaced: {} games", results.len());
    ConfigChange::Rebuilt
}

/// Points earned so far: each completed game picked correctly is worth its round's points.
pub fn score_bracket(config: &TournamentConfig, bracket: &Bracket, results: &[Game]) -> u32 {
    results
        .iter()
        .filter(|g| g.completed)
        .filter(|g| g.winner.is_some() && bracket.pick(g.slot()) == g.winner.as_deref())
        .map(|g| config.round_points(g.round))
        .sum()
}

/// Recompute `total_points` for every bracket after results change.
pub fn apply_scores(config: &TournamentConfig, brackets: &mut [Bracket], results: &[Game]) {
    for bracket in brackets.iter_mut() {
        bracket.total_points = score_bracket(config, bracket, results);
    }
}

/// Teams that have lost a completed game.
fn eliminated_teams(results: &[Game]) -> HashSet<&str> {
    results
        .iter()
        .filter(|g| g.completed)
        .flat_map(|g| {
            [g.team1.as_deref(), g.team2.as_deref()]
                .into_iter()
                .flatten()
                .filter(move |team| g.winner.as_deref() != Some(*team))
        })
        .collect()
}

fn max_possible_points(config: &TournamentConfig, bracket: &Bracket, results: &[Game], out: &HashSet<&str>) -> u32 {
    let remaining: u32 = results
        .iter()
        .filter(|g| !g.completed)
        .filter_map(|g| bracket.pick(g.slot()).map(|team| (g, team)))
        .filter(|(_, team)| !out.contains(team))
        .map(|(g, _)| config.round_points(g.round))
        .sum();
    bracket.total_points + remaining
}

/// Leaderboard over the given brackets: points (desc), then tie-breaker distance once the
/// championship is final, then earliest submission.
pub fn standings(config: &TournamentConfig, brackets: &[Bracket], results: &[Game]) -> Vec<StandingsEntry> {
    let championship = config.championship();
    let real_total = results
        .iter()
        .find(|g| g.slot() == championship && g.completed)
        .and_then(Game::total_score);
    let out = eliminated_teams(results);

    let mut rows: Vec<StandingsEntry> = brackets
        .iter()
        .map(|b| {
            let predicted = b.game(championship).and_then(Game::total_score);
            StandingsEntry {
                rank: 0,
                bracket_id: b.id,
                player_name: b.player_name.clone(),
                total_points: b.total_points,
                max_possible_points: max_possible_points(config, b, results, &out),
                tie_breaker_diff: real_total.zip(predicted).map(|(real, p)| real.abs_diff(p)),
                submitted_at: b.submitted_at,
            }
        })
        .collect();

    let tie_key = |e: &StandingsEntry| match real_total {
        Some(_) => e.tie_breaker_diff.unwrap_or(u32::MAX),
        None => 0,
    };
    rows.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| tie_key(a).cmp(&tie_key(b)))
            .then_with(|| a.submitted_at.cmp(&b.submitted_at))
    });

    let mut prev: Option<(u32, u32)> = None;
    for i in 0..rows.len() {
        let key = (rows[i].total_points, tie_key(&rows[i]));
        rows[i].rank = match prev {
            Some(p) if p == key => rows[i - 1].rank,
            _ => i + 1,
        };
        prev = Some(key);
    }
    rows
}
