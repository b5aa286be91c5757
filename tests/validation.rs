//! Integration tests for bracket submission validation.

use bracket_contest_web::{
    validate_bracket_submission, BracketError, BracketSubmission, GamePick, GameSlot,
    RoundConfig, SlotRef, SlotSource, TournamentConfig, MAX_PREDICTED_SCORE,
};
use chrono::NaiveDate;

/// Single region, two rounds: A (X vs Y) and B (Z vs W) feed C.
fn four_team_config() -> TournamentConfig {
    let seeded = |game_number: u32, label: &str, t1: &str, t2: &str| GameSlot {
        round: 1,
        game_number,
        label: Some(label.to_string()),
        region: Some("East".to_string()),
        source: SlotSource::Seeded {
            team1: Some(t1.to_string()),
            team2: Some(t2.to_string()),
        },
    };
    TournamentConfig {
        regions: vec!["East".to_string()],
        rounds: vec![RoundConfig::new("Semifinal", 2, 1), RoundConfig::new("Final", 1, 2)],
        total_teams: 4,
        start_date: NaiveDate::from_ymd_opt(2026, 3, 19).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 3, 21).unwrap(),
        tie_breaker_required: false,
        slots: vec![
            seeded(1, "A", "X", "Y"),
            seeded(2, "B", "Z", "W"),
            GameSlot {
                round: 2,
                game_number: 1,
                label: Some("C".to_string()),
                region: None,
                source: SlotSource::Fed {
                    team1: SlotRef::new(1, 1),
                    team2: SlotRef::new(1, 2),
                },
            },
        ],
    }
}

fn submission(games: Vec<GamePick>) -> BracketSubmission {
    BracketSubmission::new("Pat Player", "pat@example.com", games)
}

fn scenario_picks() -> Vec<GamePick> {
    vec![
        GamePick::new(1, 1).teams("X", "Y").winner("X"),
        GamePick::new(1, 2).teams("Z", "W").winner("Z"),
        GamePick::new(2, 1).teams("X", "Z").winner("X"),
    ]
}

#[test]
fn scenario_bracket_is_valid() {
    let result = validate_bracket_submission(&four_team_config(), &submission(scenario_picks())).unwrap();
    assert!(result.is_valid, "{:?}", result.errors);
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn later_round_teams_may_be_omitted() {
    let mut picks = scenario_picks();
    picks[2] = GamePick::new(2, 1).winner("Z");
    let result = validate_bracket_submission(&four_team_config(), &submission(picks)).unwrap();
    assert!(result.is_valid, "{:?}", result.errors);
}

#[test]
fn picking_an_eliminated_team_is_one_progression_error() {
    let mut picks = scenario_picks();
    picks[2] = GamePick::new(2, 1).teams("X", "Z").winner("Y");
    let result = validate_bracket_submission(&four_team_config(), &submission(picks)).unwrap();
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
    let err = &result.errors[0];
    assert!(err.contains("(A)") && err.contains("(C)"), "{}", err);
    assert!(err.contains("eliminated"), "{}", err);
}

#[test]
fn missing_game_is_reported() {
    for missing in 0..3 {
        let mut picks = scenario_picks();
        let removed = picks.remove(missing);
        let result = validate_bracket_submission(&four_team_config(), &submission(picks)).unwrap();
        assert!(!result.is_valid);
        let slot = removed.slot().to_string();
        assert!(
            result.errors.iter().any(|e| e.starts_with("Missing pick") && e.contains(&slot)),
            "{:?}",
            result.errors
        );
    }
}

#[test]
fn winner_outside_the_matchup_is_an_error_for_that_game() {
    let mut picks = scenario_picks();
    picks[1] = GamePick::new(1, 2).teams("Z", "W").winner("Q");
    let result = validate_bracket_submission(&four_team_config(), &submission(picks)).unwrap();
    assert!(!result.is_valid);
    assert!(
        result.errors.iter().any(|e| e.contains("(B)") && e.contains("'Q'")),
        "{:?}",
        result.errors
    );
}

#[test]
fn team_that_does_not_match_its_feeder_names_both_games() {
    let mut picks = scenario_picks();
    picks[2] = GamePick::new(2, 1).teams("W", "Z").winner("Z");
    let result = validate_bracket_submission(&four_team_config(), &submission(picks)).unwrap();
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
    let err = &result.errors[0];
    assert!(err.contains("(A)") && err.contains("(C)"), "{}", err);
    assert!(err.contains("'W'") && err.contains("'X'"), "{}", err);
}

#[test]
fn first_round_teams_must_match_seeding() {
    let mut picks = scenario_picks();
    picks[0] = GamePick::new(1, 1).teams("X", "W").winner("X");
    let result = validate_bracket_submission(&four_team_config(), &submission(picks)).unwrap();
    assert!(!result.is_valid);
    assert!(result.errors.iter().any(|e| e.contains("seeded entrant 'Y'")));
}

#[test]
fn missing_winner_is_an_error() {
    let mut picks = scenario_picks();
    picks[2].winner = None;
    let result = validate_bracket_submission(&four_team_config(), &submission(picks)).unwrap();
    assert_eq!(result.errors, vec!["No winner picked for round 2 game 1 (C)".to_string()]);
}

#[test]
fn winner_is_checked_when_a_feeder_has_no_pick() {
    let picks = vec![
        GamePick::new(1, 1).teams("X", "Y"),
        GamePick::new(1, 2).teams("Z", "W").winner("Z"),
        GamePick::new(2, 1).winner("NOBODY"),
    ];
    let result = validate_bracket_submission(&four_team_config(), &submission(picks)).unwrap();
    assert_eq!(result.errors.len(), 2, "{:?}", result.errors);
    assert_eq!(result.errors[0], "No winner picked for round 1 game 1 (A)");
    let err = &result.errors[1];
    assert!(err.contains("(C)") && err.contains("'NOBODY'"), "{}", err);
    assert!(err.contains("'X', 'Y', 'Z'"), "{}", err);
}

#[test]
fn open_feeder_still_allows_the_teams_that_can_reach() {
    for winner in ["X", "Y", "Z"] {
        let picks = vec![
            GamePick::new(1, 1).teams("X", "Y"),
            GamePick::new(1, 2).teams("Z", "W").winner("Z"),
            GamePick::new(2, 1).winner(winner),
        ];
        let result = validate_bracket_submission(&four_team_config(), &submission(picks)).unwrap();
        assert_eq!(
            result.errors,
            vec!["No winner picked for round 1 game 1 (A)".to_string()],
            "winner {}",
            winner
        );
    }

    // W lost B, so it cannot come through the open side either.
    let picks = vec![
        GamePick::new(1, 1).teams("X", "Y"),
        GamePick::new(1, 2).teams("Z", "W").winner("Z"),
        GamePick::new(2, 1).winner("W"),
    ];
    let result = validate_bracket_submission(&four_team_config(), &submission(picks)).unwrap();
    assert_eq!(result.errors.len(), 2, "{:?}", result.errors);
    assert!(result.errors[1].contains("eliminated in round 1 game 2 (B)"), "{}", result.errors[1]);
}

#[test]
fn player_identity_is_checked() {
    let config = four_team_config();

    let mut s = submission(scenario_picks());
    s.player_name = "   ".to_string();
    let result = validate_bracket_submission(&config, &s).unwrap();
    assert_eq!(result.errors, vec!["Player name is required".to_string()]);

    for bad in ["pat", "pat@", "@example.com", "pat@example", "pat @example.com", "pat@@example.com", "pat@example..com"] {
        let mut s = submission(scenario_picks());
        s.player_email = bad.to_string();
        let result = validate_bracket_submission(&config, &s).unwrap();
        assert!(!result.is_valid, "{} accepted", bad);
        assert!(result.errors[0].contains("not a valid email"), "{:?}", result.errors);
    }

    let mut s = submission(scenario_picks());
    s.player_email = String::new();
    let result = validate_bracket_submission(&config, &s).unwrap();
    assert_eq!(result.errors, vec!["Player email is required".to_string()]);
}

#[test]
fn duplicate_and_unknown_entries_are_errors() {
    let mut picks = scenario_picks();
    picks.push(GamePick::new(1, 1).teams("X", "Y").winner("Y"));
    picks.push(GamePick::new(3, 1).winner("X"));
    let result = validate_bracket_submission(&four_team_config(), &submission(picks)).unwrap();
    assert_eq!(result.errors.len(), 2, "{:?}", result.errors);
    assert!(result.errors.iter().any(|e| e.starts_with("Duplicate entry") && e.contains("(A)")));
    assert!(result.errors.iter().any(|e| e.starts_with("Unknown game round 3 game 1")));
}

#[test]
fn missing_tie_breaker_is_only_a_warning() {
    let mut config = four_team_config();
    config.tie_breaker_required = true;

    let result = validate_bracket_submission(&config, &submission(scenario_picks())).unwrap();
    assert!(result.is_valid);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("Tie-breaker"));

    let mut picks = scenario_picks();
    picks[2] = picks[2].clone().scores(70, 64);
    let result = validate_bracket_submission(&config, &submission(picks)).unwrap();
    assert!(result.is_valid);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
}

#[test]
fn predicted_score_against_the_pick_is_a_warning() {
    let mut picks = scenario_picks();
    picks[2] = picks[2].clone().scores(60, 64);
    let result = validate_bracket_submission(&four_team_config(), &submission(picks)).unwrap();
    assert!(result.is_valid);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("60-64"));
}

#[test]
fn implausible_predicted_score_is_a_warning() {
    let mut picks = scenario_picks();
    picks[2] = picks[2].clone().scores(4_000_000_000, 1_000_000_000);
    let result = validate_bracket_submission(&four_team_config(), &submission(picks)).unwrap();
    assert!(result.is_valid);
    assert_eq!(result.warnings.len(), 2, "{:?}", result.warnings);
    assert!(result.warnings.iter().all(|w| w.contains(&format!("above {} points", MAX_PREDICTED_SCORE))));
}

#[test]
fn validation_is_deterministic() {
    let config = four_team_config();
    let mut picks = scenario_picks();
    picks[0].winner = Some("Q".to_string());
    picks.push(GamePick::new(9, 9));
    let s = submission(picks);
    let first = validate_bracket_submission(&config, &s).unwrap();
    let second = validate_bracket_submission(&config, &s).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn broken_config_is_a_contract_violation() {
    let mut config = four_team_config();
    config.total_teams = 8;
    let err = validate_bracket_submission(&config, &submission(scenario_picks())).unwrap_err();
    assert!(matches!(err, BracketError::InvalidConfig(_)));
}

#[test]
fn unparseable_submission_is_a_contract_violation() {
    let err = BracketSubmission::from_json(
        r#"{"player_name":"Pat","player_email":"pat@example.com","games":"all of them"}"#,
    )
    .unwrap_err();
    assert!(matches!(err, BracketError::MalformedSubmission(_)));

    let ok = BracketSubmission::from_json(
        r#"{"player_name":"Pat","player_email":"pat@example.com","games":[{"round":1,"game_number":1,"winner":"X"}]}"#,
    )
    .unwrap();
    assert_eq!(ok.games[0].winner.as_deref(), Some("X"));
    assert!(ok.is_public);
}

/// Picks every game of the default 64-team layout: first-round team1 always wins.
fn full_default_bracket(config: &TournamentConfig) -> Vec<GamePick> {
    let mut picks: Vec<GamePick> = Vec::new();
    for slot in config.ordered_slots() {
        let pick = match slot.feeders() {
            None => GamePick::new(1, slot.game_number)
                .teams(format!("team-{}a", slot.game_number), format!("team-{}b", slot.game_number))
                .winner(format!("team-{}a", slot.game_number)),
            Some([feeder, _]) => {
                let winner = picks
                    .iter()
                    .find(|p| p.slot() == feeder)
                    .and_then(|p| p.winner.clone())
                    .unwrap();
                GamePick::new(slot.round, slot.game_number).winner(winner)
            }
        };
        picks.push(pick);
    }
    picks
}

#[test]
fn consistent_full_bracket_is_valid() {
    let config = TournamentConfig::ncaa_default();
    let mut picks = full_default_bracket(&config);
    assert_eq!(picks.len(), 63);
    let last = picks.len() - 1;
    picks[last] = picks[last].clone().scores(71, 65);
    let result = validate_bracket_submission(&config, &submission(picks)).unwrap();
    assert!(result.is_valid, "{:?}", result.errors);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
}

#[test]
fn upset_deep_in_the_bracket_is_traced_to_the_losing_game() {
    let config = TournamentConfig::ncaa_default();
    let mut picks = full_default_bracket(&config);
    // Championship winner picked as a team that lost in the first round.
    let last = picks.len() - 1;
    picks[last].winner = Some("team-1b".to_string());
    let result = validate_bracket_submission(&config, &submission(picks)).unwrap();
    assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
    assert!(result.errors[0].contains("eliminated in round 1 game 1"), "{}", result.errors[0]);
}
