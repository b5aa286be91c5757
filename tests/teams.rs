//! Integration tests for loading team reference data.

use bracket_contest_web::{load_teams_csv, BracketError, Region};

#[test]
fn loads_teams_with_optional_logo() {
    let csv = "id,name,seed,region,logo_url\n\
               duke, Duke ,1,East,https://img.example.com/duke.png\n\
               vermont,Vermont,16,midwest,\n";
    let teams = load_teams_csv(csv.as_bytes()).unwrap();
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0].id, "duke");
    assert_eq!(teams[0].name, "Duke");
    assert_eq!(teams[0].region, Region::East);
    assert_eq!(teams[0].logo_url.as_deref(), Some("https://img.example.com/duke.png"));
    assert_eq!(teams[1].seed, 16);
    assert_eq!(teams[1].region, Region::Midwest);
    assert_eq!(teams[1].logo_url, None);
}

#[test]
fn rejects_seed_out_of_range() {
    let csv = "id,name,seed,region,logo_url\nduke,Duke,17,East,\n";
    let err = load_teams_csv(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, BracketError::InvalidTeamData(_)));
    assert!(err.to_string().contains("seed 17"), "{}", err);

    let csv = "id,name,seed,region,logo_url\nduke,Duke,0,East,\n";
    assert!(load_teams_csv(csv.as_bytes()).is_err());
}

#[test]
fn rejects_unknown_region_and_duplicate_ids() {
    let csv = "id,name,seed,region,logo_url\nduke,Duke,1,North,\n";
    let err = load_teams_csv(csv.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("unknown region 'North'"), "{}", err);

    let csv = "id,name,seed,region,logo_url\nduke,Duke,1,East,\nduke,Duke Again,2,East,\n";
    let err = load_teams_csv(csv.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("duplicate team id 'duke'"), "{}", err);
}

#[test]
fn rejects_non_numeric_seed() {
    let csv = "id,name,seed,region,logo_url\nduke,Duke,one,East,\n";
    assert!(matches!(load_teams_csv(csv.as_bytes()), Err(BracketError::InvalidTeamData(_))));
}
