//! Team and Region reference data.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier used to reference a team from games and picks.
pub type TeamId = String;

/// Tournament region a team is seeded into.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Region {
    East,
    West,
    South,
    Midwest,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::East, Region::West, Region::South, Region::Midwest];

    pub fn name(&self) -> &'static str {
        match self {
            Region::East => "East",
            Region::West => "West",
            Region::South => "South",
            Region::Midwest => "Midwest",
        }
    }
}

impl FromStr for Region {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A team in the field. Immutable once loaded.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// 1 (strongest) to 16.
    pub seed: u8,
    pub region: Region,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Team {
    pub const MIN_SEED: u8 = 1;
    pub const MAX_SEED: u8 = 16;

    pub fn new(id: impl Into<TeamId>, name: impl Into<String>, seed: u8, region: Region) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            seed,
            region,
            logo_url: None,
        }
    }

    pub fn has_valid_seed(&self) -> bool {
        (Self::MIN_SEED..=Self::MAX_SEED).contains(&self.seed)
    }
}
