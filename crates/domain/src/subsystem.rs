//! Names of the independently loadable slices of character state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// A named slice of character state cached on the client.
///
/// The wire name (`as_str`) is also the path segment of the backend endpoint
/// that serves the subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubsystemName {
    AbilityScores,
    Combat,
    Saves,
    Skills,
    Feats,
    Spells,
    Inventory,
    Classes,
    Alignment,
}

impl SubsystemName {
    pub const ALL: [SubsystemName; 9] = [
        SubsystemName::AbilityScores,
        SubsystemName::Combat,
        SubsystemName::Saves,
        SubsystemName::Skills,
        SubsystemName::Feats,
        SubsystemName::Spells,
        SubsystemName::Inventory,
        SubsystemName::Classes,
        SubsystemName::Alignment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AbilityScores => "abilityScores",
            Self::Combat => "combat",
            Self::Saves => "saves",
            Self::Skills => "skills",
            Self::Feats => "feats",
            Self::Spells => "spells",
            Self::Inventory => "inventory",
            Self::Classes => "classes",
            Self::Alignment => "alignment",
        }
    }

    /// Path segment under `/characters/{id}/` serving this subsystem.
    pub fn endpoint_segment(self) -> &'static str {
        match self {
            Self::AbilityScores => "abilities",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for SubsystemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubsystemName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubsystemName::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| DomainError::unknown_field("subsystem", s))
    }
}
