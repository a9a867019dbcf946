//! Ability scores and modifier derivation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Lowest base ability score the editor accepts.
pub const ABILITY_SCORE_MIN: i32 = 3;

/// Highest base ability score the editor accepts.
pub const ABILITY_SCORE_MAX: i32 = 50;

/// The six ability scores.
///
/// Serialized with the short names the backend uses as map keys (`"Str"`,
/// `"Dex"`, ...). The short name is also the override key for edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Str,
        Ability::Dex,
        Ability::Con,
        Ability::Int,
        Ability::Wis,
        Ability::Cha,
    ];

    /// Canonical short name (`"Str"`).
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Str => "Str",
            Self::Dex => "Dex",
            Self::Con => "Con",
            Self::Int => "Int",
            Self::Wis => "Wis",
            Self::Cha => "Cha",
        }
    }

    /// Human readable name (`"Strength"`).
    pub fn full_name(self) -> &'static str {
        match self {
            Self::Str => "Strength",
            Self::Dex => "Dexterity",
            Self::Con => "Constitution",
            Self::Int => "Intelligence",
            Self::Wis => "Wisdom",
            Self::Cha => "Charisma",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Ability::ALL
            .into_iter()
            .find(|a| {
                a.short_name().eq_ignore_ascii_case(needle)
                    || a.full_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| DomainError::unknown_field("ability", needle))
    }
}

/// Ability modifier: `floor((score - 10) / 2)`.
///
/// Integer division in Rust truncates toward zero, so odd scores below 10
/// need euclidean division to round down (score 9 is -1, not 0).
pub fn calculate_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Clamp a requested base score into the legal range.
pub fn clamp_ability_score(score: i32) -> i32 {
    score.clamp(ABILITY_SCORE_MIN, ABILITY_SCORE_MAX)
}

/// Format a modifier the way the sheet displays it (`+3`, `0`, `-1`).
pub fn format_modifier(modifier: i32) -> String {
    if modifier > 0 {
        format!("+{}", modifier)
    } else {
        modifier.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_examples() {
        assert_eq!(calculate_modifier(10), 0);
        assert_eq!(calculate_modifier(11), 0);
        assert_eq!(calculate_modifier(14), 2);
        assert_eq!(calculate_modifier(16), 3);
        assert_eq!(calculate_modifier(18), 4);
        assert_eq!(calculate_modifier(9), -1);
        assert_eq!(calculate_modifier(3), -4);
        assert_eq!(calculate_modifier(50), 20);
    }

    #[test]
    fn modifier_matches_floor_over_legal_range() {
        for score in ABILITY_SCORE_MIN..=ABILITY_SCORE_MAX {
            let expected = ((score - 10) as f64 / 2.0).floor() as i32;
            assert_eq!(calculate_modifier(score), expected, "score {}", score);
        }
    }

    #[test]
    fn clamp_keeps_scores_in_range() {
        assert_eq!(clamp_ability_score(1), 3);
        assert_eq!(clamp_ability_score(16), 16);
        assert_eq!(clamp_ability_score(99), 50);
    }

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("str".parse::<Ability>(), Ok(Ability::Str));
        assert_eq!("Wisdom".parse::<Ability>(), Ok(Ability::Wis));
        assert!("Luck".parse::<Ability>().is_err());
    }

    #[test]
    fn serializes_as_short_name() {
        let json = serde_json::to_string(&Ability::Cha).expect("serialize");
        assert_eq!(json, "\"Cha\"");
    }

    #[test]
    fn formats_modifiers_with_sign() {
        assert_eq!(format_modifier(3), "+3");
        assert_eq!(format_modifier(0), "0");
        assert_eq!(format_modifier(-2), "-2");
    }
}
