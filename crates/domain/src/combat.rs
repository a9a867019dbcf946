//! Misc bonuses on combat stats and saving throws.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DomainError, SubsystemName};

pub const MISC_BONUS_MIN: i32 = -50;
pub const MISC_BONUS_MAX: i32 = 50;

/// A stat carrying a user-editable misc bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MiscStat {
    ArmorClass,
    Initiative,
    Fortitude,
    Reflex,
    Will,
}

impl MiscStat {
    pub const ALL: [MiscStat; 5] = [
        MiscStat::ArmorClass,
        MiscStat::Initiative,
        MiscStat::Fortitude,
        MiscStat::Reflex,
        MiscStat::Will,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ArmorClass => "armor_class",
            Self::Initiative => "initiative",
            Self::Fortitude => "fortitude",
            Self::Reflex => "reflex",
            Self::Will => "will",
        }
    }

    /// Subsystem whose data holds this stat.
    pub fn subsystem(self) -> SubsystemName {
        match self {
            Self::ArmorClass | Self::Initiative => SubsystemName::Combat,
            Self::Fortitude | Self::Reflex | Self::Will => SubsystemName::Saves,
        }
    }

    pub fn is_save(self) -> bool {
        self.subsystem() == SubsystemName::Saves
    }
}

impl fmt::Display for MiscStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MiscStat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        match needle.as_str() {
            "ac" | "armor_class" => Ok(Self::ArmorClass),
            "init" | "initiative" => Ok(Self::Initiative),
            "fort" | "fortitude" => Ok(Self::Fortitude),
            "ref" | "reflex" => Ok(Self::Reflex),
            "will" => Ok(Self::Will),
            _ => Err(DomainError::unknown_field("stat", s)),
        }
    }
}

pub fn clamp_misc_bonus(value: i32) -> i32 {
    value.clamp(MISC_BONUS_MIN, MISC_BONUS_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_live_in_saves_subsystem() {
        assert_eq!(MiscStat::Will.subsystem(), SubsystemName::Saves);
        assert_eq!(MiscStat::ArmorClass.subsystem(), SubsystemName::Combat);
        assert!(MiscStat::Reflex.is_save());
        assert!(!MiscStat::Initiative.is_save());
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("AC".parse::<MiscStat>(), Ok(MiscStat::ArmorClass));
        assert_eq!("fort".parse::<MiscStat>(), Ok(MiscStat::Fortitude));
        assert!(matches!(
            "luck".parse::<MiscStat>(),
            Err(DomainError::UnknownField { kind: "stat", .. })
        ));
    }

    #[test]
    fn clamps_bonus() {
        assert_eq!(clamp_misc_bonus(99), 50);
        assert_eq!(clamp_misc_bonus(-99), -50);
        assert_eq!(clamp_misc_bonus(4), 4);
    }
}
