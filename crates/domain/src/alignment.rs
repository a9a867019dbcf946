//! Two-axis alignment.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const ALIGNMENT_MIN: i32 = 0;
pub const ALIGNMENT_MAX: i32 = 100;

/// Values at or below this are chaotic/evil.
const LOW_BAND_MAX: i32 = 30;
/// Values at or above this are lawful/good.
const HIGH_BAND_MIN: i32 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentAxis {
    LawChaos,
    GoodEvil,
}

impl AlignmentAxis {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LawChaos => "law_chaos",
            Self::GoodEvil => "good_evil",
        }
    }
}

impl fmt::Display for AlignmentAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn clamp_alignment(value: i32) -> i32 {
    value.clamp(ALIGNMENT_MIN, ALIGNMENT_MAX)
}

/// Alignment position; 100 is fully lawful / fully good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub law_chaos: i32,
    pub good_evil: i32,
}

impl Default for Alignment {
    fn default() -> Self {
        Self {
            law_chaos: 50,
            good_evil: 50,
        }
    }
}

impl Alignment {
    pub fn get(&self, axis: AlignmentAxis) -> i32 {
        match axis {
            AlignmentAxis::LawChaos => self.law_chaos,
            AlignmentAxis::GoodEvil => self.good_evil,
        }
    }

    pub fn with(mut self, axis: AlignmentAxis, value: i32) -> Self {
        match axis {
            AlignmentAxis::LawChaos => self.law_chaos = value,
            AlignmentAxis::GoodEvil => self.good_evil = value,
        }
        self
    }

    /// Nine-box name, e.g. "Lawful Good" or "True Neutral".
    pub fn name(&self) -> String {
        let ethic = band(self.law_chaos, "Lawful", "Chaotic");
        let moral = band(self.good_evil, "Good", "Evil");
        match (ethic, moral) {
            (None, None) => "True Neutral".to_string(),
            (Some(e), None) => format!("{} Neutral", e),
            (None, Some(m)) => format!("Neutral {}", m),
            (Some(e), Some(m)) => format!("{} {}", e, m),
        }
    }
}

fn band(value: i32, high: &'static str, low: &'static str) -> Option<&'static str> {
    if value >= HIGH_BAND_MIN {
        Some(high)
    } else if value <= LOW_BAND_MAX {
        Some(low)
    } else {
        None
    }
}
