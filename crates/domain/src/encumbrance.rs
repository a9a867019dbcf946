//! Carried weight and encumbrance tiers.

use serde::{Deserialize, Serialize};

/// Lower bound (inclusive) of the warning band, in percent of heavy load.
pub const WARNING_THRESHOLD: u32 = 33;

/// Upper bound (inclusive) of the warning band, in percent of heavy load.
pub const ERROR_THRESHOLD: u32 = 66;

/// Weight limits for a character, as reported by the inventory subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Encumbrance {
    pub total_weight: f64,
    #[serde(default)]
    pub light_load: f64,
    #[serde(default)]
    pub medium_load: f64,
    pub heavy_load: f64,
}

/// Load category derived from carried weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadTier {
    Light,
    Medium,
    Heavy,
    Overloaded,
}

/// Colour tier of the weight progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressTier {
    Success,
    Warning,
    Error,
}

impl ProgressTier {
    /// `< 33` is success, `33..=66` warning, anything above is error.
    pub fn for_percentage(percent: u32) -> Self {
        if percent < WARNING_THRESHOLD {
            Self::Success
        } else if percent <= ERROR_THRESHOLD {
            Self::Warning
        } else {
            Self::Error
        }
    }
}

impl Encumbrance {
    pub fn new(total_weight: f64, heavy_load: f64) -> Self {
        Self {
            total_weight,
            light_load: heavy_load / 3.0,
            medium_load: heavy_load * 2.0 / 3.0,
            heavy_load,
        }
    }

    /// Carried weight as a percentage of the heavy load, rounded and capped at 100.
    pub fn weight_percentage(&self) -> u32 {
        if self.heavy_load <= 0.0 {
            return if self.total_weight > 0.0 { 100 } else { 0 };
        }
        let percent = (self.total_weight / self.heavy_load * 100.0).round();
        percent.clamp(0.0, 100.0) as u32
    }

    pub fn progress_tier(&self) -> ProgressTier {
        ProgressTier::for_percentage(self.weight_percentage())
    }

    /// Load category. Missing light/medium limits fall back to thirds of the heavy load.
    pub fn load_tier(&self) -> LoadTier {
        let light = if self.light_load > 0.0 {
            self.light_load
        } else {
            self.heavy_load / 3.0
        };
        let medium = if self.medium_load > 0.0 {
            self.medium_load
        } else {
            self.heavy_load * 2.0 / 3.0
        };

        if self.total_weight > self.heavy_load {
            LoadTier::Overloaded
        } else if self.total_weight > medium {
            LoadTier::Heavy
        } else if self.total_weight > light {
            LoadTier::Medium
        } else {
            LoadTier::Light
        }
    }
}
