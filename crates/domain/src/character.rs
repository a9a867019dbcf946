//! Active character identity and the denormalized basics many views share.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend-issued identifier of a loaded character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(String);

impl CharacterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CharacterId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLevel {
    pub name: String,
    pub level: u32,
}

/// Total saving throw bonuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveTotals {
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
}

/// Snapshot of basic character fields, replaced wholesale on every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRef {
    pub id: CharacterId,
    pub name: String,
    #[serde(default)]
    pub classes: Vec<ClassLevel>,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub saves: SaveTotals,
}

impl CharacterRef {
    pub fn total_level(&self) -> u32 {
        self.classes.iter().map(|c| c.level).sum()
    }

    /// "Fighter 4 / Wizard 2"
    pub fn class_line(&self) -> String {
        self.classes
            .iter()
            .map(|c| format!("{} {}", c.name, c.level))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}
