//! Relative endpoint paths. The HTTP client prefixes them with the API base path.

use saveforge_domain::{CharacterId, SubsystemName};

pub const HEALTH: &str = "/health";
pub const SESSION_LOAD: &str = "/session/load";
pub const SESSION_CLOSE: &str = "/session/close";

fn character(id: &CharacterId, rest: &str) -> String {
    format!("/characters/{}/{}", id, rest)
}

pub fn summary(id: &CharacterId) -> String {
    character(id, "summary")
}

pub fn subsystem(id: &CharacterId, name: SubsystemName) -> String {
    character(id, name.endpoint_segment())
}

pub fn attributes_update(id: &CharacterId) -> String {
    character(id, "attributes/update")
}

pub fn combat_misc_bonus(id: &CharacterId) -> String {
    character(id, "combat/misc-bonus")
}

pub fn saves_misc_bonus(id: &CharacterId) -> String {
    character(id, "saves/misc-bonus")
}

pub fn skills_update(id: &CharacterId) -> String {
    character(id, "skills/update")
}

pub fn feat_validate(id: &CharacterId, feat_id: u32) -> String {
    character(id, &format!("feats/{}/validate", feat_id))
}

pub fn feats_add(id: &CharacterId) -> String {
    character(id, "feats/add")
}

pub fn feats_remove(id: &CharacterId) -> String {
    character(id, "feats/remove")
}

pub fn alignment(id: &CharacterId) -> String {
    character(id, "alignment")
}

pub fn gold(id: &CharacterId) -> String {
    character(id, "gold")
}

pub fn inventory_equip(id: &CharacterId) -> String {
    character(id, "inventory/equip")
}

pub fn inventory_unequip(id: &CharacterId) -> String {
    character(id, "inventory/unequip")
}
