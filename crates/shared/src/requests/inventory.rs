use serde::{Deserialize, Serialize};

/// Equip the backpack item at `item_index` into `slot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipRequest {
    pub item_index: u32,
    pub slot: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnequipRequest {
    pub slot: String,
}
