use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use saveforge_domain::Ability;

/// Base ability score changes keyed by short name (`{"attributes": {"Str": 16}}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeUpdateRequest {
    pub attributes: BTreeMap<Ability, i32>,
}

impl AttributeUpdateRequest {
    pub fn single(ability: Ability, value: i32) -> Self {
        Self {
            attributes: BTreeMap::from([(ability, value)]),
        }
    }
}
