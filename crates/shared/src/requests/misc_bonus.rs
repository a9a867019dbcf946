use serde::{Deserialize, Serialize};
use saveforge_domain::MiscStat;

/// Misc bonus change for a combat stat or saving throw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiscBonusRequest {
    pub stat: MiscStat,
    pub value: i32,
}
