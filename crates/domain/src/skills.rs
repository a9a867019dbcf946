//! Skill rank limits and skill point bookkeeping.

use serde::{Deserialize, Serialize};

/// Maximum ranks a character may hold in a skill at the given total level.
///
/// Class skills cap at `level + 3`; cross-class skills at half that, rounded down.
pub fn max_skill_rank(character_level: u32, class_skill: bool) -> i32 {
    let cap = character_level.saturating_add(3);
    let cap = if class_skill { cap } else { cap / 2 };
    i32::try_from(cap).unwrap_or(i32::MAX)
}

/// Clamp a requested rank into `0..=max_rank`.
pub fn clamp_skill_rank(rank: i32, max_rank: i32) -> i32 {
    rank.clamp(0, max_rank.max(0))
}

/// Points needed to hold `ranks` ranks. Cross-class ranks cost double.
pub fn skill_point_cost(ranks: i32, class_skill: bool) -> i32 {
    let ranks = ranks.max(0);
    if class_skill {
        ranks
    } else {
        ranks.saturating_mul(2)
    }
}

/// One skill's contribution to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillAllocation {
    pub rank: i32,
    pub class_skill: bool,
}

/// Spent and remaining skill points for a pool.
///
/// Overspending is reported, not rejected: the backend owns the rule check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPointLedger {
    pub pool: i32,
    pub spent: i32,
}

impl SkillPointLedger {
    pub fn from_allocations<I>(pool: i32, allocations: I) -> Self
    where
        I: IntoIterator<Item = SkillAllocation>,
    {
        let spent = allocations
            .into_iter()
            .map(|a| skill_point_cost(a.rank, a.class_skill))
            .fold(0i32, i32::saturating_add);
        Self { pool, spent }
    }

    pub fn remaining(&self) -> i32 {
        self.pool - self.spent
    }

    pub fn is_overspent(&self) -> bool {
        self.spent > self.pool
    }
}
