//! saveforge domain.
//!
//! Rules arithmetic and vocabulary types for the save editor client: ability
//! modifiers, encumbrance tiers, skill rank limits, alignment and misc bonus
//! ranges. Nothing here performs I/O; the backend stays the source of truth and
//! these functions only let the client derive display values immediately.

pub mod abilities;
pub mod alignment;
pub mod character;
pub mod combat;
pub mod encumbrance;
pub mod error;
pub mod skills;
pub mod subsystem;

pub use abilities::{
    calculate_modifier, clamp_ability_score, format_modifier, Ability, ABILITY_SCORE_MAX,
    ABILITY_SCORE_MIN,
};
pub use alignment::{clamp_alignment, Alignment, AlignmentAxis, ALIGNMENT_MAX, ALIGNMENT_MIN};
pub use character::{CharacterId, CharacterRef, ClassLevel, SaveTotals};
pub use combat::{clamp_misc_bonus, MiscStat, MISC_BONUS_MAX, MISC_BONUS_MIN};
pub use encumbrance::{Encumbrance, LoadTier, ProgressTier};
pub use error::DomainError;
pub use skills::{
    clamp_skill_rank, max_skill_rank, skill_point_cost, SkillAllocation, SkillPointLedger,
};
pub use subsystem::SubsystemName;
