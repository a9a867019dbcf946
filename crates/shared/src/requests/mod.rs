//! Request bodies for the backend HTTP API, one module per resource area.

pub mod alignment;
pub mod attributes;
pub mod feats;
pub mod inventory;
pub mod misc_bonus;
pub mod session;
pub mod skills;

pub use alignment::AlignmentUpdateRequest;
pub use attributes::AttributeUpdateRequest;
pub use feats::FeatChangeRequest;
pub use inventory::{EquipRequest, UnequipRequest};
pub use misc_bonus::MiscBonusRequest;
pub use session::{GoldUpdateRequest, LoadSaveRequest};
pub use skills::SkillRankUpdateRequest;
