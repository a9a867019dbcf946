//! saveforge shared - wire types for the save editor backend API.
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json and the domain vocabulary
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Paths live here** - endpoint builders keep URL shapes in one place

pub mod paths;
pub mod requests;
pub mod responses;

pub use requests::{
    AlignmentUpdateRequest, AttributeUpdateRequest, EquipRequest, FeatChangeRequest,
    GoldUpdateRequest, LoadSaveRequest, MiscBonusRequest, SkillRankUpdateRequest, UnequipRequest,
};
pub use responses::{
    AlignmentResponse, AttributeChangeResponse, ErrorBody, FeatChangeResponse,
    FeatValidationResponse, GoldResponse, HealthResponse, InventoryChangeResponse,
    LoadSaveResponse, MiscBonusResponse, MutationOutcome, SkillUpdateResponse,
};
