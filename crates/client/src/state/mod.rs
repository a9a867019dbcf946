//! Client-side state: subsystem cache, local overrides and the active character.

pub mod cache;
pub mod character;
pub mod feat_validation;
pub mod overrides;

pub use cache::{LoadOptions, Refresh, SubsystemCache, SubsystemEvent, SubsystemState};
pub use character::CharacterContext;
pub use feat_validation::{FeatEligibility, FeatValidationCache};
pub use overrides::{OverrideMap, OverrideTicket};
