//! Response bodies returned by the backend HTTP API.
//!
//! Mutation responses may carry a refreshed payload for the subsystem they
//! touched; the client applies it directly instead of issuing another GET.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use saveforge_domain::{Alignment, CharacterRef};

fn default_true() -> bool {
    true
}

/// Common accessors for mutation acknowledgements.
pub trait MutationOutcome {
    fn succeeded(&self) -> bool;
    fn message(&self) -> Option<&str>;
}

macro_rules! mutation_outcome {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MutationOutcome for $ty {
                fn succeeded(&self) -> bool {
                    self.success
                }

                fn message(&self) -> Option<&str> {
                    self.message.as_deref()
                }
            }
        )*
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok") || self.status.eq_ignore_ascii_case("healthy")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSaveResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub character: CharacterRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeChangeResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Refreshed `abilityScores` subsystem payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_scores: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiscBonusResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combat: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saves: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillUpdateResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Refreshed point totals, merged into the `skills` subsystem as `summary`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_summary: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatValidationResponse {
    pub can_take: bool,
    #[serde(default)]
    pub missing_requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatChangeResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Refreshed `feats` subsystem payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feats: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldResponse {
    pub gold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryChangeResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Refreshed `inventory` subsystem payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Value>,
}

mutation_outcome!(
    LoadSaveResponse,
    AttributeChangeResponse,
    MiscBonusResponse,
    SkillUpdateResponse,
    FeatChangeResponse,
    AlignmentResponse,
    InventoryChangeResponse,
);

/// Error body of a non-2xx response.
///
/// Backends disagree on the field name; the first one present wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn server_message(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .or(self.error.as_deref())
            .or(self.message.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_defaults_to_true() {
        let resp: SkillUpdateResponse = serde_json::from_str("{}").expect("parse");
        assert!(resp.succeeded());
        assert!(resp.skill_summary.is_none());
    }

    #[test]
    fn error_body_prefers_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "generic", "detail": "Strength too high"}"#)
                .expect("parse");
        assert_eq!(body.server_message(), Some("Strength too high"));

        let body: ErrorBody = serde_json::from_str(r#"{"message": "nope"}"#).expect("parse");
        assert_eq!(body.server_message(), Some("nope"));
        assert_eq!(ErrorBody::default().server_message(), None);
    }

    #[test]
    fn health_status_accepts_ok_and_healthy() {
        let ok = HealthResponse {
            status: "OK".to_string(),
            version: None,
        };
        assert!(ok.is_healthy());
        let down = HealthResponse {
            status: "starting".to_string(),
            version: None,
        };
        assert!(!down.is_healthy());
    }
}
