use serde::{Deserialize, Serialize};
use saveforge_domain::AlignmentAxis;

/// Alignment change. Only the axes present are written; an omitted axis keeps
/// its stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law_chaos: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good_evil: Option<i32>,
}

impl AlignmentUpdateRequest {
    pub fn single(axis: AlignmentAxis, value: i32) -> Self {
        match axis {
            AlignmentAxis::LawChaos => Self {
                law_chaos: Some(value),
                ..Self::default()
            },
            AlignmentAxis::GoodEvil => Self {
                good_evil: Some(value),
                ..Self::default()
            },
        }
    }
}
