use serde::{Deserialize, Serialize};

/// Most products a single room analysis may recommend.
pub const MAX_RECOMMENDATIONS: usize = 3;

pub const UNAVAILABLE_REASONING: &str = "The design assistant is currently unavailable. \
Please check that an API key is configured for the AI service.";

pub const ANALYSIS_FAILED_REASONING: &str = "I'm having trouble analyzing this image right now. \
Please try a clearer photo or try again later.";

pub const DEFAULT_REASONING: &str = "Could not analyze the room.";

/// Outcome of a room-photo analysis.
///
/// `recommended_ids` are whatever the provider returned; they are not checked
/// against the catalog here. See [`crate::find_products`] for caller-side
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    recommended_ids: Vec<String>,
    reasoning: String,
}

impl RecommendationResult {
    pub fn new(recommended_ids: Vec<String>, reasoning: impl Into<String>) -> Self {
        Self {
            recommended_ids,
            reasoning: reasoning.into(),
        }
    }

    /// Result returned when no provider client exists.
    pub fn unavailable() -> Self {
        Self::new(Vec::new(), UNAVAILABLE_REASONING)
    }

    /// Result returned when the provider call or its parsing failed.
    pub fn failed() -> Self {
        Self::new(Vec::new(), ANALYSIS_FAILED_REASONING)
    }

    pub fn recommended_ids(&self) -> &[String] {
        &self.recommended_ids
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn is_empty(&self) -> bool {
        self.recommended_ids.is_empty()
    }
}
