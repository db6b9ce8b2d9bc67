//! The structured analysis report
//!
//! Immutable once constructed, never persisted beyond the response.
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

/// One inferred interest with a short description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    /// Interest name, e.g. "travel"
    pub name: String,
    /// Short free-text description
    pub description: String,
}

/// Relationship-building advice derived from the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    /// Conversation topics worth opening with
    pub topics: Vec<String>,
    /// Date ideas and planning suggestions
    pub dating: Vec<String>,
    /// Communication techniques
    pub communication: Vec<String>,
    /// How to pace the relationship overall
    pub relationship: String,
}

/// The structured personality/compatibility report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Inferred personality traits
    pub personality_traits: Vec<String>,
    /// Inferred interests
    pub interests: Vec<Interest>,
    /// Free-text lifestyle summary
    pub lifestyle: String,
    /// Free-text social-preference summary
    pub social_preference: String,
    /// Relationship-building advice
    pub advice: Advice,
}

impl AnalysisReport {
    /// Check the completeness invariant: every field populated
    ///
    /// Holds for every report this crate hands out, whether it came from
    /// the provider or from the fallback.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.personality_traits.is_empty()
            && !self.interests.is_empty()
            && !self.lifestyle.is_empty()
            && !self.social_preference.is_empty()
            && !self.advice.topics.is_empty()
            && !self.advice.dating.is_empty()
            && !self.advice.communication.is_empty()
            && !self.advice.relationship.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn wire_shape_is_camel_case() {
        let report = crate::normalize::fallback_report();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("personalityTraits").is_some());
        assert!(json.get("socialPreference").is_some());
        assert!(json["advice"].get("relationship").is_some());
    }

    #[test]
    fn empty_trait_list_is_incomplete() {
        let mut report = crate::normalize::fallback_report();
        report.personality_traits.clear();
        assert!(!report.is_complete());
    }

    #[test]
    fn missing_advice_subfield_is_incomplete() {
        let mut report = crate::normalize::fallback_report();
        report.advice.relationship.clear();
        assert!(!report.is_complete());
    }
}
