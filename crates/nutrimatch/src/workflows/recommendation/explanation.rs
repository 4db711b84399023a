use std::fmt::Write as _;

use serde::Serialize;

use super::analysis::{AnalysisOutcome, ScoredProduct};
use super::domain::{EvidenceEntry, UserProfile};

/// Message returned when no product survives the eligibility screen.
pub const NO_MATCH_MESSAGE: &str =
    "Sorry, we could not find products suitable for your profile.";

/// Context handed to the external text-generation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationPrompt {
    pub product_details: String,
    pub scientific_context: String,
    pub user_context: String,
}

/// Seam for the external natural-language generator. Prompt orchestration
/// lives behind this trait, not in the pipeline.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &RecommendationPrompt) -> Result<String, GenerationError>;
}

/// Error enumeration for generation failures.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("text generation unavailable: {0}")]
    Unavailable(String),
}

/// Where the user-facing text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
    Generated,
    Fallback,
    NoMatch,
}

/// Rendered user-facing recommendation text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub text: String,
    pub source: ExplanationSource,
}

pub(crate) fn render<G: TextGenerator + ?Sized>(
    profile: &UserProfile,
    outcome: &AnalysisOutcome,
    evidence: &[EvidenceEntry],
    generator: &G,
    top_n: usize,
) -> Explanation {
    if outcome.ranked.is_empty() {
        return Explanation {
            text: NO_MATCH_MESSAGE.to_string(),
            source: ExplanationSource::NoMatch,
        };
    }

    let prompt = build_prompt(profile, outcome, evidence, top_n);
    match generator.generate(&prompt) {
        Ok(text) => Explanation {
            text,
            source: ExplanationSource::Generated,
        },
        Err(err) => {
            tracing::warn!("text generation failed, using deterministic summary: {err}");
            Explanation {
                text: fallback_summary(&outcome.ranked[0]),
                source: ExplanationSource::Fallback,
            }
        }
    }
}

pub(crate) fn build_prompt(
    profile: &UserProfile,
    outcome: &AnalysisOutcome,
    evidence: &[EvidenceEntry],
    top_n: usize,
) -> RecommendationPrompt {
    let mut product_details = String::new();
    for (index, product) in outcome.ranked.iter().take(top_n).enumerate() {
        if index > 0 {
            product_details.push_str("\n\n");
        }
        let _ = write!(
            product_details,
            "**{}. {} - {}**\n- Score: {:.1}/100\n- Price: {:.2}\n- Reasons: {}",
            index + 1,
            product.brand_name,
            product.product_name,
            product.score,
            product.price,
            product.reasons.join(", ")
        );
    }

    let mut scientific_context = String::new();
    for entry in evidence.iter().take(2) {
        let effects = entry
            .effects
            .iter()
            .take(3)
            .map(|(effect, strength)| format!("{effect} ({strength})"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(
            scientific_context,
            "\n- **{}** ({}): {}",
            entry.supplement_name, entry.source, effects
        );
        if let Some(dosage) = &entry.dosage {
            let _ = write!(
                scientific_context,
                ". Dosage: {}-{} {}",
                dosage.min, dosage.max, dosage.unit
            );
        }
    }

    let mut user_context = String::new();
    if !profile.medical_conditions.is_empty() {
        let conditions = profile
            .medical_conditions
            .iter()
            .map(|condition| condition.label())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(user_context, "\n- Medical conditions: {conditions}");
    }
    if !profile.dietary_restrictions.is_empty() {
        let restrictions = profile
            .dietary_restrictions
            .iter()
            .map(|restriction| restriction.label())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(user_context, "\n- Dietary restrictions: {restrictions}");
    }
    let _ = write!(user_context, "\n- Goal: {}", profile.goal.label());

    RecommendationPrompt {
        product_details,
        scientific_context,
        user_context,
    }
}

/// Deterministic summary used when the generator is unavailable.
pub(crate) fn fallback_summary(top: &ScoredProduct) -> String {
    let reasons = top
        .reasons
        .iter()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "We recommend {} - {} (score {:.1}/100). Reasons: {}",
        top.brand_name, top.product_name, top.score, reasons
    )
}
