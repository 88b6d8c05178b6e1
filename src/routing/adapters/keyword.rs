//! Deterministic keyword-matching decision backend.

use crate::routing::ports::{
    BackendDecision, CandidateSummary, DecisionBackend, DecisionBackendResult, DecisionRequest,
};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Decision backend that matches query words against capability names and
/// tags.
///
/// Each candidate scores one point per distinct query token that names one of
/// its capabilities or tags. The highest score wins; ties go to the earlier
/// candidate. Confidence is the share of query tokens matched.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordDecisionBackend;

impl KeywordDecisionBackend {
    /// Name recorded on decisions made by this backend.
    pub const NAME: &'static str = "keyword";

    /// Creates the backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DecisionBackend for KeywordDecisionBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn decide(&self, request: &DecisionRequest) -> DecisionBackendResult<BackendDecision> {
        let tokens = tokenize(&request.query);
        let mut ranked: Vec<(usize, usize, &CandidateSummary)> = request
            .candidates
            .iter()
            .enumerate()
            .map(|(position, candidate)| (matched_tokens(candidate, &tokens), position, candidate))
            .filter(|(score, _, _)| *score > 0)
            .collect();
        ranked.sort_by(|left, right| right.0.cmp(&left.0).then(left.1.cmp(&right.1)));

        let mut ranked_iter = ranked.into_iter();
        let Some((score, _, best)) = ranked_iter.next() else {
            return Ok(BackendDecision::decline(
                "no candidate advertises a capability matching the query",
            ));
        };

        let alternatives = ranked_iter.map(|(_, _, candidate)| candidate.id.clone()).collect();
        Ok(BackendDecision::select(
            best.id.clone(),
            token_share(score, tokens.len()),
            format!(
                "{} matched {score} of {} query terms",
                best.name,
                tokens.len()
            ),
        )
        .with_alternatives(alternatives))
    }
}

/// Splits a query into distinct lowercase words.
fn tokenize(query: &str) -> BTreeSet<String> {
    query
        .split(|character: char| !(character.is_alphanumeric() || character == '-' || character == '_'))
        .map(str::to_lowercase)
        .filter(|token| !token.is_empty())
        .collect()
}

fn matched_tokens(candidate: &CandidateSummary, tokens: &BTreeSet<String>) -> usize {
    tokens
        .iter()
        .filter(|token| {
            candidate.capabilities.iter().any(|capability| {
                capability.name == **token || capability.tags.iter().any(|tag| tag == *token)
            })
        })
        .count()
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "confidence is the ratio of matched to total query tokens"
)]
fn token_share(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (matched as f64 / total as f64).clamp(0.0, 1.0)
}
