use std::ops::Range;

/// Scoring strategy abstraction
///
/// This module provides a pluggable architecture for the two ranking
/// strategies (collaborative-filtering prediction, global popularity). Each
/// strategy produces one scored candidate per movie it can rank; the ranking
/// engine is written once against this trait.
use crate::models::{Catalog, ScoredCandidate, UserId};

pub mod popularity;
pub mod predictive;

pub use popularity::PopularityScorer;
pub use predictive::{PredictiveScorer, SvdModel};

/// What a strategy's score means.
///
/// Controls the score field name in API responses. A deployment runs a
/// single strategy, so the two meanings never mix within one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    /// Estimated rating on the trained model's rating scale
    PredictedRating,
    /// Aggregate popularity metric (rating count times mean rating), unbounded
    PopularityScore,
}

/// Trait for ranking strategies
pub trait Scorer: Send + Sync {
    /// The score semantics this strategy produces.
    fn kind(&self) -> ScoreKind;

    /// Half-open range of user ids this strategy can score.
    ///
    /// `None` means any id is accepted (the popularity strategy ignores the
    /// user entirely). The ranking engine rejects out-of-range ids before
    /// calling [`Scorer::candidates`].
    fn valid_users(&self) -> Option<Range<UserId>>;

    /// Scores every movie this strategy can rank, one candidate per
    /// distinct movie id.
    ///
    /// Callers must have validated `user_id` against [`Scorer::valid_users`]
    /// first; out-of-range ids are not guaranteed a meaningful score.
    fn candidates(&self, user_id: UserId, catalog: &Catalog) -> Vec<ScoredCandidate>;
}
