pub mod ranking;
pub mod scorers;

pub use ranking::{Ranker, RankingError};
pub use scorers::{PopularityScorer, PredictiveScorer, ScoreKind, Scorer, SvdModel};
