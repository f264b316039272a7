use std::collections::HashSet;
use std::ops::Range;
use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;
use crate::models::{Catalog, MovieId, ScoredCandidate, UserId};
use crate::services::scorers::{ScoreKind, Scorer};

/// Scores movies by global popularity, independent of the requesting user.
///
/// The ranking is prepared once at startup: each movie's popularity is its
/// rating count times its mean rating, and the list is held pre-sorted in
/// descending order. Requests only read a prefix of it.
pub struct PopularityScorer {
    ranked: Vec<ScoredCandidate>,
}

/// One row of the popularity CSV written by the training pipeline.
#[derive(Debug, Deserialize)]
struct PopularityRecord {
    movie_id: MovieId,
    count: u64,
    mean: f64,
}

impl PopularityScorer {
    /// Loads the precomputed popularity statistics from a CSV with
    /// `movie_id`, `count` and `mean` columns.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path_str = path.as_ref().display().to_string();

        let mut reader = csv::Reader::from_path(&path).map_err(|source| LoadError::Csv {
            path: path_str.clone(),
            source,
        })?;

        let mut candidates = Vec::new();
        for record in reader.deserialize() {
            let row: PopularityRecord = record.map_err(|source| LoadError::Csv {
                path: path_str.clone(),
                source,
            })?;
            candidates.push(ScoredCandidate {
                movie_id: row.movie_id,
                score: row.count as f64 * row.mean,
            });
        }

        let scorer = Self::from_candidates(candidates);
        tracing::info!(movies = scorer.ranked.len(), "Popularity ranking loaded");
        Ok(scorer)
    }

    /// Builds a scorer from raw (movie id, popularity score) pairs.
    pub fn from_scores(scores: impl IntoIterator<Item = (MovieId, f64)>) -> Self {
        Self::from_candidates(
            scores
                .into_iter()
                .map(|(movie_id, score)| ScoredCandidate { movie_id, score })
                .collect(),
        )
    }

    /// Sorts descending by score with ascending movie id on ties, then
    /// drops repeated movie ids so each movie appears once.
    fn from_candidates(mut candidates: Vec<ScoredCandidate>) -> Self {
        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.movie_id.cmp(&b.movie_id))
        });

        let total = candidates.len();
        let mut seen = HashSet::new();
        candidates.retain(|c| seen.insert(c.movie_id));

        if candidates.len() < total {
            tracing::warn!(
                dropped = total - candidates.len(),
                "Dropped repeated movie ids from popularity ranking"
            );
        }

        Self { ranked: candidates }
    }
}

impl Scorer for PopularityScorer {
    fn kind(&self) -> ScoreKind {
        ScoreKind::PopularityScore
    }

    fn valid_users(&self) -> Option<Range<UserId>> {
        None
    }

    fn candidates(&self, _user_id: UserId, _catalog: &Catalog) -> Vec<ScoredCandidate> {
        self.ranked.clone()
    }
}
