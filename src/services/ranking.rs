use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use thiserror::Error;

use crate::models::{Catalog, MovieId, Recommendation, ScoredCandidate, UserId};
use crate::services::scorers::Scorer;

/// Error types for the ranking engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankingError {
    #[error("Invalid user ID: {0}")]
    InvalidUser(UserId),
    #[error("movie {0} was scored but has no catalog entry")]
    MissingCatalogEntry(MovieId),
    #[error("movie {0} received a non-finite score")]
    NonFiniteScore(MovieId),
}

/// Selects the top-N movies for a user under a pluggable scoring strategy.
///
/// A pure function of its inputs: repeated calls with the same user, count,
/// catalog and scorer return identical results. Reads only shared immutable
/// state and never suspends, so it can run on any number of requests
/// concurrently.
pub struct Ranker<'a> {
    catalog: &'a Catalog,
    scorer: &'a dyn Scorer,
}

impl<'a> Ranker<'a> {
    /// Creates a ranker over the given catalog and strategy
    pub fn new(catalog: &'a Catalog, scorer: &'a dyn Scorer) -> Self {
        Self { catalog, scorer }
    }

    /// Returns the `min(n, scorable movies)` best-scoring movies for
    /// `user_id`, highest score first, enriched with catalog titles.
    ///
    /// Equal scores order by ascending movie id, so the output is fully
    /// deterministic. Scores come back at full precision; any display
    /// rounding is the caller's concern and never affects selection.
    pub fn rank(&self, user_id: UserId, n: usize) -> Result<Vec<Recommendation>, RankingError> {
        if let Some(range) = self.scorer.valid_users() {
            if !range.contains(&user_id) {
                return Err(RankingError::InvalidUser(user_id));
            }
        }

        let candidates = self.scorer.candidates(user_id, self.catalog);
        let selected = top_n(candidates, n)?;

        selected
            .into_iter()
            .map(|candidate| {
                let movie = self
                    .catalog
                    .lookup(candidate.movie_id)
                    .ok_or(RankingError::MissingCatalogEntry(candidate.movie_id))?;
                Ok(Recommendation {
                    movie_id: candidate.movie_id,
                    title: movie.title.clone(),
                    score: candidate.score,
                })
            })
            .collect()
    }
}

/// Candidate ordering for the selection heap: higher score ranks first,
/// lower movie id wins ties.
#[derive(Debug)]
struct HeapEntry {
    score: f64,
    movie_id: MovieId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.movie_id.cmp(&self.movie_id))
    }
}

/// Picks the `n` highest-ranked candidates without sorting the full set.
///
/// Keeps a bounded min-heap of the current best `n`, replacing its minimum
/// whenever a better candidate arrives: O(M log N) over M candidates, which
/// beats a full sort when the requested page is much smaller than the
/// catalog. Candidates are assumed unique per movie id by construction.
fn top_n(
    candidates: Vec<ScoredCandidate>,
    n: usize,
) -> Result<Vec<ScoredCandidate>, RankingError> {
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::with_capacity(n + 1);

    for candidate in candidates {
        if !candidate.score.is_finite() {
            return Err(RankingError::NonFiniteScore(candidate.movie_id));
        }

        let entry = HeapEntry {
            score: candidate.score,
            movie_id: candidate.movie_id,
        };

        if heap.len() < n {
            heap.push(Reverse(entry));
        } else if let Some(Reverse(worst)) = heap.peek() {
            if entry > *worst {
                heap.pop();
                heap.push(Reverse(entry));
            }
        }
    }

    // Ascending over Reverse yields the best-ranked entry first
    Ok(heap
        .into_sorted_vec()
        .into_iter()
        .map(|Reverse(entry)| ScoredCandidate {
            movie_id: entry.movie_id,
            score: entry.score,
        })
        .collect())
}
