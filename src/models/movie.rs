use serde::Deserialize;

/// Identifier for a movie, unique within the catalog.
pub type MovieId = i64;

/// Identifier for a user. Externally supplied and only meaningful to
/// strategies that know a user space.
pub type UserId = i64;

/// A movie as stored in the catalog.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Movie {
    /// Unique identifier for the movie
    #[serde(rename = "movie_id")]
    pub id: MovieId,
    /// Display title (e.g., "Toy Story (1995)")
    pub title: String,
}

impl Movie {
    /// Creates a new movie entry
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// A movie paired with the score a strategy assigned to it.
///
/// Produced per request and consumed by the ranking engine; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub movie_id: MovieId,
    pub score: f64,
}

/// A ranked movie with its catalog metadata attached.
///
/// The score is kept at full precision here; display rounding happens at
/// the API boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub score: f64,
}
