use std::collections::HashMap;
use std::path::Path;

use crate::error::LoadError;
use crate::models::{Movie, MovieId};

/// Read-only movie metadata lookup table.
///
/// Built once at process start from the movies CSV and shared across all
/// requests. Never mutated afterwards, so concurrent reads need no locking.
#[derive(Debug)]
pub struct Catalog {
    movies: HashMap<MovieId, Movie>,
}

impl Catalog {
    /// Loads the catalog from a movies CSV file.
    ///
    /// The file must carry `movie_id` and `title` columns; any further
    /// columns (release date, genre flags) are ignored. A missing or
    /// malformed file is fatal, as is an empty one: a recommender with no
    /// movies to rank is a deployment mistake, not a servable state.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path_str = path.as_ref().display().to_string();

        let mut reader = csv::Reader::from_path(&path).map_err(|source| LoadError::Csv {
            path: path_str.clone(),
            source,
        })?;

        let mut movies = HashMap::new();
        for record in reader.deserialize() {
            let movie: Movie = record.map_err(|source| LoadError::Csv {
                path: path_str.clone(),
                source,
            })?;
            movies.insert(movie.id, movie);
        }

        if movies.is_empty() {
            return Err(LoadError::Invalid {
                path: path_str,
                reason: "catalog contains no movies".to_string(),
            });
        }

        tracing::info!(movies = movies.len(), "Catalog loaded");

        Ok(Self { movies })
    }

    /// Builds a catalog directly from movie entries.
    pub fn from_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        Self {
            movies: movies.into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    /// Looks up a movie by id.
    pub fn lookup(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// Iterates over every movie id in the catalog.
    pub fn movie_ids(&self) -> impl Iterator<Item = MovieId> + '_ {
        self.movies.keys().copied()
    }

    /// Number of distinct movies in the catalog.
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
