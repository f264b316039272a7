use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::ops::Range;
use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;
use crate::models::{Catalog, MovieId, ScoredCandidate, UserId};
use crate::services::scorers::{ScoreKind, Scorer};

/// A trained matrix-factorization rating model.
///
/// Holds the factors exported by the offline training pipeline: global mean
/// rating, per-user and per-item biases, and the latent factor matrices.
/// Users are addressed by their training index; items by catalog movie id
/// through `item_index`. All state is read-only after loading, so a shared
/// reference can serve concurrent requests.
#[derive(Debug)]
pub struct SvdModel {
    global_mean: f64,
    rating_min: f64,
    rating_max: f64,
    user_biases: Vec<f64>,
    item_biases: Vec<f64>,
    user_factors: Vec<Vec<f64>>,
    item_factors: Vec<Vec<f64>>,
    item_index: HashMap<MovieId, usize>,
}

/// On-disk layout of the exported model artifact.
#[derive(Debug, Deserialize)]
struct SvdModelFile {
    global_mean: f64,
    #[serde(default = "default_rating_min")]
    rating_min: f64,
    #[serde(default = "default_rating_max")]
    rating_max: f64,
    user_biases: Vec<f64>,
    item_biases: Vec<f64>,
    user_factors: Vec<Vec<f64>>,
    item_factors: Vec<Vec<f64>>,
    /// Movie ids parallel to `item_biases` / `item_factors`
    item_ids: Vec<MovieId>,
}

fn default_rating_min() -> f64 {
    1.0
}

fn default_rating_max() -> f64 {
    5.0
}

impl SvdModel {
    /// Loads a model from the JSON artifact written by the training pipeline.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path_str = path.as_ref().display().to_string();

        let file = File::open(&path).map_err(|source| LoadError::Io {
            path: path_str.clone(),
            source,
        })?;

        let raw: SvdModelFile =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Json {
                path: path_str.clone(),
                source,
            })?;

        let model = Self::from_parts(raw, &path_str)?;

        tracing::info!(
            users = model.n_users(),
            items = model.item_index.len(),
            "Model loaded"
        );

        Ok(model)
    }

    /// Assembles a model from its raw factors, validating structural
    /// consistency between the parallel arrays.
    pub fn new(
        global_mean: f64,
        rating_scale: (f64, f64),
        user_biases: Vec<f64>,
        item_biases: Vec<f64>,
        user_factors: Vec<Vec<f64>>,
        item_factors: Vec<Vec<f64>>,
        item_ids: Vec<MovieId>,
    ) -> Result<Self, LoadError> {
        let raw = SvdModelFile {
            global_mean,
            rating_min: rating_scale.0,
            rating_max: rating_scale.1,
            user_biases,
            item_biases,
            user_factors,
            item_factors,
            item_ids,
        };
        Self::from_parts(raw, "<in-memory>")
    }

    fn from_parts(raw: SvdModelFile, path: &str) -> Result<Self, LoadError> {
        let invalid = |reason: String| LoadError::Invalid {
            path: path.to_string(),
            reason,
        };

        if raw.user_factors.len() != raw.user_biases.len() {
            return Err(invalid(format!(
                "{} user factor rows but {} user biases",
                raw.user_factors.len(),
                raw.user_biases.len()
            )));
        }
        if raw.item_factors.len() != raw.item_biases.len()
            || raw.item_ids.len() != raw.item_biases.len()
        {
            return Err(invalid(format!(
                "item arrays disagree: {} factor rows, {} biases, {} ids",
                raw.item_factors.len(),
                raw.item_biases.len(),
                raw.item_ids.len()
            )));
        }
        if raw.rating_min >= raw.rating_max {
            return Err(invalid(format!(
                "rating scale [{}, {}] is empty",
                raw.rating_min, raw.rating_max
            )));
        }

        let n_factors = raw
            .user_factors
            .first()
            .or(raw.item_factors.first())
            .map(Vec::len)
            .unwrap_or(0);
        let uneven = raw
            .user_factors
            .iter()
            .chain(raw.item_factors.iter())
            .any(|row| row.len() != n_factors);
        if uneven {
            return Err(invalid("factor rows have uneven widths".to_string()));
        }

        let item_index = raw
            .item_ids
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index))
            .collect::<HashMap<_, _>>();
        if item_index.len() != raw.item_ids.len() {
            return Err(invalid("duplicate movie ids in item_ids".to_string()));
        }

        Ok(Self {
            global_mean: raw.global_mean,
            rating_min: raw.rating_min,
            rating_max: raw.rating_max,
            user_biases: raw.user_biases,
            item_biases: raw.item_biases,
            user_factors: raw.user_factors,
            item_factors: raw.item_factors,
            item_index,
        })
    }

    /// Number of users the model was trained on. Valid user indices are
    /// `0..n_users()`.
    pub fn n_users(&self) -> usize {
        self.user_biases.len()
    }

    /// Estimates the rating `user` would give `movie_id`, clamped to the
    /// trained rating scale.
    ///
    /// Movies the model never saw get the user's baseline estimate (global
    /// mean plus user bias) with no item terms. `user` must be inside
    /// `0..n_users()`; the ranking engine enforces this before scoring.
    pub fn predict(&self, user: usize, movie_id: MovieId) -> f64 {
        let mut estimate = self.global_mean + self.user_biases[user];

        if let Some(&item) = self.item_index.get(&movie_id) {
            estimate += self.item_biases[item];
            estimate += dot(&self.user_factors[user], &self.item_factors[item]);
        }

        estimate.clamp(self.rating_min, self.rating_max)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Scores movies with per-user rating estimates from a trained [`SvdModel`].
pub struct PredictiveScorer {
    model: SvdModel,
}

impl PredictiveScorer {
    pub fn new(model: SvdModel) -> Self {
        Self { model }
    }
}

impl Scorer for PredictiveScorer {
    fn kind(&self) -> ScoreKind {
        ScoreKind::PredictedRating
    }

    fn valid_users(&self) -> Option<Range<UserId>> {
        Some(0..self.model.n_users() as UserId)
    }

    fn candidates(&self, user_id: UserId, catalog: &Catalog) -> Vec<ScoredCandidate> {
        let user = user_id as usize;
        catalog
            .movie_ids()
            .map(|movie_id| ScoredCandidate {
                movie_id,
                score: self.model.predict(user, movie_id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn two_user_model() -> SvdModel {
        // user 0 leans toward item 10, user 1 toward item 20
        SvdModel::new(
            3.0,
            (1.0, 5.0),
            vec![0.1, -0.1],
            vec![0.5, 0.2],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            vec![vec![1.0, -1.0], vec![-1.0, 1.0]],
            vec![10, 20],
        )
        .unwrap()
    }

    #[test]
    fn test_predict_combines_biases_and_factors() {
        let model = two_user_model();
        // 3.0 + 0.1 + 0.5 + (1.0 * 1.0 + 0.0 * -1.0) = 4.6
        assert!((model.predict(0, 10) - 4.6).abs() < 1e-12);
        // 3.0 - 0.1 + 0.2 + (0.0 * -1.0 + 1.0 * 1.0) = 4.1
        assert!((model.predict(1, 20) - 4.1).abs() < 1e-12);
    }

    #[test]
    fn test_predict_clamps_to_rating_scale() {
        let model = SvdModel::new(
            3.0,
            (1.0, 5.0),
            vec![2.0, -10.0],
            vec![3.0],
            vec![vec![1.0], vec![1.0]],
            vec![vec![4.0]],
            vec![10],
        )
        .unwrap();

        // 3 + 2 + 3 + 4 = 12 and 3 - 10 + 3 + 4 = 0, both outside the scale
        assert_eq!(model.predict(0, 10), 5.0);
        assert_eq!(model.predict(1, 10), 1.0);
    }

    #[test]
    fn test_unknown_movie_gets_baseline_estimate() {
        let model = two_user_model();
        // No item terms: 3.0 + 0.1
        assert!((model.predict(0, 999) - 3.1).abs() < 1e-12);
    }

    #[test]
    fn test_mismatched_arrays_rejected() {
        let result = SvdModel::new(
            3.0,
            (1.0, 5.0),
            vec![0.0],
            vec![0.0, 0.0],
            vec![vec![1.0]],
            vec![vec![1.0]],
            vec![10],
        );
        assert!(matches!(result, Err(LoadError::Invalid { .. })));
    }

    #[test]
    fn test_duplicate_item_ids_rejected() {
        let result = SvdModel::new(
            3.0,
            (1.0, 5.0),
            vec![0.0],
            vec![0.0, 0.0],
            vec![vec![1.0]],
            vec![vec![1.0], vec![1.0]],
            vec![10, 10],
        );
        assert!(matches!(result, Err(LoadError::Invalid { .. })));
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "global_mean": 3.5,
                "user_biases": [0.2],
                "item_biases": [0.1, -0.1],
                "user_factors": [[1.0, 0.5]],
                "item_factors": [[0.5, 0.5], [-0.5, 0.5]],
                "item_ids": [1, 2]
            }}"#
        )
        .unwrap();

        let model = SvdModel::from_path(file.path()).unwrap();
        assert_eq!(model.n_users(), 1);
        // Defaulted rating scale still clamps
        assert!(model.predict(0, 1) <= 5.0);
        // 3.5 + 0.2 + 0.1 + (0.5 + 0.25) = 4.55
        assert!((model.predict(0, 1) - 4.55).abs() < 1e-12);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let result = SvdModel::from_path(file.path());
        assert!(matches!(result, Err(LoadError::Json { .. })));
    }

    #[test]
    fn test_scorer_covers_every_catalog_movie() {
        let catalog = Catalog::from_movies(vec![
            Movie::new(10, "A"),
            Movie::new(20, "B"),
            Movie::new(30, "C"),
        ]);
        let scorer = PredictiveScorer::new(two_user_model());

        let candidates = scorer.candidates(0, &catalog);
        assert_eq!(candidates.len(), 3);

        let mut ids: Vec<_> = candidates.iter().map(|c| c.movie_id).collect();
        ids.sort();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_scorer_valid_user_range() {
        let scorer = PredictiveScorer::new(two_user_model());
        assert_eq!(scorer.valid_users(), Some(0..2));
        assert_eq!(scorer.kind(), ScoreKind::PredictedRating);
    }
}
