use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{MovieId, Recommendation, UserId};
use crate::services::{Ranker, ScoreKind};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: UserId,
    #[serde(default = "default_n_recommendations")]
    pub n_recommendations: usize,
}

fn default_n_recommendations() -> usize {
    5
}

/// A single recommendation as returned to the client. The score field name
/// follows the deployed strategy; a deployment never mixes the two.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MovieRecommendation {
    Predicted {
        movie_id: MovieId,
        title: String,
        predicted_rating: f64,
    },
    Popular {
        movie_id: MovieId,
        title: String,
        popularity_score: f64,
    },
}

impl MovieRecommendation {
    fn new(recommendation: Recommendation, kind: ScoreKind) -> Self {
        let Recommendation {
            movie_id,
            title,
            score,
        } = recommendation;

        match kind {
            ScoreKind::PredictedRating => Self::Predicted {
                movie_id,
                title,
                predicted_rating: round2(score),
            },
            ScoreKind::PopularityScore => Self::Popular {
                movie_id,
                title,
                popularity_score: round2(score),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub status: String,
    pub recommendations: Vec<MovieRecommendation>,
}

/// Display rounding only; ranking always works on full-precision scores.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Serves top-N recommendations for a user
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    if request.n_recommendations < 1 {
        return Err(AppError::InvalidInput(
            "n_recommendations must be at least 1".to_string(),
        ));
    }

    let start = Instant::now();

    let ranker = Ranker::new(&state.catalog, state.scorer.as_ref());
    let ranked = ranker.rank(request.user_id, request.n_recommendations)?;

    tracing::info!(
        user_id = request.user_id,
        requested = request.n_recommendations,
        returned = ranked.len(),
        processing_time_ms = start.elapsed().as_millis() as u64,
        "Recommendations served"
    );

    let kind = state.scorer.kind();
    let recommendations = ranked
        .into_iter()
        .map(|rec| MovieRecommendation::new(rec, kind))
        .collect();

    Ok(Json(RecommendationResponse {
        status: "success".to_string(),
        recommendations,
    }))
}
