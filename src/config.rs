use serde::Deserialize;

/// Which ranking strategy the deployment serves.
///
/// Fixed at startup; the response score field follows the chosen strategy
/// for the lifetime of the process.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Per-user rating estimates from the trained model
    Predictive,
    /// Global popularity statistics, no personalization
    Popularity,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Ranking strategy to serve
    #[serde(default = "default_strategy")]
    pub strategy: Strategy,

    /// Movies CSV with `movie_id` and `title` columns
    #[serde(default = "default_movies_csv")]
    pub movies_csv: String,

    /// Trained model artifact (predictive strategy only)
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Precomputed popularity CSV (popularity strategy only)
    #[serde(default = "default_popularity_csv")]
    pub popularity_csv: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_strategy() -> Strategy {
    Strategy::Predictive
}

fn default_movies_csv() -> String {
    "model/movies.csv".to_string()
}

fn default_model_path() -> String {
    "model/svd_model.json".to_string()
}

fn default_popularity_csv() -> String {
    "model/movie_popularity.csv".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
