pub mod catalog;
pub mod movie;

pub use catalog::Catalog;
pub use movie::{Movie, MovieId, Recommendation, ScoredCandidate, UserId};
