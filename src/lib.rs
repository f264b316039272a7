//! Personalized top-N movie recommendations over HTTP, with a trained
//! collaborative-filtering strategy and a global-popularity fallback.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
