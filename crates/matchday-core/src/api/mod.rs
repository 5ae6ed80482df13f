// Prediction server API: wire shapes, error taxonomy, and the HTTP client.

pub mod client;
pub mod error;
pub mod wire;

pub use client::{HttpLeagueApi, LeagueApi};
pub use error::FetchError;
