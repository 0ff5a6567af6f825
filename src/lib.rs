//! Dota 2 match details from the Steam Web API, normalized into a stable
//! result shape and kept in a time-bounded SQLite cache.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod transform;

pub use config::Config;
pub use error::{FetchError, MatchInfoError};
pub use models::{FieldGroup, FieldSelector, MatchResult};
pub use service::MatchInfoService;
