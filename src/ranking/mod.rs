mod deepseek;
mod prompt;

pub use deepseek::DeepSeekRanker;
pub use prompt::build_prompt;

use crate::models::{Event, Person};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_RANKED: usize = 3;
pub const MAX_SCORE: f32 = 10.0;

#[derive(Error, Debug)]
pub enum RankingError {
    #[error("no API key configured for the ranking service")]
    MissingCredential,

    #[error("ranking request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ranking service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed ranking response: {0}")]
    Malformed(String),
}

/// An event picked by the ranking service for both people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEvent {
    pub rank: usize,
    pub match_score: f32,
    pub why_matches: String,
    pub person1_name: String,
    pub person1_interests: Vec<String>,
    pub person2_name: String,
    pub person2_interests: Vec<String>,
    #[serde(flatten)]
    pub event: Event,
}

/// Scores and orders a pre-filtered event list for two people.
#[async_trait]
pub trait Ranker: Send + Sync {
    /// At most [`MAX_RANKED`] events, best first.
    async fn rank(
        &self,
        events: &[Event],
        person1: &Person,
        person2: &Person,
    ) -> Result<Vec<RankedEvent>, RankingError>;
}
