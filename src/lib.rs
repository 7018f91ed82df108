pub mod browser;
pub mod classify;
pub mod cli;
pub mod core;
pub mod location;
pub mod matcher;
pub mod models;
pub mod parser;
pub mod ranking;
pub mod stats;
pub mod storage;

pub use browser::{Browser, WebDriverBrowser};
pub use core::{ListingSource, PipelineState, RunReport, Scout, ScoutConfig};
pub use core::{ScoutError, ScoutResult};
pub use location::{normalize, CanonicalCity};
pub use models::{Event, Hackathon, Listing, Person};
pub use parser::{CardParser, DevpostSource, LumaSource};
pub use ranking::{DeepSeekRanker, Ranker};
pub use stats::StatsTracker;
pub use storage::DiskStorage;
