use super::status::ListingStatus;
use crate::models::Listing;
use log::info;

/// Which slice of the scraped records to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFilter {
    All,
    BeginnerFriendly,
    Open,
    BeginnerOpen,
}

impl RecordFilter {
    pub const ALL: [RecordFilter; 4] = [
        RecordFilter::All,
        RecordFilter::BeginnerFriendly,
        RecordFilter::Open,
        RecordFilter::BeginnerOpen,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "all" => Some(RecordFilter::All),
            "beginner" | "beginner-friendly" => Some(RecordFilter::BeginnerFriendly),
            "open" => Some(RecordFilter::Open),
            "beginner-open" | "beginner-friendly-open" => Some(RecordFilter::BeginnerOpen),
            _ => None,
        }
    }

    /// Suffix of the output file, e.g. `devpost_hackathons_beginner_open.json`.
    pub fn suffix(&self) -> &'static str {
        match self {
            RecordFilter::All => "all",
            RecordFilter::BeginnerFriendly => "beginner",
            RecordFilter::Open => "open",
            RecordFilter::BeginnerOpen => "beginner_open",
        }
    }

    pub fn apply<R: Listing + Clone>(&self, records: &[R]) -> Vec<R> {
        match self {
            RecordFilter::All => records.to_vec(),
            RecordFilter::BeginnerFriendly => filter_beginner_friendly(records),
            RecordFilter::Open => filter_open(records),
            RecordFilter::BeginnerOpen => filter_beginner_open(records),
        }
    }
}

pub fn filter_beginner_friendly<R: Listing + Clone>(records: &[R]) -> Vec<R> {
    let kept: Vec<R> = records
        .iter()
        .filter(|r| r.is_beginner_friendly())
        .cloned()
        .collect();
    info!(
        "Found {} beginner-friendly records out of {} total",
        kept.len(),
        records.len()
    );
    kept
}

/// Anything not explicitly closed counts as open, including unknown status.
pub fn filter_open<R: Listing + Clone>(records: &[R]) -> Vec<R> {
    let kept: Vec<R> = records
        .iter()
        .filter(|r| ListingStatus::of(r.status()) != ListingStatus::Closed)
        .cloned()
        .collect();
    info!("Found {} open records", kept.len());
    kept
}

pub fn filter_beginner_open<R: Listing + Clone>(records: &[R]) -> Vec<R> {
    filter_open(&filter_beginner_friendly(records))
}
