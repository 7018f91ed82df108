const CLOSED_MARKERS: [&str; 3] = ["closed", "ended", "finished"];

pub const OPEN_FOR_SUBMISSIONS: &str = "Open for submissions";
pub const CLOSED: &str = "Closed";
pub const UNKNOWN: &str = "Unknown";

/// Applies the date-text overrides on top of the status scraped from the card.
pub fn classify_status(date: &str, raw_status: &str) -> String {
    let date = date.to_lowercase();
    if date.contains("submissions close") {
        OPEN_FOR_SUBMISSIONS.to_string()
    } else if CLOSED_MARKERS.iter().any(|marker| date.contains(marker)) {
        CLOSED.to_string()
    } else {
        raw_status.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    Open,
    Closed,
    Unknown,
}

impl ListingStatus {
    pub fn of(status: &str) -> Self {
        let status = status.trim().to_lowercase();
        if status.contains("closed") {
            ListingStatus::Closed
        } else if status.is_empty() || status == "unknown" {
            ListingStatus::Unknown
        } else {
            ListingStatus::Open
        }
    }
}
