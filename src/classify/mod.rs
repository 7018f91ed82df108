mod beginner;
mod filters;
mod status;

pub use beginner::{is_beginner_friendly, BEGINNER_KEYWORDS, STUDENT_INDICATORS};
pub use filters::{filter_beginner_friendly, filter_beginner_open, filter_open, RecordFilter};
pub use status::{classify_status, ListingStatus, CLOSED, OPEN_FOR_SUBMISSIONS, UNKNOWN};

use crate::models::Listing;

/// Fills in the derived classifier fields of freshly extracted records.
pub fn annotate<R: Listing>(records: &mut [R]) {
    for record in records.iter_mut() {
        let friendly = is_beginner_friendly(record.title(), record.description(), record.tags());
        record.set_beginner_friendly(friendly);
    }
}
