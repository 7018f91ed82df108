use crate::models::{Listing, Matched, Person};
use log::{debug, info};
use std::collections::BTreeSet;

fn lowercase_interests(person: &Person) -> BTreeSet<String> {
    person
        .interests
        .iter()
        .map(|interest| interest.trim().to_lowercase())
        .filter(|interest| !interest.is_empty())
        .collect()
}

/// Interests both people share, compared case-insensitively.
pub fn common_interests(p1: &Person, p2: &Person) -> BTreeSet<String> {
    let second = lowercase_interests(p2);
    lowercase_interests(p1)
        .into_iter()
        .filter(|interest| second.contains(interest))
        .collect()
}

/// Union of both people's lowercased interests.
pub fn all_interests(p1: &Person, p2: &Person) -> BTreeSet<String> {
    let mut combined = lowercase_interests(p1);
    combined.extend(lowercase_interests(p2));
    combined
}

/// Cheap pre-filter ahead of ranking: keeps records whose title or description mentions at
/// least one of the interests, tagged with the ones it mentions. No scoring happens here.
pub fn match_events<R: Listing>(records: Vec<R>, interests: &BTreeSet<String>) -> Vec<Matched<R>> {
    let total = records.len();
    let matched: Vec<Matched<R>> = records
        .into_iter()
        .filter_map(|record| {
            let text = format!("{} {}", record.title(), record.description()).to_lowercase();
            let matching_interests: BTreeSet<String> = interests
                .iter()
                .filter(|interest| text.contains(interest.as_str()))
                .cloned()
                .collect();

            if matching_interests.is_empty() {
                return None;
            }
            debug!(
                "'{}' matches interests {:?}",
                record.title(),
                matching_interests
            );
            Some(Matched {
                record,
                matching_interests,
            })
        })
        .collect();

    info!("{} of {} records mention a shared interest", matched.len(), total);
    matched
}
