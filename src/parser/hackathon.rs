use super::base::CardParser;
use super::fallback::{
    absolutize, all_texts, element_text, find_text_node, first_attr, first_match, first_text,
    resolve, selector, FieldStrategy,
};
use crate::classify::{classify_status, UNKNOWN};
use crate::core::ListingSource;
use crate::models::Hackathon;
use crate::{ScoutError, ScoutResult};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

pub const DEVPOST_ORIGIN: &str = "https://devpost.com";
const DEVPOST_LISTING: &str = "https://devpost.com/hackathons";
const DEFAULT_LOCATION: &str = "Online";

static CARD: Lazy<Selector> = Lazy::new(|| selector("div.challenge-listing"));
static H6: Lazy<Selector> = Lazy::new(|| selector("h6"));
static H5: Lazy<Selector> = Lazy::new(|| selector("h5"));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| selector("a.challenge-link-colorless"));
static META: Lazy<Selector> = Lazy::new(|| selector("div.challenge-meta"));
static TIME: Lazy<Selector> = Lazy::new(|| selector("time"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector("div.challenge-description"));
static TAG: Lazy<Selector> = Lazy::new(|| selector("span.challenge-tag"));
static TAG_DIV: Lazy<Selector> = Lazy::new(|| selector("div.tag"));
static STATUS: Lazy<Selector> = Lazy::new(|| selector("div.challenge-status"));
static BADGE: Lazy<Selector> = Lazy::new(|| selector("span.badge"));

static CURRENCY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[$€£]").unwrap());
static LOCATION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(online|virtual|remote|in-person|offline)").unwrap());

static TITLE_CHAIN: &[FieldStrategy] = &[
    FieldStrategy { name: "h6", run: |card| first_text(card, &H6) },
    FieldStrategy { name: "h5", run: |card| first_text(card, &H5) },
    FieldStrategy { name: "title link", run: |card| first_text(card, &TITLE_LINK) },
];

static URL_CHAIN: &[FieldStrategy] = &[FieldStrategy {
    name: "title link href",
    run: |card| first_attr(card, &TITLE_LINK, "href").map(|href| absolutize(DEVPOST_ORIGIN, &href)),
}];

static DATE_CHAIN: &[FieldStrategy] = &[
    FieldStrategy { name: "challenge meta", run: |card| first_text(card, &META) },
    FieldStrategy { name: "time", run: |card| first_text(card, &TIME) },
];

// The whole enclosing element keeps context such as "$5,000 in prizes".
static PRIZE_CHAIN: &[FieldStrategy] = &[FieldStrategy {
    name: "currency text",
    run: |card| {
        let (text, parent) = find_text_node(card, |text| CURRENCY.is_match(text))?;
        Some(parent.map(element_text).unwrap_or_else(|| text.trim().to_string()))
    },
}];

static DESCRIPTION_CHAIN: &[FieldStrategy] = &[
    FieldStrategy { name: "paragraph", run: |card| first_text(card, &PARAGRAPH) },
    FieldStrategy { name: "description block", run: |card| first_text(card, &DESCRIPTION) },
];

static LOCATION_CHAIN: &[FieldStrategy] = &[FieldStrategy {
    name: "location marker",
    run: |card| {
        find_text_node(card, |text| LOCATION_MARKER.is_match(text))
            .map(|(text, _)| text.trim().to_string())
    },
}];

static STATUS_CHAIN: &[FieldStrategy] = &[
    FieldStrategy { name: "challenge status", run: |card| first_text(card, &STATUS) },
    FieldStrategy { name: "badge", run: |card| first_text(card, &BADGE) },
];

fn extract_tags(card: ElementRef<'_>) -> Vec<String> {
    if card.select(&TAG).next().is_some() {
        all_texts(card, &TAG)
    } else {
        all_texts(card, &TAG_DIV)
    }
}

/// Devpost's hackathon directory.
#[derive(Debug, Clone, Default)]
pub struct DevpostSource;

impl DevpostSource {
    pub fn new() -> Self {
        Self
    }
}

impl CardParser for DevpostSource {
    type Record = Hackathon;

    fn name(&self) -> &str {
        "devpost"
    }

    fn card_selector(&self) -> &Selector {
        &CARD
    }

    fn extract(&self, card: ElementRef<'_>) -> ScoutResult<Hackathon> {
        let title = first_match(card, "title", TITLE_CHAIN)
            .ok_or_else(|| ScoutError::CardSkipped("hackathon card has no title".to_string()))?;

        let date = resolve(card, "date", DATE_CHAIN);
        let raw_status = first_match(card, "status", STATUS_CHAIN)
            .unwrap_or_else(|| UNKNOWN.to_string());
        let status = classify_status(&date, &raw_status);

        Ok(Hackathon {
            title,
            url: resolve(card, "url", URL_CHAIN),
            prize: resolve(card, "prize", PRIZE_CHAIN),
            description: resolve(card, "description", DESCRIPTION_CHAIN),
            tags: extract_tags(card),
            is_beginner_friendly: false,
            location: first_match(card, "location", LOCATION_CHAIN)
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            status,
            date,
        })
    }
}

impl ListingSource for DevpostSource {
    fn start_url(&self) -> String {
        DEVPOST_LISTING.to_string()
    }

    fn ready_selector(&self) -> &str {
        ".challenge-listing"
    }

    fn expands_on_scroll(&self) -> bool {
        true
    }
}
