use super::base::CardParser;
use super::fallback::{absolutize, first_match, first_text, resolve, selector, FieldStrategy};
use crate::core::ListingSource;
use crate::location::CanonicalCity;
use crate::models::Event;
use crate::{ScoutError, ScoutResult};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

pub const LUMA_ORIGIN: &str = "https://lu.ma";

static CARD: Lazy<Selector> = Lazy::new(|| selector(r#"div[class*="event-content"]"#));
static H3: Lazy<Selector> = Lazy::new(|| selector("h3"));
static EVENT_LINK: Lazy<Selector> =
    Lazy::new(|| selector(r#"a[class*="event-link"], a[class*="content-link"]"#));
static EVENT_TIME: Lazy<Selector> = Lazy::new(|| selector("div.event-time span"));
static ATTRIBUTE: Lazy<Selector> = Lazy::new(|| selector("div.attribute"));
static ICON: Lazy<Selector> = Lazy::new(|| selector("svg"));
static ELLIPSES: Lazy<Selector> = Lazy::new(|| selector("div.text-ellipses"));
static ORGANIZERS: Lazy<Selector> = Lazy::new(|| selector("div.text-ellipses.nowrap"));
static PILL: Lazy<Selector> = Lazy::new(|| selector("div.pill-label"));
static REMAINING: Lazy<Selector> = Lazy::new(|| selector("div.remaining-count"));

static TITLE_CHAIN: &[FieldStrategy] = &[FieldStrategy {
    name: "h3",
    run: |card| first_text(card, &H3),
}];

// The link wraps the card, so it is looked up from the card's parent.
static LINK_CHAIN: &[FieldStrategy] = &[FieldStrategy {
    name: "parent event link",
    run: |card| {
        let parent = card.parent().and_then(ElementRef::wrap)?;
        let href = parent
            .select(&EVENT_LINK)
            .next()?
            .value()
            .attr("href")?
            .trim()
            .to_string();
        Some(absolutize(LUMA_ORIGIN, &href))
    },
}];

static DATE_CHAIN: &[FieldStrategy] = &[FieldStrategy {
    name: "event time",
    run: |card| first_text(card, &EVENT_TIME),
}];

// The venue row is the attribute carrying a map-pin icon.
static LOCATION_CHAIN: &[FieldStrategy] = &[FieldStrategy {
    name: "icon attribute",
    run: |card| {
        card.select(&ATTRIBUTE)
            .filter(|attribute| attribute.select(&ICON).next().is_some())
            .find_map(|attribute| first_text(attribute, &ELLIPSES))
            .filter(|text| !text.is_empty())
    },
}];

static ORGANIZERS_CHAIN: &[FieldStrategy] = &[FieldStrategy {
    name: "organizer line",
    run: |card| first_text(card, &ORGANIZERS),
}];

static STATUS_CHAIN: &[FieldStrategy] = &[FieldStrategy {
    name: "pill label",
    run: |card| first_text(card, &PILL),
}];

static ATTENDEES_CHAIN: &[FieldStrategy] = &[FieldStrategy {
    name: "remaining count",
    run: |card| first_text(card, &REMAINING),
}];

/// A Luma city calendar.
#[derive(Debug, Clone)]
pub struct LumaSource {
    city: CanonicalCity,
}

impl LumaSource {
    pub fn new(city: CanonicalCity) -> Self {
        Self { city }
    }
}

impl CardParser for LumaSource {
    type Record = Event;

    fn name(&self) -> &str {
        self.city.name()
    }

    fn card_selector(&self) -> &Selector {
        &CARD
    }

    fn extract(&self, card: ElementRef<'_>) -> ScoutResult<Event> {
        let title = first_match(card, "title", TITLE_CHAIN)
            .ok_or_else(|| ScoutError::CardSkipped("event card has no title".to_string()))?;

        let organizers = resolve(card, "organizers", ORGANIZERS_CHAIN);
        let status = resolve(card, "status", STATUS_CHAIN);
        let attendees = resolve(card, "attendees", ATTENDEES_CHAIN);
        let description = format!(
            "Organized by {}. {} {} attendees.",
            organizers, status, attendees
        );

        Ok(Event {
            title,
            date: resolve(card, "date", DATE_CHAIN),
            location: first_match(card, "location", LOCATION_CHAIN)
                .unwrap_or_else(|| self.city.name().to_string()),
            link: resolve(card, "link", LINK_CHAIN),
            organizers,
            status,
            attendees,
            description,
            city: self.city,
            is_beginner_friendly: false,
        })
    }
}

impl ListingSource for LumaSource {
    fn start_url(&self) -> String {
        self.city.calendar_url().to_string()
    }

    fn ready_selector(&self) -> &str {
        r#"div[class*="event-content"]"#
    }

    fn expand_link_text(&self) -> Option<&str> {
        Some("View All")
    }
}
