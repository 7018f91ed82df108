use crate::location::CanonicalCity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Read access shared by every scraped record kind.
pub trait Listing {
    fn title(&self) -> &str;
    fn description(&self) -> &str;

    fn tags(&self) -> &[String] {
        &[]
    }

    fn status(&self) -> &str;
    fn is_beginner_friendly(&self) -> bool;

    /// Written once by the classifying pass.
    fn set_beginner_friendly(&mut self, value: bool);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hackathon {
    pub title: String,
    pub url: String,
    pub date: String,
    pub prize: String,
    pub description: String,
    pub tags: Vec<String>,
    pub is_beginner_friendly: bool,
    pub location: String,
    pub status: String,
}

impl Listing for Hackathon {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn is_beginner_friendly(&self) -> bool {
        self.is_beginner_friendly
    }

    fn set_beginner_friendly(&mut self, value: bool) {
        self.is_beginner_friendly = value;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub date: String,
    pub location: String,
    pub organizers: String,
    pub status: String,
    pub attendees: String,
    pub link: String,
    pub description: String,
    pub city: CanonicalCity,
    #[serde(default)]
    pub is_beginner_friendly: bool,
}

impl Listing for Event {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn is_beginner_friendly(&self) -> bool {
        self.is_beginner_friendly
    }

    fn set_beginner_friendly(&mut self, value: bool) {
        self.is_beginner_friendly = value;
    }
}

/// A record kept by the interest pre-filter, with the interests it mentions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matched<R> {
    #[serde(flatten)]
    pub record: R,
    pub matching_interests: BTreeSet<String>,
}
