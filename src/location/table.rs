use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalCity {
    #[serde(rename = "San Francisco")]
    SanFrancisco,
    #[serde(rename = "Los Angeles")]
    LosAngeles,
    #[serde(rename = "New York")]
    NewYork,
    #[serde(rename = "Toronto")]
    Toronto,
}

pub const DEFAULT_CITY: CanonicalCity = CanonicalCity::SanFrancisco;

impl CanonicalCity {
    pub const ALL: [CanonicalCity; 4] = [
        CanonicalCity::SanFrancisco,
        CanonicalCity::LosAngeles,
        CanonicalCity::NewYork,
        CanonicalCity::Toronto,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CanonicalCity::SanFrancisco => "San Francisco",
            CanonicalCity::LosAngeles => "Los Angeles",
            CanonicalCity::NewYork => "New York",
            CanonicalCity::Toronto => "Toronto",
        }
    }

    /// Luma city calendar.
    pub fn calendar_url(&self) -> &'static str {
        match self {
            CanonicalCity::SanFrancisco => "https://lu.ma/sf",
            CanonicalCity::LosAngeles => "https://lu.ma/la",
            CanonicalCity::NewYork => "https://lu.ma/nyc",
            CanonicalCity::Toronto => "https://lu.ma/toronto",
        }
    }

    /// `san_francisco`, used in output file names.
    pub fn slug(&self) -> String {
        self.name().to_lowercase().replace(' ', "_")
    }
}

impl fmt::Display for CanonicalCity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Order matters: substring lookups take the first key contained in the input. Exact matches are
// tried first, so a later alias containing an earlier key still maps to its own city.
pub const CITY_ALIASES: &[(&str, CanonicalCity)] = &[
    ("san francisco", CanonicalCity::SanFrancisco),
    ("sf", CanonicalCity::SanFrancisco),
    ("san fran", CanonicalCity::SanFrancisco),
    ("bay area", CanonicalCity::SanFrancisco),
    ("silicon valley", CanonicalCity::SanFrancisco),
    ("south san francisco", CanonicalCity::SanFrancisco),
    ("los angeles", CanonicalCity::LosAngeles),
    ("la", CanonicalCity::LosAngeles),
    ("l.a.", CanonicalCity::LosAngeles),
    ("la county", CanonicalCity::LosAngeles),
    ("los angeles county", CanonicalCity::LosAngeles),
    ("hollywood", CanonicalCity::LosAngeles),
    ("santa monica", CanonicalCity::LosAngeles),
    ("venice", CanonicalCity::LosAngeles),
    ("culver city", CanonicalCity::LosAngeles),
    ("new york", CanonicalCity::NewYork),
    ("new york city", CanonicalCity::NewYork),
    ("nyc", CanonicalCity::NewYork),
    ("ny", CanonicalCity::NewYork),
    ("manhattan", CanonicalCity::NewYork),
    ("brooklyn", CanonicalCity::NewYork),
    ("queens", CanonicalCity::NewYork),
    ("bronx", CanonicalCity::NewYork),
    ("staten island", CanonicalCity::NewYork),
    ("toronto", CanonicalCity::Toronto),
    ("gta", CanonicalCity::Toronto),
    ("north york", CanonicalCity::Toronto),
    ("scarborough", CanonicalCity::Toronto),
    ("downtown toronto", CanonicalCity::Toronto),
    ("york", CanonicalCity::Toronto),
    ("east york", CanonicalCity::Toronto),
];

/// State/province codes. `None` marks a code shared by several cities.
pub const REGION_CODES: &[(&str, Option<CanonicalCity>)] = &[
    ("ca", None),
    ("ny", Some(CanonicalCity::NewYork)),
    ("on", Some(CanonicalCity::Toronto)),
    ("ontario", Some(CanonicalCity::Toronto)),
];
