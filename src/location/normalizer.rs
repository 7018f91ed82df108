use super::table::{CanonicalCity, CITY_ALIASES, DEFAULT_CITY, REGION_CODES};
use log::{debug, warn};

const LOS_ANGELES_HINTS: [&str; 2] = ["la", "los"];

/// Maps a free-text location onto one of the canonical cities.
///
/// Lookup order is exact alias, then the first alias (in table order) appearing in the input as
/// a whole word or phrase, then a state/province code token. Anything else falls back to
/// [`DEFAULT_CITY`].
pub fn normalize(raw: &str) -> CanonicalCity {
    let location = raw.trim().to_lowercase();

    if let Some((_, city)) = CITY_ALIASES.iter().find(|(key, _)| *key == location) {
        return *city;
    }

    if let Some((key, city)) = CITY_ALIASES
        .iter()
        .find(|(key, _)| contains_phrase(&location, key))
    {
        debug!("Location '{}' matched alias '{}'", raw, key);
        return *city;
    }

    if let Some(city) = resolve_region_code(&location) {
        return city;
    }

    warn!(
        "Could not map location '{}' to a city, defaulting to {}",
        raw, DEFAULT_CITY
    );
    DEFAULT_CITY
}

/// `haystack` contains `phrase` with no letter or digit directly on either side.
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + phrase.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn resolve_region_code(location: &str) -> Option<CanonicalCity> {
    location
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|token| token.trim_matches('.'))
        .filter(|token| !token.is_empty())
        .find_map(|token| {
            REGION_CODES
                .iter()
                .find(|(code, _)| *code == token)
                .map(|&(_, city)| city.unwrap_or_else(|| disambiguate_california(location)))
        })
}

// Known to be loose: any "la" anywhere in the input counts as Los Angeles.
fn disambiguate_california(location: &str) -> CanonicalCity {
    if LOS_ANGELES_HINTS.iter().any(|hint| location.contains(hint)) {
        CanonicalCity::LosAngeles
    } else {
        CanonicalCity::SanFrancisco
    }
}
