mod normalizer;
mod table;

pub use normalizer::normalize;
pub use table::{CanonicalCity, CITY_ALIASES, DEFAULT_CITY, REGION_CODES};
