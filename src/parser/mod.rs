pub mod base;
pub mod event;
pub mod fallback;
pub mod hackathon;

pub use base::{CardParser, ExtractionReport};
pub use event::LumaSource;
pub use fallback::FieldStrategy;
pub use hackathon::DevpostSource;
