use crate::parser::CardParser;

/// A site listing page: where it lives, how to tell it rendered, how to reveal more cards.
pub trait ListingSource: CardParser {
    fn start_url(&self) -> String;

    /// CSS selector that is present once the listing has rendered.
    fn ready_selector(&self) -> &str;

    fn expands_on_scroll(&self) -> bool {
        false
    }

    /// Text of a link to click after the page is ready, e.g. "View All".
    fn expand_link_text(&self) -> Option<&str> {
        None
    }
}
