use log::{debug, trace};
use scraper::{ElementRef, Selector};

/// One named way of reading a field out of a card.
pub struct FieldStrategy {
    pub name: &'static str,
    pub run: fn(ElementRef<'_>) -> Option<String>,
}

/// Tries each strategy in order and keeps the first non-empty value.
pub fn first_match(card: ElementRef<'_>, field: &str, chain: &[FieldStrategy]) -> Option<String> {
    let found = chain.iter().find_map(|strategy| {
        (strategy.run)(card)
            .filter(|value| !value.is_empty())
            .inspect(|_| trace!("Field '{}' resolved via {}", field, strategy.name))
    });
    if found.is_none() {
        debug!("No strategy resolved field '{}'", field);
    }
    found
}

/// [`first_match`], degrading to an empty string.
pub fn resolve(card: ElementRef<'_>, field: &str, chain: &[FieldStrategy]) -> String {
    first_match(card, field, chain).unwrap_or_default()
}

pub fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector '{}': {:?}", css, e))
}

/// Visible text of an element: trimmed text nodes joined by single spaces.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first element under `card` matching `selector`.
pub fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(element_text)
}

pub fn first_attr(card: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    card.select(selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
}

/// Every non-empty text under `card` matching `selector`, in document order.
pub fn all_texts(card: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    card.select(selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// First text node under `card` for which `accept` holds, with the element enclosing it.
pub fn find_text_node<'a>(
    card: ElementRef<'a>,
    accept: impl Fn(&str) -> bool,
) -> Option<(&'a str, Option<ElementRef<'a>>)> {
    card.descendants().find_map(|node| {
        let text = node.value().as_text()?;
        if !accept(text) {
            return None;
        }
        let parent = node.parent().and_then(ElementRef::wrap);
        Some((&**text, parent))
    })
}

/// Prefixes site-relative links with `origin`; anything else passes through.
pub fn absolutize(origin: &str, href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), href)
    } else {
        href.to_string()
    }
}
