use crate::models::Listing;
use crate::{ScoutError, ScoutResult};
use log::{debug, info, warn};
use scraper::{ElementRef, Html, Selector};

/// Outcome of running a parser over one rendered page.
#[derive(Debug, Clone)]
pub struct ExtractionReport<R> {
    pub records: Vec<R>,
    pub cards_found: usize,
    pub cards_skipped: usize,
    pub cards_failed: usize,
}

pub trait CardParser: Send + Sync {
    type Record: Listing;

    fn name(&self) -> &str;

    /// Root element of a single listing.
    fn card_selector(&self) -> &Selector;

    /// Reads one card. Missing optional fields degrade to empty values; only a card without a
    /// title is rejected, with [`ScoutError::CardSkipped`].
    fn extract(&self, card: ElementRef<'_>) -> ScoutResult<Self::Record>;

    /// Extracts every card on the page, isolating failures to the card they came from.
    fn parse_document(&self, page_source: &str) -> ExtractionReport<Self::Record> {
        let document = Html::parse_document(page_source);
        let mut report = ExtractionReport {
            records: Vec::new(),
            cards_found: 0,
            cards_skipped: 0,
            cards_failed: 0,
        };

        for card in document.select(self.card_selector()) {
            report.cards_found += 1;
            match self.extract(card) {
                Ok(record) => {
                    debug!("[{}] Extracted '{}'", self.name(), record.title());
                    report.records.push(record);
                }
                Err(ScoutError::CardSkipped(reason)) => {
                    debug!("[{}] Skipping card: {}", self.name(), reason);
                    report.cards_skipped += 1;
                }
                Err(e) => {
                    warn!("[{}] Error extracting card details: {}", self.name(), e);
                    report.cards_failed += 1;
                }
            }
        }

        info!(
            "[{}] Found {} cards, extracted {} records",
            self.name(),
            report.cards_found,
            report.records.len()
        );
        report
    }
}
