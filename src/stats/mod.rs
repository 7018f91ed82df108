use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct ScrapingStats {
    pub run_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub locations_scraped: usize,
    pub failed_locations: usize,
    pub cards_found: usize,
    pub records_extracted: usize,
    pub cards_skipped: usize,
    pub cards_failed: usize,
    pub scroll_attempts: usize,
    pub selector_timeouts: usize,
    pub records_per_source: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: Arc<RwLock<ScrapingStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(ScrapingStats {
                run_id: Uuid::now_v7(),
                start_time: Utc::now(),
                end_time: None,
                locations_scraped: 0,
                failed_locations: 0,
                cards_found: 0,
                records_extracted: 0,
                cards_skipped: 0,
                cards_failed: 0,
                scroll_attempts: 0,
                selector_timeouts: 0,
                records_per_source: HashMap::new(),
            })),
        }
    }

    pub fn record_extraction(
        &self,
        source: &str,
        found: usize,
        extracted: usize,
        skipped: usize,
        failed: usize,
    ) {
        let mut stats = self.stats.write();
        stats.locations_scraped += 1;
        stats.cards_found += found;
        stats.records_extracted += extracted;
        stats.cards_skipped += skipped;
        stats.cards_failed += failed;
        *stats
            .records_per_source
            .entry(source.to_string())
            .or_insert(0) += extracted;
    }

    pub fn record_failure(&self) {
        self.stats.write().failed_locations += 1;
    }

    pub fn record_scroll(&self) {
        self.stats.write().scroll_attempts += 1;
    }

    pub fn record_timeout(&self) {
        self.stats.write().selector_timeouts += 1;
    }

    pub fn finish(&self) {
        self.stats.write().end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> ScrapingStats {
        self.stats.read().clone()
    }

    pub fn print_summary(&self) {
        let stats = self.stats.read();
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        println!("\nScraping Statistics ({}):", stats.run_id);
        println!("===================");
        println!("Duration: {} seconds", duration.num_seconds());
        println!("Locations Scraped: {}", stats.locations_scraped);
        println!("Failed Locations: {}", stats.failed_locations);
        println!("Cards Found: {}", stats.cards_found);
        println!("Records Extracted: {}", stats.records_extracted);
        println!("Cards Skipped: {}", stats.cards_skipped);
        println!("Cards Failed: {}", stats.cards_failed);
        println!("Scroll Attempts: {}", stats.scroll_attempts);
        println!("Selector Timeouts: {}", stats.selector_timeouts);

        if !stats.records_per_source.is_empty() {
            println!("\nRecords per Source:");
            for (source, count) in &stats.records_per_source {
                println!("  {}: {}", source, count);
            }
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
