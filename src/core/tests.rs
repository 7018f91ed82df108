use crate::browser::{MockBrowser, MockPage};
use crate::location::CanonicalCity;
use crate::models::Hackathon;
use crate::parser::fallback::{element_text, selector};
use crate::parser::{CardParser, DevpostSource, LumaSource};
use crate::{ListingSource, PipelineState, Scout, ScoutConfig, ScoutError, ScoutResult};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

const DEVPOST_URL: &str = "https://devpost.com/hackathons";

const DEVPOST_PAGE: &str = r#"<html><body>
  <div class="challenge-listing">
    <a class="challenge-link-colorless" href="/hackathons/campus-hack"><h6>Campus Hack</h6></a>
    <div class="challenge-meta">Submissions close May 3</div>
    <p>Open to every university team.</p>
    <span class="challenge-tag">Education</span>
  </div>
  <div class="challenge-listing">
    <a class="challenge-link-colorless" href="https://other.devpost.com/"><h6>Pro League</h6></a>
    <div class="challenge-meta">Ended Mar 1</div>
    <p>Seasoned builders only.</p>
    <span class="challenge-tag">Fintech</span>
  </div>
  <div class="challenge-listing"><div class="challenge-meta">No title here</div></div>
</body></html>"#;

const LUMA_PAGE: &str = r#"<html><body>
  <div><a class="event-link" href="/gpu-social"></a>
    <div class="event-content"><h3>GPU Social</h3><div class="event-time"><span>7 PM</span></div></div>
  </div>
</body></html>"#;

fn scout(browser: MockBrowser) -> Scout<MockBrowser> {
    Scout::new(browser, ScoutConfig::instant())
}

#[tokio::test]
async fn test_hackathon_run_classifies_records() {
    let browser = MockBrowser::new().with_page(DEVPOST_URL, MockPage::new(DEVPOST_PAGE));
    let mut scout = scout(browser);

    let report = scout.run(&DevpostSource::new()).await;

    assert!(report.is_done());
    assert_eq!(report.diagnostic, None);
    assert_eq!(report.records.len(), 2);

    let campus = &report.records[0];
    assert_eq!(campus.url, "https://devpost.com/hackathons/campus-hack");
    assert_eq!(campus.status, "Open for submissions");
    assert!(campus.is_beginner_friendly);

    let pro = &report.records[1];
    assert_eq!(pro.status, "Closed");
    assert!(!pro.is_beginner_friendly);

    let stats = scout.stats().get_stats();
    assert_eq!(stats.cards_found, 3);
    assert_eq!(stats.cards_skipped, 1);
    assert_eq!(stats.records_extracted, 2);
}

#[tokio::test]
async fn test_scroll_stops_when_extent_settles() {
    let page = MockPage::new(DEVPOST_PAGE).with_extents(vec![1000, 2000, 2600, 2600]);
    let browser = MockBrowser::new().with_page(DEVPOST_URL, page);
    let mut scout = scout(browser);

    let report = scout.run(&DevpostSource::new()).await;

    assert!(report.is_done());
    assert_eq!(scout.browser().scrolls(), 3);
    assert_eq!(scout.stats().get_stats().scroll_attempts, 3);
}

#[tokio::test]
async fn test_scroll_respects_budget() {
    let page = MockPage::new(DEVPOST_PAGE).with_extents((1..=20).map(|i| i * 500).collect());
    let browser = MockBrowser::new().with_page(DEVPOST_URL, page);
    let mut scout = Scout::new(browser, ScoutConfig::instant().with_max_scrolls(4));

    scout.run(&DevpostSource::new()).await;

    assert_eq!(scout.browser().scrolls(), 4);
}

#[tokio::test]
async fn test_unreachable_page_fails() {
    let mut scout = scout(MockBrowser::new());

    let report = scout.run(&DevpostSource::new()).await;

    assert_eq!(report.state, PipelineState::Failed);
    assert_eq!(scout.state(), PipelineState::Failed);
    assert!(report.records.is_empty());
    assert!(report
        .diagnostic
        .as_deref()
        .is_some_and(|d| d.contains(DEVPOST_URL)));
    assert_eq!(scout.stats().get_stats().failed_locations, 1);
}

#[tokio::test]
async fn test_unreadable_document_fails() {
    let page = MockPage::new(DEVPOST_PAGE).with_broken_source();
    let browser = MockBrowser::new().with_page(DEVPOST_URL, page);
    let mut scout = scout(browser);

    let report = scout.run(&DevpostSource::new()).await;

    assert_eq!(report.state, PipelineState::Failed);
    assert!(report.records.is_empty());
    assert!(report.diagnostic.is_some());
}

#[tokio::test]
async fn test_timeout_still_extracts() {
    let page = MockPage::new(DEVPOST_PAGE).never_ready();
    let browser = MockBrowser::new().with_page(DEVPOST_URL, page);
    let mut scout = scout(browser);

    let report = scout.run(&DevpostSource::new()).await;

    assert!(report.is_done());
    assert_eq!(report.records.len(), 2);
    assert_eq!(scout.stats().get_stats().selector_timeouts, 1);
}

#[tokio::test]
async fn test_event_run_clicks_view_all() {
    let browser = MockBrowser::new().with_page("https://lu.ma/toronto", MockPage::new(LUMA_PAGE));
    let mut scout = scout(browser);

    let report = scout.run(&LumaSource::new(CanonicalCity::Toronto)).await;

    assert!(report.is_done());
    assert_eq!(scout.browser().clicks(), vec!["View All".to_string()]);
    assert_eq!(scout.browser().scrolls(), 0);
    assert_eq!(report.records[0].link, "https://lu.ma/gpu-social");
    assert_eq!(report.records[0].location, "Toronto");
    assert_eq!(report.records[0].city, CanonicalCity::Toronto);
}

#[tokio::test]
async fn test_sequential_locations_share_one_session() {
    let browser = MockBrowser::new()
        .with_page("https://lu.ma/sf", MockPage::new(LUMA_PAGE))
        .with_page("https://lu.ma/toronto", MockPage::new(LUMA_PAGE));
    let mut scout = scout(browser);

    let sf = scout.run(&LumaSource::new(CanonicalCity::SanFrancisco)).await;
    let la = scout.run(&LumaSource::new(CanonicalCity::LosAngeles)).await;
    let toronto = scout.run(&LumaSource::new(CanonicalCity::Toronto)).await;

    assert!(sf.is_done());
    assert_eq!(la.state, PipelineState::Failed);
    assert!(toronto.is_done());
    assert_eq!(
        scout.browser().navigations(),
        vec!["https://lu.ma/sf", "https://lu.ma/la", "https://lu.ma/toronto"]
    );

    scout.close().await.unwrap();
    assert!(scout.browser().is_closed());
    let stats = scout.stats().get_stats();
    assert_eq!(stats.locations_scraped, 2);
    assert_eq!(stats.failed_locations, 1);
    assert!(stats.end_time.is_some());
}

static BROKEN_CARD: Lazy<Selector> = Lazy::new(|| selector("div.card"));
static NAME: Lazy<Selector> = Lazy::new(|| selector("b"));

/// Fails hard on cards marked `broken` to check that failures stay per card.
struct FlakySource;

impl CardParser for FlakySource {
    type Record = Hackathon;

    fn name(&self) -> &str {
        "flaky"
    }

    fn card_selector(&self) -> &Selector {
        &BROKEN_CARD
    }

    fn extract(&self, card: ElementRef<'_>) -> ScoutResult<Hackathon> {
        if card.value().classes().any(|class| class == "broken") {
            return Err(ScoutError::Extraction("malformed markup".to_string()));
        }
        let title = card
            .select(&NAME)
            .next()
            .map(element_text)
            .ok_or_else(|| ScoutError::CardSkipped("no name".to_string()))?;
        Ok(Hackathon {
            title,
            url: String::new(),
            date: String::new(),
            prize: String::new(),
            description: "a workshop".to_string(),
            tags: Vec::new(),
            is_beginner_friendly: false,
            location: "Online".to_string(),
            status: "Unknown".to_string(),
        })
    }
}

impl ListingSource for FlakySource {
    fn start_url(&self) -> String {
        "https://flaky.test/".to_string()
    }

    fn ready_selector(&self) -> &str {
        "div.card"
    }
}

#[tokio::test]
async fn test_failing_card_does_not_affect_others() {
    let html = r#"<div class="card"><b>First</b></div>
                  <div class="card broken"><b>Second</b></div>
                  <div class="card"><i>no name</i></div>
                  <div class="card"><b>Fourth</b></div>"#;
    let browser = MockBrowser::new().with_page("https://flaky.test/", MockPage::new(html));
    let mut scout = scout(browser);

    let report = scout.run(&FlakySource).await;

    let titles: Vec<_> = report.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["First", "Fourth"]);
    assert!(report.records.iter().all(|r| r.is_beginner_friendly));

    let stats = scout.stats().get_stats();
    assert_eq!(stats.cards_found, 4);
    assert_eq!(stats.cards_failed, 1);
    assert_eq!(stats.cards_skipped, 1);
}
