use crate::browser::{Browser, WebDriverBrowser};
use crate::classify::RecordFilter;
use crate::location::{normalize, CanonicalCity};
use crate::matcher::{all_interests, common_interests, match_events};
use crate::models::{Event, Hackathon, Person};
use crate::parser::{DevpostSource, LumaSource};
use crate::ranking::{DeepSeekRanker, RankedEvent, Ranker};
use crate::storage::DiskStorage;
use crate::{Scout, ScoutConfig, ScoutError, ScoutResult};
use anyhow::Context;
use log::{info, warn};
use std::path::{Path, PathBuf};

pub const USAGE: &str = "\
Usage: eventscout <command> [options]

Commands:
  hackathons [--filter all|beginner|open|beginner-open]
  events     --person1 FILE --person2 FILE
  match      --person1 FILE --person2 FILE [--events FILE]

Options:
  --out DIR            directory for JSON output (default: .)
  --webdriver URL      WebDriver endpoint (default: http://localhost:9515)
  --show-browser       run Chrome with a visible window
  -h, --help           print this message

The ranking step reads its API key from DEEPSEEK_API_KEY.";

const ALL_EVENTS_FILE: &str = "all_luma_events.json";
const MATCHES_FILE: &str = "ai_matches.json";
const SUMMARY_TAGS: usize = 5;
const SUMMARY_DESCRIPTION_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `None` writes every filtered file.
    Hackathons { filter: Option<RecordFilter> },
    Events { person1: PathBuf, person2: PathBuf },
    Match {
        person1: PathBuf,
        person2: PathBuf,
        events: Option<PathBuf>,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: Command,
    pub output_dir: Option<PathBuf>,
    pub webdriver_url: Option<String>,
    pub show_browser: bool,
}

impl Invocation {
    pub fn config(&self) -> ScoutConfig {
        let mut config = ScoutConfig::default().with_headless(!self.show_browser);
        if let Some(url) = &self.webdriver_url {
            config = config.with_webdriver_url(url.clone());
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir.clone());
        }
        config
    }
}

fn invalid(message: impl Into<String>) -> ScoutError {
    ScoutError::InvalidArgs(message.into())
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> ScoutResult<String> {
    args.next()
        .ok_or_else(|| invalid(format!("Missing value for {}", flag)))
}

/// Parses everything after the program name.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> ScoutResult<Invocation> {
    let mut args = args.into_iter();
    let name = args.next().ok_or_else(|| invalid("Missing command"))?;

    let mut filter = None;
    let mut person1 = None;
    let mut person2 = None;
    let mut events = None;
    let mut invocation = Invocation {
        command: Command::Help,
        output_dir: None,
        webdriver_url: None,
        show_browser: false,
    };

    if matches!(name.as_str(), "-h" | "--help" | "help") {
        return Ok(invocation);
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--filter" => {
                let v = value(&mut args, "--filter")?;
                filter = Some(
                    RecordFilter::parse(&v)
                        .ok_or_else(|| invalid(format!("Unknown filter: {}", v)))?,
                );
            }
            "--person1" => person1 = Some(PathBuf::from(value(&mut args, "--person1")?)),
            "--person2" => person2 = Some(PathBuf::from(value(&mut args, "--person2")?)),
            "--events" => events = Some(PathBuf::from(value(&mut args, "--events")?)),
            "--out" | "-o" => invocation.output_dir = Some(PathBuf::from(value(&mut args, "--out")?)),
            "--webdriver" => invocation.webdriver_url = Some(value(&mut args, "--webdriver")?),
            "--show-browser" => invocation.show_browser = true,
            "-h" | "--help" => return Ok(invocation),
            _ => return Err(invalid(format!("Unknown arg: {}", arg))),
        }
    }

    let require = |path: Option<PathBuf>, flag: &str| {
        path.ok_or_else(|| invalid(format!("{} requires {}", name, flag)))
    };

    invocation.command = match name.as_str() {
        "hackathons" => Command::Hackathons { filter },
        "events" => Command::Events {
            person1: require(person1, "--person1")?,
            person2: require(person2, "--person2")?,
        },
        "match" => Command::Match {
            person1: require(person1, "--person1")?,
            person2: require(person2, "--person2")?,
            events,
        },
        other => return Err(invalid(format!("Unknown command: {}", other))),
    };
    Ok(invocation)
}

/// Canonical cities of both people, without repeats.
pub fn cities_for(person1: &Person, person2: &Person) -> Vec<CanonicalCity> {
    let first = normalize(&person1.location);
    let second = normalize(&person2.location);
    info!(
        "{} is in {}, {} is in {}",
        person1.name, first, person2.name, second
    );
    if first == second {
        vec![first]
    } else {
        vec![first, second]
    }
}

pub fn events_file(city: CanonicalCity) -> String {
    format!("luma_events_{}.json", city.slug())
}

pub fn hackathons_file(filter: RecordFilter) -> String {
    format!("devpost_hackathons_{}.json", filter.suffix())
}

/// Scrapes each city's calendar in turn, saving one file per city and a combined file.
pub async fn scrape_events<B: Browser>(
    scout: &mut Scout<B>,
    cities: &[CanonicalCity],
    storage: &DiskStorage,
) -> Vec<Event> {
    let mut all_events = Vec::new();
    for &city in cities {
        let report = scout.run(&LumaSource::new(city)).await;
        if let Some(diagnostic) = &report.diagnostic {
            warn!("No events for {}: {}", city, diagnostic);
        }
        storage.save_or_log(&events_file(city), &report.records);
        all_events.extend(report.records);
    }
    storage.save_or_log(ALL_EVENTS_FILE, &all_events);
    info!("Collected {} events across {} cities", all_events.len(), cities.len());
    all_events
}

/// Writes the requested slices of the hackathon list.
pub fn save_hackathons(
    storage: &DiskStorage,
    hackathons: &[Hackathon],
    filter: Option<RecordFilter>,
) -> Vec<PathBuf> {
    let filters = match filter {
        Some(filter) => vec![filter],
        None => RecordFilter::ALL.to_vec(),
    };
    filters
        .into_iter()
        .filter_map(|filter| storage.save_or_log(&hackathons_file(filter), &filter.apply(hackathons)))
        .collect()
}

pub fn hackathon_summary(hackathon: &Hackathon) -> String {
    let tags: Vec<&str> = hackathon
        .tags
        .iter()
        .take(SUMMARY_TAGS)
        .map(String::as_str)
        .collect();
    let mut description: String = hackathon
        .description
        .chars()
        .take(SUMMARY_DESCRIPTION_CHARS)
        .collect();
    if hackathon.description.chars().count() > SUMMARY_DESCRIPTION_CHARS {
        description.push_str("...");
    }
    format!(
        "{}\n  Date: {}\n  Location: {}\n  Status: {}\n  Prize: {}\n  Beginner friendly: {}\n  Tags: {}\n  URL: {}\n  {}",
        hackathon.title,
        hackathon.date,
        hackathon.location,
        hackathon.status,
        hackathon.prize,
        if hackathon.is_beginner_friendly { "yes" } else { "no" },
        tags.join(", "),
        hackathon.url,
        description
    )
}

fn print_matches(ranked: &[RankedEvent]) {
    if ranked.is_empty() {
        println!("\nNo ranked matches available.");
        return;
    }
    println!("\nTop matches:");
    for entry in ranked {
        println!(
            "{}. {} ({:.1}/10)\n   {} | {} | {}\n   {}\n   {}: {}\n   {}: {}",
            entry.rank,
            entry.event.title,
            entry.match_score,
            entry.event.date,
            entry.event.location,
            entry.event.link,
            entry.why_matches,
            entry.person1_name,
            entry.person1_interests.join(", "),
            entry.person2_name,
            entry.person2_interests.join(", "),
        );
    }
}

async fn open_scout(config: &ScoutConfig) -> anyhow::Result<Scout<WebDriverBrowser>> {
    let browser = WebDriverBrowser::connect(config)
        .await
        .context("could not start a browser session")?;
    Ok(Scout::new(browser, config.clone()))
}

async fn finish(scout: Scout<WebDriverBrowser>) {
    if let Err(e) = scout.close().await {
        warn!("Error closing browser session: {}", e);
    }
    scout.stats().print_summary();
}

fn load_people(person1: &Path, person2: &Path) -> anyhow::Result<(Person, Person)> {
    let first = Person::from_path(person1)
        .with_context(|| format!("could not load profile {}", person1.display()))?;
    let second = Person::from_path(person2)
        .with_context(|| format!("could not load profile {}", person2.display()))?;
    Ok((first, second))
}

async fn run_hackathons(config: &ScoutConfig, filter: Option<RecordFilter>) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let mut scout = open_scout(config).await?;
    let report = scout.run(&DevpostSource::new()).await;
    finish(scout).await;

    let hackathons = report.records;
    save_hackathons(&storage, &hackathons, filter);

    let shown = filter.unwrap_or(RecordFilter::All).apply(&hackathons);
    println!("\nFound {} hackathons:", shown.len());
    for hackathon in &shown {
        println!("\n{}", hackathon_summary(hackathon));
    }
    Ok(())
}

async fn run_events(
    config: &ScoutConfig,
    person1: &Person,
    person2: &Person,
    storage: &DiskStorage,
) -> anyhow::Result<Vec<Event>> {
    let cities = cities_for(person1, person2);
    let mut scout = open_scout(config).await?;
    let events = scrape_events(&mut scout, &cities, storage).await;
    finish(scout).await;
    Ok(events)
}

/// Output directory for every file a command writes.
pub fn open_storage(config: &ScoutConfig) -> ScoutResult<DiskStorage> {
    Ok(DiskStorage::new(&config.output_dir)?)
}

pub async fn try_rank<K: Ranker>(
    ranker: &K,
    candidates: &[Event],
    person1: &Person,
    person2: &Person,
) -> ScoutResult<Vec<RankedEvent>> {
    Ok(ranker.rank(candidates, person1, person2).await?)
}

/// Pre-filters by interest, ranks, and saves. A ranking failure leaves an empty result.
pub async fn rank_events<K: Ranker>(
    ranker: &K,
    events: Vec<Event>,
    person1: &Person,
    person2: &Person,
    storage: &DiskStorage,
) -> Vec<RankedEvent> {
    let shared = common_interests(person1, person2);
    info!("Shared interests: {:?}", shared);

    let candidates: Vec<Event> = match_events(events, &all_interests(person1, person2))
        .into_iter()
        .map(|matched| matched.record)
        .collect();

    let ranked = match try_rank(ranker, &candidates, person1, person2).await {
        Ok(ranked) => ranked,
        Err(e) => {
            warn!("No ranking available: {}", e);
            Vec::new()
        }
    };
    storage.save_or_log(MATCHES_FILE, &ranked);
    ranked
}

pub async fn run(invocation: Invocation) -> anyhow::Result<()> {
    let config = invocation.config();
    match invocation.command {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::Hackathons { filter } => run_hackathons(&config, filter).await,
        Command::Events { person1, person2 } => {
            let (first, second) = load_people(&person1, &person2)?;
            let storage = open_storage(&config)?;
            let events = run_events(&config, &first, &second, &storage).await?;
            println!("\nFound {} events", events.len());
            Ok(())
        }
        Command::Match {
            person1,
            person2,
            events,
        } => {
            let (first, second) = load_people(&person1, &person2)?;
            let storage = open_storage(&config)?;
            let events = match events {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("could not read {}", path.display()))?;
                    serde_json::from_str::<Vec<Event>>(&raw)
                        .with_context(|| format!("{} is not an event list", path.display()))?
                }
                None => run_events(&config, &first, &second, &storage).await?,
            };
            let ranked = rank_events(
                &DeepSeekRanker::from_env(),
                events,
                &first,
                &second,
                &storage,
            )
            .await;
            print_matches(&ranked);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{MockBrowser, MockPage};
    use crate::ranking::RankingError;
    use async_trait::async_trait;
    use uuid::Uuid;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn scratch() -> DiskStorage {
        DiskStorage::new(std::env::temp_dir().join(format!("eventscout-cli-{}", Uuid::now_v7())))
            .unwrap()
    }

    #[test]
    fn test_parse_hackathons() {
        let invocation = parse_args(args("hackathons --filter beginner-open --out data")).unwrap();
        assert_eq!(
            invocation.command,
            Command::Hackathons {
                filter: Some(RecordFilter::BeginnerOpen)
            }
        );
        assert_eq!(invocation.config().output_dir, PathBuf::from("data"));
        assert!(invocation.config().headless);

        let invocation = parse_args(args("hackathons")).unwrap();
        assert_eq!(invocation.command, Command::Hackathons { filter: None });
    }

    #[test]
    fn test_parse_match() {
        let invocation =
            parse_args(args("match --person1 a.json --person2 b.json --show-browser")).unwrap();
        assert_eq!(
            invocation.command,
            Command::Match {
                person1: PathBuf::from("a.json"),
                person2: PathBuf::from("b.json"),
                events: None,
            }
        );
        assert!(!invocation.config().headless);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_args(args("")), Err(ScoutError::InvalidArgs(_))));
        assert!(parse_args(args("events --person1 a.json")).is_err());
        assert!(parse_args(args("hackathons --filter weekly")).is_err());
        assert!(parse_args(args("hackathons --out")).is_err());
        assert!(parse_args(args("scrape")).is_err());
        assert_eq!(parse_args(args("--help")).unwrap().command, Command::Help);
    }

    #[test]
    fn test_cities_deduplicated() {
        let p1 = Person::new("Anna", &[], "Brooklyn, NY");
        let p2 = Person::new("Jordan", &[], "nyc");
        assert_eq!(cities_for(&p1, &p2), vec![CanonicalCity::NewYork]);

        let p3 = Person::new("Sam", &[], "Toronto, ON");
        assert_eq!(
            cities_for(&p1, &p3),
            vec![CanonicalCity::NewYork, CanonicalCity::Toronto]
        );
    }

    #[test]
    fn test_hackathon_summary_truncates() {
        let hackathon = Hackathon {
            title: "Long Hack".to_string(),
            url: "https://devpost.com/long".to_string(),
            date: "Jun 1".to_string(),
            prize: "$1,000".to_string(),
            description: "x".repeat(150),
            tags: (1..=7).map(|i| format!("t{}", i)).collect(),
            is_beginner_friendly: true,
            location: "Online".to_string(),
            status: "Unknown".to_string(),
        };

        let summary = hackathon_summary(&hackathon);
        assert!(summary.contains("Tags: t1, t2, t3, t4, t5\n"));
        assert!(summary.ends_with(&format!("{}...", "x".repeat(100))));
    }

    #[test]
    fn test_save_hackathons_writes_every_slice() {
        let storage = scratch();
        let written = save_hackathons(&storage, &[], None);
        assert_eq!(written.len(), 4);
        assert!(storage
            .path_for("devpost_hackathons_beginner_open.json")
            .exists());

        let written = save_hackathons(&storage, &[], Some(RecordFilter::Open));
        assert_eq!(written, vec![storage.path_for("devpost_hackathons_open.json")]);
    }

    #[tokio::test]
    async fn test_scrape_events_writes_city_files() {
        let page = r#"<div><a class="event-link" href="/jam"></a>
            <div class="event-content"><h3>Synth Jam</h3></div></div>"#;
        let browser = MockBrowser::new().with_page("https://lu.ma/nyc", MockPage::new(page));
        let mut scout = Scout::new(browser, ScoutConfig::instant());
        let storage = scratch();

        let events = scrape_events(
            &mut scout,
            &[CanonicalCity::NewYork, CanonicalCity::Toronto],
            &storage,
        )
        .await;

        assert_eq!(events.len(), 1);
        let nyc: Vec<Event> = storage.read_records("luma_events_new_york.json").unwrap();
        assert_eq!(nyc[0].title, "Synth Jam");
        let toronto: Vec<Event> = storage.read_records("luma_events_toronto.json").unwrap();
        assert!(toronto.is_empty());
        let all: Vec<Event> = storage.read_records(ALL_EVENTS_FILE).unwrap();
        assert_eq!(all, events);
    }

    struct FailingRanker;

    #[async_trait]
    impl Ranker for FailingRanker {
        async fn rank(
            &self,
            _events: &[Event],
            _person1: &Person,
            _person2: &Person,
        ) -> Result<Vec<RankedEvent>, RankingError> {
            Err(RankingError::MissingCredential)
        }
    }

    #[tokio::test]
    async fn test_ranking_failure_surfaces_as_scout_error() {
        let p1 = Person::new("Anna", &["AI"], "SF");
        let p2 = Person::new("Jordan", &["Music"], "SF");

        let result = try_rank(&FailingRanker, &[], &p1, &p2).await;
        assert!(matches!(
            result,
            Err(ScoutError::Ranking(RankingError::MissingCredential))
        ));
    }

    #[test]
    fn test_unusable_output_dir_is_storage_error() {
        let file = std::env::temp_dir().join(format!("eventscout-file-{}", Uuid::now_v7()));
        std::fs::write(&file, "not a directory").unwrap();
        let config = ScoutConfig::default().with_output_dir(file.clone());

        let result = open_storage(&config);
        assert!(matches!(result, Err(ScoutError::StorageError(_))));
        std::fs::remove_file(file).unwrap();
    }

    #[tokio::test]
    async fn test_ranking_failure_degrades() {
        let storage = scratch();
        let p1 = Person::new("Anna", &["AI"], "SF");
        let p2 = Person::new("Jordan", &["Music"], "SF");

        let ranked = rank_events(&FailingRanker, Vec::new(), &p1, &p2, &storage).await;

        assert!(ranked.is_empty());
        let saved: Vec<RankedEvent> = storage.read_records(MATCHES_FILE).unwrap();
        assert!(saved.is_empty());
    }
}
