use super::{build_prompt, RankedEvent, Ranker, RankingError, MAX_RANKED, MAX_SCORE};
use crate::models::{Event, Person};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const API_KEY_VAR: &str = "DEEPSEEK_API_KEY";
const DEFAULT_ENDPOINT: &str = "https://api.deepseek.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "deepseek-chat";

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct RankingPayload {
    matches: Vec<RankingEntry>,
}

#[derive(Debug, Deserialize)]
struct RankingEntry {
    title: String,
    #[serde(default)]
    link: String,
    match_score: f32,
    #[serde(default)]
    why_matches: String,
    #[serde(default)]
    person1_interests: Vec<String>,
    #[serde(default)]
    person2_interests: Vec<String>,
}

/// Ranks events through DeepSeek's OpenAI-compatible chat completions API.
#[derive(Clone)]
pub struct DeepSeekRanker {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl DeepSeekRanker {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Reads the key from `DEEPSEEK_API_KEY`; a missing key only surfaces when ranking.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_VAR).ok();
        if api_key.is_none() {
            warn!("{} not set, ranking will be unavailable", API_KEY_VAR);
        }
        Self::new(api_key)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn complete(&self, api_key: &str, prompt: String) -> Result<String, RankingError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: 0.7,
            max_tokens: 2000,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RankingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| RankingError::Malformed(format!("not a chat completion: {}", e)))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| RankingError::Malformed("no choices in response".to_string()))
    }
}

/// Drops a surrounding Markdown code fence, which models add despite instructions.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn find_event<'a>(events: &'a [Event], entry: &RankingEntry) -> Option<&'a Event> {
    let by_link = (!entry.link.is_empty())
        .then(|| events.iter().find(|event| event.link == entry.link))
        .flatten();
    by_link.or_else(|| {
        events
            .iter()
            .find(|event| event.title.eq_ignore_ascii_case(entry.title.trim()))
    })
}

/// Validates the model's answer against the events that were submitted.
fn parse_ranking(
    content: &str,
    events: &[Event],
    person1: &Person,
    person2: &Person,
) -> Result<Vec<RankedEvent>, RankingError> {
    let payload: RankingPayload = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| RankingError::Malformed(format!("unexpected ranking shape: {}", e)))?;

    let mut ranked: Vec<RankedEvent> = payload
        .matches
        .into_iter()
        .filter_map(|entry| {
            if !(0.0..=MAX_SCORE).contains(&entry.match_score) {
                warn!(
                    "Dropping '{}': score {} outside 0-{}",
                    entry.title, entry.match_score, MAX_SCORE
                );
                return None;
            }
            let Some(event) = find_event(events, &entry) else {
                warn!("Dropping '{}': not among the submitted events", entry.title);
                return None;
            };
            Some(RankedEvent {
                rank: 0,
                match_score: entry.match_score,
                why_matches: entry.why_matches,
                person1_name: person1.name.clone(),
                person1_interests: entry.person1_interests,
                person2_name: person2.name.clone(),
                person2_interests: entry.person2_interests,
                event: event.clone(),
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    ranked.truncate(MAX_RANKED);
    for (i, event) in ranked.iter_mut().enumerate() {
        event.rank = i + 1;
    }
    Ok(ranked)
}

#[async_trait]
impl Ranker for DeepSeekRanker {
    async fn rank(
        &self,
        events: &[Event],
        person1: &Person,
        person2: &Person,
    ) -> Result<Vec<RankedEvent>, RankingError> {
        if events.is_empty() {
            info!("No events to rank");
            return Ok(Vec::new());
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RankingError::MissingCredential)?;

        let prompt = build_prompt(events, person1, person2);
        debug!("Ranking prompt is {} characters", prompt.len());

        let content = self.complete(api_key, prompt).await?;
        let ranked = parse_ranking(&content, events, person1, person2)?;
        info!("Ranking service picked {} events", ranked.len());
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::CanonicalCity;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn event(title: &str, link: &str) -> Event {
        Event {
            title: title.to_string(),
            date: "Sat".to_string(),
            location: "SoMa".to_string(),
            organizers: "By Hosts".to_string(),
            status: String::new(),
            attendees: String::new(),
            link: link.to_string(),
            description: format!("{} for AI and music fans", title),
            city: CanonicalCity::SanFrancisco,
            is_beginner_friendly: false,
        }
    }

    fn people() -> (Person, Person) {
        (
            Person::new("Anna", &["AI", "Music"], "SF"),
            Person::new("Jordan", &["music", "Gaming"], "Bay Area"),
        )
    }

    fn completion(content: serde_json::Value) -> serde_json::Value {
        json!({
            "choices": [{"message": {"role": "assistant", "content": content.to_string()}}]
        })
    }

    async fn setup(response: ResponseTemplate) -> (DeepSeekRanker, MockServer) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(response)
            .mount(&server)
            .await;
        let ranker = DeepSeekRanker::new(Some("test-key".to_string()))
            .with_endpoint(format!("{}/v1/chat/completions", server.uri()));
        (ranker, server)
    }

    #[tokio::test]
    async fn test_rank_orders_and_truncates() {
        let events = vec![
            event("Demo Night", "https://lu.ma/demo"),
            event("Synth Jam", "https://lu.ma/jam"),
            event("GPU Social", "https://lu.ma/gpu"),
            event("Late Hack", "https://lu.ma/late"),
        ];
        let content = json!({"matches": [
            {"title": "Synth Jam", "link": "https://lu.ma/jam", "match_score": 6, "why_matches": "music",
             "person1_interests": ["music"], "person2_interests": ["music"]},
            {"title": "demo night", "link": "", "match_score": 9, "why_matches": "ai demos"},
            {"title": "GPU Social", "link": "https://lu.ma/gpu", "match_score": 7},
            {"title": "Late Hack", "link": "https://lu.ma/late", "match_score": 5}
        ]});
        let (ranker, _server) =
            setup(ResponseTemplate::new(200).set_body_json(completion(content))).await;
        let (p1, p2) = people();

        let ranked = ranker.rank(&events, &p1, &p2).await.unwrap();

        let titles: Vec<_> = ranked.iter().map(|r| r.event.title.as_str()).collect();
        assert_eq!(titles, ["Demo Night", "GPU Social", "Synth Jam"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[2].rank, 3);
        assert_eq!(ranked[2].person1_interests, vec!["music"]);
        assert_eq!(ranked[0].person2_name, "Jordan");
    }

    #[tokio::test]
    async fn test_rank_drops_invalid_entries() {
        let events = vec![event("Demo Night", "https://lu.ma/demo")];
        let content = json!({"matches": [
            {"title": "Demo Night", "link": "https://lu.ma/demo", "match_score": 14},
            {"title": "Invented Gala", "link": "https://lu.ma/nope", "match_score": 8}
        ]});
        let (ranker, _server) =
            setup(ResponseTemplate::new(200).set_body_json(completion(content))).await;
        let (p1, p2) = people();

        let ranked = ranker.rank(&events, &p1, &p2).await.unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_rank_accepts_fenced_json() {
        let events = vec![event("Demo Night", "https://lu.ma/demo")];
        let fenced = "```json\n{\"matches\": [{\"title\": \"Demo Night\", \"match_score\": 8}]}\n```";
        let body = json!({"choices": [{"message": {"role": "assistant", "content": fenced}}]});
        let (ranker, _server) = setup(ResponseTemplate::new(200).set_body_json(body)).await;
        let (p1, p2) = people();

        let ranked = ranker.rank(&events, &p1, &p2).await.unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].match_score, 8.0);
    }

    #[tokio::test]
    async fn test_rank_server_error() {
        let events = vec![event("Demo Night", "https://lu.ma/demo")];
        let (ranker, _server) =
            setup(ResponseTemplate::new(500).set_body_string("upstream down")).await;
        let (p1, p2) = people();

        let result = ranker.rank(&events, &p1, &p2).await;
        match result {
            Err(RankingError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rank_non_json_body() {
        let events = vec![event("Demo Night", "https://lu.ma/demo")];
        let (ranker, _server) =
            setup(ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;
        let (p1, p2) = people();

        let result = ranker.rank(&events, &p1, &p2).await;
        assert!(matches!(result, Err(RankingError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_rank_content_not_matching_schema() {
        let events = vec![event("Demo Night", "https://lu.ma/demo")];
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "1. Demo Night - 9/10"}}]});
        let (ranker, _server) = setup(ResponseTemplate::new(200).set_body_json(body)).await;
        let (p1, p2) = people();

        let result = ranker.rank(&events, &p1, &p2).await;
        assert!(matches!(result, Err(RankingError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_rank_without_key() {
        let events = vec![event("Demo Night", "https://lu.ma/demo")];
        let ranker = DeepSeekRanker::new(None);
        let (p1, p2) = people();

        let result = ranker.rank(&events, &p1, &p2).await;
        assert!(matches!(result, Err(RankingError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_rank_nothing_to_rank() {
        let ranker = DeepSeekRanker::new(None);
        let (p1, p2) = people();

        let ranked = ranker.rank(&[], &p1, &p2).await.unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n[]```"), "[]");
        assert_eq!(strip_code_fence("  {} "), "{}");
    }
}
