pub const BEGINNER_KEYWORDS: [&str; 16] = [
    "beginner",
    "newbie",
    "first time",
    "starter",
    "intro",
    "learn",
    "student",
    "education",
    "bootcamp",
    "workshop",
    "tutorial",
    "getting started",
    "new to",
    "novice",
    "entry level",
    "basics",
];

pub const STUDENT_INDICATORS: [&str; 5] = ["student", "university", "college", "school", "campus"];

/// Keyword heuristic over title, description and tags. Best effort, not a label.
pub fn is_beginner_friendly(title: &str, description: &str, tags: &[String]) -> bool {
    let text = format!("{} {}", title, description).to_lowercase();

    BEGINNER_KEYWORDS.iter().any(|keyword| text.contains(keyword))
        || tags.iter().any(|tag| {
            let tag = tag.to_lowercase();
            BEGINNER_KEYWORDS.iter().any(|keyword| tag.contains(keyword))
        })
        || STUDENT_INDICATORS
            .iter()
            .any(|indicator| text.contains(indicator))
}
