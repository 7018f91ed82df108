use crate::models::{Event, Person};

fn describe_event(index: usize, event: &Event) -> String {
    format!(
        "Event {}:\nTitle: {}\nDescription: {}\nLocation: {}\nCity: {}\nDate: {}\nLink: {}\nOrganizers: {}\nStatus: {}\nAttendees: {}",
        index + 1,
        event.title,
        event.description,
        event.location,
        event.city,
        event.date,
        event.link,
        event.organizers,
        event.status,
        event.attendees,
    )
}

/// Asks for the three events best suited to both people, answered as a JSON object.
pub fn build_prompt(events: &[Event], person1: &Person, person2: &Person) -> String {
    let events_text = events
        .iter()
        .enumerate()
        .map(|(i, event)| describe_event(i, event))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"Given a list of events and two people's interests, find the top 3 events that would be best for both people to attend together.

Events:
{events_text}

Person 1 ({name1})'s Interests: {interests1}
Person 2 ({name2})'s Interests: {interests2}

For each selected event, explain in at most 20 words why it suits both people, cite which interests match for each person, and give a match score from 0 to 10.

Respond with a single JSON object and nothing else, in exactly this shape:
{{"matches": [{{"title": "<event title>", "link": "<event link>", "match_score": <0-10>, "why_matches": "<explanation>", "person1_interests": ["<interest>"], "person2_interests": ["<interest>"]}}]}}

Order the matches by match score from highest to lowest. Only include events that would genuinely interest both people, and include at least 2 when possible."#,
        events_text = events_text,
        name1 = person1.name,
        interests1 = person1.interests.join(", "),
        name2 = person2.name,
        interests2 = person2.interests.join(", "),
    )
}
