//! Optional refinement of the rule-based parse via the OpenAI
//! chat-completions API.
//!
//! Best-effort by contract: when no API key is configured, or on any
//! network, HTTP, or parse failure, the deterministic seed comes back
//! unchanged. The merge itself is a pure function so it can be tested
//! without a network.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::dates;
use crate::models::{Intent, ParsedQuery, SubmissionStatus, WindowKind};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const PARSER_INSTRUCTIONS: &str = "\
You are a parser. Convert the user question into a compact JSON with keys:
intent: one of [homework, quizzes, performance]
filters: may include grade (e.g., \"Grade 8\"), classes (list), region (capitalized), homework_submitted (\"yes\"/\"no\")
date_range: one of last_week, this_week, next_week, or null
Only output JSON. Example:
{\"intent\":\"quizzes\",\"filters\":{\"grade\":\"Grade 8\"},\"date_range\":\"last_week\"}
Question: ";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

/// The compact structure the model is asked to return. Every field is
/// optional; anything the model omits falls back to the seed.
#[derive(Debug, Default, Deserialize)]
pub struct RefinedReply {
    pub intent: Option<String>,
    pub filters: Option<ReplyFilters>,
    pub date_range: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReplyFilters {
    pub grade: Option<String>,
    pub classes: Option<Vec<String>>,
    pub region: Option<String>,
    pub homework_submitted: Option<String>,
}

/// Refine a rule-based parse with the external model. Never fails: on any
/// problem the seed is returned as-is.
pub async fn refine(text: &str, seed: ParsedQuery, settings: &Settings) -> ParsedQuery {
    if !settings.llm_enabled() {
        return seed;
    }
    match request_reply(text, settings).await {
        Ok(reply) => merge_reply(seed, &reply, Local::now().date_naive()),
        Err(_) => seed,
    }
}

async fn request_reply(text: &str, settings: &Settings) -> anyhow::Result<RefinedReply> {
    let body = ChatRequest {
        model: &settings.openai_model,
        messages: vec![ChatMessage {
            role: "user",
            content: format!("{PARSER_INSTRUCTIONS}{text}"),
        }],
        temperature: 0.0,
    };

    let response = reqwest::Client::new()
        .post(CHAT_COMPLETIONS_URL)
        .header("Authorization", format!("Bearer {}", settings.openai_api_key))
        .json(&body)
        .send()
        .await
        .context("chat completion request failed")?
        .error_for_status()
        .context("chat completion returned an error status")?;

    let reply: ChatResponse = response
        .json()
        .await
        .context("chat completion reply is not JSON")?;
    let content = reply
        .choices
        .first()
        .map(|choice| choice.message.content.trim())
        .context("chat completion reply has no choices")?;

    serde_json::from_str(content).context("model output is not the expected JSON shape")
}

/// Merge the model's reply over the seed. The seed is the floor: only
/// fields the model supplies (and that are recognizable) override it.
pub fn merge_reply(seed: ParsedQuery, reply: &RefinedReply, today: NaiveDate) -> ParsedQuery {
    let mut merged = seed;

    if let Some(intent) = reply.intent.as_deref().and_then(Intent::from_keyword) {
        merged.intent = intent;
    }

    if let Some(filters) = &reply.filters {
        if let Some(grade) = &filters.grade {
            merged.filters.grade = Some(grade.clone());
        }
        if let Some(classes) = &filters.classes {
            merged.filters.classes = classes.iter().map(|c| c.to_uppercase()).collect();
        }
        if let Some(region) = &filters.region {
            merged.filters.region = Some(region.clone());
        }
        if let Some(status) = filters
            .homework_submitted
            .as_deref()
            .and_then(SubmissionStatus::from_keyword)
        {
            merged.filters.homework_submitted = Some(status);
        }
    }

    // Only the three symbolic keywords recompute the window; anything else
    // keeps the seed's window untouched.
    if let Some(kind) = reply.date_range.as_deref().and_then(WindowKind::from_keyword) {
        merged.window = dates::compute_range(kind, today);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateWindow, QueryFilters};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed() -> ParsedQuery {
        ParsedQuery {
            intent: Intent::Quizzes,
            filters: QueryFilters {
                grade: Some("Grade 8".to_string()),
                classes: Vec::new(),
                region: Some("East".to_string()),
                homework_submitted: None,
            },
            window: DateWindow::none(),
        }
    }

    #[test]
    fn empty_reply_keeps_the_seed() {
        let merged = merge_reply(seed(), &RefinedReply::default(), date(2026, 8, 26));
        assert_eq!(merged, seed());
    }

    #[test]
    fn recognized_intent_overrides_the_seed() {
        let reply = RefinedReply {
            intent: Some("performance".to_string()),
            ..RefinedReply::default()
        };
        let merged = merge_reply(seed(), &reply, date(2026, 8, 26));
        assert_eq!(merged.intent, Intent::Performance);
    }

    #[test]
    fn unrecognized_intent_keeps_the_seed() {
        let reply = RefinedReply {
            intent: Some("attendance".to_string()),
            ..RefinedReply::default()
        };
        let merged = merge_reply(seed(), &reply, date(2026, 8, 26));
        assert_eq!(merged.intent, Intent::Quizzes);
    }

    #[test]
    fn supplied_filters_override_and_others_survive() {
        let reply = RefinedReply {
            filters: Some(ReplyFilters {
                grade: Some("Grade 9".to_string()),
                classes: Some(vec!["9a".to_string()]),
                region: None,
                homework_submitted: Some("no".to_string()),
            }),
            ..RefinedReply::default()
        };
        let merged = merge_reply(seed(), &reply, date(2026, 8, 26));
        assert_eq!(merged.filters.grade.as_deref(), Some("Grade 9"));
        assert_eq!(merged.filters.classes, vec!["9A".to_string()]);
        // Region came from the seed and was not supplied by the model.
        assert_eq!(merged.filters.region.as_deref(), Some("East"));
        assert_eq!(
            merged.filters.homework_submitted,
            Some(SubmissionStatus::No)
        );
    }

    #[test]
    fn recognized_date_keyword_recomputes_the_window() {
        let reply = RefinedReply {
            date_range: Some("last_week".to_string()),
            ..RefinedReply::default()
        };
        let merged = merge_reply(seed(), &reply, date(2026, 8, 26));
        assert_eq!(merged.window.kind, Some(WindowKind::LastWeek));
        assert_eq!(merged.window.start, Some(date(2026, 8, 17)));
        assert_eq!(merged.window.end, Some(date(2026, 8, 23)));
    }

    #[test]
    fn unrecognized_date_keyword_keeps_the_seed_window() {
        let original = ParsedQuery {
            window: dates::compute_range(WindowKind::ThisWeek, date(2026, 8, 26)),
            ..seed()
        };
        let reply = RefinedReply {
            date_range: Some("someday".to_string()),
            ..RefinedReply::default()
        };
        let merged = merge_reply(original.clone(), &reply, date(2026, 8, 26));
        assert_eq!(merged.window, original.window);
    }

    #[test]
    fn reply_json_in_the_expected_shape_deserializes() {
        let reply: RefinedReply = serde_json::from_str(
            r#"{"intent":"quizzes","filters":{"grade":"Grade 8"},"date_range":"last_week"}"#,
        )
        .unwrap();
        assert_eq!(reply.intent.as_deref(), Some("quizzes"));
        assert_eq!(
            reply.filters.unwrap().grade.as_deref(),
            Some("Grade 8")
        );
        assert_eq!(reply.date_range.as_deref(), Some("last_week"));
    }
}
