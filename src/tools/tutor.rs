use axum::{extract::State, Json};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub topic: &'static str,
    pub points: i64,
}

struct Topic {
    name: &'static str,
    patterns: &'static [&'static str],
    responses: &'static [&'static str],
}

// Matched in order, first topic with a matching pattern wins.
static KNOWLEDGE_BASE: &[Topic] = &[
    Topic {
        name: "greeting",
        patterns: &["hello", "hey there", "good morning", "good evening"],
        responses: &[
            "Hello! What would you like to study today?",
            "Hey! Ready to learn something new?",
        ],
    },
    Topic {
        name: "study-tips",
        patterns: &["how to study", "study tips", "concentrate", "focus"],
        responses: &[
            "Break your study time into 25 minute blocks with short breaks in between.",
            "Summarize each chapter in your own words, it helps the material stick.",
            "Teach the topic to someone else, explaining is the best way to learn.",
        ],
    },
    Topic {
        name: "pythagoras",
        patterns: &["pythagoras", "pythagorean", "hypotenuse"],
        responses: &[
            "The Pythagorean theorem says that in a right triangle, a² + b² = c², where c is the hypotenuse.",
            "To find the hypotenuse, square both legs, add them, and take the square root.",
        ],
    },
    Topic {
        name: "math",
        patterns: &["equation", "algebra", "fraction", "geometry"],
        responses: &[
            "In math, always start by writing down what is given and what you need to find.",
            "When solving equations, whatever you do to one side you must do to the other.",
        ],
    },
    Topic {
        name: "photosynthesis",
        patterns: &["photosynthesis", "chlorophyll"],
        responses: &[
            "Photosynthesis is how plants turn sunlight, water and carbon dioxide into sugar and oxygen.",
            "Chlorophyll is the green pigment that captures light energy for photosynthesis.",
        ],
    },
    Topic {
        name: "science",
        patterns: &["experiment", "physics", "chemistry", "biology"],
        responses: &[
            "In science, start from the question the experiment is trying to answer.",
            "Always connect the result back to the hypothesis, did it confirm or refute it?",
        ],
    },
    Topic {
        name: "ww2",
        patterns: &["world war", "holocaust"],
        responses: &[
            "World War II lasted from 1939 to 1945 and reshaped the entire world order.",
            "When studying the war, build a timeline of the major turning points first.",
        ],
    },
    Topic {
        name: "history",
        patterns: &["history", "ancient", "revolution"],
        responses: &[
            "In history, always ask about causes and consequences, not just dates.",
            "Place events on a timeline, it makes the connections easier to see.",
        ],
    },
    Topic {
        name: "essay",
        patterns: &["essay", "composition", "write about"],
        responses: &[
            "A good essay has an introduction, body paragraphs with one idea each, and a conclusion.",
            "Start your essay with a clear thesis, then support it paragraph by paragraph.",
        ],
    },
    Topic {
        name: "english",
        patterns: &["english", "vocabulary", "translate"],
        responses: &[
            "Read English texts a little every day, consistency beats cramming.",
            "Keep a personal word list and review it before bed.",
        ],
    },
    Topic {
        name: "grammar",
        patterns: &["grammar", "tense", "verb"],
        responses: &[
            "Identify the time of the action first, then pick the matching tense.",
            "Read the sentence aloud, your ear often catches grammar mistakes your eye misses.",
        ],
    },
    Topic {
        name: "thanks",
        patterns: &["thank", "thanks"],
        responses: &[
            "You're welcome! Come back whenever you need help.",
            "Happy to help! Good luck with your studies.",
        ],
    },
];

static DEFAULT_RESPONSES: &[&str] = &[
    "Interesting question! Try asking me about math, science, history or study tips.",
    "I'm not sure about that one. I can help with school subjects and study advice.",
    "Tell me more, or ask about a specific subject like math or English.",
];

pub fn match_topic(message: &str) -> Option<&'static Topic> {
    let lower = message.to_lowercase();
    KNOWLEDGE_BASE
        .iter()
        .find(|topic| topic.patterns.iter().any(|p| lower.contains(p)))
}

fn pick_reply(responses: &'static [&'static str]) -> &'static str {
    responses
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Let's keep studying!")
}

#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::bad_request("Please enter a message"));
    }

    let (topic, reply) = match match_topic(&payload.message) {
        Some(t) => (t.name, pick_reply(t.responses)),
        None => ("general", pick_reply(DEFAULT_RESPONSES)),
    };

    let points = points::award(&state, user_id, rewards::CHAT).await?;
    Ok(Json(ChatResponse {
        reply: reply.to_string(),
        topic,
        points,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(match_topic("Tell me about PYTHAGORAS").unwrap().name, "pythagoras");
    }

    #[test]
    fn specific_topics_win_over_broad_ones() {
        // "pythagoras" and "photosynthesis" come before the broader subjects.
        assert_eq!(match_topic("what is the hypotenuse").unwrap().name, "pythagoras");
        assert_eq!(match_topic("explain chlorophyll").unwrap().name, "photosynthesis");
        assert_eq!(match_topic("the world war ended in 1945").unwrap().name, "ww2");
    }

    #[test]
    fn every_topic_is_reachable() {
        // A pattern of a later topic must not be a substring match for an
        // earlier topic's pattern.
        for (i, topic) in KNOWLEDGE_BASE.iter().enumerate() {
            for pattern in topic.patterns {
                let hit = match_topic(pattern).unwrap();
                assert_eq!(
                    hit.name, topic.name,
                    "pattern {pattern:?} of topic #{i} matched {:?}",
                    hit.name
                );
            }
        }
    }

    #[test]
    fn topic_names_are_unique() {
        let names: HashSet<_> = KNOWLEDGE_BASE.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), KNOWLEDGE_BASE.len());
    }

    #[test]
    fn unmatched_message_has_no_topic() {
        assert!(match_topic("xyzzy plugh").is_none());
    }
}
