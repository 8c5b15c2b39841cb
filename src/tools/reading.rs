use axum::{
    extract::{Query, State},
    Json,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;

fn default_level() -> String {
    "easy".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PassageQuery {
    #[serde(default = "default_level")]
    pub level: String,
}

#[derive(Debug, Serialize)]
pub struct PassageResponse {
    pub level: String,
    pub title: &'static str,
    pub text: &'static str,
    pub word_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ReadingResultRequest {
    pub words: u32,
    pub seconds: u32,
}

#[derive(Debug, Serialize)]
pub struct ReadingResultResponse {
    pub wpm: u32,
    pub verdict: &'static str,
    pub points: i64,
}

struct Passage {
    title: &'static str,
    text: &'static str,
}

static EASY: &[Passage] = &[
    Passage {
        title: "The Morning Walk",
        text: "Dana walks to school every morning. She likes to watch the birds \
               in the trees. Sometimes she meets her friend Tom on the way. \
               They talk about their favorite books until they reach the gate.",
    },
    Passage {
        title: "A Day at the Beach",
        text: "In the summer, my family goes to the beach. We build castles in \
               the sand and swim in the sea. My little brother collects shells. \
               At the end of the day we eat ice cream and watch the sunset.",
    },
];

static MEDIUM: &[Passage] = &[
    Passage {
        title: "How Bees Make Honey",
        text: "Bees collect nectar from flowers and carry it back to the hive. \
               Inside the hive, worker bees pass the nectar from mouth to mouth, \
               adding enzymes that break down its sugars. They then store it in \
               wax cells and fan it with their wings until the water evaporates, \
               leaving the thick sweet honey we know.",
    },
    Passage {
        title: "The Invention of Paper",
        text: "Paper was invented in China about two thousand years ago. Before \
               that, people wrote on clay tablets, animal skins and strips of \
               bamboo, which were heavy and expensive. The new material was light, \
               cheap and easy to make, and the idea slowly spread along the trade \
               routes to the rest of the world.",
    },
];

static HARD: &[Passage] = &[
    Passage {
        title: "The Water Beneath Us",
        text: "Much of the fresh water on Earth is hidden underground in layers of \
               porous rock called aquifers. Rain slowly seeps through the soil and \
               accumulates there over decades or even centuries. Because the water \
               moves so slowly, pollution that reaches an aquifer can linger for \
               generations, which is why protecting these reserves is considered \
               one of the central challenges of modern water management.",
    },
    Passage {
        title: "Why the Sky Is Blue",
        text: "Sunlight looks white, but it is actually a mixture of all colors. \
               As it passes through the atmosphere, the shortest wavelengths are \
               scattered in every direction by molecules of air far more strongly \
               than the longer ones. Blue light is scattered the most, so wherever \
               you look in the daytime sky, scattered blue light reaches your eyes, \
               painting the entire dome in that familiar color.",
    },
];

fn passages_for(level: &str) -> Option<&'static [Passage]> {
    match level {
        "easy" => Some(EASY),
        "medium" => Some(MEDIUM),
        "hard" => Some(HARD),
        _ => None,
    }
}

pub fn words_per_minute(words: u32, seconds: u32) -> u32 {
    (words as f64 / seconds as f64 * 60.0).round() as u32
}

pub fn verdict_for(wpm: u32) -> &'static str {
    if wpm > 150 {
        "Excellent! Fast reading!"
    } else if wpm > 100 {
        "Very good!"
    } else {
        "Keep practicing!"
    }
}

#[instrument(skip(_state))]
pub async fn passage(
    State(_state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(query): Query<PassageQuery>,
) -> Result<Json<PassageResponse>, ApiError> {
    let pool = passages_for(&query.level)
        .ok_or_else(|| ApiError::bad_request("Unknown reading level"))?;
    let picked = pool
        .choose(&mut rand::thread_rng())
        .ok_or_else(|| ApiError::bad_request("No passages for this level"))?;

    Ok(Json(PassageResponse {
        level: query.level,
        title: picked.title,
        text: picked.text,
        word_count: picked.text.split_whitespace().count(),
    }))
}

#[instrument(skip(state))]
pub async fn result(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ReadingResultRequest>,
) -> Result<Json<ReadingResultResponse>, ApiError> {
    if payload.seconds == 0 {
        return Err(ApiError::bad_request("Reading time must be positive"));
    }

    let wpm = words_per_minute(payload.words, payload.seconds);
    let points = points::award(&state, user_id, rewards::READING).await?;
    Ok(Json(ReadingResultResponse {
        wpm,
        verdict: verdict_for(wpm),
        points,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wpm_scales_to_a_minute() {
        assert_eq!(words_per_minute(100, 60), 100);
        assert_eq!(words_per_minute(50, 30), 100);
        assert_eq!(words_per_minute(200, 60), 200);
    }

    #[test]
    fn verdict_thresholds() {
        assert_eq!(verdict_for(151), "Excellent! Fast reading!");
        assert_eq!(verdict_for(150), "Very good!");
        assert_eq!(verdict_for(101), "Very good!");
        assert_eq!(verdict_for(100), "Keep practicing!");
    }

    #[test]
    fn each_level_has_passages() {
        for level in ["easy", "medium", "hard"] {
            assert_eq!(passages_for(level).unwrap().len(), 2);
        }
        assert!(passages_for("expert").is_none());
    }
}
