use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::points::rewards;
use crate::state::AppState;

pub mod calculator;
pub mod dictionary;
pub mod essay;
pub mod homework;
pub mod improver;
pub mod math;
pub mod quiz;
pub mod reading;
pub mod summarizer;
pub mod translator;
pub mod tutor;

/// One entry in the tool catalog: the section of the app it belongs to
/// and the points a completed run awards.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub id: &'static str,
    pub section: &'static str,
    pub reward: i64,
}

pub const CATALOG: &[ToolInfo] = &[
    ToolInfo { id: "essay-writer", section: "writing", reward: rewards::ESSAY },
    ToolInfo { id: "essay-improver", section: "writing", reward: rewards::IMPROVE },
    ToolInfo { id: "homework-helper", section: "learning", reward: rewards::HOMEWORK },
    ToolInfo { id: "math-solver", section: "learning", reward: rewards::MATH },
    ToolInfo { id: "summarizer", section: "learning", reward: rewards::SUMMARY },
    ToolInfo { id: "quiz-generator", section: "learning", reward: rewards::QUIZ },
    ToolInfo { id: "flashcards", section: "learning", reward: rewards::FLASHCARD },
    ToolInfo { id: "dictionary", section: "learning", reward: rewards::DICTIONARY },
    ToolInfo { id: "voice-recorder", section: "voice", reward: rewards::RECORDING },
    ToolInfo { id: "reading-practice", section: "voice", reward: rewards::READING },
    ToolInfo { id: "translator", section: "voice", reward: rewards::TRANSLATE },
    ToolInfo { id: "calculator", section: "tools", reward: 0 },
    ToolInfo { id: "notes", section: "tools", reward: rewards::NOTE },
    ToolInfo { id: "todo", section: "tools", reward: rewards::TODO_ADD },
    ToolInfo { id: "pomodoro", section: "tools", reward: rewards::POMODORO },
    ToolInfo { id: "chat-tutor", section: "tools", reward: rewards::CHAT },
    ToolInfo { id: "study-planner", section: "planner", reward: rewards::PLANNER },
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tools", get(catalog))
        .route("/tools/essay", post(essay::generate))
        .route("/tools/improve", post(improver::improve))
        .route("/tools/homework", post(homework::help))
        .route("/tools/math", post(math::solve))
        .route("/tools/summarize", post(summarizer::summarize))
        .route("/tools/quiz", post(quiz::generate))
        .route("/tools/tutor", post(tutor::chat))
        .route("/tools/reading/passage", get(reading::passage))
        .route("/tools/reading/result", post(reading::result))
        .route("/tools/calculator", post(calculator::calculate))
        .route("/tools/dictionary", post(dictionary::define))
        .route("/tools/translate", post(translator::translate))
}

async fn catalog() -> Json<&'static [ToolInfo]> {
    Json(CATALOG)
}
