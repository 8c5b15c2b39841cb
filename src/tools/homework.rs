use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HomeworkRequest {
    pub subject: String,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct HomeworkResponse {
    pub subject: String,
    pub tips: Vec<&'static str>,
    pub approach: Vec<&'static str>,
    pub recommendation: String,
    pub points: i64,
}

struct SubjectGuide {
    id: &'static str,
    tips: [&'static str; 4],
}

static GUIDES: &[SubjectGuide] = &[
    SubjectGuide {
        id: "language",
        tips: [
            "Read the text twice before answering",
            "Underline the key words in each question",
            "Answer in full sentences",
            "Check your spelling before submitting",
        ],
    },
    SubjectGuide {
        id: "math",
        tips: [
            "Write down what is given and what is asked",
            "Solve step by step and show your work",
            "Check the answer by substituting it back",
            "Draw a sketch when the problem describes shapes",
        ],
    },
    SubjectGuide {
        id: "english",
        tips: [
            "Look up unfamiliar words before translating the whole sentence",
            "Pay attention to verb tenses",
            "Read the passage aloud to catch mistakes",
            "Keep a personal vocabulary list",
        ],
    },
    SubjectGuide {
        id: "science",
        tips: [
            "Identify the phenomenon the question is about",
            "Use the correct scientific terms",
            "Connect the answer to an experiment or example",
            "Draw a diagram when it helps explain",
        ],
    },
    SubjectGuide {
        id: "history",
        tips: [
            "Place the event on a timeline first",
            "Separate causes from consequences",
            "Name the key figures involved",
            "Support claims with dates and sources",
        ],
    },
    SubjectGuide {
        id: "bible",
        tips: [
            "Read the chapter before the commentary",
            "Identify who is speaking and to whom",
            "Note repeated words, they carry the theme",
            "Compare the story to ones you already know",
        ],
    },
    SubjectGuide {
        id: "civics",
        tips: [
            "Define the civic concept before using it",
            "Bring a current example from the news",
            "Distinguish between rights and duties",
            "Structure the answer as claim and explanation",
        ],
    },
    SubjectGuide {
        id: "literature",
        tips: [
            "Identify the speaker and the situation in the poem or story",
            "Mark literary devices and explain their effect",
            "Quote short lines to support your reading",
            "Connect the theme to the title",
        ],
    },
    SubjectGuide {
        id: "geography",
        tips: [
            "Start from the map, locate the region first",
            "Use terms like climate, terrain and population precisely",
            "Explain processes, not just facts",
            "Compare regions to highlight differences",
        ],
    },
];

static APPROACH: [&'static str; 4] = [
    "Read the question carefully and make sure you understand what is asked",
    "Gather what you already know about the topic",
    "Work through the answer in small steps",
    "Review your answer and check it addresses the question",
];

fn guide_for(subject: &str) -> &'static SubjectGuide {
    GUIDES
        .iter()
        .find(|g| g.id == subject)
        .unwrap_or(&GUIDES[0])
}

#[instrument(skip(state, payload))]
pub async fn help(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<HomeworkRequest>,
) -> Result<Json<HomeworkResponse>, ApiError> {
    if payload.question.trim().is_empty() {
        return Err(ApiError::bad_request("Please enter your homework question"));
    }

    let subject = payload.subject.trim().to_lowercase();
    let guide = guide_for(&subject);
    let recommendation = format!(
        "Work through the question yourself using the tips, then ask your {} teacher if you are still stuck.",
        guide.id
    );

    let points = points::award(&state, user_id, rewards::HOMEWORK).await?;
    Ok(Json(HomeworkResponse {
        subject: guide.id.to_string(),
        tips: guide.tips.to_vec(),
        approach: APPROACH.to_vec(),
        recommendation,
        points,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subject_has_four_tips() {
        assert_eq!(GUIDES.len(), 9);
        for guide in GUIDES {
            assert!(guide.tips.iter().all(|t| !t.is_empty()));
        }
    }

    #[test]
    fn known_subject_resolves() {
        assert_eq!(guide_for("math").id, "math");
        assert_eq!(guide_for("geography").id, "geography");
    }

    #[test]
    fn unknown_subject_falls_back_to_language() {
        assert_eq!(guide_for("astronomy").id, "language");
    }
}
