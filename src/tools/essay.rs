use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EssayRequest {
    pub topic: String,
    /// short | medium | long
    pub length: String,
    /// argumentative | descriptive | narrative | analytical
    pub style: String,
}

#[derive(Debug, Serialize)]
pub struct EssayResponse {
    pub title: String,
    pub intro: String,
    pub body: Vec<String>,
    pub conclusion: String,
    pub points: i64,
}

fn style_intro(style: &str, topic: &str) -> Option<String> {
    let text = match style {
        "argumentative" => format!(
            "The topic of {topic} raises important questions that deserve a thorough \
             discussion. In this essay I will present my position and support it with \
             well-grounded arguments."
        ),
        "descriptive" => format!(
            "When I think about {topic}, many images come to mind. In this essay I will \
             describe the subject in rich and careful detail."
        ),
        "narrative" => format!(
            "My story with {topic} began on one bright day, when I first discovered the \
             deeper meaning hidden within it."
        ),
        "analytical" => format!(
            "A close analysis of {topic} reveals many complex aspects. In this essay I \
             will examine the subject from several different angles."
        ),
        _ => return None,
    };
    Some(text)
}

fn style_conclusion(style: &str, topic: &str) -> Option<String> {
    let text = match style {
        "argumentative" => format!(
            "In conclusion, the arguments presented clearly show the importance of the \
             subject. {topic} is a matter we should keep discussing and acting on."
        ),
        "descriptive" => format!(
            "This is how {topic} looks to me - complex, fascinating, and full of details \
             worth noticing. The description here reflects only part of its richness."
        ),
        "narrative" => format!(
            "And so my story with {topic} came to an end. The lesson I learned will stay \
             with me and shape the way I look at the world."
        ),
        "analytical" => format!(
            "The analysis shows that {topic} is a multi-dimensional subject. A deep \
             understanding of it requires constant observation and openness to new ideas."
        ),
        _ => return None,
    };
    Some(text)
}

fn body_paragraph_count(length: &str) -> Option<usize> {
    match length {
        "short" => Some(1),
        "medium" => Some(2),
        "long" => Some(3),
        _ => None,
    }
}

pub fn compose(topic: &str, length: &str, style: &str) -> Result<EssayResponse, ApiError> {
    let intro = style_intro(style, topic)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown essay style: {style}")))?;
    let conclusion = style_conclusion(style, topic)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown essay style: {style}")))?;
    let paragraphs = body_paragraph_count(length)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown essay length: {length}")))?;

    let ordinals = ["first", "second", "third"];
    let body = (0..paragraphs)
        .map(|i| {
            format!(
                "The {} aspect of {topic} touches an important part of our lives. Looking \
                 closely at it shows how it influences a wide range of fields. A deeper \
                 understanding of the subject will help us face future challenges.",
                ordinals[i]
            )
        })
        .collect();

    Ok(EssayResponse {
        title: format!("Essay: {topic}"),
        intro,
        body,
        conclusion,
        points: 0,
    })
}

#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<EssayRequest>,
) -> Result<Json<EssayResponse>, ApiError> {
    let topic = payload.topic.trim();
    if topic.is_empty() {
        return Err(ApiError::bad_request("Please enter an essay topic"));
    }

    let mut essay = compose(topic, &payload.length, &payload.style)?;
    essay.points = points::award(&state, user_id, rewards::ESSAY).await?;
    Ok(Json(essay))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_control_body_paragraphs() {
        assert_eq!(compose("rivers", "short", "descriptive").unwrap().body.len(), 1);
        assert_eq!(compose("rivers", "medium", "descriptive").unwrap().body.len(), 2);
        assert_eq!(compose("rivers", "long", "descriptive").unwrap().body.len(), 3);
    }

    #[test]
    fn topic_appears_in_every_section() {
        let essay = compose("friendship", "medium", "argumentative").unwrap();
        assert!(essay.title.contains("friendship"));
        assert!(essay.intro.contains("friendship"));
        assert!(essay.body.iter().all(|p| p.contains("friendship")));
        assert!(essay.conclusion.contains("friendship"));
    }

    #[test]
    fn unknown_style_or_length_is_rejected() {
        assert!(compose("x", "short", "poetic").is_err());
        assert!(compose("x", "epic", "narrative").is_err());
    }
}
