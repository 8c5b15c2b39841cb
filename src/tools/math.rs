use axum::{extract::State, Json};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MathRequest {
    pub problem: String,
    /// linear | quadratic | general; inferred from the problem when absent.
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MathResponse {
    pub kind: &'static str,
    pub steps: Vec<String>,
    pub answer: Option<f64>,
    pub points: i64,
}

lazy_static! {
    // ax+b=c with optional sign on a and c, e.g. "2x + 4 = 10" or "-x+5=2".
    static ref LINEAR: Regex =
        Regex::new(r"(-?\d*)x\s*([+-])\s*(\d+)\s*=\s*(-?\d+)").unwrap();
}

#[derive(Debug, PartialEq)]
pub struct LinearSolution {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub x: f64,
}

pub fn solve_linear(problem: &str) -> Option<LinearSolution> {
    let caps = LINEAR.captures(problem)?;
    let a = match &caps[1] {
        "" | "+" => 1.0,
        "-" => -1.0,
        n => n.parse().ok()?,
    };
    let mut b: f64 = caps[3].parse().ok()?;
    if &caps[2] == "-" {
        b = -b;
    }
    let c: f64 = caps[4].parse().ok()?;
    if a == 0.0 {
        return None;
    }
    Some(LinearSolution {
        a,
        b,
        c,
        x: (c - b) / a,
    })
}

fn fmt(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn linear_steps(s: &LinearSolution) -> Vec<String> {
    vec![
        format!(
            "The equation is {}x {} {} = {}",
            fmt(s.a),
            if s.b >= 0.0 { "+" } else { "-" },
            fmt(s.b.abs()),
            fmt(s.c)
        ),
        format!(
            "Move the constant to the right side: {}x = {} {} {} = {}",
            fmt(s.a),
            fmt(s.c),
            if s.b >= 0.0 { "-" } else { "+" },
            fmt(s.b.abs()),
            fmt(s.c - s.b)
        ),
        format!(
            "Divide both sides by {}: x = {} / {} = {}",
            fmt(s.a),
            fmt(s.c - s.b),
            fmt(s.a),
            fmt(s.x)
        ),
        format!("The solution is x = {}", fmt(s.x)),
    ]
}

fn quadratic_steps() -> Vec<String> {
    vec![
        "Bring the equation to the form ax^2 + bx + c = 0".to_string(),
        "Compute the discriminant: D = b^2 - 4ac".to_string(),
        "If D >= 0, apply the formula: x = (-b ± √D) / 2a".to_string(),
        "If D < 0, the equation has no real solutions".to_string(),
    ]
}

fn generic_steps() -> Vec<String> {
    vec![
        "Simplify both sides of the equation as much as possible".to_string(),
        "Gather the unknowns on one side and the constants on the other".to_string(),
        "Isolate the unknown by inverse operations".to_string(),
        "Substitute the result back in to verify it".to_string(),
    ]
}

#[instrument(skip(state, payload))]
pub async fn solve(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<MathRequest>,
) -> Result<Json<MathResponse>, ApiError> {
    let problem = payload.problem.trim();
    if problem.is_empty() {
        return Err(ApiError::bad_request("Please enter a math problem"));
    }

    let (kind, steps, answer) = match payload.kind.as_deref() {
        Some("quadratic") => ("quadratic", quadratic_steps(), None),
        Some("linear") | None => {
            if let Some(solution) = solve_linear(problem) {
                ("linear", linear_steps(&solution), Some(solution.x))
            } else if payload.kind.is_none()
                && (problem.contains("x^2") || problem.contains("x²"))
            {
                ("quadratic", quadratic_steps(), None)
            } else {
                // Unparseable input under the linear type gets the
                // generic strategy rather than an error.
                ("general", generic_steps(), None)
            }
        }
        Some(_) => ("general", generic_steps(), None),
    };

    let points = points::award(&state, user_id, rewards::MATH).await?;
    Ok(Json(MathResponse {
        kind,
        steps,
        answer,
        points,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_basic_linear_equation() {
        let s = solve_linear("2x + 4 = 10").unwrap();
        assert_eq!(s.x, 3.0);
    }

    #[test]
    fn minus_sign_negates_the_constant() {
        let s = solve_linear("x - 3 = 7").unwrap();
        assert_eq!(s.x, 10.0);
    }

    #[test]
    fn bare_minus_coefficient_is_negative_one() {
        let s = solve_linear("-x + 5 = 2").unwrap();
        assert_eq!(s.a, -1.0);
        assert_eq!(s.x, 3.0);
    }

    #[test]
    fn non_linear_input_is_not_parsed() {
        assert!(solve_linear("what is 2 + 2").is_none());
        assert!(solve_linear("0x + 1 = 5").is_none());
    }

    #[test]
    fn linear_steps_end_with_the_solution() {
        let s = solve_linear("2x + 4 = 10").unwrap();
        let steps = linear_steps(&s);
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[3], "The solution is x = 3");
    }
}
