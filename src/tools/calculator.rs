use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnaryFn {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Square,
    Percent,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CalcRequest {
    Binary { op: BinaryOp, a: f64, b: f64 },
    Unary { func: UnaryFn, value: f64 },
}

#[derive(Debug, Serialize)]
pub struct CalcResponse {
    pub result: f64,
}

fn round10(x: f64) -> f64 {
    (x * 1e10).round() / 1e10
}

pub fn evaluate(request: &CalcRequest) -> Result<f64, ApiError> {
    let result = match request {
        CalcRequest::Binary { op, a, b } => match op {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => {
                if *b == 0.0 {
                    return Err(ApiError::bad_request("Division by zero"));
                }
                a / b
            }
            BinaryOp::Power => a.powf(*b),
        },
        CalcRequest::Unary { func, value } => match func {
            UnaryFn::Sin => value.to_radians().sin(),
            UnaryFn::Cos => value.to_radians().cos(),
            UnaryFn::Tan => value.to_radians().tan(),
            UnaryFn::Sqrt => {
                if *value < 0.0 {
                    return Err(ApiError::bad_request(
                        "Cannot take the square root of a negative number",
                    ));
                }
                value.sqrt()
            }
            UnaryFn::Square => value * value,
            UnaryFn::Percent => value / 100.0,
        },
    };
    Ok(round10(result))
}

#[instrument(skip(_state, payload))]
pub async fn calculate(
    State(_state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(payload): Json<CalcRequest>,
) -> Result<Json<CalcResponse>, ApiError> {
    let result = evaluate(&payload)?;
    Ok(Json(CalcResponse { result }))
}
