//! Response shaping.
//!
//! Every code path ends here so the envelope shape and the observability
//! headers are identical across successes, early answers, and failures.

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use mealroute_core::types::{
    Constraints, HeuristicMode, MealsPayload, ResponseEnvelope, RouteMetadata, RouterMode,
    SearchPage, TextPayload,
};
use mealroute_core::Error;

pub const MODEL_USED_HEADER: &str = "x-mealroute-model-used";
pub const ROUTER_MODE_HEADER: &str = "x-mealroute-router-mode";
pub const HEURISTIC_MODE_HEADER: &str = "x-mealroute-heuristic-mode";

/// A finished response: status, envelope, and route metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedResponse {
    pub status: StatusCode,
    pub envelope: ResponseEnvelope,
    pub metadata: RouteMetadata,
}

impl ShapedResponse {
    pub fn router_mode(&self) -> RouterMode {
        self.metadata.router_mode
    }
}

impl IntoResponse for ShapedResponse {
    fn into_response(self) -> Response {
        let metadata = self.metadata;
        let mut response = (self.status, Json(self.envelope)).into_response();
        let headers = response.headers_mut();
        headers.insert(
            HeaderName::from_static(MODEL_USED_HEADER),
            HeaderValue::from_static(if metadata.model_used { "true" } else { "false" }),
        );
        headers.insert(
            HeaderName::from_static(ROUTER_MODE_HEADER),
            HeaderValue::from_static(metadata.router_mode.as_str()),
        );
        headers.insert(
            HeaderName::from_static(HEURISTIC_MODE_HEADER),
            HeaderValue::from_static(metadata.heuristic_mode.as_str()),
        );
        response
    }
}

/// Options for a meals envelope.
#[derive(Debug, Clone, Default)]
pub struct MealsExtras {
    pub summary: Option<String>,
    pub message: Option<String>,
    pub restaurant: Option<String>,
}

/// Builds [`ShapedResponse`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseShaper;

impl ResponseShaper {
    pub fn new() -> Self {
        Self
    }

    pub fn meals(&self, page: SearchPage, extras: MealsExtras, metadata: RouteMetadata) -> ShapedResponse {
        ShapedResponse {
            status: StatusCode::OK,
            envelope: ResponseEnvelope::Meals(MealsPayload {
                meals: page.meals,
                has_more: page.has_more,
                next_offset: page.next_offset,
                search_key: page.search_key,
                summary: extras.summary,
                message: extras.message,
                restaurant: extras.restaurant,
            }),
            metadata,
        }
    }

    pub fn text(&self, answer: impl Into<String>, metadata: RouteMetadata) -> ShapedResponse {
        let answer = answer.into();
        ShapedResponse {
            status: StatusCode::OK,
            envelope: ResponseEnvelope::Text(TextPayload {
                error: false,
                message: answer.clone(),
                answer,
            }),
            metadata,
        }
    }

    /// Error envelope for a failure that reaches the caller.
    ///
    /// The user-facing text is generic; details stay in the logs.
    pub fn failure(
        &self,
        error: &Error,
        model_used: bool,
        heuristic_mode: HeuristicMode,
    ) -> ShapedResponse {
        let message = match error {
            Error::MalformedRequest(detail) => format!("Invalid request: {}", detail),
            Error::SearchExecution(_) => {
                "Sorry, meal search is unavailable right now. Please try again shortly.".to_string()
            }
            Error::Initialization(_) => {
                "Sorry, the service is still starting up. Please try again shortly.".to_string()
            }
            _ => "Sorry, something went wrong while handling your request.".to_string(),
        };
        let status = StatusCode::from_u16(error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ShapedResponse {
            status,
            envelope: ResponseEnvelope::Text(TextPayload {
                error: true,
                message: message.clone(),
                answer: message,
            }),
            metadata: RouteMetadata {
                model_used,
                router_mode: RouterMode::Error,
                heuristic_mode,
            },
        }
    }

    /// 400 envelope for a request rejected before routing.
    pub fn malformed(&self, detail: impl Into<String>) -> ShapedResponse {
        self.failure(&Error::malformed(detail), false, HeuristicMode::None)
    }
}

/// One-line description of a result page and the bounds applied.
pub fn build_summary(page: &SearchPage, constraints: &Constraints, restaurant: Option<&str>) -> String {
    let count = page.meals.len();
    let mut summary = match count {
        0 => "No meals matched".to_string(),
        1 => "Found 1 meal".to_string(),
        n => format!("Found {} meals", n),
    };

    let mut bounds = Vec::new();
    if let Some(cap) = constraints.effective_max_calories() {
        bounds.push(format!("under {} calories", cap));
    }
    if let Some(min) = constraints.min_calories {
        bounds.push(format!("at least {} calories", min));
    }
    for (value, label) in [
        (constraints.min_protein, "at least {}g protein"),
        (constraints.max_protein, "at most {}g protein"),
        (constraints.min_carbs, "at least {}g carbs"),
        (constraints.max_carbs, "at most {}g carbs"),
        (constraints.min_fats, "at least {}g fat"),
        (constraints.max_fats, "at most {}g fat"),
    ] {
        if let Some(value) = value {
            bounds.push(label.replace("{}", &value.to_string()));
        }
    }
    if !bounds.is_empty() {
        summary.push(' ');
        summary.push_str(&bounds.join(", "));
    }
    if let Some(name) = restaurant {
        summary.push_str(&format!(" at {}", name));
    }
    if page.has_more {
        summary.push_str(", more available");
    }
    summary.push('.');
    summary
}
