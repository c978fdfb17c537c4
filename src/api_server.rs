use anyhow::{anyhow, Result};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::calendar::GoogleEvent;
use crate::config::Config;
use crate::event::EventRecord;
use crate::parser::ScheduleParser;

pub const REFERENCE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// API state that will be shared across handlers
pub struct ApiState {
    pub config: Config,
    pub time_zone: Tz,
}

impl ApiState {
    pub fn new(config: Config) -> Result<Self> {
        let time_zone = config.time_zone()?;
        Ok(Self {
            config,
            time_zone,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub sentence: String,
    /// `YYYY-MM-DDTHH:MM:SS`; now in the configured zone when absent
    pub reference: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub success: bool,
    pub text: String,
    pub events: Vec<EventRecord>,
    pub google_events: Vec<GoogleEvent>,
}

// General API response
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

type ApiError = (StatusCode, Json<ApiResponse>);

fn api_error(status: StatusCode, message: String) -> ApiError {
    let body = ApiResponse {
        success: false,
        message,
    };
    (status, Json(body))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn parse_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, ApiError> {
    debug!("Parse request: {:?}", request);

    let parser = match request.reference.as_deref() {
        Some(raw) => {
            let reference = NaiveDateTime::parse_from_str(raw.trim(), REFERENCE_FORMAT)
                .map_err(|e| {
                    let message = format!("Invalid reference '{}': {}", raw, e);
                    api_error(StatusCode::BAD_REQUEST, message)
                })?;
            ScheduleParser::new(reference)
        }
        None => ScheduleParser::now(state.time_zone),
    };

    let events = parser.parse(&request.sentence);
    let google_events = events
        .iter()
        .map(|event| GoogleEvent::from_event(event, state.time_zone.name()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            let message = format!("Failed to convert events: {}", e);
            error!("{}", message);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, message)
        })?;

    let text = events
        .iter()
        .map(|event| event.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    info!("Extracted {} event(s) from API request", events.len());

    Ok(Json(ParseResponse {
        success: true,
        text,
        events: events.iter().map(EventRecord::from).collect(),
        google_events,
    }))
}

pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/parse", post(parse_handler))
        .layer(cors)
        .with_state(state)
}

// Create and start the API server
pub async fn start_api_server(config: Config, address: Option<String>) -> Result<()> {
    let addr = address.unwrap_or_else(|| config.server.address.clone());
    let state = Arc::new(ApiState::new(config)?);
    let app = router(state);

    info!("API server starting on http://{}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow!("Failed to bind to address {}: {}", addr, e))?;

    info!(
        "API server successfully bound to {}. Waiting for connections...",
        addr
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow!("Failed to start API server: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state() -> Arc<ApiState> {
        Arc::new(ApiState::new(Config::default()).unwrap())
    }

    fn request(sentence: &str, reference: Option<&str>) -> Json<ParseRequest> {
        Json(ParseRequest {
            sentence: sentence.to_string(),
            reference: reference.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_health_check() {
        assert_eq!(health_check().await, "OK");
    }

    #[tokio::test]
    async fn test_parse_with_reference() {
        let Json(response) = parse_handler(
            State(state()),
            request("Meeting tomorrow at 3pm", Some("2024-01-01T08:00:00")),
        )
        .await
        .unwrap();

        assert!(response.success);
        assert_eq!(response.events.len(), 1);
        assert_eq!(response.events[0].start_day, 2);
        assert_eq!(
            response.google_events[0].start.date_time,
            "2024-01-02T15:00:00"
        );
        assert_eq!(response.google_events[0].start.time_zone, "America/Toronto");
        assert_eq!(
            response.text,
            "Event(Activity: meeting, Start: 3 PM 2024-01-02, End: 4 PM 2024-01-02)"
        );
    }

    #[tokio::test]
    async fn test_bad_reference_is_rejected() {
        let result = parse_handler(State(state()), request("lunch", Some("tomorrow-ish"))).await;
        let (status, Json(body)) = result.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_parse_without_reference() {
        let Json(response) = parse_handler(State(state()), request("water the plants", None))
            .await
            .unwrap();
        assert_eq!(response.events.len(), 1);
        assert_eq!(response.events[0].start_hour, 9);
    }

    #[test]
    fn test_state_rejects_unknown_zone() {
        let mut config = Config::default();
        config.calendar.time_zone = "Atlantis/Central".to_string();
        assert!(ApiState::new(config).is_err());
    }
}
