use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{ClimaCepError, WeatherResponse, WeatherService};

/// Body returned for every non-200 answer
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl ClimaCepError {
    /// HTTP status this error is reported with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ClimaCepError::InvalidZip => StatusCode::UNPROCESSABLE_ENTITY,
            ClimaCepError::NotFound => StatusCode::NOT_FOUND,
            ClimaCepError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ClimaCepError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ClimaCepError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = ApiError {
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(service: WeatherService) -> Router {
    Router::new()
        .route("/weather/{cep}", get(get_weather))
        .with_state(service)
}

async fn get_weather(
    State(service): State<WeatherService>,
    Path(cep): Path<String>,
) -> Result<Json<WeatherResponse>, ClimaCepError> {
    // Dropping this handler (client gone, request timeout) cancels the upstream calls
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let weather = service.weather_by_postal_code(&cep, &cancel).await?;
    Ok(Json(weather))
}
