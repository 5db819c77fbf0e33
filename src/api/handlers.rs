use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::{ApiError, ErrorResponse};
use crate::logic::{CupcakeService, ServiceError};
use crate::model::{CreateCupcakeRequest, Cupcake, CupcakeId, UpdateCupcakeRequest};
use crate::store::traits::CupcakeStore;

pub type AppState<S> = Arc<CupcakeService<S>>;

/// Simple health check endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Cupcake Store API is running!".to_string(),
    })
}

/// Accepts decimal digits only and rejects zero, before any lookup happens.
pub fn parse_id(raw: &str) -> Result<CupcakeId, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::InvalidId);
    }

    match raw.parse::<CupcakeId>() {
        Ok(0) | Err(_) => Err(ApiError::InvalidId),
        Ok(id) => Ok(id),
    }
}

// Bodies are decoded by hand so that every malformed payload gets the same
// error body, whatever the Content-Type header says.
fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        log::debug!("Rejected request body: {}", e);
        ApiError::Decode
    })
}

// Cupcake handlers
pub async fn list_cupcakes<S: CupcakeStore>(
    State(service): State<AppState<S>>,
) -> Result<Json<Vec<Cupcake>>, (StatusCode, Json<ErrorResponse>)> {
    match service.list().await {
        Ok(cupcakes) => Ok(Json(cupcakes)),
        Err(e) => {
            log::error!("Failed to list cupcakes: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Error fetching cupcakes")),
            ))
        }
    }
}

pub async fn create_cupcake<S: CupcakeStore>(
    State(service): State<AppState<S>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Cupcake>), ApiError> {
    let request: CreateCupcakeRequest = decode_body(&body)?;
    let cupcake = service.create(&request).await?;

    Ok((StatusCode::CREATED, Json(cupcake)))
}

pub async fn get_cupcake<S: CupcakeStore>(
    State(service): State<AppState<S>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Cupcake>, Response> {
    let id = parse_id(&raw_id).map_err(IntoResponse::into_response)?;

    match service.get(id).await {
        Ok(cupcake) => Ok(Json(cupcake)),
        Err(ServiceError::NotFound) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(&ServiceError::CupcakeNotFound.to_string())),
        )
            .into_response()),
        Err(e) => Err(ApiError::from(e).into_response()),
    }
}

pub async fn update_cupcake<S: CupcakeStore>(
    State(service): State<AppState<S>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Cupcake>, ApiError> {
    let id = parse_id(&raw_id)?;
    let request: UpdateCupcakeRequest = decode_body(&body)?;

    Ok(Json(service.update(id, &request).await?))
}

pub async fn delete_cupcake<S: CupcakeStore>(
    State(service): State<AppState<S>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
