//! Request handlers
//!
//! JSON bodies are taken as `Result<Json<T>, JsonRejection>` so a missing
//! or unreadable body gets the same 400 envelope as a missing field. Bodies
//! that could not be read at all, such as ones over the upload cap, keep
//! their own message.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snaptable_core::{
    model::{ImageIntent, Table},
    util::{csv_export::value_to_csv, timestamp::format_timestamp},
};
use tracing::info;

use super::AppState;
use crate::error::ApiError;

const NO_IMAGE: &str = "No image data provided";
const NO_TABLE: &str = "No table data provided";

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    success:  bool,
    filename: String,
}

#[derive(Debug, Serialize)]
pub struct TableResponse {
    success:    bool,
    table_data: Table,
}

#[derive(Debug, Serialize)]
pub struct CsvResponse {
    success:  bool,
    filename: String,
    data:     String,
}

/// Maps a body rejection to the error the client sees
///
/// Unreadable bodies report why; anything else counts as missing input.
fn rejection_error(rejection: JsonRejection, missing: &str) -> ApiError {
    match rejection {
        JsonRejection::BytesRejection(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            ApiError::PayloadTooLarge(format!("Request body too large: {}", e.body_text()))
        }
        JsonRejection::BytesRejection(e) => {
            ApiError::BadRequest(format!("Could not read request body: {}", e.body_text()))
        }
        _ => ApiError::BadRequest(missing.to_string()),
    }
}

fn image_from(payload: Result<Json<ImageRequest>, JsonRejection>) -> Result<String, ApiError> {
    let Json(request) = payload.map_err(|e| rejection_error(e, NO_IMAGE))?;
    request
        .image
        .ok_or_else(|| ApiError::BadRequest(NO_IMAGE.to_string()))
}

/// GET /request-screenshot
pub async fn request_screenshot(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Screenshot requested");
    let png = state.screenshots.capture().await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// POST /save-cropped
pub async fn save_cropped(
    State(state): State<AppState>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<SavedResponse>, ApiError> {
    let image = image_from(payload)?;
    let stored = state
        .images
        .store(&image, ImageIntent::CroppedArchive)
        .await?;

    Ok(Json(SavedResponse {
        success:  true,
        filename: stored.display_path(),
    }))
}

/// POST /extract-table
///
/// The working copy of the image is deleted whether or not extraction
/// succeeds.
pub async fn extract_table(
    State(state): State<AppState>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<TableResponse>, ApiError> {
    let image = image_from(payload)?;
    let stored = state.images.store(&image, ImageIntent::TempWorking).await?;

    let result = state.extractor.extract(&stored.path).await;
    state.images.delete(&stored.path).await;

    Ok(Json(TableResponse {
        success:    true,
        table_data: result?,
    }))
}

/// POST /download-csv
///
/// Only an absent `table_data` key is an error. A present but null or
/// malformed value exports as an empty CSV.
pub async fn download_csv(
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<CsvResponse>, ApiError> {
    let Json(mut body) = payload.map_err(|e| rejection_error(e, NO_TABLE))?;
    let table_data = body
        .remove("table_data")
        .ok_or_else(|| ApiError::BadRequest(NO_TABLE.to_string()))?;

    Ok(Json(CsvResponse {
        success:  true,
        filename: format!("table_data_{}.csv", format_timestamp()),
        data:     value_to_csv(&table_data),
    }))
}
