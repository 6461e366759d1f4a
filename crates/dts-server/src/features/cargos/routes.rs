//! Cargo API routes
//!
//! Wires the cargo commands and queries to Axum HTTP handlers.
//!
//! # Route Structure
//!
//! - `POST /api/v1/cargos` - Register a new cargo
//! - `GET /api/v1/cargos/_list` - Search cargos with pagination and filters
//! - `POST /api/v1/cargos/file/upload` - Bulk import cargos from JSON files
//! - `GET /api/v1/cargos/:id` - Get a single cargo
//! - `PUT /api/v1/cargos/:id` - Replace a cargo
//! - `DELETE /api/v1/cargos/:id` - Delete a cargo

use crate::api::response::{ApiResponse, ErrorResponse};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;

use super::commands::{
    CreateCargoCommand, CreateCargoError, DeleteCargoCommand, DeleteCargoError,
    UpdateCargoCommand, UpdateCargoError, UploadCargoFilesCommand, UploadCargoFilesError,
};
use super::queries::{GetCargoError, GetCargoQuery, SearchCargosError, SearchCargosQuery};
use crate::features::FeatureState;
use crate::ingest::IngestFile;

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the cargos router with all routes configured
///
/// The static segments `_list` and `file/upload` take precedence over the
/// `:id` capture, so they are safe to live under the same prefix.
pub fn cargos_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_cargo))
        .route("/_list", get(search_cargos))
        .route("/file/upload", post(upload_cargo_files))
        .route("/:id", get(get_cargo))
        .route("/:id", put(update_cargo))
        .route("/:id", delete(delete_cargo))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Register a new cargo
///
/// # Endpoint
///
/// `POST /api/v1/cargos`
///
/// # Request Body
///
/// ```json
/// {
///   "vehicleNumber": "AA1234BB",
///   "description": "Office furniture",
///   "weight": 540.0,
///   "status": "PENDING"
/// }
/// ```
///
/// # Response
///
/// - `201 Created` - Cargo registered
/// - `400 Bad Request` - Validation error
/// - `404 Not Found` - No vehicle with the given number
/// - `500 Internal Server Error` - Storage error
#[tracing::instrument(
    skip(state, command),
    fields(vehicle_number = %command.vehicle_number)
)]
async fn create_cargo(
    State(state): State<FeatureState>,
    Json(command): Json<CreateCargoCommand>,
) -> Result<Response, CargoApiError> {
    let response = super::commands::create::handle(state.store.as_ref(), command).await?;

    tracing::info!(cargo_id = response.id, "Cargo created via API");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

/// Replace an existing cargo
///
/// # Endpoint
///
/// `PUT /api/v1/cargos/:id`
///
/// # Response
///
/// - `200 OK` - Cargo updated
/// - `400 Bad Request` - Validation error
/// - `404 Not Found` - Cargo or vehicle not found
/// - `500 Internal Server Error` - Storage error
#[tracing::instrument(skip(state, command), fields(cargo_id = id))]
async fn update_cargo(
    State(state): State<FeatureState>,
    Path(id): Path<i64>,
    Json(mut command): Json<UpdateCargoCommand>,
) -> Result<Response, CargoApiError> {
    // The path parameter wins over anything in the body.
    command.id = id;

    let response = super::commands::update::handle(state.store.as_ref(), command).await?;

    tracing::info!(cargo_id = response.id, "Cargo updated via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// Delete a cargo
///
/// # Endpoint
///
/// `DELETE /api/v1/cargos/:id`
///
/// # Response
///
/// - `204 No Content` - Cargo deleted
/// - `404 Not Found` - Cargo not found
/// - `500 Internal Server Error` - Storage error
#[tracing::instrument(skip(state), fields(cargo_id = id))]
async fn delete_cargo(
    State(state): State<FeatureState>,
    Path(id): Path<i64>,
) -> Result<Response, CargoApiError> {
    super::commands::delete::handle(state.store.as_ref(), DeleteCargoCommand { id }).await?;

    tracing::info!(cargo_id = id, "Cargo deleted via API");

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Bulk import cargos from uploaded JSON files
///
/// Accepts any number of multipart parts named `file`, each holding a JSON
/// array of cargo records. Files are processed concurrently; the response
/// reports how many records were imported and how many were rejected.
///
/// # Endpoint
///
/// `POST /api/v1/cargos/file/upload`
///
/// # Response
///
/// - `200 OK` - At least one record was imported
/// - `400 Bad Request` - No file parts or unreadable multipart body
/// - `417 Expectation Failed` - Files were processed but nothing was imported
/// - `500 Internal Server Error` - Report could not be written
#[tracing::instrument(skip(state, multipart))]
async fn upload_cargo_files(
    State(state): State<FeatureState>,
    mut multipart: Multipart,
) -> Result<Response, CargoApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CargoApiError::Multipart(format!("Failed to read multipart field: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != "file" {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.json").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| CargoApiError::Multipart(format!("Failed to read file bytes: {e}")))?;
        files.push(IngestFile::new(file_name, data.to_vec()));
    }

    let summary = super::commands::upload::handle(
        state.coordinator.as_ref(),
        state.report.as_ref(),
        UploadCargoFilesCommand { files },
    )
    .await?;

    tracing::info!(
        successful = summary.successful_imports,
        failed = summary.failed_imports,
        "Cargo files uploaded via API"
    );

    if !summary.accepted() {
        return Err(CargoApiError::NothingImported {
            failed: summary.failed_imports,
        });
    }

    Ok((StatusCode::OK, Json(ApiResponse::success(summary))).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// Get a single cargo by id
///
/// # Endpoint
///
/// `GET /api/v1/cargos/:id`
///
/// # Response
///
/// - `200 OK` - Cargo found
/// - `404 Not Found` - Cargo not found
/// - `500 Internal Server Error` - Storage error
#[tracing::instrument(skip(state), fields(cargo_id = id))]
async fn get_cargo(
    State(state): State<FeatureState>,
    Path(id): Path<i64>,
) -> Result<Response, CargoApiError> {
    let response = super::queries::get::handle(state.store.as_ref(), GetCargoQuery { id }).await?;

    tracing::debug!(cargo_id = response.id, "Cargo retrieved via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// Search cargos with pagination and filters
///
/// # Endpoint
///
/// `GET /api/v1/cargos/_list?page=1&size=10&status=PENDING&type=TRUCK`
///
/// # Query Parameters
///
/// - `page` - Page number (default: 1)
/// - `size` - Items per page (default: 10, max: 100)
/// - any other key - Filter field; must be known to the predicate registry
///
/// Values may repeat or be comma-separated. Different fields must all
/// match; within one field any value may match.
///
/// # Response
///
/// - `200 OK` - Matching page with pagination metadata
/// - `400 Bad Request` - Invalid pagination, unknown field, or bad value
/// - `500 Internal Server Error` - Storage error
#[tracing::instrument(skip(state, params))]
async fn search_cargos(
    State(state): State<FeatureState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, CargoApiError> {
    let query = SearchCargosQuery::from_params(params);

    let response =
        super::queries::search::handle(state.store.as_ref(), state.filters.as_ref(), query).await?;

    tracing::debug!(
        count = response.items.len(),
        total = response.pagination.total,
        "Cargos searched via API"
    );

    let meta = json!({ "pagination": response.pagination });

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(response.items, meta))).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for cargo API endpoints
#[derive(Debug)]
enum CargoApiError {
    CreateError(CreateCargoError),
    UpdateError(UpdateCargoError),
    DeleteError(DeleteCargoError),
    GetError(GetCargoError),
    SearchError(SearchCargosError),
    UploadError(UploadCargoFilesError),
    Multipart(String),
    NothingImported { failed: u64 },
}

impl From<CreateCargoError> for CargoApiError {
    fn from(err: CreateCargoError) -> Self {
        Self::CreateError(err)
    }
}

impl From<UpdateCargoError> for CargoApiError {
    fn from(err: UpdateCargoError) -> Self {
        Self::UpdateError(err)
    }
}

impl From<DeleteCargoError> for CargoApiError {
    fn from(err: DeleteCargoError) -> Self {
        Self::DeleteError(err)
    }
}

impl From<GetCargoError> for CargoApiError {
    fn from(err: GetCargoError) -> Self {
        Self::GetError(err)
    }
}

impl From<SearchCargosError> for CargoApiError {
    fn from(err: SearchCargosError) -> Self {
        Self::SearchError(err)
    }
}

impl From<UploadCargoFilesError> for CargoApiError {
    fn from(err: UploadCargoFilesError) -> Self {
        Self::UploadError(err)
    }
}

impl IntoResponse for CargoApiError {
    fn into_response(self) -> Response {
        match self {
            // Create errors
            CargoApiError::CreateError(CreateCargoError::VehicleNumber(_))
            | CargoApiError::CreateError(CreateCargoError::Description(_))
            | CargoApiError::CreateError(CreateCargoError::Weight(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            CargoApiError::CreateError(CreateCargoError::VehicleNotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            CargoApiError::CreateError(CreateCargoError::Store(_)) => {
                tracing::error!("Storage error during cargo creation: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            // Update errors
            CargoApiError::UpdateError(UpdateCargoError::VehicleNumber(_))
            | CargoApiError::UpdateError(UpdateCargoError::Description(_))
            | CargoApiError::UpdateError(UpdateCargoError::Weight(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            CargoApiError::UpdateError(UpdateCargoError::VehicleNotFound(_))
            | CargoApiError::UpdateError(UpdateCargoError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            CargoApiError::UpdateError(UpdateCargoError::Store(_)) => {
                tracing::error!("Storage error during cargo update: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            // Delete errors
            CargoApiError::DeleteError(DeleteCargoError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            CargoApiError::DeleteError(DeleteCargoError::Store(_)) => {
                tracing::error!("Storage error during cargo deletion: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            // Get errors
            CargoApiError::GetError(GetCargoError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            CargoApiError::GetError(GetCargoError::Store(_)) => {
                tracing::error!("Storage error during cargo retrieval: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            // Search errors
            CargoApiError::SearchError(SearchCargosError::InvalidPagination(_))
            | CargoApiError::SearchError(SearchCargosError::Filter(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            CargoApiError::SearchError(SearchCargosError::Store(_)) => {
                tracing::error!("Storage error during cargo search: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            // Upload errors
            CargoApiError::UploadError(UploadCargoFilesError::NoFiles) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            CargoApiError::UploadError(UploadCargoFilesError::Report(_)) => {
                tracing::error!("Report error during cargo upload: {}", self);
                let error =
                    ErrorResponse::new("INTERNAL_ERROR", "The ingestion report could not be written");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            CargoApiError::Multipart(_) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },

            CargoApiError::NothingImported { failed } => {
                let error = ErrorResponse::with_details(
                    "EXPECTATION_FAILED",
                    "No cargo records were imported",
                    json!({ "successfulImports": 0, "failedImports": failed }),
                );
                (StatusCode::EXPECTATION_FAILED, Json(error)).into_response()
            },
        }
    }
}

impl std::fmt::Display for CargoApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateError(e) => write!(f, "{}", e),
            Self::UpdateError(e) => write!(f, "{}", e),
            Self::DeleteError(e) => write!(f, "{}", e),
            Self::GetError(e) => write!(f, "{}", e),
            Self::SearchError(e) => write!(f, "{}", e),
            Self::UploadError(e) => write!(f, "{}", e),
            Self::Multipart(msg) => write!(f, "{}", msg),
            Self::NothingImported { .. } => write!(f, "No cargo records were imported"),
        }
    }
}
