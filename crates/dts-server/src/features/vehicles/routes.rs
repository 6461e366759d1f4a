//! Vehicle API routes

use crate::api::response::{ApiResponse, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;

use super::commands::{
    CreateVehicleCommand, CreateVehicleError, DeleteVehicleCommand, DeleteVehicleError,
    UpdateVehicleCommand, UpdateVehicleError,
};
use super::queries::{ListVehiclesError, ListVehiclesQuery};
use crate::features::shared::pagination::PaginationParams;
use crate::features::FeatureState;

pub fn vehicles_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_vehicle))
        .route("/", get(list_vehicles))
        .route("/:id", put(update_vehicle))
        .route("/:id", delete(delete_vehicle))
}

/// Register a new vehicle
///
/// # Response
///
/// - `201 Created` - Vehicle registered
/// - `400 Bad Request` - Validation error
/// - `409 Conflict` - Vehicle number already registered
/// - `500 Internal Server Error` - Storage error
#[tracing::instrument(skip(state, command), fields(vehicle_number = %command.vehicle_number))]
async fn create_vehicle(
    State(state): State<FeatureState>,
    Json(command): Json<CreateVehicleCommand>,
) -> Result<Response, VehicleApiError> {
    let response = super::commands::create::handle(state.store.as_ref(), command).await?;

    tracing::info!(vehicle_id = response.id, "Vehicle created via API");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

/// List vehicles with their cargos
///
/// # Response
///
/// - `200 OK` - Page of vehicles with pagination metadata
/// - `400 Bad Request` - Invalid pagination parameters
/// - `500 Internal Server Error` - Storage error
#[tracing::instrument(skip(state, pagination))]
async fn list_vehicles(
    State(state): State<FeatureState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, VehicleApiError> {
    let query = ListVehiclesQuery { pagination };

    let response = super::queries::list::handle(state.store.as_ref(), query).await?;

    tracing::debug!(
        count = response.items.len(),
        total = response.pagination.total,
        "Vehicles listed via API"
    );

    let meta = json!({ "pagination": response.pagination });

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(response.items, meta))).into_response())
}

/// Replace an existing vehicle
///
/// # Response
///
/// - `200 OK` - Vehicle updated
/// - `400 Bad Request` - Validation error
/// - `404 Not Found` - Vehicle not found
/// - `409 Conflict` - Vehicle number already registered
/// - `500 Internal Server Error` - Storage error
#[tracing::instrument(skip(state, command), fields(vehicle_id = id))]
async fn update_vehicle(
    State(state): State<FeatureState>,
    Path(id): Path<i64>,
    Json(mut command): Json<UpdateVehicleCommand>,
) -> Result<Response, VehicleApiError> {
    command.id = id;

    let response = super::commands::update::handle(state.store.as_ref(), command).await?;

    tracing::info!(vehicle_id = response.id, "Vehicle updated via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// Delete a vehicle that has no cargo assigned
///
/// # Response
///
/// - `204 No Content` - Vehicle deleted
/// - `404 Not Found` - Vehicle not found
/// - `409 Conflict` - Cargos still reference the vehicle
/// - `500 Internal Server Error` - Storage error
#[tracing::instrument(skip(state), fields(vehicle_id = id))]
async fn delete_vehicle(
    State(state): State<FeatureState>,
    Path(id): Path<i64>,
) -> Result<Response, VehicleApiError> {
    super::commands::delete::handle(state.store.as_ref(), DeleteVehicleCommand { id }).await?;

    tracing::info!(vehicle_id = id, "Vehicle deleted via API");

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Unified error type for vehicle API endpoints
#[derive(Debug)]
enum VehicleApiError {
    CreateError(CreateVehicleError),
    UpdateError(UpdateVehicleError),
    DeleteError(DeleteVehicleError),
    ListError(ListVehiclesError),
}

impl From<CreateVehicleError> for VehicleApiError {
    fn from(err: CreateVehicleError) -> Self {
        Self::CreateError(err)
    }
}

impl From<UpdateVehicleError> for VehicleApiError {
    fn from(err: UpdateVehicleError) -> Self {
        Self::UpdateError(err)
    }
}

impl From<DeleteVehicleError> for VehicleApiError {
    fn from(err: DeleteVehicleError) -> Self {
        Self::DeleteError(err)
    }
}

impl From<ListVehiclesError> for VehicleApiError {
    fn from(err: ListVehiclesError) -> Self {
        Self::ListError(err)
    }
}

impl IntoResponse for VehicleApiError {
    fn into_response(self) -> Response {
        match self {
            VehicleApiError::CreateError(CreateVehicleError::VehicleNumber(_))
            | VehicleApiError::CreateError(CreateVehicleError::RouteFrom(_))
            | VehicleApiError::CreateError(CreateVehicleError::RouteTo(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            VehicleApiError::CreateError(CreateVehicleError::DuplicateNumber(_)) => {
                let error = ErrorResponse::new("CONFLICT", self.to_string());
                (StatusCode::CONFLICT, Json(error)).into_response()
            },
            VehicleApiError::CreateError(CreateVehicleError::Store(_)) => {
                tracing::error!("Storage error during vehicle creation: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            VehicleApiError::UpdateError(UpdateVehicleError::VehicleNumber(_))
            | VehicleApiError::UpdateError(UpdateVehicleError::RouteFrom(_))
            | VehicleApiError::UpdateError(UpdateVehicleError::RouteTo(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            VehicleApiError::UpdateError(UpdateVehicleError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            VehicleApiError::UpdateError(UpdateVehicleError::DuplicateNumber(_)) => {
                let error = ErrorResponse::new("CONFLICT", self.to_string());
                (StatusCode::CONFLICT, Json(error)).into_response()
            },
            VehicleApiError::UpdateError(UpdateVehicleError::Store(_)) => {
                tracing::error!("Storage error during vehicle update: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            VehicleApiError::DeleteError(DeleteVehicleError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            VehicleApiError::DeleteError(DeleteVehicleError::HasCargos(_)) => {
                let error = ErrorResponse::new("CONFLICT", self.to_string());
                (StatusCode::CONFLICT, Json(error)).into_response()
            },
            VehicleApiError::DeleteError(DeleteVehicleError::Store(_)) => {
                tracing::error!("Storage error during vehicle deletion: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            VehicleApiError::ListError(ListVehiclesError::InvalidPagination(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            VehicleApiError::ListError(ListVehiclesError::Store(_)) => {
                tracing::error!("Storage error during vehicle listing: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

impl std::fmt::Display for VehicleApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateError(e) => write!(f, "{}", e),
            Self::UpdateError(e) => write!(f, "{}", e),
            Self::DeleteError(e) => write!(f, "{}", e),
            Self::ListError(e) => write!(f, "{}", e),
        }
    }
}
