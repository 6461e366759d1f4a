//! Update vehicle command

use serde::{Deserialize, Serialize};

use crate::domain::VehicleType;
use crate::features::shared::validation::{
    validate_route, validate_vehicle_number, RouteError, VehicleNumberError,
};
use crate::features::vehicles::types::VehicleResponse;
use crate::store::{NewVehicle, Store, StoreError};

/// Command to replace a vehicle's fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleCommand {
    /// Vehicle id, taken from the request path
    #[serde(default)]
    pub id: i64,

    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub vehicle_number: String,
    pub route_from: String,
    pub route_to: String,
}

/// Errors that can occur when updating a vehicle
#[derive(Debug, thiserror::Error)]
pub enum UpdateVehicleError {
    #[error("Vehicle number validation failed: {0}")]
    VehicleNumber(#[from] VehicleNumberError),

    #[error("routeFrom validation failed: {0}")]
    RouteFrom(RouteError),

    #[error("routeTo validation failed: {0}")]
    RouteTo(RouteError),

    #[error("Vehicle with id '{0}' not found")]
    NotFound(i64),

    #[error("Vehicle with number '{0}' already exists")]
    DuplicateNumber(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl UpdateVehicleCommand {
    pub fn validate(&self) -> Result<(), UpdateVehicleError> {
        validate_vehicle_number(&self.vehicle_number)?;
        validate_route(&self.route_from).map_err(UpdateVehicleError::RouteFrom)?;
        validate_route(&self.route_to).map_err(UpdateVehicleError::RouteTo)?;
        Ok(())
    }
}

/// Handles the update vehicle command
///
/// # Errors
///
/// - Validation errors if command parameters are invalid
/// - `NotFound` - No vehicle has this id
/// - `DuplicateNumber` - Another vehicle already carries the new number
/// - `Store` - The storage backend failed
#[tracing::instrument(skip(store, command), fields(vehicle_id = command.id))]
pub async fn handle(
    store: &dyn Store,
    command: UpdateVehicleCommand,
) -> Result<VehicleResponse, UpdateVehicleError> {
    command.validate()?;

    let result = store
        .update_vehicle(
            command.id,
            NewVehicle {
                vehicle_type: command.vehicle_type,
                vehicle_number: command.vehicle_number,
                route_from: command.route_from,
                route_to: command.route_to,
            },
        )
        .await;

    let vehicle = match result {
        Ok(Some(vehicle)) => vehicle,
        Ok(None) => return Err(UpdateVehicleError::NotFound(command.id)),
        Err(StoreError::DuplicateVehicleNumber(number)) => {
            return Err(UpdateVehicleError::DuplicateNumber(number));
        },
        Err(e) => return Err(e.into()),
    };

    tracing::info!(vehicle_id = vehicle.id, "Vehicle updated");

    Ok(vehicle.into())
}
