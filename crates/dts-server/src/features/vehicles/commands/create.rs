//! Create vehicle command

use serde::{Deserialize, Serialize};

use crate::domain::VehicleType;
use crate::features::shared::validation::{
    validate_route, validate_vehicle_number, RouteError, VehicleNumberError,
};
use crate::features::vehicles::types::VehicleResponse;
use crate::store::{NewVehicle, Store, StoreError};

/// Command to register a new vehicle
///
/// # Examples
///
/// ```rust,ignore
/// use dts_server::domain::VehicleType;
/// use dts_server::features::vehicles::commands::CreateVehicleCommand;
///
/// let command = CreateVehicleCommand {
///     vehicle_type: VehicleType::Truck,
///     vehicle_number: "AA1234BB".to_string(),
///     route_from: "Kyiv".to_string(),
///     route_to: "Lviv".to_string(),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleCommand {
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,

    /// Unique plate-style number
    pub vehicle_number: String,

    pub route_from: String,
    pub route_to: String,
}

/// Errors that can occur when creating a vehicle
#[derive(Debug, thiserror::Error)]
pub enum CreateVehicleError {
    #[error("Vehicle number validation failed: {0}")]
    VehicleNumber(#[from] VehicleNumberError),

    #[error("routeFrom validation failed: {0}")]
    RouteFrom(RouteError),

    #[error("routeTo validation failed: {0}")]
    RouteTo(RouteError),

    #[error("Vehicle with number '{0}' already exists")]
    DuplicateNumber(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl CreateVehicleCommand {
    pub fn validate(&self) -> Result<(), CreateVehicleError> {
        validate_vehicle_number(&self.vehicle_number)?;
        validate_route(&self.route_from).map_err(CreateVehicleError::RouteFrom)?;
        validate_route(&self.route_to).map_err(CreateVehicleError::RouteTo)?;
        Ok(())
    }
}

/// Handles the create vehicle command
///
/// # Errors
///
/// - Validation errors if command parameters are invalid
/// - `DuplicateNumber` - Another vehicle already carries this number
/// - `Store` - The storage backend failed
#[tracing::instrument(skip(store, command), fields(vehicle_number = %command.vehicle_number))]
pub async fn handle(
    store: &dyn Store,
    command: CreateVehicleCommand,
) -> Result<VehicleResponse, CreateVehicleError> {
    command.validate()?;

    let result = store
        .save_vehicle(NewVehicle {
            vehicle_type: command.vehicle_type,
            vehicle_number: command.vehicle_number,
            route_from: command.route_from,
            route_to: command.route_to,
        })
        .await;

    let vehicle = match result {
        Ok(vehicle) => vehicle,
        Err(StoreError::DuplicateVehicleNumber(number)) => {
            return Err(CreateVehicleError::DuplicateNumber(number));
        },
        Err(e) => return Err(e.into()),
    };

    tracing::info!(vehicle_id = vehicle.id, "Vehicle created");

    Ok(vehicle.into())
}
