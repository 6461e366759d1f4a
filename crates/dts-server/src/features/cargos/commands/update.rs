//! Update cargo command
//!
//! Full replacement of a cargo's fields. The target vehicle is re-resolved
//! by number, so an update can move the cargo to a different vehicle.

use serde::{Deserialize, Serialize};

use crate::features::cargos::types::CargoResponse;
use crate::features::shared::validation::{
    validate_description, validate_vehicle_number, validate_weight, DescriptionError,
    VehicleNumberError, WeightError,
};
use crate::domain::DeliveryStatus;
use crate::store::{NewCargo, Store, StoreError};

/// Command to update an existing cargo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCargoCommand {
    /// Cargo id, taken from the request path
    #[serde(default)]
    pub id: i64,

    pub vehicle_number: String,
    pub description: String,
    pub weight: f64,
    pub status: DeliveryStatus,
}

/// Errors that can occur when updating a cargo
#[derive(Debug, thiserror::Error)]
pub enum UpdateCargoError {
    #[error("Vehicle number validation failed: {0}")]
    VehicleNumber(#[from] VehicleNumberError),

    #[error("Description validation failed: {0}")]
    Description(#[from] DescriptionError),

    #[error("Weight validation failed: {0}")]
    Weight(#[from] WeightError),

    #[error("Can't find vehicle by vehicle number: {0}")]
    VehicleNotFound(String),

    #[error("Cargo with id '{0}' not found")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl UpdateCargoCommand {
    pub fn validate(&self) -> Result<(), UpdateCargoError> {
        validate_vehicle_number(&self.vehicle_number)?;
        validate_description(&self.description)?;
        validate_weight(self.weight)?;
        Ok(())
    }
}

/// Handles the update cargo command
///
/// # Errors
///
/// - Validation errors if command parameters are invalid
/// - `VehicleNotFound` - No vehicle carries the given number
/// - `NotFound` - No cargo has this id
/// - `Store` - The storage backend failed
#[tracing::instrument(skip(store, command), fields(cargo_id = command.id))]
pub async fn handle(
    store: &dyn Store,
    command: UpdateCargoCommand,
) -> Result<CargoResponse, UpdateCargoError> {
    command.validate()?;

    let vehicle = store
        .vehicle_by_number(&command.vehicle_number)
        .await?
        .ok_or_else(|| UpdateCargoError::VehicleNotFound(command.vehicle_number.clone()))?;

    let updated = store
        .update_cargo(
            command.id,
            NewCargo {
                vehicle_id: vehicle.id,
                description: command.description,
                weight: command.weight,
                status: command.status,
            },
        )
        .await?
        .ok_or(UpdateCargoError::NotFound(command.id))?;

    tracing::info!(cargo_id = updated.id, vehicle_id = vehicle.id, "Cargo updated");

    Ok(CargoResponse::from_parts(updated, vehicle))
}
