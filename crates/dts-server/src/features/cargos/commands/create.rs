//! Create cargo command
//!
//! Registers a new cargo and assigns it to an existing vehicle, addressed
//! by its vehicle number rather than its id.

use serde::{Deserialize, Serialize};

use crate::features::cargos::types::CargoResponse;
use crate::features::shared::validation::{
    validate_description, validate_vehicle_number, validate_weight, DescriptionError,
    VehicleNumberError, WeightError,
};
use crate::domain::DeliveryStatus;
use crate::store::{NewCargo, Store, StoreError};

/// Command to create a new cargo
///
/// # Examples
///
/// ```rust,ignore
/// use dts_server::features::cargos::commands::CreateCargoCommand;
/// use dts_server::domain::DeliveryStatus;
///
/// let command = CreateCargoCommand {
///     vehicle_number: "AA1234BB".to_string(),
///     description: "Office furniture".to_string(),
///     weight: 540.0,
///     status: DeliveryStatus::Pending,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCargoCommand {
    /// Number of the vehicle that will carry the cargo
    pub vehicle_number: String,

    /// What is being shipped
    pub description: String,

    /// Weight in kilograms
    pub weight: f64,

    /// Initial delivery status
    pub status: DeliveryStatus,
}

/// Errors that can occur when creating a cargo
#[derive(Debug, thiserror::Error)]
pub enum CreateCargoError {
    #[error("Vehicle number validation failed: {0}")]
    VehicleNumber(#[from] VehicleNumberError),

    #[error("Description validation failed: {0}")]
    Description(#[from] DescriptionError),

    #[error("Weight validation failed: {0}")]
    Weight(#[from] WeightError),

    #[error("Can't find vehicle by vehicle number: {0}")]
    VehicleNotFound(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl CreateCargoCommand {
    /// Validates the command parameters
    ///
    /// # Errors
    ///
    /// - `VehicleNumber` - Number is empty or not alphanumeric
    /// - `Description` - Description is empty
    /// - `Weight` - Weight is negative or not finite
    pub fn validate(&self) -> Result<(), CreateCargoError> {
        validate_vehicle_number(&self.vehicle_number)?;
        validate_description(&self.description)?;
        validate_weight(self.weight)?;
        Ok(())
    }
}

/// Handles the create cargo command
///
/// Resolves the vehicle by number, then persists the cargo against it.
///
/// # Errors
///
/// - Validation errors if command parameters are invalid
/// - `VehicleNotFound` - No vehicle carries the given number
/// - `Store` - The storage backend failed
#[tracing::instrument(skip(store, command), fields(vehicle_number = %command.vehicle_number))]
pub async fn handle(
    store: &dyn Store,
    command: CreateCargoCommand,
) -> Result<CargoResponse, CreateCargoError> {
    command.validate()?;

    let vehicle = store
        .vehicle_by_number(&command.vehicle_number)
        .await?
        .ok_or_else(|| CreateCargoError::VehicleNotFound(command.vehicle_number.clone()))?;

    let cargo = store
        .save_cargo(NewCargo {
            vehicle_id: vehicle.id,
            description: command.description,
            weight: command.weight,
            status: command.status,
        })
        .await?;

    tracing::info!(cargo_id = cargo.id, vehicle_id = vehicle.id, "Cargo created");

    Ok(CargoResponse::from_parts(cargo, vehicle))
}
