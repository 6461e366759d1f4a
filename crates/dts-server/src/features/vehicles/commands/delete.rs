//! Delete vehicle command

use serde::{Deserialize, Serialize};

use crate::store::{Store, StoreError};

/// Command to delete a vehicle by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteVehicleCommand {
    pub id: i64,
}

/// Errors that can occur when deleting a vehicle
#[derive(Debug, thiserror::Error)]
pub enum DeleteVehicleError {
    #[error("Vehicle with id '{0}' not found")]
    NotFound(i64),

    #[error("Vehicle {0} still has cargo assigned and cannot be deleted")]
    HasCargos(i64),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Handles the delete vehicle command
///
/// # Errors
///
/// - `NotFound` - No vehicle has this id
/// - `HasCargos` - Cargos still reference the vehicle
/// - `Store` - The storage backend failed
#[tracing::instrument(skip(store), fields(vehicle_id = command.id))]
pub async fn handle(
    store: &dyn Store,
    command: DeleteVehicleCommand,
) -> Result<(), DeleteVehicleError> {
    match store.delete_vehicle(command.id).await {
        Ok(true) => {
            tracing::info!(vehicle_id = command.id, "Vehicle deleted");
            Ok(())
        },
        Ok(false) => Err(DeleteVehicleError::NotFound(command.id)),
        Err(StoreError::VehicleInUse(id)) => Err(DeleteVehicleError::HasCargos(id)),
        Err(e) => Err(e.into()),
    }
}
