//! Delete cargo command

use serde::{Deserialize, Serialize};

use crate::store::{Store, StoreError};

/// Command to delete a cargo by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCargoCommand {
    pub id: i64,
}

/// Errors that can occur when deleting a cargo
#[derive(Debug, thiserror::Error)]
pub enum DeleteCargoError {
    #[error("Cargo with id '{0}' not found")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Handles the delete cargo command
///
/// # Errors
///
/// - `NotFound` - No cargo has this id
/// - `Store` - The storage backend failed
#[tracing::instrument(skip(store), fields(cargo_id = command.id))]
pub async fn handle(store: &dyn Store, command: DeleteCargoCommand) -> Result<(), DeleteCargoError> {
    if !store.delete_cargo(command.id).await? {
        return Err(DeleteCargoError::NotFound(command.id));
    }

    tracing::info!(cargo_id = command.id, "Cargo deleted");
    Ok(())
}
