//! Get cargo query

use serde::{Deserialize, Serialize};

use crate::features::cargos::types::CargoResponse;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCargoQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetCargoError {
    #[error("Cargo with id '{0}' not found")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

#[tracing::instrument(skip(store), fields(cargo_id = query.id))]
pub async fn handle(store: &dyn Store, query: GetCargoQuery) -> Result<CargoResponse, GetCargoError> {
    let found = store
        .cargo_by_id(query.id)
        .await?
        .ok_or(GetCargoError::NotFound(query.id))?;

    Ok(found.into())
}
