//! List vehicles query
//!
//! Returns one page of vehicles, each with its assigned cargos inlined.

use crate::features::shared::pagination::{PaginationMetadata, PaginationParams};
use crate::features::vehicles::types::VehicleWithCargosResponse;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Copy, Default)]
pub struct ListVehiclesQuery {
    pub pagination: PaginationParams,
}

#[derive(Debug)]
pub struct ListVehiclesResponse {
    pub items: Vec<VehicleWithCargosResponse>,
    pub pagination: PaginationMetadata,
}

#[derive(Debug, thiserror::Error)]
pub enum ListVehiclesError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

#[tracing::instrument(
    skip(store, query),
    fields(page = ?query.pagination.page, size = ?query.pagination.size)
)]
pub async fn handle(
    store: &dyn Store,
    query: ListVehiclesQuery,
) -> Result<ListVehiclesResponse, ListVehiclesError> {
    query
        .pagination
        .validate()
        .map_err(ListVehiclesError::InvalidPagination)?;

    let total = store.count_vehicles().await?;
    let rows = store
        .list_vehicles(query.pagination.size(), query.pagination.offset())
        .await?;

    tracing::debug!(total, returned = rows.len(), "Vehicles listed");

    Ok(ListVehiclesResponse {
        items: rows.into_iter().map(VehicleWithCargosResponse::from).collect(),
        pagination: PaginationMetadata::from_params(&query.pagination, total),
    })
}
