//! Persistence layer
//!
//! All reads and writes go through the [`Store`] trait so that request
//! handlers and the ingestion pipeline stay independent of the backing
//! database. [`postgres::PgStore`] is the production implementation;
//! [`memory::MemoryStore`] backs tests and local development without a
//! database.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Cargo, DeliveryStatus, Vehicle, VehicleType};
use crate::filter::Predicate;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Vehicle number '{0}' is already registered")]
    DuplicateVehicleNumber(String),

    #[error("Vehicle {0} still has cargo assigned")]
    VehicleInUse(i64),

    #[error("Stored value could not be decoded: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Fields for a cargo insert or full update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCargo {
    pub vehicle_id: i64,
    pub description: String,
    pub weight: f64,
    pub status: DeliveryStatus,
}

/// Fields for a vehicle insert or full update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub vehicle_type: VehicleType,
    pub vehicle_number: String,
    pub route_from: String,
    pub route_to: String,
}

/// A cargo joined with the vehicle delivering it.
///
/// Every cargo references a vehicle, so the join never loses rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CargoWithVehicle {
    pub cargo: Cargo,
    pub vehicle: Vehicle,
}

/// A vehicle with every cargo currently assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleWithCargos {
    pub vehicle: Vehicle,
    pub cargos: Vec<Cargo>,
}

/// Storage operations for cargos and vehicles.
///
/// Update and delete report a missing row as `Ok(None)` / `Ok(false)`
/// rather than an error; the caller decides whether that is a problem.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn save_cargo(&self, new: NewCargo) -> Result<Cargo, StoreError>;

    async fn cargo_by_id(&self, id: i64) -> Result<Option<CargoWithVehicle>, StoreError>;

    async fn update_cargo(&self, id: i64, changes: NewCargo) -> Result<Option<Cargo>, StoreError>;

    async fn delete_cargo(&self, id: i64) -> Result<bool, StoreError>;

    /// One page of cargos matching `predicate`, ordered by id.
    async fn search_cargos(
        &self,
        predicate: &Predicate,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CargoWithVehicle>, StoreError>;

    /// Every cargo matching `predicate`, ordered by id.
    async fn cargos_matching(
        &self,
        predicate: &Predicate,
    ) -> Result<Vec<CargoWithVehicle>, StoreError>;

    async fn count_cargos(&self, predicate: &Predicate) -> Result<i64, StoreError>;

    /// Fails with [`StoreError::DuplicateVehicleNumber`] when the number is
    /// already taken.
    async fn save_vehicle(&self, new: NewVehicle) -> Result<Vehicle, StoreError>;

    async fn vehicle_by_id(&self, id: i64) -> Result<Option<Vehicle>, StoreError>;

    async fn vehicle_by_number(&self, number: &str) -> Result<Option<Vehicle>, StoreError>;

    /// One page of vehicles with their cargos, ordered by id.
    async fn list_vehicles(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VehicleWithCargos>, StoreError>;

    async fn count_vehicles(&self) -> Result<i64, StoreError>;

    async fn update_vehicle(
        &self,
        id: i64,
        changes: NewVehicle,
    ) -> Result<Option<Vehicle>, StoreError>;

    /// Fails with [`StoreError::VehicleInUse`] while cargos still reference
    /// the vehicle.
    async fn delete_vehicle(&self, id: i64) -> Result<bool, StoreError>;
}
