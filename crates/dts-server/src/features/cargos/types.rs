//! Cargo API representations

use serde::{Deserialize, Serialize};

use crate::domain::{Cargo, DeliveryStatus, Vehicle, VehicleType};
use crate::store::CargoWithVehicle;

/// Vehicle block embedded in cargo responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub id: i64,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub vehicle_number: String,
    pub route_from: String,
    pub route_to: String,
}

impl From<Vehicle> for VehicleInfo {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            vehicle_type: vehicle.vehicle_type,
            vehicle_number: vehicle.vehicle_number,
            route_from: vehicle.route_from,
            route_to: vehicle.route_to,
        }
    }
}

/// A cargo as returned by every cargo endpoint, with the delivering
/// vehicle embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoResponse {
    pub id: i64,
    pub vehicle: VehicleInfo,
    pub description: String,
    pub weight: f64,
    pub status: DeliveryStatus,
}

impl CargoResponse {
    pub fn from_parts(cargo: Cargo, vehicle: Vehicle) -> Self {
        Self {
            id: cargo.id,
            vehicle: vehicle.into(),
            description: cargo.description,
            weight: cargo.weight,
            status: cargo.status,
        }
    }
}

impl From<CargoWithVehicle> for CargoResponse {
    fn from(joined: CargoWithVehicle) -> Self {
        Self::from_parts(joined.cargo, joined.vehicle)
    }
}
