//! Vehicle API representations

use serde::{Deserialize, Serialize};

use crate::domain::{Cargo, DeliveryStatus, Vehicle, VehicleType};
use crate::store::VehicleWithCargos;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub vehicle_number: String,
    pub route_from: String,
    pub route_to: String,
}

impl From<Vehicle> for VehicleResponse {
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

/// Cargo block embedded in vehicle listings. The vehicle is not repeated
/// inside its own cargos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoSummary {
    pub id: i64,
    pub description: String,
    pub weight: f64,
    pub status: DeliveryStatus,
}

impl From<Cargo> for CargoSummary {
    fn from(cargo: Cargo) -> Self {
        Self {
            id: cargo.id,
            description: cargo.description,
            weight: cargo.weight,
            status: cargo.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleWithCargosResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub vehicle_number: String,
    pub route_from: String,
    pub route_to: String,
    pub cargos: Vec<CargoSummary>,
}

impl From<VehicleWithCargos> for VehicleWithCargosResponse {
    fn from(listed: VehicleWithCargos) -> Self {
        Self {
            id: listed.vehicle.id,
            vehicle_type: listed.vehicle.vehicle_type,
            vehicle_number: listed.vehicle.vehicle_number,
            route_from: listed.vehicle.route_from,
            route_to: listed.vehicle.route_to,
            cargos: listed.cargos.into_iter().map(CargoSummary::from).collect(),
        }
    }
}
