//! Core domain model: vehicles, the cargo they carry, and the enumerations
//! both are classified by.
//!
//! Enum values travel as their uppercase names over the wire and in the
//! database. Parsing is strict: an unrecognized name is an error, never a
//! silent fallback, because filter semantics depend on rejecting typos.

use dts_common::DtsError;
use serde::{Deserialize, Serialize};

/// Delivery state of a single cargo record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    InTransit,
    Delivered,
    OutForDelivery,
    Pending,
    Returned,
    Lost,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::InTransit => "IN_TRANSIT",
            DeliveryStatus::Delivered => "DELIVERED",
            DeliveryStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::Returned => "RETURNED",
            DeliveryStatus::Lost => "LOST",
        }
    }
}

impl std::str::FromStr for DeliveryStatus {
    type Err = DtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_TRANSIT" => Ok(DeliveryStatus::InTransit),
            "DELIVERED" => Ok(DeliveryStatus::Delivered),
            "OUT_FOR_DELIVERY" => Ok(DeliveryStatus::OutForDelivery),
            "PENDING" => Ok(DeliveryStatus::Pending),
            "RETURNED" => Ok(DeliveryStatus::Returned),
            "LOST" => Ok(DeliveryStatus::Lost),
            other => Err(DtsError::Parse(format!("unknown delivery status: {other}"))),
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of vehicle a cargo is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Car,
    Truck,
    Train,
    Plane,
    Ship,
    Helicopter,
    Drone,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "CAR",
            VehicleType::Truck => "TRUCK",
            VehicleType::Train => "TRAIN",
            VehicleType::Plane => "PLANE",
            VehicleType::Ship => "SHIP",
            VehicleType::Helicopter => "HELICOPTER",
            VehicleType::Drone => "DRONE",
        }
    }
}

impl std::str::FromStr for VehicleType {
    type Err = DtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CAR" => Ok(VehicleType::Car),
            "TRUCK" => Ok(VehicleType::Truck),
            "TRAIN" => Ok(VehicleType::Train),
            "PLANE" => Ok(VehicleType::Plane),
            "SHIP" => Ok(VehicleType::Ship),
            "HELICOPTER" => Ok(VehicleType::Helicopter),
            "DRONE" => Ok(VehicleType::Drone),
            other => Err(DtsError::Parse(format!("unknown vehicle type: {other}"))),
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: i64,
    pub vehicle_type: VehicleType,
    pub vehicle_number: String,
    pub route_from: String,
    pub route_to: String,
}

/// A cargo record, always owned by exactly one vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct Cargo {
    pub id: i64,
    pub vehicle_id: i64,
    pub description: String,
    pub weight: f64,
    pub status: DeliveryStatus,
}
