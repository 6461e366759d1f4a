//! In-memory store for tests and local development

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    CargoWithVehicle, NewCargo, NewVehicle, Store, StoreError, VehicleWithCargos,
};
use crate::domain::{Cargo, Vehicle};
use crate::filter::Predicate;

/// Hash-map backed [`Store`].
///
/// Enforces the same rules as the database schema: vehicle numbers are
/// unique and a vehicle cannot be deleted while cargos reference it.
/// Listings are ordered by id so pagination is deterministic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    vehicles: RwLock<HashMap<i64, Vehicle>>,
    cargos: RwLock<HashMap<i64, Cargo>>,
    next_vehicle_id: AtomicI64,
    next_cargo_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            vehicles: RwLock::new(HashMap::new()),
            cargos: RwLock::new(HashMap::new()),
            next_vehicle_id: AtomicI64::new(1),
            next_cargo_id: AtomicI64::new(1),
        }
    }

    async fn matching_cargos(&self, predicate: &Predicate) -> Vec<CargoWithVehicle> {
        let vehicles = self.vehicles.read().await;
        let cargos = self.cargos.read().await;

        let mut matches: Vec<CargoWithVehicle> = cargos
            .values()
            .filter_map(|cargo| {
                let vehicle = vehicles.get(&cargo.vehicle_id)?;
                predicate.matches(cargo, Some(vehicle)).then(|| CargoWithVehicle {
                    cargo: cargo.clone(),
                    vehicle: vehicle.clone(),
                })
            })
            .collect();
        matches.sort_by_key(|entry| entry.cargo.id);
        matches
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn save_cargo(&self, new: NewCargo) -> Result<Cargo, StoreError> {
        let mut cargos = self.cargos.write().await;
        let id = self.next_cargo_id.fetch_add(1, Ordering::Relaxed);
        let cargo = Cargo {
            id,
            vehicle_id: new.vehicle_id,
            description: new.description,
            weight: new.weight,
            status: new.status,
        };
        cargos.insert(id, cargo.clone());
        Ok(cargo)
    }

    async fn cargo_by_id(&self, id: i64) -> Result<Option<CargoWithVehicle>, StoreError> {
        let vehicles = self.vehicles.read().await;
        let cargos = self.cargos.read().await;

        Ok(cargos.get(&id).and_then(|cargo| {
            let vehicle = vehicles.get(&cargo.vehicle_id)?;
            Some(CargoWithVehicle {
                cargo: cargo.clone(),
                vehicle: vehicle.clone(),
            })
        }))
    }

    async fn update_cargo(&self, id: i64, changes: NewCargo) -> Result<Option<Cargo>, StoreError> {
        let mut cargos = self.cargos.write().await;
        let Some(cargo) = cargos.get_mut(&id) else {
            return Ok(None);
        };

        cargo.vehicle_id = changes.vehicle_id;
        cargo.description = changes.description;
        cargo.weight = changes.weight;
        cargo.status = changes.status;
        Ok(Some(cargo.clone()))
    }

    async fn delete_cargo(&self, id: i64) -> Result<bool, StoreError> {
        let mut cargos = self.cargos.write().await;
        Ok(cargos.remove(&id).is_some())
    }

    async fn search_cargos(
        &self,
        predicate: &Predicate,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CargoWithVehicle>, StoreError> {
        let matches = self.matching_cargos(predicate).await;
        Ok(matches
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn cargos_matching(
        &self,
        predicate: &Predicate,
    ) -> Result<Vec<CargoWithVehicle>, StoreError> {
        Ok(self.matching_cargos(predicate).await)
    }

    async fn count_cargos(&self, predicate: &Predicate) -> Result<i64, StoreError> {
        Ok(self.matching_cargos(predicate).await.len() as i64)
    }

    async fn save_vehicle(&self, new: NewVehicle) -> Result<Vehicle, StoreError> {
        let mut vehicles = self.vehicles.write().await;
        if vehicles.values().any(|v| v.vehicle_number == new.vehicle_number) {
            return Err(StoreError::DuplicateVehicleNumber(new.vehicle_number));
        }

        let id = self.next_vehicle_id.fetch_add(1, Ordering::Relaxed);
        let vehicle = Vehicle {
            id,
            vehicle_type: new.vehicle_type,
            vehicle_number: new.vehicle_number,
            route_from: new.route_from,
            route_to: new.route_to,
        };
        vehicles.insert(id, vehicle.clone());
        Ok(vehicle)
    }

    async fn vehicle_by_id(&self, id: i64) -> Result<Option<Vehicle>, StoreError> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.get(&id).cloned())
    }

    async fn vehicle_by_number(&self, number: &str) -> Result<Option<Vehicle>, StoreError> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.values().find(|v| v.vehicle_number == number).cloned())
    }

    async fn list_vehicles(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VehicleWithCargos>, StoreError> {
        let vehicles = self.vehicles.read().await;
        let cargos = self.cargos.read().await;

        let mut ordered: Vec<&Vehicle> = vehicles.values().collect();
        ordered.sort_by_key(|v| v.id);

        Ok(ordered
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|vehicle| {
                let mut assigned: Vec<Cargo> = cargos
                    .values()
                    .filter(|c| c.vehicle_id == vehicle.id)
                    .cloned()
                    .collect();
                assigned.sort_by_key(|c| c.id);
                VehicleWithCargos {
                    vehicle: vehicle.clone(),
                    cargos: assigned,
                }
            })
            .collect())
    }

    async fn count_vehicles(&self) -> Result<i64, StoreError> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.len() as i64)
    }

    async fn update_vehicle(
        &self,
        id: i64,
        changes: NewVehicle,
    ) -> Result<Option<Vehicle>, StoreError> {
        let mut vehicles = self.vehicles.write().await;
        if !vehicles.contains_key(&id) {
            return Ok(None);
        }
        let number_taken = vehicles
            .values()
            .any(|v| v.id != id && v.vehicle_number == changes.vehicle_number);
        if number_taken {
            return Err(StoreError::DuplicateVehicleNumber(changes.vehicle_number));
        }

        let vehicle = vehicles
            .get_mut(&id)
            .ok_or_else(|| StoreError::Decode("vehicle vanished during update".to_string()))?;
        vehicle.vehicle_type = changes.vehicle_type;
        vehicle.vehicle_number = changes.vehicle_number;
        vehicle.route_from = changes.route_from;
        vehicle.route_to = changes.route_to;
        Ok(Some(vehicle.clone()))
    }

    async fn delete_vehicle(&self, id: i64) -> Result<bool, StoreError> {
        let mut vehicles = self.vehicles.write().await;
        let cargos = self.cargos.read().await;

        if !vehicles.contains_key(&id) {
            return Ok(false);
        }
        if cargos.values().any(|c| c.vehicle_id == id) {
            return Err(StoreError::VehicleInUse(id));
        }

        Ok(vehicles.remove(&id).is_some())
    }
}
