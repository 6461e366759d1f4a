//! Vehicle feature slice

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateVehicleCommand, CreateVehicleError, DeleteVehicleCommand, DeleteVehicleError,
    UpdateVehicleCommand, UpdateVehicleError,
};

pub use queries::{ListVehiclesError, ListVehiclesQuery, ListVehiclesResponse};

pub use routes::vehicles_routes;
pub use types::{CargoSummary, VehicleResponse, VehicleWithCargosResponse};
