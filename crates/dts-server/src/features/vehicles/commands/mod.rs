pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateVehicleCommand, CreateVehicleError};
pub use delete::{DeleteVehicleCommand, DeleteVehicleError};
pub use update::{UpdateVehicleCommand, UpdateVehicleError};
