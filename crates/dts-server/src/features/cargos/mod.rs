//! Cargo feature slice
//!
//! CRUD, filtered search, and bulk file import for cargos.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateCargoCommand, CreateCargoError, DeleteCargoCommand, DeleteCargoError,
    UpdateCargoCommand, UpdateCargoError, UploadCargoFilesCommand, UploadCargoFilesError,
};

pub use queries::{
    GetCargoError, GetCargoQuery, SearchCargosError, SearchCargosQuery, SearchCargosResponse,
};

pub use routes::cargos_routes;
pub use types::{CargoResponse, VehicleInfo};
