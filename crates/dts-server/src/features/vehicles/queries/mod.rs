pub mod list;

pub use list::{ListVehiclesError, ListVehiclesQuery, ListVehiclesResponse};
