pub mod get;
pub mod search;

pub use get::{GetCargoError, GetCargoQuery};
pub use search::{SearchCargosError, SearchCargosQuery, SearchCargosResponse};
