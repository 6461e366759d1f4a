pub mod create;
pub mod delete;
pub mod update;
pub mod upload;

pub use create::{CreateCargoCommand, CreateCargoError};
pub use delete::{DeleteCargoCommand, DeleteCargoError};
pub use update::{UpdateCargoCommand, UpdateCargoError};
pub use upload::{UploadCargoFilesCommand, UploadCargoFilesError};
