//! DTS Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the delivery tracking service
//! workspace.
//!
//! # Overview
//!
//! - **Error Handling**: the [`DtsError`] type and the [`Result`] alias
//! - **Logging**: environment-driven [`logging::LogConfig`] and the
//!   [`logging::init_logging`] bootstrap built on `tracing`
//!
//! # Example
//!
//! ```no_run
//! use dts_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     tracing::info!("service starting");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

pub use error::{DtsError, Result};
