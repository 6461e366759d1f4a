//! Shared HTTP surface types

pub mod response;
