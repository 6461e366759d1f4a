//! Helpers shared across feature slices

pub mod pagination;
pub mod validation;
