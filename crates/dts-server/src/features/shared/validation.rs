//! Field validation rules
//!
//! The same rules apply no matter how a cargo or vehicle enters the
//! system: REST commands reject the request, the bulk pipeline counts the
//! record as a failed import.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VehicleNumberError {
    #[error("Vehicle number is required and cannot be empty")]
    Required,
    #[error("Vehicle number can only contain letters and digits")]
    NotAlphanumeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DescriptionError {
    #[error("Description is required and cannot be empty")]
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WeightError {
    #[error("Weight must be a finite number")]
    NotFinite,
    #[error("Weight cannot be negative")]
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Route endpoint is required and cannot be empty")]
    Required,
}

/// Vehicle numbers are plate-style identifiers: ASCII letters and digits
/// only, at least one character.
pub fn validate_vehicle_number(number: &str) -> Result<(), VehicleNumberError> {
    if number.trim().is_empty() {
        return Err(VehicleNumberError::Required);
    }
    if !number.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(VehicleNumberError::NotAlphanumeric);
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), DescriptionError> {
    if description.trim().is_empty() {
        return Err(DescriptionError::Required);
    }
    Ok(())
}

pub fn validate_weight(weight: f64) -> Result<(), WeightError> {
    if !weight.is_finite() {
        return Err(WeightError::NotFinite);
    }
    if weight < 0.0 {
        return Err(WeightError::Negative);
    }
    Ok(())
}

pub fn validate_route(endpoint: &str) -> Result<(), RouteError> {
    if endpoint.trim().is_empty() {
        return Err(RouteError::Required);
    }
    Ok(())
}
