//! Predicate providers and their registry
//!
//! One provider per filterable field. The registry is populated once at
//! startup and handed out behind `Arc`, so the provider set is closed for
//! the life of the process.

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;

use super::predicate::Predicate;
use crate::domain::{DeliveryStatus, VehicleType};

/// Errors raised while turning raw filter input into a predicate
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The request names a field no provider answers for
    #[error("Unsupported filter field: {0}")]
    UnknownField(String),
    /// A value for a registered field does not parse
    #[error("Invalid value '{value}' for filter field '{field}'")]
    InvalidValue { field: String, value: String },
}

/// Builds a predicate for one named field from its raw values.
///
/// Providers are stateless and shared read-only across concurrent request
/// handlers. Values carry OR semantics: the produced predicate accepts a
/// record matching any of them. Callers pass at least one value; an empty
/// slice produces a predicate that matches nothing.
pub trait PredicateProvider: Send + Sync {
    /// Field name this provider answers for
    fn key(&self) -> &'static str;

    /// Build the predicate accepting any of `values`
    fn build(&self, values: &[String]) -> Result<Predicate, FilterError>;
}

impl std::fmt::Debug for dyn PredicateProvider + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateProvider")
            .field("key", &self.key())
            .finish()
    }
}

/// Provider for the `status` field
pub struct StatusProvider;

impl PredicateProvider for StatusProvider {
    fn key(&self) -> &'static str {
        "status"
    }

    fn build(&self, values: &[String]) -> Result<Predicate, FilterError> {
        let statuses = values
            .iter()
            .map(|value| {
                DeliveryStatus::from_str(value).map_err(|_| FilterError::InvalidValue {
                    field: self.key().to_string(),
                    value: value.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Predicate::StatusIn(statuses))
    }
}

/// Provider for the `type` field, restricting through the cargo's vehicle
pub struct VehicleTypeProvider;

impl PredicateProvider for VehicleTypeProvider {
    fn key(&self) -> &'static str {
        "type"
    }

    fn build(&self, values: &[String]) -> Result<Predicate, FilterError> {
        let types = values
            .iter()
            .map(|value| {
                VehicleType::from_str(value).map_err(|_| FilterError::InvalidValue {
                    field: self.key().to_string(),
                    value: value.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Predicate::VehicleTypeIn(types))
    }
}

/// All providers, keyed by field name
pub struct PredicateRegistry {
    providers: HashMap<&'static str, Box<dyn PredicateProvider>>,
}

impl PredicateRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Registry with every provider the search API supports
    pub fn with_default_providers() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(StatusProvider));
        registry.register(Box::new(VehicleTypeProvider));
        registry
    }

    /// Register a provider under its key. Last registration wins.
    pub fn register(&mut self, provider: Box<dyn PredicateProvider>) {
        self.providers.insert(provider.key(), provider);
    }

    /// Look up the provider for a field name.
    pub fn resolve(&self, key: &str) -> Result<&dyn PredicateProvider, FilterError> {
        self.providers
            .get(key)
            .map(|p| p.as_ref())
            .ok_or_else(|| FilterError::UnknownField(key.to_string()))
    }

    /// Registered field names, sorted
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.providers.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for PredicateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
