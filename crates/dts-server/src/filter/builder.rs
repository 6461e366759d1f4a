//! Conjunctive composition of per-field predicates

use std::collections::BTreeMap;

use super::predicate::Predicate;
use super::providers::{FilterError, PredicateRegistry};

/// Raw search input: field name to the values accepted for that field.
///
/// Absent fields place no constraint. Fields iterate in sorted name order,
/// so the predicate built from a request is independent of the order the
/// parameters arrived in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    fields: BTreeMap<String, Vec<String>>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one accepted value for a field.
    pub fn add_value(&mut self, field: &str, value: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(value.into());
    }

    /// Builder-style variant of [`add_value`](Self::add_value) taking the
    /// whole value list at once.
    pub fn with_field(mut self, field: impl Into<String>, values: Vec<String>) -> Self {
        self.fields.insert(field.into(), values);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|values| values.is_empty())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, values)| (field.as_str(), values.as_slice()))
    }
}

/// Folds a [`SearchRequest`] into one predicate via the registry.
pub struct FilterBuilder<'a> {
    registry: &'a PredicateRegistry,
}

impl<'a> FilterBuilder<'a> {
    pub fn new(registry: &'a PredicateRegistry) -> Self {
        Self { registry }
    }

    /// Resolve every present field and AND the resulting predicates.
    ///
    /// Starts from [`Predicate::All`], so a request with no fields selects
    /// everything. Fields with an empty value list are skipped. Fails on
    /// the first unknown field or unparseable value; no partial predicate
    /// escapes.
    pub fn build(&self, request: &SearchRequest) -> Result<Predicate, FilterError> {
        let mut predicate = Predicate::All;
        for (field, values) in request.fields() {
            if values.is_empty() {
                continue;
            }
            let provider = self.registry.resolve(field)?;
            predicate = predicate.and(provider.build(values)?);
        }
        Ok(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeliveryStatus, VehicleType};

    fn registry() -> PredicateRegistry {
        PredicateRegistry::with_default_providers()
    }

    #[test]
    fn test_empty_request_selects_everything() {
        let registry = registry();
        let predicate = FilterBuilder::new(&registry)
            .build(&SearchRequest::new())
            .unwrap();
        assert!(predicate.is_unrestricted());
    }

    #[test]
    fn test_single_field() {
        let registry = registry();
        let request =
            SearchRequest::new().with_field("status", vec!["DELIVERED".to_string()]);
        let predicate = FilterBuilder::new(&registry).build(&request).unwrap();
        assert_eq!(predicate, Predicate::StatusIn(vec![DeliveryStatus::Delivered]));
    }

    #[test]
    fn test_fields_compose_conjunctively() {
        let registry = registry();
        let request = SearchRequest::new()
            .with_field("status", vec!["DELIVERED".to_string()])
            .with_field("type", vec!["TRUCK".to_string(), "SHIP".to_string()]);
        let predicate = FilterBuilder::new(&registry).build(&request).unwrap();
        assert_eq!(
            predicate,
            Predicate::And(vec![
                Predicate::StatusIn(vec![DeliveryStatus::Delivered]),
                Predicate::VehicleTypeIn(vec![VehicleType::Truck, VehicleType::Ship]),
            ])
        );
    }

    #[test]
    fn test_field_order_does_not_matter() {
        let registry = registry();
        let builder = FilterBuilder::new(&registry);

        let mut status_first = SearchRequest::new();
        status_first.add_value("status", "PENDING");
        status_first.add_value("type", "CAR");

        let mut type_first = SearchRequest::new();
        type_first.add_value("type", "CAR");
        type_first.add_value("status", "PENDING");

        assert_eq!(
            builder.build(&status_first).unwrap(),
            builder.build(&type_first).unwrap()
        );
    }

    #[test]
    fn test_unknown_field_fails_the_build() {
        let registry = registry();
        let request = SearchRequest::new()
            .with_field("status", vec!["PENDING".to_string()])
            .with_field("colour", vec!["red".to_string()]);
        let err = FilterBuilder::new(&registry).build(&request).unwrap_err();
        assert_eq!(err, FilterError::UnknownField("colour".to_string()));
    }

    #[test]
    fn test_empty_value_list_is_skipped() {
        let registry = registry();
        let request = SearchRequest::new().with_field("status", Vec::new());
        let predicate = FilterBuilder::new(&registry).build(&request).unwrap();
        assert!(predicate.is_unrestricted());
    }

    #[test]
    fn test_invalid_value_fails_the_build() {
        let registry = registry();
        let request = SearchRequest::new().with_field("type", vec!["BICYCLE".to_string()]);
        let err = FilterBuilder::new(&registry).build(&request).unwrap_err();
        assert!(matches!(err, FilterError::InvalidValue { .. }));
    }
}
