//! Composable boolean tests over cargo records

use crate::domain::{Cargo, DeliveryStatus, Vehicle, VehicleType};

/// A boolean test over a cargo record and its (optional) vehicle.
///
/// `And`/`Or` compose arbitrarily; the leaf variants test one field each
/// with OR semantics across their value list. [`Predicate::All`] is the
/// identity of `and`, so an unfiltered search composes to `All` and stays
/// recognizable to store backends that want to skip the WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every record
    All,
    /// Cargo status is one of the listed values
    StatusIn(Vec<DeliveryStatus>),
    /// Owning vehicle exists and its type is one of the listed values
    VehicleTypeIn(Vec<VehicleType>),
    /// Every part matches
    And(Vec<Predicate>),
    /// At least one part matches
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Conjunction. `All` is the identity; nested `And`s are flattened.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::All, p) | (p, Predicate::All) => p,
            (Predicate::And(mut parts), p) => {
                parts.push(p);
                Predicate::And(parts)
            },
            (a, b) => Predicate::And(vec![a, b]),
        }
    }

    /// Disjunction. `All` absorbs; nested `Or`s are flattened.
    pub fn or(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::All, _) | (_, Predicate::All) => Predicate::All,
            (Predicate::Or(mut parts), p) => {
                parts.push(p);
                Predicate::Or(parts)
            },
            (a, b) => Predicate::Or(vec![a, b]),
        }
    }

    /// True when the predicate places no restriction at all.
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Predicate::All)
    }

    /// Evaluate against one record.
    ///
    /// `vehicle` is the record's owning vehicle if the relation could be
    /// resolved. A vehicle-type test on a record without a vehicle is
    /// false: the filter restricts to records that join through.
    pub fn matches(&self, cargo: &Cargo, vehicle: Option<&Vehicle>) -> bool {
        match self {
            Predicate::All => true,
            Predicate::StatusIn(statuses) => statuses.contains(&cargo.status),
            Predicate::VehicleTypeIn(types) => {
                vehicle.is_some_and(|v| types.contains(&v.vehicle_type))
            },
            Predicate::And(parts) => parts.iter().all(|p| p.matches(cargo, vehicle)),
            Predicate::Or(parts) => parts.iter().any(|p| p.matches(cargo, vehicle)),
        }
    }
}
