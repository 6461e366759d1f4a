//! Dynamic predicate composition for cargo search
//!
//! Search requests arrive as optional, independently specified fields
//! (`status`, `type`, ...). Each field is owned by a [`PredicateProvider`]
//! registered in a [`PredicateRegistry`]; the [`FilterBuilder`] resolves the
//! providers and folds their predicates into one conjunctive [`Predicate`].
//!
//! A predicate is a plain value. The in-memory store evaluates it directly
//! against `(cargo, vehicle)` pairs; the PostgreSQL store renders it to SQL
//! conditions. Both read the same tree, so the two backends cannot drift.

pub mod builder;
pub mod predicate;
pub mod providers;

pub use builder::{FilterBuilder, SearchRequest};
pub use predicate::Predicate;
pub use providers::{FilterError, PredicateProvider, PredicateRegistry};
