#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/// Core domain models for flow aggregation.
///
/// This module contains the data structures produced and consumed by each
/// stage of the per-interval pipeline. All of them are interval-scoped and
/// immutable once produced.
///
/// The models in this module are primarily data structures with minimal business logic,
/// following the principles of the hexagonal architecture to separate domain entities
/// from their persistence and processing implementations.
pub mod models;

/// Interface traits for flow aggregation.
///
/// This module contains the "ports" in the hexagonal architecture pattern.
///
/// These traits define the contract between the allocation engine and external adapters
/// (time-series stores, aggregate tables) without specifying implementation details.
/// This separation allows for easier testing and the ability to swap out infrastructure
/// components without affecting the core computation.
pub mod ports;
