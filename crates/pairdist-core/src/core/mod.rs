//! # Core Module
//!
//! The foundation layer: component infrastructure and structure models that
//! every physics strategy in the library rides on.
//!
//! ## Architecture
//!
//! - **Attribute Reflection** ([`attributes`]) - Named `f64` parameter tables
//!   letting opaque fitting drivers inspect and mutate any component by name
//! - **Change Tracking** ([`ticker`]) - Monotonic counters for cheap
//!   staleness checks by external cache layers
//! - **Component Registries** ([`registry`]) - Prototype-based runtime type
//!   lookup, aliasing, and construction-by-name for polymorphic strategy
//!   families
//! - **Binary Persistence** ([`serialization`]) - Self-describing tag+fields
//!   snapshots that restore the exact concrete subtype through a registry
//! - **Structure Models** ([`models`]) - Atomic sites and the snapshot
//!   contract consumed by the engine layer
//! - **Built-in Families** ([`components`]) - Baselines, envelopes, and peak
//!   profiles with their sealed process-wide registries
//!
//! ## Key Capabilities
//!
//! - **Dynamic extensibility** - a new strategy type becomes discoverable,
//!   cloneable, and serializable by registering one prototype
//! - **Zero-coupling parameter access** - drivers manipulate tunable scalars
//!   purely through string names
//! - **Exact state round-trips** - every serializable field participates in
//!   the binary encoding, so restored components are observably identical

pub mod attributes;
pub mod components;
pub mod models;
pub mod registry;
pub mod serialization;
pub mod ticker;
