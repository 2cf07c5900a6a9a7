//! # pairdist Core Library
//!
//! Infrastructure core for pair-distribution-function and structure-factor
//! calculators: the registry, reflection, persistence, and incremental-update
//! machinery that every physics strategy family (peak profiles, baselines,
//! envelopes, radii and scattering-factor tables, pair-quantity calculators)
//! is built on.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers with a strict dependency direction:
//!
//! - **[`core`]: The Foundation.** Stateless contracts and data models:
//!   attribute reflection over named `f64` parameters, change tickers,
//!   prototype-based component registries with aliasing, the binary
//!   serialization bridge, structure snapshots, and the built-in strategy
//!   families with their sealed process-wide registries.
//!
//! - **[`engine`]: The Logic Core.** Stateful evaluation: structure diffing
//!   and pair-quantity accumulators that branch between cheap incremental
//!   patching and full recomputation based on how much of a structure
//!   changed.
//!
//! Concrete physics formulas are deliberately thin leaves over these
//! contracts; a new strategy type plugs into lookup-by-name, deep cloning,
//! attribute fitting, and binary persistence by registering a single
//! prototype.
//!
//! ## Example
//!
//! ```
//! use pairdist::core::attributes::Tunable;
//! use pairdist::core::components::baseline_registry;
//! use pairdist::core::components::baseline::Baseline;
//!
//! let mut baseline = baseline_registry().create("linear")?;
//! baseline.set_attribute("slope", 2.0)?;
//! assert_eq!(baseline.eval(3.0), 6.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod engine;
