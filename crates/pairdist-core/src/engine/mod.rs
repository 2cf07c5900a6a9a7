//! # Engine Module
//!
//! The stateful evaluation layer: decides between incremental patching and
//! full recomputation of pairwise quantities as structures evolve.
//!
//! - **Structure Diffing** ([`diff`]) - Site-set symmetric differences and
//!   the fast-update feasibility verdict
//! - **Pair Accumulation** ([`pair_quantity`]) - Cached pairwise sums that
//!   patch themselves in `O(N * K)` for small perturbations instead of
//!   rebuilding in `O(N^2)`

pub mod diff;
pub mod pair_quantity;
