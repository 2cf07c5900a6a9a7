//! # Core Models Module
//!
//! Structure representation consumed by the pairwise engine layer.
//!
//! ## Key Components
//!
//! - [`site`] - Atomic site content: element symbol, position, occupancy
//! - [`snapshot`] - The [`snapshot::SiteView`] contract external structure
//!   representations are adapted to, plus the library's own owned
//!   [`snapshot::StructureSnapshot`]
//!
//! Snapshots are immutable views of a structure's site set at one point in
//! time; everything downstream (diffing, pair accumulation) relies on their
//! stable indexing and on site equality being total.

pub mod site;
pub mod snapshot;
