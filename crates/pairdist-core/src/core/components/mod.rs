//! Built-in strategy families and their process-wide registries.
//!
//! Each family keeps one global [`ComponentRegistry`] behind a `LazyLock`:
//! the initializer registers every built-in prototype and its aliases, then
//! seals the registry before the reference ever escapes. Population therefore
//! always completes before the first lookup, and steady-state lookups from
//! any thread need no locking because no entry is mutated after sealing.
//! A registration failure inside an initializer is a build misconfiguration
//! (two leaves claiming one tag) and panics with the offending name.
//!
//! Downstream strategy families follow the same pattern with their own
//! `ComponentRegistry` values; nothing here is special-cased.

pub mod baseline;
pub mod envelope;
pub mod profile;

use crate::core::registry::ComponentRegistry;
use baseline::{Baseline, LinearBaseline, ZeroBaseline};
use envelope::{Envelope, QResolutionEnvelope, ScaleEnvelope};
use profile::{GaussianProfile, PeakProfile};
use std::sync::LazyLock;

static BASELINES: LazyLock<ComponentRegistry<dyn Baseline>> = LazyLock::new(|| {
    let mut registry = ComponentRegistry::<dyn Baseline>::new("baseline");
    registry
        .register(Box::new(ZeroBaseline))
        .expect("baseline bootstrap");
    registry
        .register(Box::new(LinearBaseline::default()))
        .expect("baseline bootstrap");
    registry.alias("line", "linear").expect("baseline bootstrap");
    registry.seal();
    registry
});

static ENVELOPES: LazyLock<ComponentRegistry<dyn Envelope>> = LazyLock::new(|| {
    let mut registry = ComponentRegistry::<dyn Envelope>::new("envelope");
    registry
        .register(Box::new(ScaleEnvelope::default()))
        .expect("envelope bootstrap");
    registry
        .register(Box::new(QResolutionEnvelope::default()))
        .expect("envelope bootstrap");
    registry
        .alias("resolution", "qresolution")
        .expect("envelope bootstrap");
    registry.seal();
    registry
});

static PROFILES: LazyLock<ComponentRegistry<dyn PeakProfile>> = LazyLock::new(|| {
    let mut registry = ComponentRegistry::<dyn PeakProfile>::new("peak profile");
    registry
        .register(Box::new(GaussianProfile::default()))
        .expect("peak profile bootstrap");
    registry.alias("gauss", "gaussian").expect("peak profile bootstrap");
    registry.seal();
    registry
});

/// The sealed registry of built-in [`Baseline`] types.
pub fn baseline_registry() -> &'static ComponentRegistry<dyn Baseline> {
    &BASELINES
}

/// The sealed registry of built-in [`Envelope`] types.
pub fn envelope_registry() -> &'static ComponentRegistry<dyn Envelope> {
    &ENVELOPES
}

/// The sealed registry of built-in [`PeakProfile`] types.
pub fn profile_registry() -> &'static ComponentRegistry<dyn PeakProfile> {
    &PROFILES
}
