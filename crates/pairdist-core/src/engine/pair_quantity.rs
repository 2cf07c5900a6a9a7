use super::diff::{StructureDiffEngine, StructureDifference};
use crate::core::models::site::AtomSite;
use crate::core::models::snapshot::{SiteView, StructureSnapshot};
use crate::core::ticker::ChangeTicker;
use tracing::{info, trace};

/// Per-pair term of an accumulated pairwise quantity.
pub trait PairContribution: Send + Sync {
    /// Value contributed by the unordered site pair `(a, b)`.
    fn pair_value(&self, a: &AtomSite, b: &AtomSite) -> f64;
}

/// Occupancy-weighted pair distance; the simplest useful pairwise quantity,
/// also used to exercise the incremental-update path in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceSum;

impl PairContribution for DistanceSum {
    fn pair_value(&self, a: &AtomSite, b: &AtomSite) -> f64 {
        (a.position - b.position).norm() * a.occupancy * b.occupancy
    }
}

/// Accumulates `sum over i < j of c(site_i, site_j)` for a structure and
/// keeps the result current across structure changes.
///
/// On every evaluation the quantity asks [`StructureDiffEngine`] how the new
/// snapshot relates to the last one it saw and branches on the verdict:
/// a small perturbation is patched in `O(N * K)` by subtracting the pair
/// terms of removed sites against the old snapshot and adding those of added
/// sites against the new one; anything else triggers an `O(N^2)` rebuild.
/// Retained sites compare equal in both snapshots, so their mutual pair
/// terms carry over untouched.
pub struct PairQuantity<C: PairContribution> {
    contribution: C,
    diff_engine: StructureDiffEngine,
    last_snapshot: Option<StructureSnapshot>,
    value: f64,
    ticker: ChangeTicker,
}

impl<C: PairContribution> PairQuantity<C> {
    pub fn new(contribution: C) -> Self {
        Self {
            contribution,
            diff_engine: StructureDiffEngine::new(),
            last_snapshot: None,
            value: 0.0,
            ticker: ChangeTicker::new(),
        }
    }

    /// The most recently evaluated value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Ticker clicked whenever an evaluation changes the cached value.
    pub fn ticker(&self) -> &ChangeTicker {
        &self.ticker
    }

    /// Drops the cached snapshot, forcing the next evaluation to rebuild.
    pub fn reset(&mut self) {
        self.last_snapshot = None;
        if self.value != 0.0 {
            self.ticker.click();
        }
        self.value = 0.0;
    }

    /// Evaluates the quantity for `structure` and caches the snapshot for the
    /// next incremental update.
    pub fn evaluate(&mut self, structure: &StructureSnapshot) -> f64 {
        let difference = self.diff_engine.diff(self.last_snapshot.as_ref(), structure);

        let new_value = match &self.last_snapshot {
            Some(base) if difference.allows_fast_update() => {
                trace!(
                    removed = difference.removed_indices().len(),
                    added = difference.added_indices().len(),
                    "patching pair quantity incrementally"
                );
                self.value + Self::patch_delta(&self.contribution, base, structure, &difference)
            }
            _ => {
                info!(
                    sites = structure.site_count(),
                    "rebuilding pair quantity from scratch"
                );
                Self::full_value(&self.contribution, structure)
            }
        };

        if new_value != self.value {
            self.ticker.click();
        }
        self.value = new_value;
        self.last_snapshot = Some(structure.clone());
        new_value
    }

    fn full_value(contribution: &C, structure: &StructureSnapshot) -> f64 {
        let n = structure.site_count();
        let mut total = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                total += contribution.pair_value(structure.site(i), structure.site(j));
            }
        }
        total
    }

    /// Net change from removing the pair terms of vanished sites (against the
    /// base snapshot) and adding those of new sites (against the updated
    /// one). Pairs internal to the removed or added set are counted once.
    fn patch_delta(
        contribution: &C,
        base: &StructureSnapshot,
        updated: &StructureSnapshot,
        difference: &StructureDifference,
    ) -> f64 {
        let removed = difference.removed_indices();
        let added = difference.added_indices();
        let mut delta = 0.0;

        for &i in removed {
            for j in 0..base.site_count() {
                if j == i || (removed.contains(&j) && j < i) {
                    continue;
                }
                delta -= contribution.pair_value(base.site(i), base.site(j));
            }
        }

        for &i in added {
            for j in 0..updated.site_count() {
                if j == i || (added.contains(&j) && j < i) {
                    continue;
                }
                delta += contribution.pair_value(updated.site(i), updated.site(j));
            }
        }

        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn grid(n: usize) -> StructureSnapshot {
        // Irregular spacing so no two pair distances coincide by accident.
        StructureSnapshot::from_sites(
            (0..n)
                .map(|i| {
                    let x = i as f64 * 1.5 + (i as f64).sqrt();
                    AtomSite::new("C", Point3::new(x, 0.0, 0.0))
                })
                .collect(),
        )
    }

    fn reference_value(structure: &StructureSnapshot) -> f64 {
        let mut total = 0.0;
        let sites = structure.sites();
        for i in 0..sites.len() {
            for j in (i + 1)..sites.len() {
                total += DistanceSum.pair_value(&sites[i], &sites[j]);
            }
        }
        total
    }

    #[test]
    fn first_evaluation_builds_from_scratch() {
        let mut quantity = PairQuantity::new(DistanceSum);
        let structure = grid(6);
        let value = quantity.evaluate(&structure);
        assert!((value - reference_value(&structure)).abs() < 1e-9);
        assert_eq!(quantity.value(), value);
    }

    #[test]
    fn empty_and_single_site_structures_evaluate_to_zero() {
        let mut quantity = PairQuantity::new(DistanceSum);
        assert_eq!(quantity.evaluate(&grid(0)), 0.0);
        assert_eq!(quantity.evaluate(&grid(1)), 0.0);
    }

    #[test]
    fn incremental_patch_matches_full_rebuild_after_removal() {
        let mut quantity = PairQuantity::new(DistanceSum);
        let base = grid(20);
        quantity.evaluate(&base);

        // Drop two sites out of twenty: well under the ~29.3% crossover.
        let mut sites = base.sites().to_vec();
        sites.remove(17);
        sites.remove(3);
        let updated = StructureSnapshot::from_sites(sites);

        let patched = quantity.evaluate(&updated);
        assert!((patched - reference_value(&updated)).abs() < 1e-9);
    }

    #[test]
    fn incremental_patch_matches_full_rebuild_after_addition() {
        let mut quantity = PairQuantity::new(DistanceSum);
        let base = grid(10);
        quantity.evaluate(&base);

        let mut updated = base.clone();
        updated.add_site(AtomSite::new("N", Point3::new(-2.0, 1.0, 0.0)));
        updated.add_site(AtomSite::new("O", Point3::new(-4.0, -1.0, 0.5)));

        let patched = quantity.evaluate(&updated);
        assert!((patched - reference_value(&updated)).abs() < 1e-9);
    }

    #[test]
    fn incremental_patch_matches_full_rebuild_after_site_change() {
        let mut quantity = PairQuantity::new(DistanceSum);
        let base = grid(12);
        quantity.evaluate(&base);

        let mut sites = base.sites().to_vec();
        sites[5] = AtomSite::new("C", Point3::new(100.0, 0.0, 0.0)).with_occupancy(0.5);
        let updated = StructureSnapshot::from_sites(sites);

        let patched = quantity.evaluate(&updated);
        assert!((patched - reference_value(&updated)).abs() < 1e-9);
    }

    #[test]
    fn large_removal_falls_back_to_rebuild_and_stays_correct() {
        let mut quantity = PairQuantity::new(DistanceSum);
        let base = grid(10);
        quantity.evaluate(&base);

        // Drop half the sites: far past the crossover, so this exercises the
        // rebuild branch after a cached evaluation.
        let updated = StructureSnapshot::from_sites(base.sites()[..5].to_vec());
        let value = quantity.evaluate(&updated);
        assert!((value - reference_value(&updated)).abs() < 1e-9);
    }

    #[test]
    fn unchanged_structure_keeps_value_and_ticker_stable() {
        let mut quantity = PairQuantity::new(DistanceSum);
        let structure = grid(8);
        quantity.evaluate(&structure);
        let clicks = quantity.ticker().value();

        let value = quantity.evaluate(&structure.clone());
        assert_eq!(value, quantity.value());
        assert_eq!(quantity.ticker().value(), clicks);
    }

    #[test]
    fn ticker_clicks_when_value_changes() {
        let mut quantity = PairQuantity::new(DistanceSum);
        quantity.evaluate(&grid(5));
        let clicks = quantity.ticker().value();
        quantity.evaluate(&grid(6));
        assert!(quantity.ticker().value() > clicks);
    }

    #[test]
    fn reset_forces_rebuild() {
        let mut quantity = PairQuantity::new(DistanceSum);
        let structure = grid(7);
        let first = quantity.evaluate(&structure);
        quantity.reset();
        assert_eq!(quantity.value(), 0.0);
        let second = quantity.evaluate(&structure);
        assert_eq!(first, second);
    }
}
