use crate::core::models::snapshot::SiteView;
use std::collections::BTreeSet;
use tracing::trace;

/// How a [`StructureDifference`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMethod {
    /// No usable base snapshot existed (first-ever evaluation); the consumer
    /// must build from scratch.
    None,
    /// Removed/added index sets were computed from two snapshots.
    SiteSets,
}

/// Symmetric difference of two structure snapshots' site sets.
///
/// `removed_indices` index only into the base snapshot, `added_indices` only
/// into the updated one. The difference is consumed once, to drive (or veto)
/// an incremental update of a pairwise quantity, and then discarded; it is
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureDifference {
    pop0: usize,
    removed_indices: BTreeSet<usize>,
    added_indices: BTreeSet<usize>,
    method: DiffMethod,
}

/// Fraction of the old population at which patching a pairwise quantity
/// stops being cheaper than a full rebuild. A quantity over `N0` sites costs
/// `O(N0^2)` to build and `O(N0 * K)` to patch for `K` removed sites;
/// equating `N0 * K` with a constant-factor-adjusted `N0^2 / 2` puts the
/// crossover at `K = (1 - sqrt(0.5)) * N0`, about 29.3%.
const FAST_UPDATE_FRACTION: f64 = 1.0 - std::f64::consts::FRAC_1_SQRT_2;

impl StructureDifference {
    /// Site count of the base snapshot (zero when no base existed).
    pub fn pop0(&self) -> usize {
        self.pop0
    }

    /// Indices of base-snapshot sites absent from the updated snapshot.
    pub fn removed_indices(&self) -> &BTreeSet<usize> {
        &self.removed_indices
    }

    /// Indices of updated-snapshot sites absent from the base snapshot.
    pub fn added_indices(&self) -> &BTreeSet<usize> {
        &self.added_indices
    }

    pub fn method(&self) -> DiffMethod {
        self.method
    }

    /// `true` when the two snapshots compare site-for-site identical.
    pub fn is_unchanged(&self) -> bool {
        self.method == DiffMethod::SiteSets
            && self.removed_indices.is_empty()
            && self.added_indices.is_empty()
    }

    /// The core policy decision: may a previously accumulated pairwise
    /// quantity be patched instead of rebuilt?
    ///
    /// The verdict is `true` iff the number of removed sites is strictly
    /// below `(1 - sqrt(0.5)) * pop0`; the strict comparison is the
    /// documented rounding rule at integer boundaries. With no base snapshot
    /// (or an empty one) the verdict is unconditionally `false`, forcing a
    /// full build. A `false` verdict means the consumer must discard this
    /// difference and recompute from scratch; the engine only advises.
    pub fn allows_fast_update(&self) -> bool {
        if self.method == DiffMethod::None {
            return false;
        }
        (self.removed_indices.len() as f64) < FAST_UPDATE_FRACTION * self.pop0 as f64
    }
}

/// Computes site-set differences between structure snapshots.
///
/// `diff` is a pure function of its two inputs; the engine carries no state
/// and independent snapshot pairs may be diffed concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureDiffEngine;

impl StructureDiffEngine {
    pub fn new() -> Self {
        Self
    }

    /// Computes the symmetric difference of the two snapshots' site sets.
    ///
    /// Matching is multiset-style: every base site consumes at most one equal
    /// updated site, judged by the site type's own `PartialEq`, which is
    /// treated as opaque and total. Base sites with no match become removed
    /// indices; updated sites left unconsumed become added indices. The scan
    /// is linear in comparisons per site (`O(n * m)` overall); snapshots
    /// needing better complexity can pre-bucket by a content hash, but that
    /// is a performance choice, not part of this contract.
    pub fn diff<S: SiteView>(&self, base: Option<&S>, updated: &S) -> StructureDifference {
        let Some(base) = base else {
            return StructureDifference {
                pop0: 0,
                removed_indices: BTreeSet::new(),
                added_indices: BTreeSet::new(),
                method: DiffMethod::None,
            };
        };

        let pop0 = base.site_count();
        let pop1 = updated.site_count();
        let mut consumed = vec![false; pop1];
        let mut removed_indices = BTreeSet::new();

        for i in 0..pop0 {
            let matched = (0..pop1)
                .find(|&j| !consumed[j] && base.site(i) == updated.site(j));
            match matched {
                Some(j) => consumed[j] = true,
                None => {
                    removed_indices.insert(i);
                }
            }
        }

        let added_indices: BTreeSet<usize> =
            (0..pop1).filter(|&j| !consumed[j]).collect();

        trace!(
            pop0,
            pop1,
            removed = removed_indices.len(),
            added = added_indices.len(),
            "computed structure difference"
        );

        StructureDifference {
            pop0,
            removed_indices,
            added_indices,
            method: DiffMethod::SiteSets,
        }
    }
}
