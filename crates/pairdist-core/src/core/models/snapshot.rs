use super::site::AtomSite;

/// Read-only view of a structure's site set at one point in time.
///
/// This is the narrow contract through which external structure
/// representations (including host-runtime adapters wrapping foreign
/// structure objects) are consumed: a stable site count, stable indexing
/// within one snapshot instance, and site equality sufficient to decide
/// whether two sites carry the same content. The diff engine treats that
/// equality as opaque and total.
pub trait SiteView {
    /// The site content type; its `PartialEq` defines site sameness.
    type Site: PartialEq;

    /// Total number of sites in this snapshot.
    fn site_count(&self) -> usize;

    /// The site at `index`; indices are stable for the snapshot's lifetime.
    fn site(&self, index: usize) -> &Self::Site;
}

/// An owned, immutable-by-convention sequence of atomic sites.
///
/// The library's own snapshot type, used by pair-quantity calculators to
/// cache the structure a value was last evaluated against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureSnapshot {
    sites: Vec<AtomSite>,
}

impl StructureSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sites(sites: Vec<AtomSite>) -> Self {
        Self { sites }
    }

    pub fn add_site(&mut self, site: AtomSite) {
        self.sites.push(site);
    }

    pub fn sites(&self) -> &[AtomSite] {
        &self.sites
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl SiteView for StructureSnapshot {
    type Site = AtomSite;

    fn site_count(&self) -> usize {
        self.sites.len()
    }

    fn site(&self, index: usize) -> &AtomSite {
        &self.sites[index]
    }
}
