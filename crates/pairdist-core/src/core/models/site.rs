use nalgebra::Point3;

/// One atomic site of a structure snapshot.
///
/// A site is plain content: an element symbol, Cartesian coordinates in
/// Angstroms, and a fractional occupancy. Two sites are "the same" for
/// structure-diff purposes exactly when they compare equal, so everything
/// that should distinguish sites participates in `PartialEq`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomSite {
    /// Element symbol, e.g. "C", "Na", "U".
    pub element: String,
    /// Cartesian position of the site in Angstroms.
    pub position: Point3<f64>,
    /// Fractional site occupancy in `[0, 1]`.
    pub occupancy: f64,
}

impl AtomSite {
    /// Creates a fully occupied site.
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        Self {
            element: element.to_string(),
            position,
            occupancy: 1.0,
        }
    }

    pub fn with_occupancy(mut self, occupancy: f64) -> Self {
        self.occupancy = occupancy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_site_is_fully_occupied() {
        let site = AtomSite::new("C", Point3::new(1.0, 2.0, 3.0));
        assert_eq!(site.element, "C");
        assert_eq!(site.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(site.occupancy, 1.0);
    }

    #[test]
    fn with_occupancy_overrides_default() {
        let site = AtomSite::new("Na", Point3::origin()).with_occupancy(0.5);
        assert_eq!(site.occupancy, 0.5);
    }

    #[test]
    fn equality_covers_element_position_and_occupancy() {
        let site = AtomSite::new("C", Point3::new(1.0, 0.0, 0.0));
        assert_eq!(site, site.clone());
        assert_ne!(site, AtomSite::new("N", Point3::new(1.0, 0.0, 0.0)));
        assert_ne!(site, AtomSite::new("C", Point3::new(1.0, 0.0, 0.1)));
        assert_ne!(site, site.clone().with_occupancy(0.5));
    }
}
