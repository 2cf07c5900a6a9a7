use crate::core::attributes::{AttributeError, AttributeStore, Tunable};
use crate::core::registry::{Component, Family};
use crate::core::serialization::CodecError;
use crate::core::ticker::ChangeTicker;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::LazyLock;

/// Type-level name for `dyn PeakProfile`; see [`Family`] for why the
/// supertrait below is written through this projection instead of naming
/// `dyn PeakProfile` directly.
pub struct PeakProfileFamily;

impl Family for PeakProfileFamily {
    type Obj = dyn PeakProfile;
}

/// A peak-shape function used to spread pair contributions over distance.
///
/// Family contract: `eval(x, fwhm)` is the profile amplitude at offset `x`
/// from the peak center for a peak of the given full width at half maximum;
/// `wing_cutoff(fwhm)` is the half-width beyond which the amplitude drops
/// below the profile's precision and may be truncated. Leaves are
/// discoverable through [`profile_registry`](super::profile_registry).
pub trait PeakProfile: Component<<PeakProfileFamily as Family>::Obj> {
    fn eval(&self, x: f64, fwhm: f64) -> f64;

    fn wing_cutoff(&self, fwhm: f64) -> f64;
}

/// Unit-area Gaussian peak profile.
///
/// Attribute: `"peakprecision"` — the relative amplitude below which the
/// peak's wings are considered negligible.
#[derive(Debug, Clone)]
pub struct GaussianProfile {
    peak_precision: f64,
    ticker: ChangeTicker,
}

/// Relative wing amplitude at which truncation keeps errors invisible at
/// double precision plotting scales.
const DEFAULT_PEAK_PRECISION: f64 = 3.33e-6;

/// fwhm = 2 * sqrt(2 ln 2) * sigma for a Gaussian.
const FWHM_PER_SIGMA: f64 = 2.354_820_045_030_949_4;

impl Default for GaussianProfile {
    fn default() -> Self {
        Self {
            peak_precision: DEFAULT_PEAK_PRECISION,
            ticker: ChangeTicker::new(),
        }
    }
}

static GAUSSIAN_ATTRIBUTES: LazyLock<AttributeStore<GaussianProfile>> = LazyLock::new(|| {
    let mut store = AttributeStore::new();
    store
        .register(
            "peakprecision",
            |p: &GaussianProfile| p.peak_precision,
            GaussianProfile::set_peak_precision,
        )
        .expect("gaussian profile attribute table is misconfigured");
    store
});

#[derive(Serialize, Deserialize)]
struct GaussianProfileState {
    peak_precision: f64,
}

impl GaussianProfile {
    pub fn peak_precision(&self) -> f64 {
        self.peak_precision
    }

    pub fn set_peak_precision(&mut self, precision: f64) {
        if precision != self.peak_precision {
            self.peak_precision = precision;
            self.ticker.click();
        }
    }

    pub fn ticker(&self) -> &ChangeTicker {
        &self.ticker
    }
}

impl Tunable for GaussianProfile {
    fn get_attribute(&self, name: &str) -> Result<f64, AttributeError> {
        GAUSSIAN_ATTRIBUTES.get(self, name)
    }

    fn set_attribute(&mut self, name: &str, value: f64) -> Result<(), AttributeError> {
        GAUSSIAN_ATTRIBUTES.set(self, name, value)
    }

    fn attribute_names(&self) -> Vec<String> {
        GAUSSIAN_ATTRIBUTES.names().map(str::to_string).collect()
    }
}

impl Component<dyn PeakProfile> for GaussianProfile {
    fn type_name(&self) -> &str {
        "gaussian"
    }

    fn create(&self) -> Box<dyn PeakProfile> {
        Box::new(Self::default())
    }

    fn clone_boxed(&self) -> Box<dyn PeakProfile> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn encode_state(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        rmp_serde::encode::write(
            out,
            &GaussianProfileState {
                peak_precision: self.peak_precision,
            },
        )?;
        Ok(())
    }

    fn apply_state(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let state: GaussianProfileState = rmp_serde::from_slice(bytes)?;
        self.set_peak_precision(state.peak_precision);
        Ok(())
    }
}

impl PeakProfile for GaussianProfile {
    fn eval(&self, x: f64, fwhm: f64) -> f64 {
        let sigma = fwhm / FWHM_PER_SIGMA;
        if sigma <= 0.0 {
            return 0.0;
        }
        let norm = 1.0 / (sigma * (2.0 * std::f64::consts::PI).sqrt());
        norm * (-0.5 * (x / sigma).powi(2)).exp()
    }

    fn wing_cutoff(&self, fwhm: f64) -> f64 {
        let sigma = fwhm / FWHM_PER_SIGMA;
        if sigma <= 0.0 || self.peak_precision >= 1.0 {
            return 0.0;
        }
        sigma * (-2.0 * self.peak_precision.ln()).sqrt()
    }
}
