use crate::core::attributes::{AttributeError, AttributeStore, Tunable};
use crate::core::registry::{Component, Family};
use crate::core::serialization::CodecError;
use crate::core::ticker::ChangeTicker;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::LazyLock;

/// Type-level name for `dyn Baseline`; see [`Family`] for why the supertrait
/// below is written through this projection instead of naming `dyn Baseline`
/// directly.
pub struct BaselineFamily;

impl Family for BaselineFamily {
    type Obj = dyn Baseline;
}

/// A baseline function subtracted from a pair-distribution curve.
///
/// Family contract: `eval(r)` for any pair distance `r >= 0`. Leaves are
/// discoverable through [`baseline_registry`](super::baseline_registry) and
/// expose their tunable scalars through [`Tunable`].
pub trait Baseline: Component<<BaselineFamily as Family>::Obj> + std::fmt::Debug {
    /// Evaluates the baseline at pair distance `r`.
    fn eval(&self, r: f64) -> f64;
}

/// The trivial baseline: identically zero.
#[derive(Debug, Clone, Default)]
pub struct ZeroBaseline;

static ZERO_ATTRIBUTES: LazyLock<AttributeStore<ZeroBaseline>> = LazyLock::new(AttributeStore::new);

#[derive(Serialize, Deserialize)]
struct ZeroBaselineState {}

impl Tunable for ZeroBaseline {
    fn get_attribute(&self, name: &str) -> Result<f64, AttributeError> {
        ZERO_ATTRIBUTES.get(self, name)
    }

    fn set_attribute(&mut self, name: &str, value: f64) -> Result<(), AttributeError> {
        ZERO_ATTRIBUTES.set(self, name, value)
    }

    fn attribute_names(&self) -> Vec<String> {
        ZERO_ATTRIBUTES.names().map(str::to_string).collect()
    }
}

impl Component<dyn Baseline> for ZeroBaseline {
    fn type_name(&self) -> &str {
        "zero"
    }

    fn create(&self) -> Box<dyn Baseline> {
        Box::new(Self::default())
    }

    fn clone_boxed(&self) -> Box<dyn Baseline> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn encode_state(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        rmp_serde::encode::write(out, &ZeroBaselineState {})?;
        Ok(())
    }

    fn apply_state(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let ZeroBaselineState {} = rmp_serde::from_slice(bytes)?;
        Ok(())
    }
}

impl Baseline for ZeroBaseline {
    fn eval(&self, _r: f64) -> f64 {
        0.0
    }
}

/// A straight-line baseline through the origin, `eval(r) = slope * r`.
///
/// Attribute: `"slope"`.
#[derive(Debug, Clone, Default)]
pub struct LinearBaseline {
    slope: f64,
    ticker: ChangeTicker,
}

static LINEAR_ATTRIBUTES: LazyLock<AttributeStore<LinearBaseline>> = LazyLock::new(|| {
    let mut store = AttributeStore::new();
    store
        .register("slope", |b: &LinearBaseline| b.slope, LinearBaseline::set_slope)
        .expect("linear baseline attribute table is misconfigured");
    store
});

#[derive(Serialize, Deserialize)]
struct LinearBaselineState {
    slope: f64,
}

impl LinearBaseline {
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn set_slope(&mut self, slope: f64) {
        if slope != self.slope {
            self.slope = slope;
            self.ticker.click();
        }
    }

    pub fn ticker(&self) -> &ChangeTicker {
        &self.ticker
    }
}

impl Tunable for LinearBaseline {
    fn get_attribute(&self, name: &str) -> Result<f64, AttributeError> {
        LINEAR_ATTRIBUTES.get(self, name)
    }

    fn set_attribute(&mut self, name: &str, value: f64) -> Result<(), AttributeError> {
        LINEAR_ATTRIBUTES.set(self, name, value)
    }

    fn attribute_names(&self) -> Vec<String> {
        LINEAR_ATTRIBUTES.names().map(str::to_string).collect()
    }
}

impl Component<dyn Baseline> for LinearBaseline {
    fn type_name(&self) -> &str {
        "linear"
    }

    fn create(&self) -> Box<dyn Baseline> {
        Box::new(Self::default())
    }

    fn clone_boxed(&self) -> Box<dyn Baseline> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn encode_state(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        rmp_serde::encode::write(out, &LinearBaselineState { slope: self.slope })?;
        Ok(())
    }

    fn apply_state(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let state: LinearBaselineState = rmp_serde::from_slice(bytes)?;
        self.set_slope(state.slope);
        Ok(())
    }
}

impl Baseline for LinearBaseline {
    fn eval(&self, r: f64) -> f64 {
        self.slope * r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_baseline_evaluates_to_zero_everywhere() {
        let baseline = ZeroBaseline;
        assert_eq!(baseline.eval(0.0), 0.0);
        assert_eq!(baseline.eval(3.7), 0.0);
        assert_eq!(baseline.eval(-1.0), 0.0);
    }

    #[test]
    fn zero_baseline_has_no_attributes() {
        let baseline = ZeroBaseline;
        assert!(baseline.attribute_names().is_empty());
        assert!(matches!(
            baseline.get_attribute("slope"),
            Err(AttributeError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn linear_baseline_scales_with_slope() {
        let mut baseline = LinearBaseline::default();
        assert_eq!(baseline.eval(3.0), 0.0);
        baseline.set_slope(2.0);
        assert_eq!(baseline.eval(3.0), 6.0);
    }

    #[test]
    fn slope_is_reachable_by_attribute_name() {
        let mut baseline = LinearBaseline::default();
        baseline.set_attribute("slope", -0.5).unwrap();
        assert_eq!(baseline.get_attribute("slope").unwrap(), -0.5);
        assert_eq!(baseline.slope(), -0.5);
        assert_eq!(baseline.attribute_names(), vec!["slope"]);
    }

    #[test]
    fn setter_clicks_ticker_only_on_value_change() {
        let mut baseline = LinearBaseline::default();
        baseline.set_slope(1.5);
        assert_eq!(baseline.ticker().value(), 1);
        baseline.set_slope(1.5);
        assert_eq!(baseline.ticker().value(), 1);
        baseline.set_slope(0.0);
        assert_eq!(baseline.ticker().value(), 2);
    }
}
