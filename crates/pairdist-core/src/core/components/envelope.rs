use crate::core::attributes::{AttributeError, AttributeStore, Tunable};
use crate::core::registry::{Component, Family};
use crate::core::serialization::CodecError;
use crate::core::ticker::ChangeTicker;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::LazyLock;

/// Type-level name for `dyn Envelope`; see [`Family`] for why the supertrait
/// below is written through this projection instead of naming `dyn Envelope`
/// directly.
pub struct EnvelopeFamily;

impl Family for EnvelopeFamily {
    type Obj = dyn Envelope;
}

/// A multiplicative envelope applied to a pair-distribution curve.
///
/// Family contract: `eval(q)` for a scattering-vector magnitude `q`. Leaves
/// are discoverable through [`envelope_registry`](super::envelope_registry).
pub trait Envelope: Component<<EnvelopeFamily as Family>::Obj> {
    /// Evaluates the envelope factor at `q`.
    fn eval(&self, q: f64) -> f64;
}

/// A constant amplitude factor.
///
/// Attribute: `"scale"`, default `1.0`.
#[derive(Debug, Clone)]
pub struct ScaleEnvelope {
    scale: f64,
    ticker: ChangeTicker,
}

impl Default for ScaleEnvelope {
    fn default() -> Self {
        Self {
            scale: 1.0,
            ticker: ChangeTicker::new(),
        }
    }
}

static SCALE_ATTRIBUTES: LazyLock<AttributeStore<ScaleEnvelope>> = LazyLock::new(|| {
    let mut store = AttributeStore::new();
    store
        .register("scale", |e: &ScaleEnvelope| e.scale, ScaleEnvelope::set_scale)
        .expect("scale envelope attribute table is misconfigured");
    store
});

#[derive(Serialize, Deserialize)]
struct ScaleEnvelopeState {
    scale: f64,
}

impl ScaleEnvelope {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        if scale != self.scale {
            self.scale = scale;
            self.ticker.click();
        }
    }

    pub fn ticker(&self) -> &ChangeTicker {
        &self.ticker
    }
}

impl Tunable for ScaleEnvelope {
    fn get_attribute(&self, name: &str) -> Result<f64, AttributeError> {
        SCALE_ATTRIBUTES.get(self, name)
    }

    fn set_attribute(&mut self, name: &str, value: f64) -> Result<(), AttributeError> {
        SCALE_ATTRIBUTES.set(self, name, value)
    }

    fn attribute_names(&self) -> Vec<String> {
        SCALE_ATTRIBUTES.names().map(str::to_string).collect()
    }
}

impl Component<dyn Envelope> for ScaleEnvelope {
    fn type_name(&self) -> &str {
        "scale"
    }

    fn create(&self) -> Box<dyn Envelope> {
        Box::new(Self::default())
    }

    fn clone_boxed(&self) -> Box<dyn Envelope> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn encode_state(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        rmp_serde::encode::write(out, &ScaleEnvelopeState { scale: self.scale })?;
        Ok(())
    }

    fn apply_state(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let state: ScaleEnvelopeState = rmp_serde::from_slice(bytes)?;
        self.set_scale(state.scale);
        Ok(())
    }
}

impl Envelope for ScaleEnvelope {
    fn eval(&self, _q: f64) -> f64 {
        self.scale
    }
}

/// Gaussian damping from finite instrument Q-resolution:
/// `exp(-(q * qdamp)^2 / 2)` when `qdamp > 0`, otherwise `1.0`.
///
/// Attribute: `"qdamp"`, default `0.0` (no damping).
#[derive(Debug, Clone, Default)]
pub struct QResolutionEnvelope {
    qdamp: f64,
    ticker: ChangeTicker,
}

static QRESOLUTION_ATTRIBUTES: LazyLock<AttributeStore<QResolutionEnvelope>> =
    LazyLock::new(|| {
        let mut store = AttributeStore::new();
        store
            .register(
                "qdamp",
                |e: &QResolutionEnvelope| e.qdamp,
                QResolutionEnvelope::set_qdamp,
            )
            .expect("qresolution envelope attribute table is misconfigured");
        store
    });

#[derive(Serialize, Deserialize)]
struct QResolutionEnvelopeState {
    qdamp: f64,
}

impl QResolutionEnvelope {
    pub fn qdamp(&self) -> f64 {
        self.qdamp
    }

    pub fn set_qdamp(&mut self, qdamp: f64) {
        if qdamp != self.qdamp {
            self.qdamp = qdamp;
            self.ticker.click();
        }
    }

    pub fn ticker(&self) -> &ChangeTicker {
        &self.ticker
    }
}

impl Tunable for QResolutionEnvelope {
    fn get_attribute(&self, name: &str) -> Result<f64, AttributeError> {
        QRESOLUTION_ATTRIBUTES.get(self, name)
    }

    fn set_attribute(&mut self, name: &str, value: f64) -> Result<(), AttributeError> {
        QRESOLUTION_ATTRIBUTES.set(self, name, value)
    }

    fn attribute_names(&self) -> Vec<String> {
        QRESOLUTION_ATTRIBUTES.names().map(str::to_string).collect()
    }
}

impl Component<dyn Envelope> for QResolutionEnvelope {
    fn type_name(&self) -> &str {
        "qresolution"
    }

    fn create(&self) -> Box<dyn Envelope> {
        Box::new(Self::default())
    }

    fn clone_boxed(&self) -> Box<dyn Envelope> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn encode_state(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        rmp_serde::encode::write(out, &QResolutionEnvelopeState { qdamp: self.qdamp })?;
        Ok(())
    }

    fn apply_state(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let state: QResolutionEnvelopeState = rmp_serde::from_slice(bytes)?;
        self.set_qdamp(state.qdamp);
        Ok(())
    }
}

impl Envelope for QResolutionEnvelope {
    fn eval(&self, q: f64) -> f64 {
        if self.qdamp > 0.0 {
            (-0.5 * (q * self.qdamp).powi(2)).exp()
        } else {
            1.0
        }
    }
}
