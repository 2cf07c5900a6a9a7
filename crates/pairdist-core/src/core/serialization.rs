//! Binary snapshot/restore of registered polymorphic components.
//!
//! The encoding is self-describing: a format-version byte, a length-prefixed
//! UTF-8 type tag, then the component's field values as a MessagePack
//! payload. On restore, the tag is resolved through a [`ComponentRegistry`]
//! to a correctly-typed default instance whose fields are then populated, so
//! a deserialized box reconstructs the exact concrete subtype. The bridge
//! itself holds no state across calls; extending the format to a new leaf
//! only requires registering the leaf and declaring its serializable fields.

use super::registry::{Component, ComponentRegistry, RegistryError};
use thiserror::Error;

/// Bumped whenever the framing or payload encoding changes shape, so that
/// cross-version compatibility stays a deliberate decision instead of an
/// accidental layout coupling.
pub const FORMAT_VERSION: u8 = 1;

/// Snapshots `obj` into an opaque byte string.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if the component's state fails to encode,
/// or [`CodecError::OversizedTag`] for a type tag longer than `u16::MAX`
/// bytes.
pub fn to_bytes<F: ?Sized + Component<F>>(obj: &F) -> Result<Vec<u8>, CodecError> {
    let tag = obj.type_name().as_bytes();
    let tag_len = u16::try_from(tag.len()).map_err(|_| CodecError::OversizedTag {
        type_name: obj.type_name().to_string(),
    })?;

    let mut out = Vec::with_capacity(3 + tag.len() + 16);
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&tag_len.to_le_bytes());
    out.extend_from_slice(tag);
    obj.encode_state(&mut out)?;
    Ok(out)
}

/// Restores a component previously snapshotted with [`to_bytes`].
///
/// The type tag is resolved through `registry`, a fresh default instance is
/// constructed, and its fields are populated from the payload. On any error a
/// fully valid instance is never partially constructed: either a complete
/// component is returned or nothing is.
///
/// # Errors
///
/// - [`CodecError::Corrupt`] if the byte layout is truncated or malformed.
/// - [`CodecError::UnknownType`] if the tag matches no registered type.
pub fn from_bytes<F: ?Sized + Component<F>>(
    registry: &ComponentRegistry<F>,
    bytes: &[u8],
) -> Result<Box<F>, CodecError> {
    let (tag, payload) = split_frame(bytes)?;
    let mut obj = registry.create(tag).map_err(|err| match err {
        RegistryError::UnknownType { .. } => CodecError::UnknownType {
            type_name: tag.to_string(),
        },
        other => CodecError::Corrupt {
            reason: other.to_string(),
        },
    })?;
    obj.apply_state(payload)?;
    Ok(obj)
}

fn split_frame(bytes: &[u8]) -> Result<(&str, &[u8]), CodecError> {
    let [version, len_lo, len_hi, rest @ ..] = bytes else {
        return Err(CodecError::Corrupt {
            reason: "truncated header".to_string(),
        });
    };
    if *version != FORMAT_VERSION {
        return Err(CodecError::Corrupt {
            reason: format!("unsupported format version {version}"),
        });
    }
    let tag_len = u16::from_le_bytes([*len_lo, *len_hi]) as usize;
    if rest.len() < tag_len {
        return Err(CodecError::Corrupt {
            reason: "truncated type tag".to_string(),
        });
    }
    let (tag, payload) = rest.split_at(tag_len);
    let tag = std::str::from_utf8(tag).map_err(|_| CodecError::Corrupt {
        reason: "type tag is not valid UTF-8".to_string(),
    })?;
    Ok((tag, payload))
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unknown type tag '{type_name}'")]
    UnknownType { type_name: String },

    #[error("Corrupt serialized data: {reason}")]
    Corrupt { reason: String },

    #[error("Type tag '{type_name}' exceeds the maximum encodable length")]
    OversizedTag { type_name: String },

    #[error("Failed to encode component state: {source}")]
    Encode {
        #[from]
        source: rmp_serde::encode::Error,
    },
}

impl From<rmp_serde::decode::Error> for CodecError {
    fn from(err: rmp_serde::decode::Error) -> Self {
        CodecError::Corrupt {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::Tunable;
    use crate::core::components::baseline::{Baseline, LinearBaseline};
    use crate::core::components::baseline_registry;

    fn linear_with_slope(slope: f64) -> Box<dyn Baseline> {
        let mut baseline = LinearBaseline::default();
        baseline.set_slope(slope);
        Box::new(baseline)
    }

    #[test]
    fn round_trip_preserves_concrete_type_and_state() {
        let original = linear_with_slope(-4.25);
        let bytes = to_bytes(original.as_ref()).unwrap();
        let restored = from_bytes(baseline_registry(), &bytes).unwrap();

        assert_eq!(restored.type_name(), "linear");
        assert_eq!(restored.get_attribute("slope").unwrap(), -4.25);
        assert_eq!(restored.eval(3.0), original.eval(3.0));
    }

    #[test]
    fn encoding_is_binary_and_self_describing() {
        let bytes = to_bytes(linear_with_slope(1.0).as_ref()).unwrap();
        assert_eq!(bytes[0], FORMAT_VERSION);
        assert_eq!(&bytes[3..9], b"linear");
    }

    #[test]
    fn unknown_tag_fails_without_constructing_anything() {
        let mut bytes = to_bytes(linear_with_slope(1.0).as_ref()).unwrap();
        // Rewrite the tag to a name no registry knows.
        bytes[3..9].copy_from_slice(b"cubics");
        let result = from_bytes(baseline_registry(), &bytes);
        assert!(matches!(
            result.unwrap_err(),
            CodecError::UnknownType { type_name } if type_name == "cubics"
        ));
    }

    #[test]
    fn empty_input_is_corrupt() {
        let result = from_bytes(baseline_registry(), &[]);
        assert!(matches!(result.unwrap_err(), CodecError::Corrupt { .. }));
    }

    #[test]
    fn wrong_version_byte_is_corrupt() {
        let mut bytes = to_bytes(linear_with_slope(1.0).as_ref()).unwrap();
        bytes[0] = FORMAT_VERSION + 1;
        let result = from_bytes(baseline_registry(), &bytes);
        assert!(matches!(result.unwrap_err(), CodecError::Corrupt { .. }));
    }

    #[test]
    fn truncated_tag_is_corrupt() {
        let bytes = to_bytes(linear_with_slope(1.0).as_ref()).unwrap();
        let result = from_bytes(baseline_registry(), &bytes[..5]);
        assert!(matches!(result.unwrap_err(), CodecError::Corrupt { .. }));
    }

    #[test]
    fn garbage_payload_is_corrupt() {
        let mut bytes = to_bytes(linear_with_slope(1.0).as_ref()).unwrap();
        bytes.truncate(9);
        bytes.extend_from_slice(&[0xc1, 0xc1, 0xc1]);
        let result = from_bytes(baseline_registry(), &bytes);
        assert!(matches!(result.unwrap_err(), CodecError::Corrupt { .. }));
    }
}
