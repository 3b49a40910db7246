//! Translation failure taxonomy (spec §4.3, §7). Folds into [`crate::error::Error::Translation`].

use core::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// Verification failure, input side: the binary buffer is smaller than the codec needs.
    BufferTooSmall { need: usize, have: usize },
    /// Exact-size verification failure (partial translation disallowed).
    BufferSizeMismatch { need: usize, have: usize },
    /// Mixed element lengths in `RequireEqualSize` string-array mode.
    StringArrayShapeMismatch,
    /// A codec-specific failure (the codec itself returned `false`/an error).
    TranslationFailed {
        direction: super::Direction,
        target_type: &'static str,
    },
    /// A non-bit-offset-aware codec was asked to translate at a non-zero bit offset under
    /// [`crate::config::BitOffsetPolicy::Strict`].
    MisalignedAccess { bit_offset: usize },
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationError::BufferTooSmall { need, have } => {
                write!(f, "buffer too small: need at least {need} bytes, have {have}")
            }
            TranslationError::BufferSizeMismatch { need, have } => write!(
                f,
                "buffer size mismatch: need exactly {need} bytes, have {have}"
            ),
            TranslationError::StringArrayShapeMismatch => {
                f.write_str("string array elements have mismatched lengths under RequireEqualSize")
            }
            TranslationError::TranslationFailed {
                direction,
                target_type,
            } => write!(f, "{direction:?} translation of {target_type} failed"),
            TranslationError::MisalignedAccess { bit_offset } => write!(
                f,
                "codec is not bit-offset-aware but was asked to translate at bit_offset={bit_offset}"
            ),
        }
    }
}

impl std::error::Error for TranslationError {}

impl From<coe_wire::WireError> for TranslationError {
    fn from(e: coe_wire::WireError) -> Self {
        match e {
            coe_wire::WireError::TooShort { need, have } => {
                TranslationError::BufferTooSmall { need, have }
            }
            coe_wire::WireError::DestinationTooSmall { need, have } => {
                TranslationError::BufferTooSmall { need, have }
            }
            coe_wire::WireError::InvalidValue => TranslationError::TranslationFailed {
                direction: super::Direction::Input,
                target_type: "unknown",
            },
        }
    }
}
