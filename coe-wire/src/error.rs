/// Low level wire (de)serialization error.
///
/// This is the error surfaced by the [`CoeRead`](crate::CoeRead)/[`CoeWrite`](crate::CoeWrite)
/// family of traits themselves. The richer [`translate::TranslationError`](https://docs.rs/ethercat-rt)
/// built on top of it carries the direction, codec and target type that were involved.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum WireError {
    /// The source buffer did not contain enough bytes to decode the target type.
    TooShort {
        /// Number of bytes required.
        need: usize,
        /// Number of bytes available.
        have: usize,
    },
    /// The destination buffer is not large enough to hold the encoded representation.
    DestinationTooSmall {
        /// Number of bytes required.
        need: usize,
        /// Number of bytes available.
        have: usize,
    },
    /// Bytes did not form a valid instance of the target type (e.g. non-UTF8 string data).
    InvalidValue,
}

impl core::fmt::Display for WireError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TooShort { need, have } => {
                write!(f, "buffer too short: need {need} bytes, have {have}")
            }
            Self::DestinationTooSmall { need, have } => {
                write!(f, "destination too small: need {need} bytes, have {have}")
            }
            Self::InvalidValue => f.write_str("bytes do not encode a valid value"),
        }
    }
}

impl std::error::Error for WireError {}
