//! Call-site resolution (spec §4.3 resolution rule 4): decide whether a codec's bit-offset-aware
//! form can be used, and whether a misaligned access is an error or the caller's problem.

use super::{InputCodec, OutputCodec, TranslationError};
use crate::config::BitOffsetPolicy;

/// Dispatch a decode call, choosing between a codec's byte-only and bit-offset-aware forms.
///
/// When `bit_offset == 0` this always calls the byte-only form, regardless of policy or
/// awareness - there is nothing to resolve. When `bit_offset != 0` and the `bit-aligned` feature
/// is compiled out entirely, the byte-only form is still called (misaligned access is then the
/// caller's problem, matching §4.3 rule 4's "otherwise" branch).
pub fn dispatch_input<T, C: InputCodec<T>>(
    codec: &C,
    data: &[u8],
    out: &mut T,
    bit_offset: usize,
    policy: BitOffsetPolicy,
) -> Result<(), TranslationError> {
    if bit_offset == 0 {
        return codec.translate_to(data, out);
    }

    if !cfg!(feature = "bit-aligned") {
        return codec.translate_to(data, out);
    }

    if C::BIT_OFFSET_AWARE {
        codec.translate_to_at(data, out, bit_offset)
    } else {
        match policy {
            BitOffsetPolicy::Strict => Err(TranslationError::MisalignedAccess { bit_offset }),
            BitOffsetPolicy::Lenient => codec.translate_to(data, out),
        }
    }
}

/// The `Output`-direction counterpart of [`dispatch_input`].
pub fn dispatch_output<T, C: OutputCodec<T>>(
    codec: &C,
    data: &mut [u8],
    obj: &T,
    bit_offset: usize,
    policy: BitOffsetPolicy,
) -> Result<(), TranslationError> {
    if bit_offset == 0 {
        return codec.translate_from(data, obj);
    }

    if !cfg!(feature = "bit-aligned") {
        return codec.translate_from(data, obj);
    }

    if C::BIT_OFFSET_AWARE {
        codec.translate_from_at(data, obj, bit_offset)
    } else {
        match policy {
            BitOffsetPolicy::Strict => Err(TranslationError::MisalignedAccess { bit_offset }),
            BitOffsetPolicy::Lenient => codec.translate_from(data, obj),
        }
    }
}

/// The `EnableBooleanReturn` reporting mode (spec §4.3): `true` on success, `false` on any
/// [`TranslationError`]. A facade over [`dispatch_input`] for embedding contexts that report
/// failures by return value rather than by propagating an error type - the error detail itself is
/// discarded, matching the original's `bool`-returning translator signature.
#[cfg(feature = "boolean-return")]
pub fn dispatch_input_bool<T, C: InputCodec<T>>(
    codec: &C,
    data: &[u8],
    out: &mut T,
    bit_offset: usize,
    policy: BitOffsetPolicy,
) -> bool {
    dispatch_input(codec, data, out, bit_offset, policy).is_ok()
}

/// The `Output`-direction counterpart of [`dispatch_input_bool`].
#[cfg(feature = "boolean-return")]
pub fn dispatch_output_bool<T, C: OutputCodec<T>>(
    codec: &C,
    data: &mut [u8],
    obj: &T,
    bit_offset: usize,
    policy: BitOffsetPolicy,
) -> bool {
    dispatch_output(codec, data, obj, bit_offset, policy).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::default::DefaultCodec;

    #[test]
    fn byte_aligned_call_never_consults_policy() {
        let data = [0x78, 0x56, 0x34, 0x12];
        let mut out = 0u32;
        dispatch_input(&DefaultCodec, &data, &mut out, 0, BitOffsetPolicy::Strict).unwrap();
        assert_eq!(out, 0x1234_5678);
    }

    #[test]
    fn bit_offset_aware_codec_is_used_when_offset_nonzero() {
        let data = [0x0F, 0xBC, 0x0A];
        let mut out = 0u16;
        dispatch_input(&DefaultCodec, &data, &mut out, 4, BitOffsetPolicy::Strict).unwrap();
        assert_eq!(out, 0xABC0);
    }

    #[cfg(feature = "boolean-return")]
    #[test]
    fn boolean_return_reports_success_as_true() {
        let data = [0x78, 0x56, 0x34, 0x12];
        let mut out = 0u32;
        assert!(dispatch_input_bool(&DefaultCodec, &data, &mut out, 0, BitOffsetPolicy::Strict));
        assert_eq!(out, 0x1234_5678);
    }

    #[cfg(feature = "boolean-return")]
    #[test]
    fn boolean_return_reports_misaligned_access_as_false() {
        // `DefaultCodec`'s `Vec<T>` impl doesn't override `BIT_OFFSET_AWARE`, so it defaults to
        // `false` and exercises the `MisalignedAccess` branch under a nonzero offset.
        let data = [0u8; 4];
        let mut out: Vec<u8> = vec![0u8; 4];
        let ok = dispatch_input_bool(&DefaultCodec, &data, &mut out, 4, BitOffsetPolicy::Strict);
        assert_eq!(ok, !cfg!(feature = "bit-aligned"));
    }
}
