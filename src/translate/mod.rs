//! The translator framework (spec §4.3): the contract a codec implements, the resolution rules
//! that pick a call shape at each use site, and a default codec for builtin CoE types.
//!
//! The four axes spec.md calls out are expressed as:
//! - **stateful vs. stateless** — a codec is just a value implementing [`InputCodec`]/
//!   [`OutputCodec`]; a stateless codec is a zero-sized unit struct like [`default::DefaultCodec`],
//!   a stateful one carries fields, like [`default::StringArrayCodec`].
//! - **specialized vs. generic** — a specialized codec has a concrete `impl InputCodec<Speed>
//!   for MyCodec`; a generic one has `impl<T: SomeBound> InputCodec<T> for DefaultCodec`. Both
//!   shapes are ordinary trait impls; there is no separate mechanism.
//! - **bit-offset-aware vs. byte-only** — the [`InputCodec::BIT_OFFSET_AWARE`]/
//!   [`OutputCodec::BIT_OFFSET_AWARE`] associated consts, resolved at the call sites in
//!   [`dispatch`] by ordinary `if`/`const` evaluation rather than template substitution
//!   (REDESIGN FLAGS).
//! - **sizing** — [`coe_wire::CoeSized`] (static) and [`DynamicSizing`] (dynamic), consulted by
//!   the SDO layer (spec §4.6).

pub mod bitops;
pub mod default;
mod dispatch;
mod error;

pub use dispatch::{dispatch_input, dispatch_output};
#[cfg(feature = "boolean-return")]
pub use dispatch::{dispatch_input_bool, dispatch_output_bool};
pub use error::TranslationError;

/// Which way a translation call moves data: into application units, or out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// A codec able to decode bytes into an application-domain `T` (spec §4.3, *Input* direction).
pub trait InputCodec<T> {
    /// Whether [`InputCodec::translate_to_at`] correctly handles `bit_offset != 0`. `false`
    /// (the default) means callers must reduce to the byte-aligned form themselves, which
    /// [`dispatch_input`] does via [`bitops::shift_merge_read`].
    const BIT_OFFSET_AWARE: bool = false;

    /// Byte-aligned decode: `data` starts exactly at the entry's first byte.
    fn translate_to(&self, data: &[u8], out: &mut T) -> Result<(), TranslationError>;

    /// Bit-offset-aware decode. Only called when `BIT_OFFSET_AWARE` is `true`; the provided
    /// default is correct only for `bit_offset == 0` and exists so implementers that don't
    /// support bit offsets don't have to write a body at all.
    fn translate_to_at(
        &self,
        data: &[u8],
        out: &mut T,
        bit_offset: usize,
    ) -> Result<(), TranslationError> {
        debug_assert_eq!(bit_offset, 0);
        self.translate_to(data, out)
    }
}

/// A codec able to encode an application-domain `T` into bytes (spec §4.3, *Output* direction).
pub trait OutputCodec<T> {
    /// See [`InputCodec::BIT_OFFSET_AWARE`].
    const BIT_OFFSET_AWARE: bool = false;

    /// Byte-aligned encode: `data` starts exactly at the entry's first byte.
    fn translate_from(&self, data: &mut [u8], obj: &T) -> Result<(), TranslationError>;

    /// Bit-offset-aware encode. See [`InputCodec::translate_to_at`].
    fn translate_from_at(
        &self,
        data: &mut [u8],
        obj: &T,
        bit_offset: usize,
    ) -> Result<(), TranslationError> {
        debug_assert_eq!(bit_offset, 0);
        self.translate_from(data, obj)
    }
}

/// The dynamic half of the sizing axis (spec §4.3, §4.6): `make_buffer(&obj)` for types whose
/// packed length depends on the value (dynamic strings, vectors, arrays of variable-length
/// strings). The static half is [`coe_wire::CoeSized::make_buffer`], which needs no instance.
pub trait DynamicSizing<T> {
    /// Fallible because a codec's shape validation (e.g. `StringArrayCodec`'s
    /// `ArrayParsingMode::RequireEqualSize`) has to run before a buffer can be sized at all - a
    /// shape that cannot be sized consistently must not silently produce a wrongly-sized buffer.
    fn make_buffer(&self, obj: &T) -> Result<Vec<u8>, TranslationError>;
}
