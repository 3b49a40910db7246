//! Traits used to pack/unpack Rust values from CoE (CANopen over EtherCAT) binary images.
//!
//! This crate factors out the "specialized, byte-aligned, stateless" capability axis of a CoE
//! translator: a type that knows how to read/write itself from the beginning of a byte slice.
//! The remaining axes described by the host crate's translator framework - bit-offset awareness,
//! stateful codecs, generic codecs and SDO buffer sizing - are built on top of these traits rather
//! than inside them, since they are properties of a *translator*, not of every representable
//! type.
//!
//! This crate is currently only used internally by
//! [`ethercat-rt`](https://crates.io/crates/ethercat-rt). It is not recommended for public use
//! (yet) and may change at any time.

#![deny(missing_docs)]
#![deny(missing_copy_implementations)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]

mod error;
mod impls;

pub use error::WireError;
pub use coe_wire_derive::CoeWireReadWrite;

/// A type that can be read from the beginning of a byte-aligned CoE binary image.
pub trait CoeRead: Sized {
    /// Decode `Self` from the beginning of `data`.
    fn read_from(data: &[u8]) -> Result<Self, WireError>;
}

/// A type that can be written to the beginning of a byte-aligned CoE binary image.
pub trait CoeWrite {
    /// Encode `self` into the beginning of `data`.
    ///
    /// `data` is guaranteed by the caller to be at least [`packed_len`](CoeWrite::packed_len)
    /// bytes long.
    fn write_into(&self, data: &mut [u8]);

    /// The number of bytes this particular value will occupy once packed.
    ///
    /// For [`CoeSized`] types this is always equal to
    /// [`packed_bytes`](CoeSized::packed_bytes).
    fn packed_len(&self) -> usize;
}

/// Implemented for CoE representations whose packed length is a compile-time constant.
///
/// This is the "statically sized" half of the sizing axis described by the translator
/// framework's SDO buffer allocation: `make_buffer()` with no instance required.
pub trait CoeSized: CoeRead {
    /// Packed size, in bits, of this type's CoE representation.
    const PACKED_BITS: usize;

    /// Packed size in bytes (`ceil(PACKED_BITS / 8)`).
    fn packed_bytes() -> usize {
        (Self::PACKED_BITS + 7) / 8
    }

    /// Allocate a zeroed buffer exactly large enough to hold a packed `Self`.
    fn make_buffer() -> Vec<u8> {
        vec![0u8; Self::packed_bytes()]
    }
}

/// Implemented for CoE representations whose packed length depends on the value itself (e.g.
/// dynamic strings, `Vec<T>`).
///
/// This is the "dynamically sized" half of the sizing axis: `make_buffer(&obj)` needs a live
/// instance to know how large a buffer to allocate.
pub trait CoeSizedDyn {
    /// Packed size, in bytes, of this particular value's CoE representation.
    fn packed_bytes(&self) -> usize;

    /// Allocate a zeroed buffer exactly large enough to hold this value packed.
    fn make_buffer(&self) -> Vec<u8> {
        vec![0u8; self.packed_bytes()]
    }
}
