//! Per-entry synchronized byte buffer (spec §4.4).

use crate::translate::{bitops, TranslationError};
use crate::types::CoeType;
use spin::Mutex;

/// Which direction this entry's cyclic update runs: spec §3/§4.7 treat Input and Output entries
/// symmetrically but with data flowing the opposite way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDirection {
    /// Written by `update_from_pdi`, read by the application.
    Input,
    /// Written by the application, read by `update_to_pdi`.
    Output,
}

/// A single addressable object's own copy of its PDI bytes, kept in sync with the shared PDI
/// once per cycle.
///
/// The buffer is always exactly `ceil(bit_size / 8)` bytes: the bit-offset-aware copy into/out
/// of the shared PDI (`update_from_pdi`/`update_to_pdi`) resolves the entry's bit alignment, so
/// everything downstream (a [`crate::reference::Reference`]'s codec call) sees a byte-aligned
/// buffer and never needs to know the entry's placement inside the PDI.
pub struct Entry {
    bit_size: usize,
    bit_offset_in_pdi: usize,
    ty: CoeType,
    direction: EntryDirection,
    buffer: Mutex<Vec<u8>>,
}

impl Entry {
    pub fn new(bit_size: usize, bit_offset_in_pdi: usize, ty: CoeType, direction: EntryDirection) -> Self {
        let n = (bit_size + 7) / 8;
        Entry {
            bit_size,
            bit_offset_in_pdi,
            ty,
            direction,
            buffer: Mutex::new(vec![0u8; n]),
        }
    }

    pub fn bit_size(&self) -> usize {
        self.bit_size
    }

    pub fn bit_offset_in_pdi(&self) -> usize {
        self.bit_offset_in_pdi
    }

    /// This entry's bit offset within its own first byte (`bit_offset_in_pdi % 8`). Exposed for
    /// diagnostics and for a custom codec that wants to special-case the byte-aligned case itself
    /// - `update_from_pdi`/`update_to_pdi` already resolve it before a [`crate::reference::Reference`]
    /// or [`crate::sdo::Sdo`] ever sees this entry's buffer, so neither needs it to dispatch a
    /// translation call.
    pub fn bit_offset_in_byte(&self) -> usize {
        self.bit_offset_in_pdi % 8
    }

    pub fn ty(&self) -> &CoeType {
        &self.ty
    }

    pub fn direction(&self) -> EntryDirection {
        self.direction
    }

    /// Copy bytes out of the shared input PDI into this entry's own buffer (spec §4.4, Input).
    pub fn update_from_pdi(&self, pdi: &[u8]) -> Result<(), TranslationError> {
        let mut buf = self.buffer.lock();
        let n = buf.len();
        bitops::shift_merge_read(&mut buf, pdi, self.bit_offset_in_pdi, n)
    }

    /// Copy this entry's own buffer into the shared output PDI (spec §4.4, Output).
    pub fn update_to_pdi(&self, pdi: &mut [u8]) -> Result<(), TranslationError> {
        let buf = self.buffer.lock();
        let n = buf.len();
        bitops::shift_merge_write(pdi, &buf, self.bit_offset_in_pdi, n)
    }

    /// Give a codec temporary locked read access to the buffer.
    pub fn with_buffer<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[u8]) -> R,
    {
        f(&self.buffer.lock())
    }

    /// Give a codec temporary locked write access to the buffer.
    pub fn with_buffer_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut [u8]) -> R,
    {
        f(&mut self.buffer.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Builtin, CoeType, Numeric};

    fn word_entry(bit_offset_in_pdi: usize, direction: EntryDirection) -> Entry {
        Entry::new(
            16,
            bit_offset_in_pdi,
            CoeType::Builtin(Builtin::numeric(Numeric::Uint, 0)),
            direction,
        )
    }

    #[test]
    fn bit_offset_in_byte_is_offset_modulo_8() {
        let entry = word_entry(20, EntryDirection::Input);
        assert_eq!(entry.bit_offset_in_byte(), 4);
    }

    #[test]
    fn buffer_size_is_ceil_bitsize_div_8() {
        let entry = word_entry(4, EntryDirection::Input);
        entry.with_buffer(|buf| assert_eq!(buf.len(), 2));
    }

    #[test]
    fn update_from_pdi_extracts_bit_shifted_value() {
        // Same bytes/offset as seed-suite scenario 2.
        let pdi = [0x0F, 0xBC, 0x0A];
        let entry = word_entry(4, EntryDirection::Input);
        entry.update_from_pdi(&pdi).unwrap();
        entry.with_buffer(|buf| assert_eq!(u16::from_le_bytes([buf[0], buf[1]]), 0xABC0));
    }

    #[test]
    fn update_to_pdi_preserves_surrounding_bits() {
        let entry = word_entry(4, EntryDirection::Output);
        entry.with_buffer_mut(|buf| buf.copy_from_slice(&0xABC0u16.to_le_bytes()));

        let mut pdi = [0xffu8, 0xff, 0xff];
        entry.update_to_pdi(&mut pdi).unwrap();

        assert_eq!(pdi[0] & 0x0f, 0x0f);
        let roundtrip = word_entry(4, EntryDirection::Input);
        roundtrip.update_from_pdi(&pdi).unwrap();
        roundtrip.with_buffer(|buf| assert_eq!(u16::from_le_bytes([buf[0], buf[1]]), 0xABC0));
    }
}
