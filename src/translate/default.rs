//! The default codec (spec §4.3): ships for booleans, the sixteen CoE scalars, static-length
//! strings, dynamic strings, fixed-arity arrays and dynamic vectors of the above, and arrays of
//! variable-length strings.
//!
//! Scalar, array and fixed-size-struct support is delegated to [`coe_wire`]'s `CoeRead`/
//! `CoeWrite`/`CoeSized` (byte-aligned, statically sized); this module adds the bit-offset-aware
//! overload on top via [`super::bitops`], and handles the dynamically sized cases ([`String`],
//! `Vec<T>`, `Vec<String>`, and bit-packed `Vec<bool>` via [`BitVecCodec`]) that are out of
//! `coe_wire`'s scope entirely.

use super::{bitops, DynamicSizing, InputCodec, OutputCodec, TranslationError};
use crate::config::ArrayParsingMode;
use coe_wire::{CoeRead, CoeSized, CoeWrite};

fn verify_read(have: usize, need: usize) -> Result<(), TranslationError> {
    if !cfg!(feature = "verify") {
        return Ok(());
    }
    if have < need {
        return Err(TranslationError::BufferTooSmall { need, have });
    }
    if !cfg!(feature = "allow-partial-translation") && have != need {
        return Err(TranslationError::BufferSizeMismatch { need, have });
    }
    Ok(())
}

fn verify_write(have: usize, need: usize) -> Result<(), TranslationError> {
    verify_read(have, need)
}

/// The stateless, specialized-by-nothing (i.e. maximally generic) default codec. A unit struct:
/// it carries no state, which is the "stateless" pole of the stateful/stateless axis (spec
/// §4.3).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCodec;

impl<T> InputCodec<T> for DefaultCodec
where
    T: CoeRead + CoeSized,
{
    const BIT_OFFSET_AWARE: bool = true;

    fn translate_to(&self, data: &[u8], out: &mut T) -> Result<(), TranslationError> {
        verify_read(data.len(), T::packed_bytes())?;
        *out = T::read_from(data)?;
        Ok(())
    }

    fn translate_to_at(
        &self,
        data: &[u8],
        out: &mut T,
        bit_offset: usize,
    ) -> Result<(), TranslationError> {
        if bit_offset == 0 {
            return self.translate_to(data, out);
        }

        let n = T::packed_bytes();
        let mut shifted = vec![0u8; n];
        bitops::shift_merge_read(&mut shifted, data, bit_offset, n)?;
        *out = T::read_from(&shifted)?;
        Ok(())
    }
}

impl<T> OutputCodec<T> for DefaultCodec
where
    T: CoeWrite,
{
    const BIT_OFFSET_AWARE: bool = true;

    fn translate_from(&self, data: &mut [u8], obj: &T) -> Result<(), TranslationError> {
        verify_write(data.len(), obj.packed_len())?;
        obj.write_into(data);
        Ok(())
    }

    fn translate_from_at(
        &self,
        data: &mut [u8],
        obj: &T,
        bit_offset: usize,
    ) -> Result<(), TranslationError> {
        if bit_offset == 0 {
            return self.translate_from(data, obj);
        }

        let n = obj.packed_len();
        let mut tmp = vec![0u8; n];
        obj.write_into(&mut tmp);
        bitops::shift_merge_write(data, &tmp, bit_offset, n)
    }
}

impl<T> DynamicSizing<T> for DefaultCodec
where
    T: CoeSized,
{
    fn make_buffer(&self, _obj: &T) -> Result<Vec<u8>, TranslationError> {
        Ok(T::make_buffer())
    }
}

// --- Dynamic strings --------------------------------------------------------------------

impl InputCodec<String> for DefaultCodec {
    fn translate_to(&self, data: &[u8], out: &mut String) -> Result<(), TranslationError> {
        let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        *out = String::from_utf8_lossy(&data[..end]).into_owned();
        Ok(())
    }
}

impl OutputCodec<String> for DefaultCodec {
    fn translate_from(&self, data: &mut [u8], obj: &String) -> Result<(), TranslationError> {
        verify_write(data.len(), obj.len())?;
        let bytes = obj.as_bytes();
        let n = bytes.len().min(data.len());
        data[..n].copy_from_slice(&bytes[..n]);
        for b in &mut data[n..] {
            *b = 0;
        }
        Ok(())
    }
}

impl DynamicSizing<String> for DefaultCodec {
    fn make_buffer(&self, obj: &String) -> Result<Vec<u8>, TranslationError> {
        Ok(vec![0u8; obj.len()])
    }
}

// --- Dynamic vectors of fixed-size elements ---------------------------------------------

impl<T> InputCodec<Vec<T>> for DefaultCodec
where
    T: CoeRead + CoeSized,
{
    fn translate_to(&self, data: &[u8], out: &mut Vec<T>) -> Result<(), TranslationError> {
        // The number of elements is taken from `out`'s current length and is never modified
        // here - the caller sizes the destination (spec §4.3).
        let stride = T::packed_bytes();
        let need = stride * out.len();
        verify_read(data.len(), need)?;

        for (i, slot) in out.iter_mut().enumerate() {
            *slot = T::read_from(&data[i * stride..(i + 1) * stride])?;
        }
        Ok(())
    }
}

impl<T> OutputCodec<Vec<T>> for DefaultCodec
where
    T: CoeWrite + CoeSized,
{
    fn translate_from(&self, data: &mut [u8], obj: &Vec<T>) -> Result<(), TranslationError> {
        let stride = T::packed_bytes();
        let need = stride * obj.len();
        verify_write(data.len(), need)?;

        for (i, item) in obj.iter().enumerate() {
            item.write_into(&mut data[i * stride..(i + 1) * stride]);
        }
        Ok(())
    }
}

impl<T> DynamicSizing<Vec<T>> for DefaultCodec
where
    T: CoeSized,
{
    fn make_buffer(&self, obj: &Vec<T>) -> Result<Vec<u8>, TranslationError> {
        Ok(vec![0u8; T::packed_bytes() * obj.len()])
    }
}

// --- Arrays of variable-length strings ---------------------------------------------------

/// A codec for `Vec<String>` whose element lengths are not all fixed, carrying the
/// [`ArrayParsingMode`] that decides how to size and validate the array (spec §4.3). Unlike
/// [`DefaultCodec`] this one is stateful: the mode is a runtime choice, not something derivable
/// from the type `Vec<String>` alone.
#[derive(Debug, Clone, Copy)]
pub struct StringArrayCodec {
    pub mode: ArrayParsingMode,
}

impl StringArrayCodec {
    pub fn new(mode: ArrayParsingMode) -> Self {
        StringArrayCodec { mode }
    }

    /// The length every element is expected to occupy when `mode` is `AssumeEqualSize` or
    /// `RequireEqualSize`: the first element's length (zero for an empty array).
    fn uniform_stride(elements: &[String]) -> usize {
        elements.first().map(|s| s.len()).unwrap_or(0)
    }
}

impl InputCodec<Vec<String>> for StringArrayCodec {
    fn translate_to(&self, data: &[u8], out: &mut Vec<String>) -> Result<(), TranslationError> {
        let n = out.len();
        match self.mode {
            ArrayParsingMode::AssumeEqualSize | ArrayParsingMode::RequireEqualSize => {
                if n == 0 {
                    return Ok(());
                }
                let stride = data.len() / n.max(1);
                verify_read(data.len(), stride * n)?;
                for (i, slot) in out.iter_mut().enumerate() {
                    let chunk = &data[i * stride..(i + 1) * stride];
                    let end = chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len());
                    *slot = String::from_utf8_lossy(&chunk[..end]).into_owned();
                }
                Ok(())
            }
            ArrayParsingMode::AllowVariableSize => {
                // Each element is nul-terminated; lengths may differ, so the offset of a later
                // element depends on every earlier one and can run past `data` if the source is
                // shorter than this array's shape implies.
                let mut offset = 0;
                for slot in out.iter_mut() {
                    if offset > data.len() {
                        return Err(TranslationError::BufferTooSmall { need: offset, have: data.len() });
                    }
                    let remaining = &data[offset..];
                    let end = remaining.iter().position(|&b| b == 0).unwrap_or(remaining.len());
                    *slot = String::from_utf8_lossy(&remaining[..end]).into_owned();
                    offset += end + 1;
                }
                Ok(())
            }
        }
    }
}

impl OutputCodec<Vec<String>> for StringArrayCodec {
    fn translate_from(&self, data: &mut [u8], obj: &Vec<String>) -> Result<(), TranslationError> {
        match self.mode {
            ArrayParsingMode::AssumeEqualSize => {
                let stride = Self::uniform_stride(obj);
                verify_write(data.len(), stride * obj.len())?;
                for (i, s) in obj.iter().enumerate() {
                    write_fixed_str(&mut data[i * stride..(i + 1) * stride], s);
                }
                Ok(())
            }
            ArrayParsingMode::RequireEqualSize => {
                let stride = Self::uniform_stride(obj);
                if obj.iter().any(|s| s.len() != stride) {
                    return Err(TranslationError::StringArrayShapeMismatch);
                }
                verify_write(data.len(), stride * obj.len())?;
                for (i, s) in obj.iter().enumerate() {
                    write_fixed_str(&mut data[i * stride..(i + 1) * stride], s);
                }
                Ok(())
            }
            ArrayParsingMode::AllowVariableSize => {
                let need: usize = obj.iter().map(|s| s.len() + 1).sum();
                verify_write(data.len(), need)?;
                let mut offset = 0;
                for s in obj {
                    let bytes = s.as_bytes();
                    data[offset..offset + bytes.len()].copy_from_slice(bytes);
                    data[offset + bytes.len()] = 0;
                    offset += bytes.len() + 1;
                }
                Ok(())
            }
        }
    }
}

impl DynamicSizing<Vec<String>> for StringArrayCodec {
    fn make_buffer(&self, obj: &Vec<String>) -> Result<Vec<u8>, TranslationError> {
        let need = match self.mode {
            ArrayParsingMode::AssumeEqualSize => Self::uniform_stride(obj) * obj.len(),
            ArrayParsingMode::RequireEqualSize => {
                let stride = Self::uniform_stride(obj);
                if obj.iter().any(|s| s.len() != stride) {
                    return Err(TranslationError::StringArrayShapeMismatch);
                }
                stride * obj.len()
            }
            ArrayParsingMode::AllowVariableSize => obj.iter().map(|s| s.len() + 1).sum(),
        };
        Ok(vec![0u8; need])
    }
}

// --- Bit-packed boolean vectors ----------------------------------------------------------

/// A codec for bit-packed `Vec<bool>` (the CoE BIT array family: one bit per element, LSB-first
/// within each byte). Distinct from [`DefaultCodec`]'s blanket `Vec<T>` support, which treats
/// `bool` as `coe_wire`'s byte-aligned BOOL8 representation - the two are different CoE type
/// families sharing a host type, not two codecs for the same wire shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitVecCodec;

impl BitVecCodec {
    fn get_bit(data: &[u8], bit: usize) -> bool {
        (data[bit / 8] >> (bit % 8)) & 1 != 0
    }

    fn set_bit(data: &mut [u8], bit: usize, value: bool) {
        let mask = 1u8 << (bit % 8);
        if value {
            data[bit / 8] |= mask;
        } else {
            data[bit / 8] &= !mask;
        }
    }
}

impl InputCodec<Vec<bool>> for BitVecCodec {
    const BIT_OFFSET_AWARE: bool = true;

    fn translate_to(&self, data: &[u8], out: &mut Vec<bool>) -> Result<(), TranslationError> {
        self.translate_to_at(data, out, 0)
    }

    fn translate_to_at(
        &self,
        data: &[u8],
        out: &mut Vec<bool>,
        bit_offset: usize,
    ) -> Result<(), TranslationError> {
        let need_bytes = (bit_offset + out.len() + 7) / 8;
        verify_read(data.len(), need_bytes)?;

        // Every element is decoded unconditionally here: an earlier revision returned as soon
        // as an element landed on a byte boundary, leaving the remaining elements untouched.
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = Self::get_bit(data, bit_offset + i);
        }
        Ok(())
    }
}

impl OutputCodec<Vec<bool>> for BitVecCodec {
    const BIT_OFFSET_AWARE: bool = true;

    fn translate_from(&self, data: &mut [u8], obj: &Vec<bool>) -> Result<(), TranslationError> {
        self.translate_from_at(data, obj, 0)
    }

    fn translate_from_at(
        &self,
        data: &mut [u8],
        obj: &Vec<bool>,
        bit_offset: usize,
    ) -> Result<(), TranslationError> {
        let need_bytes = (bit_offset + obj.len() + 7) / 8;
        verify_write(data.len(), need_bytes)?;

        for (i, &bit) in obj.iter().enumerate() {
            Self::set_bit(data, bit_offset + i, bit);
        }
        Ok(())
    }
}

impl DynamicSizing<Vec<bool>> for BitVecCodec {
    fn make_buffer(&self, obj: &Vec<bool>) -> Result<Vec<u8>, TranslationError> {
        Ok(vec![0u8; (obj.len() + 7) / 8])
    }
}

fn write_fixed_str(dst: &mut [u8], s: &str) {
    let bytes = s.as_bytes();
    let n = bytes.len().min(dst.len());
    dst[..n].copy_from_slice(&bytes[..n]);
    for b in &mut dst[n..] {
        *b = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn le_byte_copy_matches_seed_suite_scenario_1() {
        let data = [0x78u8, 0x56, 0x34, 0x12];
        let mut out = 0u32;
        DefaultCodec.translate_to(&data, &mut out).unwrap();
        assert_eq!(out, 0x1234_5678);
    }

    #[test]
    fn array_of_three_usint_matches_seed_suite_scenario_3() {
        let data = [0x01u8, 0x02, 0x03];
        let mut out = [0u8; 3];
        DefaultCodec.translate_to(&data, &mut out).unwrap();
        assert_eq!(out, [0x01, 0x02, 0x03]);
    }

    #[test]
    fn string_write_matches_seed_suite_scenario_4() {
        let mut data = [0u8; 4];
        let value = "abcd".to_string();
        DefaultCodec.translate_from(&mut data, &value).unwrap();
        assert_eq!(data, [0x61, 0x62, 0x63, 0x64]);
    }

    #[test]
    fn exact_fit_required_without_allow_partial() {
        // `allow-partial-translation` is a default feature in this crate's Cargo.toml; this
        // test documents the behavior verify_read implements regardless of which way the
        // feature happens to be compiled for this test run.
        let result = verify_read(5, 4);
        if cfg!(feature = "allow-partial-translation") {
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(TranslationError::BufferSizeMismatch { .. })));
        }
    }

    #[test]
    fn require_equal_size_rejects_mismatched_lengths() {
        let codec = StringArrayCodec::new(ArrayParsingMode::RequireEqualSize);
        let mut data = [0u8; 8];
        let values = vec!["ab".to_string(), "abc".to_string()];
        let result = codec.translate_from(&mut data, &values);
        assert_eq!(result, Err(TranslationError::StringArrayShapeMismatch));
    }

    #[test]
    fn bit_vec_reads_every_element_past_a_byte_boundary() {
        // 10 bits spanning two bytes; every element must be read, not just the first 8.
        let data = [0b1010_1010u8, 0b0000_0001];
        let mut out = vec![false; 10];
        BitVecCodec.translate_to(&data, &mut out).unwrap();
        assert_eq!(
            out,
            vec![false, true, false, true, false, true, false, true, true, false]
        );
    }

    #[test]
    fn bit_vec_honors_a_nonzero_bit_offset() {
        let data = [0b1111_0000u8, 0b0000_0001];
        let mut out = vec![false; 5];
        BitVecCodec.translate_to_at(&data, &mut out, 4).unwrap();
        assert_eq!(out, vec![false, false, false, false, true]);
    }

    #[test]
    fn bit_vec_round_trips_through_make_buffer() {
        let values = vec![true, false, true, true, false, false, true, true, true];
        let mut buf = BitVecCodec.make_buffer(&values).unwrap();
        BitVecCodec.translate_from(&mut buf, &values).unwrap();

        let mut decoded = vec![false; values.len()];
        BitVecCodec.translate_to(&buf, &mut decoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn require_equal_size_make_buffer_rejects_mismatched_lengths() {
        let codec = StringArrayCodec::new(ArrayParsingMode::RequireEqualSize);
        let values = vec!["ab".to_string(), "abc".to_string()];
        let result = codec.make_buffer(&values);
        assert_eq!(result, Err(TranslationError::StringArrayShapeMismatch));
    }

    #[test]
    fn allow_variable_size_translate_to_rejects_a_short_buffer_instead_of_panicking() {
        let codec = StringArrayCodec::new(ArrayParsingMode::AllowVariableSize);
        // No nul terminator for the first (only) element in `data`: the first slot consumes it
        // all and the offset for the second slot runs past `data.len()`.
        let data = b"ab";
        let mut out = vec![String::new(), String::new()];
        let result = codec.translate_to(data, &mut out);
        assert_eq!(result, Err(TranslationError::BufferTooSmall { need: 3, have: 2 }));
    }

    #[test]
    fn allow_variable_size_round_trips() {
        let codec = StringArrayCodec::new(ArrayParsingMode::AllowVariableSize);
        let values = vec!["ab".to_string(), "c".to_string()];
        let mut data = vec![0u8; codec.make_buffer(&values).unwrap().len()];
        codec.translate_from(&mut data, &values).unwrap();

        let mut decoded = vec![String::new(), String::new()];
        codec.translate_to(&data, &mut decoded).unwrap();
        assert_eq!(decoded, values);
    }
}
