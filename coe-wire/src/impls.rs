//! Builtin implementations of the wire traits for the CoE numeric scalars.

use crate::{CoeRead, CoeSized, CoeWrite, WireError};

macro_rules! impl_numeric {
    ($ty:ty, $bytes:expr) => {
        impl CoeRead for $ty {
            fn read_from(data: &[u8]) -> Result<Self, WireError> {
                let raw = data.get(0..$bytes).ok_or(WireError::TooShort {
                    need: $bytes,
                    have: data.len(),
                })?;

                // SAFETY net: `raw` is exactly `$bytes` long per the slice above.
                let arr: [u8; $bytes] = raw.try_into().map_err(|_| WireError::InvalidValue)?;

                Ok(Self::from_le_bytes(arr))
            }
        }

        impl CoeWrite for $ty {
            fn write_into(&self, data: &mut [u8]) {
                data[0..$bytes].copy_from_slice(&self.to_le_bytes());
            }

            fn packed_len(&self) -> usize {
                $bytes
            }
        }

        impl CoeSized for $ty {
            const PACKED_BITS: usize = $bytes * 8;
        }
    };
}

impl_numeric!(u8, 1);
impl_numeric!(u16, 2);
impl_numeric!(u32, 4);
impl_numeric!(u64, 8);
impl_numeric!(i8, 1);
impl_numeric!(i16, 2);
impl_numeric!(i32, 4);
impl_numeric!(i64, 8);
impl_numeric!(f32, 4);
impl_numeric!(f64, 8);

impl CoeRead for bool {
    fn read_from(data: &[u8]) -> Result<Self, WireError> {
        let byte = *data.first().ok_or(WireError::TooShort { need: 1, have: 0 })?;

        Ok(byte != 0)
    }
}

impl CoeWrite for bool {
    fn write_into(&self, data: &mut [u8]) {
        data[0] = *self as u8;
    }

    fn packed_len(&self) -> usize {
        1
    }
}

impl CoeSized for bool {
    const PACKED_BITS: usize = 1;

    fn packed_bytes() -> usize {
        1
    }
}

// Note: there is deliberately no specialized `impl CoeRead for [u8; N]` here - the generic
// `[T; N]` impls below already cover it since `u8: CoeRead + CoeSized`, and a second impl would
// conflict (E0119).

impl<T, const N: usize> CoeRead for [T; N]
where
    T: CoeRead + CoeSized,
{
    fn read_from(data: &[u8]) -> Result<Self, WireError> {
        let stride = T::packed_bytes();

        let mut items = Vec::with_capacity(N);

        for i in 0..N {
            let start = i * stride;
            let end = start + stride;
            let chunk = data.get(start..end).ok_or(WireError::TooShort {
                need: end,
                have: data.len(),
            })?;
            items.push(T::read_from(chunk)?);
        }

        // `Vec<T>`'s `TryFrom` for `[T; N]` only fails on a length mismatch, which cannot
        // happen here as we pushed exactly `N` items above.
        Ok(items
            .try_into()
            .unwrap_or_else(|_| unreachable!("exactly N items were pushed")))
    }
}

impl<T, const N: usize> CoeWrite for [T; N]
where
    T: CoeWrite + CoeSized,
{
    fn write_into(&self, data: &mut [u8]) {
        let stride = T::packed_bytes();

        for (i, item) in self.iter().enumerate() {
            let start = i * stride;
            item.write_into(&mut data[start..start + stride]);
        }
    }

    fn packed_len(&self) -> usize {
        T::packed_bytes() * N
    }
}

impl<T, const N: usize> CoeSized for [T; N]
where
    T: CoeRead + CoeSized,
{
    const PACKED_BITS: usize = T::PACKED_BITS * N;
}
