//! The two process-wide PDI buffers (spec §3): one for inputs, one for outputs, each behind a
//! `std::sync::Mutex` so `read_bus`/`write_bus` can hold the lock across a (potentially slow)
//! hardware layer call without burning CPU, per the concurrency model in spec §5.

use std::sync::{Mutex, MutexGuard};

/// A fixed-size, zero-initialized byte buffer shared between the bus cycle and every slave's
/// entries. Size is fixed at construction from the ENI `ProcessImage` and never changes.
pub struct PdiBuffer {
    bytes: Mutex<Vec<u8>>,
}

impl PdiBuffer {
    pub fn new(size_bits: usize) -> Self {
        PdiBuffer {
            bytes: Mutex::new(vec![0u8; (size_bits + 7) / 8]),
        }
    }

    pub fn len_bytes(&self) -> usize {
        // Locking just to read the length is cheap and avoids a separate cached field going
        // stale relative to the real buffer, which never resizes anyway.
        self.bytes.lock().unwrap().len()
    }

    pub fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_from_bits_rounding_up() {
        assert_eq!(PdiBuffer::new(1).len_bytes(), 1);
        assert_eq!(PdiBuffer::new(8).len_bytes(), 1);
        assert_eq!(PdiBuffer::new(9).len_bytes(), 2);
    }

    #[test]
    fn starts_zeroed() {
        let pdi = PdiBuffer::new(32);
        assert_eq!(&pdi.lock()[..], &[0, 0, 0, 0]);
    }
}
