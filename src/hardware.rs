//! The boundary to the hardware-specific lower layer (spec §6).
//!
//! This crate never constructs or parses an EtherCAT datagram itself; it is handed a
//! `HardwareLayer` implementation that already knows how to do that for a specific NIC, stack or
//! simulator, and calls through it for every raw PDI exchange, SDO access and ESM state
//! transition.

use crate::eni::Direction;
use crate::state::EsmState;
use std::time::Duration;

/// Opaque handle identifying a slave to the hardware layer, as assigned during the hardware
/// layer's own bus enumeration. This crate never constructs one itself — it is handed back
/// whatever the `Master`'s slave-factory callback associates with each slave (spec §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlaveHandle(pub u16);

/// An SDO address: object dictionary index plus subindex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SdoAddress {
    pub index: u16,
    pub subindex: u8,
}

/// Whether an SDO access reads one subindex or the whole object from a given subindex up
/// (spec §3, `SDO proxy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdoAccess {
    /// `(index, subindex)` only.
    Limited,
    /// `(index, subindex_start)` and every subsequent subindex.
    Complete,
}

/// The small interface required of a concrete EtherCAT master driver (spec §6).
///
/// Every method is a blocking call bounded by the given `timeout`; there is no async flavor —
/// this crate's concurrency model is thread-based, not task-based (spec §5).
pub trait HardwareLayer: Send + Sync {
    /// Read the whole input PDI into `buf`.
    fn raw_read_pdi(&self, buf: &mut [u8], timeout: Duration) -> Result<(), crate::Error>;

    /// Write the whole output PDI from `buf`.
    fn raw_write_pdi(&self, buf: &[u8], timeout: Duration) -> Result<(), crate::Error>;

    /// Upload (read) an SDO into `buf`, returning the number of bytes actually read.
    fn sdo_upload(
        &self,
        slave: SlaveHandle,
        addr: SdoAddress,
        access: SdoAccess,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, crate::Error>;

    /// Download (write) an SDO from `buf`.
    fn sdo_download(
        &self,
        slave: SlaveHandle,
        addr: SdoAddress,
        access: SdoAccess,
        buf: &[u8],
        timeout: Duration,
    ) -> Result<(), crate::Error>;

    fn get_master_state(&self, timeout: Duration) -> Result<EsmState, crate::Error>;

    fn set_master_state(&self, state: EsmState, timeout: Duration) -> Result<(), crate::Error>;

    fn get_slave_state(
        &self,
        slave: SlaveHandle,
        timeout: Duration,
    ) -> Result<EsmState, crate::Error>;

    fn set_slave_state(
        &self,
        slave: SlaveHandle,
        state: EsmState,
        timeout: Duration,
    ) -> Result<(), crate::Error>;
}

/// `RxPdo`/`TxPdo` seen from the hardware layer's addressing perspective, re-exported here so
/// implementors don't need to reach into [`crate::eni`] just for the enum.
pub type PdoDirection = Direction;

#[cfg(any(test, feature = "test-support"))]
pub mod mock {
    #![allow(missing_docs)]
    //! An in-memory [`HardwareLayer`] used by this crate's own integration tests, mirroring the
    //! way the teacher library's test suite substitutes a bare lock for a real PDU loop rather
    //! than talking to a network device.

    use super::*;
    use std::sync::Mutex;

    /// A fixed-size, all-zeroes-by-default hardware layer: reads hand back whatever was last
    /// written into `inputs`, writes capture into `outputs`, SDO calls are served from a table
    /// the test populates ahead of time.
    pub struct MockHardwareLayer {
        pub inputs: Mutex<Vec<u8>>,
        pub outputs: Mutex<Vec<u8>>,
        pub sdo_table: Mutex<std::collections::HashMap<(u16, u8), Vec<u8>>>,
        pub master_state: Mutex<EsmState>,
        pub slave_states: Mutex<std::collections::HashMap<u16, EsmState>>,
    }

    impl MockHardwareLayer {
        pub fn new(input_bytes: usize, output_bytes: usize) -> Self {
            MockHardwareLayer {
                inputs: Mutex::new(vec![0; input_bytes]),
                outputs: Mutex::new(vec![0; output_bytes]),
                sdo_table: Mutex::new(std::collections::HashMap::new()),
                master_state: Mutex::new(EsmState::Init),
                slave_states: Mutex::new(std::collections::HashMap::new()),
            }
        }

        pub fn set_input_bytes(&self, bytes: &[u8]) {
            self.inputs.lock().unwrap().copy_from_slice(bytes);
        }

        pub fn set_sdo(&self, index: u16, subindex: u8, bytes: Vec<u8>) {
            self.sdo_table.lock().unwrap().insert((index, subindex), bytes);
        }
    }

    impl HardwareLayer for MockHardwareLayer {
        fn raw_read_pdi(&self, buf: &mut [u8], _timeout: Duration) -> Result<(), crate::Error> {
            let inputs = self.inputs.lock().unwrap();
            buf.copy_from_slice(&inputs);
            Ok(())
        }

        fn raw_write_pdi(&self, buf: &[u8], _timeout: Duration) -> Result<(), crate::Error> {
            self.outputs.lock().unwrap().copy_from_slice(buf);
            Ok(())
        }

        fn sdo_upload(
            &self,
            _slave: SlaveHandle,
            addr: SdoAddress,
            _access: SdoAccess,
            buf: &mut [u8],
            _timeout: Duration,
        ) -> Result<usize, crate::Error> {
            let table = self.sdo_table.lock().unwrap();
            let data = table
                .get(&(addr.index, addr.subindex))
                .ok_or(crate::Error::IoFailed("no SDO value programmed in mock".to_string()))?;
            let len = data.len().min(buf.len());
            buf[..len].copy_from_slice(&data[..len]);
            Ok(len)
        }

        fn sdo_download(
            &self,
            _slave: SlaveHandle,
            addr: SdoAddress,
            _access: SdoAccess,
            buf: &[u8],
            _timeout: Duration,
        ) -> Result<(), crate::Error> {
            self.sdo_table
                .lock()
                .unwrap()
                .insert((addr.index, addr.subindex), buf.to_vec());
            Ok(())
        }

        fn get_master_state(&self, _timeout: Duration) -> Result<EsmState, crate::Error> {
            Ok(*self.master_state.lock().unwrap())
        }

        fn set_master_state(&self, state: EsmState, _timeout: Duration) -> Result<(), crate::Error> {
            *self.master_state.lock().unwrap() = state;
            Ok(())
        }

        fn get_slave_state(
            &self,
            slave: SlaveHandle,
            _timeout: Duration,
        ) -> Result<EsmState, crate::Error> {
            Ok(*self
                .slave_states
                .lock()
                .unwrap()
                .get(&slave.0)
                .unwrap_or(&EsmState::Init))
        }

        fn set_slave_state(
            &self,
            slave: SlaveHandle,
            state: EsmState,
            _timeout: Duration,
        ) -> Result<(), crate::Error> {
            self.slave_states.lock().unwrap().insert(slave.0, state);
            Ok(())
        }
    }
}
