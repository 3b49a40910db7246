//! The SDO proxy: acyclic configuration/diagnostic access in application units (spec §4.6).

use crate::eni::{Direction, SlaveData};
use crate::error::Error;
use crate::hardware::{HardwareLayer, SdoAccess, SdoAddress, SlaveHandle};
use crate::translate::{dispatch_input, dispatch_output, DynamicSizing, InputCodec, OutputCodec};
use coe_wire::CoeSized;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// Best-effort object dictionary metadata for one SDO address, populated from ENI when a PDO
/// mapping happens to describe it. ENI typically only carries PDO-mapped entries; anything else
/// would need the hardware layer's own object dictionary query primitives, which are out of this
/// crate's scope (spec.md §1) — so this is `None` when ENI doesn't describe the object.
#[derive(Debug, Clone, PartialEq)]
pub struct SdoInfo {
    pub name: String,
    pub writable: bool,
    pub pdo_mappable: bool,
}

impl SdoInfo {
    /// Search every PDO entry of `slave` for one matching `(index, subindex)`.
    pub fn from_eni(slave: &SlaveData, index: u16, subindex: u8) -> Option<SdoInfo> {
        slave.get_pdos().iter().find_map(|pdo| {
            pdo.entries
                .iter()
                .find(|e| e.index == index && e.subindex == subindex)
                .map(|e| SdoInfo {
                    name: e.name.clone(),
                    writable: pdo.direction == Direction::Output,
                    pdo_mappable: true,
                })
        })
    }
}

/// A non-owning handle pairing a codec with a slave's SDO address (spec §4.6, §3).
pub struct Sdo<T, C> {
    hardware: Arc<dyn HardwareLayer>,
    handle: SlaveHandle,
    addr: SdoAddress,
    access: SdoAccess,
    codec: C,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C> Sdo<T, C> {
    pub fn new(
        hardware: Arc<dyn HardwareLayer>,
        handle: SlaveHandle,
        index: u16,
        subindex: u8,
        codec: C,
    ) -> Self {
        Sdo {
            hardware,
            handle,
            addr: SdoAddress { index, subindex },
            access: SdoAccess::Limited,
            codec,
            _marker: PhantomData,
        }
    }

    pub fn with_access(mut self, access: SdoAccess) -> Self {
        self.access = access;
        self
    }
}

impl<T, C> Sdo<T, C>
where
    C: InputCodec<T>,
    T: CoeSized + Default,
{
    /// Statically sized upload: allocate via [`coe_wire::CoeSized::make_buffer`], read, decode.
    pub fn upload(&self, timeout: Duration) -> Result<T, Error> {
        trace!("sdo upload 0x{:04x}:{}", self.addr.index, self.addr.subindex);
        let mut buf = T::make_buffer();
        let len = self
            .hardware
            .sdo_upload(self.handle, self.addr, self.access, &mut buf, timeout)?;
        buf.truncate(len);

        let mut out = T::default();
        dispatch_input(&self.codec, &buf, &mut out, 0, Default::default())?;
        Ok(out)
    }
}

impl<T, C> Sdo<T, C>
where
    C: InputCodec<T> + DynamicSizing<T>,
{
    /// Dynamically sized upload: size the buffer from `out`'s current shape (spec §4.6).
    pub fn upload_into(&self, out: &mut T, timeout: Duration) -> Result<(), Error> {
        let mut buf = self.codec.make_buffer(out)?;
        let len = self
            .hardware
            .sdo_upload(self.handle, self.addr, self.access, &mut buf, timeout)?;
        buf.truncate(len);

        dispatch_input(&self.codec, &buf, out, 0, Default::default())?;
        Ok(())
    }
}

impl<T, C> Sdo<T, C>
where
    C: OutputCodec<T> + DynamicSizing<T>,
{
    /// Download: allocate via the codec's sizing method, encode, write.
    pub fn download(&self, obj: &T, timeout: Duration) -> Result<(), Error> {
        trace!("sdo download 0x{:04x}:{}", self.addr.index, self.addr.subindex);
        let mut buf = self.codec.make_buffer(obj)?;
        dispatch_output(&self.codec, &mut buf, obj, 0, Default::default())?;

        self.hardware
            .sdo_download(self.handle, self.addr, self.access, &buf, timeout)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::mock::MockHardwareLayer;
    use crate::translate::default::DefaultCodec;

    #[test]
    fn sdo_upload_dint_matches_seed_suite_scenario_5() {
        let mock = Arc::new(MockHardwareLayer::new(0, 0));
        mock.set_sdo(0x6064, 0, vec![0x01, 0x00, 0x00, 0x00]);

        let sdo: Sdo<i32, _> = Sdo::new(
            mock as Arc<dyn HardwareLayer>,
            SlaveHandle(0),
            0x6064,
            0,
            DefaultCodec,
        );

        assert_eq!(sdo.upload(Duration::from_millis(100)).unwrap(), 1);
    }

    #[test]
    fn download_then_upload_round_trips() {
        let mock = Arc::new(MockHardwareLayer::new(0, 0));
        let sdo: Sdo<String, _> = Sdo::new(
            Arc::clone(&mock) as Arc<dyn HardwareLayer>,
            SlaveHandle(0),
            0x1008,
            0,
            DefaultCodec,
        );

        sdo.download(&"hello".to_string(), Duration::from_millis(100))
            .unwrap();

        let mut out = String::new();
        sdo.upload_into(&mut out, Duration::from_millis(100))
            .unwrap();
        assert_eq!(out, "hello");
    }
}
