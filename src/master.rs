//! The Master facade (spec §4.8): owns the PDI buffers, orchestrates the bus cycle, owns every
//! Slave.

use crate::eni::{Configuration, Direction as PdoDirection};
use crate::error::Error;
use crate::event::{EventBus, HandlerId};
use crate::hardware::{HardwareLayer, SlaveHandle};
use crate::pdi::{Entry, EntryDirection, PdiBuffer};
use crate::slave::Slave;
use crate::state::EsmState;
use crate::types::CoeType;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Events fired during `read_bus`/`write_bus` (spec §4.8, §5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MasterEvent {
    ReadBusStart,
    ReadBusComplete,
    ReadBusSlavesUpdateComplete,
    WriteBusStart,
    WriteBusSlavesUpdateComplete,
    WriteBusComplete,
}

/// Owns the two process-wide PDI buffers and every [`Slave`] (spec §3 ownership graph).
pub struct Master {
    input_pdi: PdiBuffer,
    output_pdi: PdiBuffer,
    slaves: Vec<Arc<Slave>>,
    hardware: Arc<dyn HardwareLayer>,
    cyclic: crate::eni::Cyclic,
    process_image: crate::eni::ProcessImage,
    events: EventBus<MasterEvent>,
}

impl Master {
    pub fn from_file(
        path: impl AsRef<Path>,
        hardware: Arc<dyn HardwareLayer>,
        slave_factory: impl Fn(&crate::eni::Slave) -> SlaveHandle,
    ) -> Result<Self, Error> {
        let config = Configuration::from_file(path)?;
        Self::build(config, hardware, slave_factory)
    }

    pub fn from_string(
        xml: &str,
        hardware: Arc<dyn HardwareLayer>,
        slave_factory: impl Fn(&crate::eni::Slave) -> SlaveHandle,
    ) -> Result<Self, Error> {
        let config = Configuration::from_string(xml)?;
        Self::build(config, hardware, slave_factory)
    }

    pub fn from_stream(
        reader: impl Read,
        hardware: Arc<dyn HardwareLayer>,
        slave_factory: impl Fn(&crate::eni::Slave) -> SlaveHandle,
    ) -> Result<Self, Error> {
        let config = Configuration::from_stream(reader)?;
        Self::build(config, hardware, slave_factory)
    }

    /// Build every [`Slave`]'s entries by cross-referencing its assigned PDOs' entries against
    /// the `ProcessImage` variables ENI declares for the same slave+PDO, the "proxy that, given
    /// a PDO entry, returns its PDI bit offset and bit size" spec §4.8 describes.
    fn build(
        config: Configuration,
        hardware: Arc<dyn HardwareLayer>,
        slave_factory: impl Fn(&crate::eni::Slave) -> SlaveHandle,
    ) -> Result<Self, Error> {
        let process_image = config.get_process_image();
        let cyclic = config.get_cyclic();

        let input_pdi = PdiBuffer::new(process_image.input_bits());
        let output_pdi = PdiBuffer::new(process_image.output_bits());

        let mut slaves = Vec::new();
        for eni_slave in config.slaves() {
            let handle = slave_factory(&eni_slave);
            let data = eni_slave.autonomize();

            let mut input_entries = Vec::new();
            let mut output_entries = Vec::new();

            for pdo in data.get_assigned_pdos() {
                for pdo_entry in &pdo.entries {
                    let var = match process_image
                        .variables_for_slave_pdo(data.name(), &pdo.name)
                        .find(|v| v.entry_name == pdo_entry.name)
                    {
                        Some(v) => v,
                        None => continue,
                    };

                    let ty = CoeType::Builtin(pdo_entry.resolved_type()?);
                    let direction = match pdo.direction {
                        PdoDirection::Input => EntryDirection::Input,
                        PdoDirection::Output => EntryDirection::Output,
                    };
                    let entry = Arc::new(Entry::new(var.bit_size, var.bit_offset, ty, direction));

                    match pdo.direction {
                        PdoDirection::Input => input_entries.push((pdo_entry.name.clone(), entry)),
                        PdoDirection::Output => output_entries.push((pdo_entry.name.clone(), entry)),
                    }
                }
            }

            slaves.push(Arc::new(Slave::new(
                data,
                handle,
                Arc::clone(&hardware),
                input_entries,
                output_entries,
            )));
        }

        Ok(Master {
            input_pdi,
            output_pdi,
            slaves,
            hardware,
            cyclic,
            process_image,
            events: EventBus::new(),
        })
    }

    pub fn list_slaves(&self) -> impl Iterator<Item = &str> {
        self.slaves.iter().map(|s| s.name())
    }

    pub fn get_slaves(&self) -> &[Arc<Slave>] {
        &self.slaves
    }

    pub fn get_slave(&self, name: &str) -> Option<&Arc<Slave>> {
        self.slaves.iter().find(|s| s.name() == name)
    }

    pub fn get_bus_cycle(&self) -> Duration {
        self.cyclic.cycle_time()
    }

    pub fn get_process_image(&self) -> &crate::eni::ProcessImage {
        &self.process_image
    }

    // --- Master-level ESM state -------------------------------------------------------------

    pub fn get_state(&self, timeout: Duration) -> Result<EsmState, Error> {
        Ok(self.hardware.get_master_state(timeout)?)
    }

    pub fn set_state(&self, state: EsmState, timeout: Duration) -> Result<(), Error> {
        debug!("requesting master state {}", state);
        self.hardware.set_master_state(state, timeout)?;
        Ok(())
    }

    // --- Bus cycle ---------------------------------------------------------------------------

    /// Fire `ReadBusStart`; raw-read the input PDI; fire `ReadBusComplete`; update every slave's
    /// Input entries; fire `ReadBusSlavesUpdateComplete` (spec §4.8, §5).
    pub fn read_bus(&self, timeout: Duration) -> Result<(), Error> {
        self.events.fire(&MasterEvent::ReadBusStart);

        {
            let mut pdi = self.input_pdi.lock();
            self.hardware.raw_read_pdi(&mut pdi[..], timeout).inspect_err(|e| {
                error!("raw_read_pdi failed: {}", e);
            })?;
        }
        self.events.fire(&MasterEvent::ReadBusComplete);

        {
            let pdi = self.input_pdi.lock();
            for slave in &self.slaves {
                slave.update_inputs(&pdi[..])?;
            }
        }
        self.events.fire(&MasterEvent::ReadBusSlavesUpdateComplete);
        trace!("read_bus complete, {} slaves updated", self.slaves.len());

        Ok(())
    }

    /// Fire `WriteBusStart`; harvest every slave's Output entries; fire
    /// `WriteBusSlavesUpdateComplete`; raw-write the output PDI; fire `WriteBusComplete`.
    pub fn write_bus(&self, timeout: Duration) -> Result<(), Error> {
        self.events.fire(&MasterEvent::WriteBusStart);

        {
            let mut pdi = self.output_pdi.lock();
            for slave in &self.slaves {
                slave.update_outputs(&mut pdi[..])?;
            }
        }
        self.events.fire(&MasterEvent::WriteBusSlavesUpdateComplete);

        {
            let pdi = self.output_pdi.lock();
            self.hardware.raw_write_pdi(&pdi[..], timeout).inspect_err(|e| {
                error!("raw_write_pdi failed: {}", e);
            })?;
        }
        self.events.fire(&MasterEvent::WriteBusComplete);

        Ok(())
    }

    /// Debug-only direct access, not synchronized by the accessor (spec §4.8).
    #[doc(hidden)]
    pub fn _get_input_buffer(&self) -> Vec<u8> {
        self.input_pdi.lock().clone()
    }

    #[doc(hidden)]
    pub fn _get_output_buffer(&self) -> Vec<u8> {
        self.output_pdi.lock().clone()
    }

    // --- Event handlers ----------------------------------------------------------------------

    pub fn on_event(&self, f: impl Fn(&MasterEvent) + Send + Sync + 'static) -> HandlerId {
        self.events.register(f)
    }

    pub fn unregister_handler(&self, id: HandlerId) {
        self.events.unregister(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::mock::MockHardwareLayer;
    use std::sync::Mutex as StdMutex;

    const SAMPLE_ENI: &str = r#"
        <EtherCATConfig>
          <Config>
            <Master><Name>MainMaster</Name></Master>
            <Slave>
              <Info>
                <Name>Drive1</Name>
                <PhysAddr>#x1001</PhysAddr>
                <AutoIncAddr>0</AutoIncAddr>
              </Info>
              <ProcessData>
                <TxPdo>
                  <Index>#x1a00</Index>
                  <Name>TxPDO</Name>
                  <SmNo>3</SmNo>
                  <Entry>
                    <Index>#x6041</Index>
                    <SubIndex>0</SubIndex>
                    <BitLen>16</BitLen>
                    <Name>StatusWord</Name>
                    <DataType>UINT</DataType>
                  </Entry>
                </TxPdo>
              </ProcessData>
            </Slave>
            <ProcessImage>
              <Inputs>
                <ByteSize>2</ByteSize>
                <Variable>
                  <Name>Drive1.TxPDO.StatusWord</Name>
                  <BitSize>16</BitSize>
                  <BitOffs>0</BitOffs>
                  <DataType>UINT</DataType>
                </Variable>
              </Inputs>
              <Outputs><ByteSize>0</ByteSize></Outputs>
            </ProcessImage>
            <Cyclic><CycleTime>1000</CycleTime></Cyclic>
          </Config>
        </EtherCATConfig>
    "#;

    fn build_master() -> (Master, Arc<MockHardwareLayer>) {
        let mock = Arc::new(MockHardwareLayer::new(2, 0));
        let hardware: Arc<dyn HardwareLayer> = mock.clone();
        let master = Master::from_string(SAMPLE_ENI, hardware, |_slave| SlaveHandle(0)).unwrap();
        (master, mock)
    }

    #[test]
    fn builds_one_slave_with_one_input_entry() {
        let (master, _mock) = build_master();
        assert_eq!(master.list_slaves().collect::<Vec<_>>(), vec!["Drive1"]);
        assert_eq!(master.get_bus_cycle(), Duration::from_micros(1000));
    }

    #[test]
    fn read_bus_fires_events_in_spec_order_and_updates_entries() {
        let (master, mock) = build_master();
        mock.set_input_bytes(&[0x34, 0x12]);

        let order = Arc::new(StdMutex::new(Vec::new()));
        let o1 = Arc::clone(&order);
        master.on_event(move |e| o1.lock().unwrap().push(*e));

        let slave = Arc::clone(master.get_slave("Drive1").unwrap());
        let reference: crate::reference::Reference<u16, _> = slave
            .reference("StatusWord", crate::translate::default::DefaultCodec)
            .unwrap();

        let o2 = Arc::clone(&order);
        slave.on_inputs_update(move || o2.lock().unwrap().push(MasterEvent::ReadBusStart));

        master.read_bus(Duration::from_millis(50)).unwrap();

        let recorded = order.lock().unwrap();
        assert_eq!(
            &recorded[..3],
            &[
                MasterEvent::ReadBusStart,
                MasterEvent::ReadBusComplete,
                MasterEvent::ReadBusStart, // the InputsUpdate marker pushed above
            ]
        );
        assert_eq!(recorded[3], MasterEvent::ReadBusSlavesUpdateComplete);
        assert_eq!(reference.get().unwrap(), 0x1234);
    }

    #[test]
    fn debug_buffer_accessors_reflect_last_read() {
        let (master, mock) = build_master();
        mock.set_input_bytes(&[0xAA, 0xBB]);
        master.read_bus(Duration::from_millis(50)).unwrap();
        assert_eq!(master._get_input_buffer(), vec![0xAA, 0xBB]);
    }
}
