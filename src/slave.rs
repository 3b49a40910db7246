//! The Slave facade (spec §4.7): owns per-slave PDI entries, ESM state control, PDO/SDO
//! accessors and the per-cycle update driver.

use crate::eni::{Direction, Pdo, PdoEntry, SlaveData};
use crate::error::Error;
use crate::event::{EventBus, HandlerId};
use crate::hardware::{HardwareLayer, SlaveHandle};
use crate::pdi::Entry;
use crate::reference::Reference;
use crate::sdo::Sdo;
use crate::state::EsmState;
use std::sync::Arc;
use std::time::Duration;

/// Events a [`Slave`] fires during its lifetime (spec §4.7's `StateChange` supplement, §5's
/// cycle-ordering guarantees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlaveEvent {
    /// Fired strictly after every Input entry's `update_from_pdi` for this cycle completes.
    InputsUpdate,
    /// Fired strictly before this slave's Output entries are harvested into the shared PDI.
    OutputsUpdate,
    /// Fired after a successful `set_state` hardware-layer call.
    StateChange(EsmState),
}

/// Owns the per-slave vectors of Input and Output PDI entries, the autonomized ENI description,
/// and the event-handler slots (spec §3 ownership graph).
pub struct Slave {
    data: SlaveData,
    handle: SlaveHandle,
    hardware: Arc<dyn HardwareLayer>,
    input_entries: Vec<(String, Arc<Entry>)>,
    output_entries: Vec<(String, Arc<Entry>)>,
    events: EventBus<SlaveEvent>,
}

impl Slave {
    pub(crate) fn new(
        data: SlaveData,
        handle: SlaveHandle,
        hardware: Arc<dyn HardwareLayer>,
        input_entries: Vec<(String, Arc<Entry>)>,
        output_entries: Vec<(String, Arc<Entry>)>,
    ) -> Self {
        Slave {
            data,
            handle,
            hardware,
            input_entries,
            output_entries,
            events: EventBus::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.data.name()
    }

    pub fn get_fixed_addr(&self) -> u16 {
        self.data.get_fixed_addr()
    }

    pub fn get_auto_increment_addr(&self) -> u16 {
        self.data.get_auto_increment_addr()
    }

    pub fn get_topological_addr(&self) -> i32 {
        self.data.get_topological_addr()
    }

    pub fn handle(&self) -> SlaveHandle {
        self.handle
    }

    // --- ESM state -----------------------------------------------------------------------

    pub fn get_state(&self, timeout: Duration) -> Result<EsmState, Error> {
        Ok(self.hardware.get_slave_state(self.handle, timeout)?)
    }

    pub fn set_state(&self, state: EsmState, timeout: Duration) -> Result<(), Error> {
        debug!("slave '{}' requesting state {}", self.data.name(), state);
        self.hardware.set_slave_state(self.handle, state, timeout)?;
        self.events.fire(&SlaveEvent::StateChange(state));
        Ok(())
    }

    // --- PDO accessors ---------------------------------------------------------------------

    pub fn get_pdos(&self, direction: Direction) -> impl Iterator<Item = &Pdo> {
        self.data.get_pdos_in_direction(direction)
    }

    pub fn has_pdo(&self, name: &str) -> bool {
        self.data.has_pdo(name)
    }

    pub fn get_pdo(&self, name: &str) -> Option<&Pdo> {
        self.data.get_pdo(name)
    }

    pub fn get_pdo_entry(&self, name: &str) -> Option<&PdoEntry> {
        self.data.get_pdo_entry(name)
    }

    // --- Typed references ------------------------------------------------------------------

    fn input_entry(&self, name: &str) -> Option<&Arc<Entry>> {
        self.input_entries.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    fn output_entry(&self, name: &str) -> Option<&Arc<Entry>> {
        self.output_entries.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    /// Bind `codec` to the named entry's buffer. Looked up by PDO entry name across both
    /// directions.
    ///
    /// Rust's own trait system stands in for spec.md's "construction rejects at compile time
    /// codecs whose target type cannot reasonably represent the entry's CoE type": a codec only
    /// implements `InputCodec<T>`/`OutputCodec<T>` for the type families it actually knows how
    /// to translate (see `translate::default::DefaultCodec`'s bounds), so a mismatched `T`
    /// simply fails to compile rather than needing a separate runtime shape check.
    pub fn reference<T, C>(&self, name: &str, codec: C) -> Result<Reference<'_, T, C>, Error> {
        let entry = self
            .input_entry(name)
            .or_else(|| self.output_entry(name))
            .ok_or_else(|| Error::EntryNotFound {
                kind: "entry",
                name: name.to_string(),
            })?;
        Ok(Reference::new(entry, codec))
    }

    // --- SDO accessors ----------------------------------------------------------------------

    pub fn get_sdo<T, C>(&self, index: u16, subindex: u8, codec: C) -> Sdo<T, C> {
        Sdo::new(Arc::clone(&self.hardware), self.handle, index, subindex, codec)
    }

    pub fn get_sdo_info(&self, index: u16, subindex: u8) -> Option<crate::sdo::SdoInfo> {
        crate::sdo::SdoInfo::from_eni(&self.data, index, subindex)
    }

    // --- Event handlers ---------------------------------------------------------------------

    pub fn on_inputs_update(&self, f: impl Fn() + Send + Sync + 'static) -> HandlerId {
        self.events.register(move |e| {
            if matches!(e, SlaveEvent::InputsUpdate) {
                f();
            }
        })
    }

    pub fn on_outputs_update(&self, f: impl Fn() + Send + Sync + 'static) -> HandlerId {
        self.events.register(move |e| {
            if matches!(e, SlaveEvent::OutputsUpdate) {
                f();
            }
        })
    }

    pub fn on_state_change(&self, f: impl Fn(EsmState) + Send + Sync + 'static) -> HandlerId {
        self.events.register(move |e| {
            if let SlaveEvent::StateChange(state) = e {
                f(*state);
            }
        })
    }

    pub fn unregister_handler(&self, id: HandlerId) {
        self.events.unregister(id);
    }

    // --- Per-cycle update -------------------------------------------------------------------

    /// Input direction: copy each Input entry out of the shared input PDI, then fire
    /// `InputsUpdate` (spec §4.7).
    pub(crate) fn update_inputs(&self, pdi: &[u8]) -> Result<(), Error> {
        for (_, entry) in &self.input_entries {
            entry.update_from_pdi(pdi)?;
        }
        self.events.fire(&SlaveEvent::InputsUpdate);
        Ok(())
    }

    /// Output direction: fire `OutputsUpdate` first, then harvest each Output entry into the
    /// shared output PDI (spec §4.7).
    pub(crate) fn update_outputs(&self, pdi: &mut [u8]) -> Result<(), Error> {
        self.events.fire(&SlaveEvent::OutputsUpdate);
        for (_, entry) in &self.output_entries {
            entry.update_to_pdi(pdi)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::mock::MockHardwareLayer;
    use crate::translate::default::DefaultCodec;
    use crate::types::{Builtin, CoeType, Numeric};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn sample_slave_data() -> SlaveData {
        // `SlaveData`'s fields are crate-private; build it the same way `eni::document` does,
        // through a minimal parsed configuration.
        let xml = r#"
            <EtherCATConfig><Config>
              <Master><Name>M</Name></Master>
              <Slave>
                <Info><Name>Drive1</Name><PhysAddr>#x1001</PhysAddr><AutoIncAddr>0</AutoIncAddr></Info>
              </Slave>
            </Config></EtherCATConfig>
        "#;
        crate::eni::Configuration::from_string(xml)
            .unwrap()
            .get_slave("Drive1")
            .unwrap()
            .autonomize()
    }

    fn test_slave() -> Slave {
        let input = Arc::new(Entry::new(
            16,
            0,
            CoeType::Builtin(Builtin::numeric(Numeric::Uint, 0)),
            crate::pdi::EntryDirection::Input,
        ));
        Slave::new(
            sample_slave_data(),
            SlaveHandle(0),
            Arc::new(MockHardwareLayer::new(2, 2)),
            vec![("StatusWord".to_string(), input)],
            Vec::new(),
        )
    }

    #[test]
    fn update_inputs_fires_handler_after_entries_are_synced() {
        let slave = test_slave();
        let seen = Arc::new(AtomicBool::new(false));
        let seen2 = Arc::clone(&seen);

        let reference: Reference<u16, _> = slave.reference("StatusWord", DefaultCodec).unwrap();

        slave.on_inputs_update(move || {
            seen2.store(true, Ordering::SeqCst);
        });

        slave.update_inputs(&[0x34, 0x12]).unwrap();
        assert!(seen.load(Ordering::SeqCst));
        assert_eq!(reference.get().unwrap(), 0x1234);
    }

    #[test]
    fn state_change_fires_with_the_requested_state() {
        let slave = test_slave();
        let seen = Arc::new(std::sync::Mutex::new(None));
        let seen2 = Arc::clone(&seen);
        slave.on_state_change(move |s| *seen2.lock().unwrap() = Some(s));

        slave.set_state(EsmState::Op, Duration::from_millis(10)).unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(EsmState::Op));
    }

    #[test]
    fn reference_lookup_fails_for_unknown_entry_name() {
        let slave = test_slave();
        let result: Result<Reference<u16, _>, _> = slave.reference("NoSuchEntry", DefaultCodec);
        assert!(matches!(result, Err(Error::EntryNotFound { .. })));
    }
}
