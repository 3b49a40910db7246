//! The EtherCAT State Machine, as seen from this crate's side of the hardware layer boundary.
//!
//! The hardware layer is the authority on transitions; this crate only forwards requests and
//! reports whatever it last read back. Bit numbering follows the status byte EtherCAT slaves
//! actually report, the same numbering `SubDeviceState` uses in the teacher library, so a
//! hardware layer's raw status byte round-trips through `EsmState` without reinterpretation.

use core::fmt;

/// A state in the EtherCAT State Machine.
///
/// `Boot` is only ever requested of or reported by a slave; the master-level state machine
/// (`Master::get_state`/`set_state`) never enters it (spec §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub enum EsmState {
    /// No communication beyond the mailbox's initial configuration.
    Init,
    /// Mailbox communication is possible, process data is not yet exchanged.
    PreOp,
    /// Firmware update state, slave-only.
    Boot,
    /// Process data is exchanged but outputs are not yet applied by the slave.
    SafeOp,
    /// Full cyclic process data exchange.
    Op,
    /// A status byte value this crate does not assign a name to (e.g. an error flag OR'd onto
    /// one of the above). Carries the raw byte so callers can still inspect it.
    Other(u8),
}

impl EsmState {
    /// Decode the status byte a hardware layer reports, masking off the error bit (0x10).
    pub fn from_status_byte(byte: u8) -> Self {
        match byte & 0x0f {
            0x01 => EsmState::Init,
            0x02 => EsmState::PreOp,
            0x03 => EsmState::Boot,
            0x04 => EsmState::SafeOp,
            0x08 => EsmState::Op,
            other => EsmState::Other(other),
        }
    }

    /// Encode back to the status byte convention a hardware layer expects in a state-write.
    pub fn to_status_byte(self) -> u8 {
        match self {
            EsmState::Init => 0x01,
            EsmState::PreOp => 0x02,
            EsmState::Boot => 0x03,
            EsmState::SafeOp => 0x04,
            EsmState::Op => 0x08,
            EsmState::Other(byte) => byte,
        }
    }
}

impl fmt::Display for EsmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EsmState::Init => f.write_str("Init"),
            EsmState::PreOp => f.write_str("PreOp"),
            EsmState::Boot => f.write_str("Boot"),
            EsmState::SafeOp => f.write_str("SafeOp"),
            EsmState::Op => f.write_str("Op"),
            EsmState::Other(byte) => write!(f, "Other(0x{byte:02x})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_known_states() {
        for state in [
            EsmState::Init,
            EsmState::PreOp,
            EsmState::Boot,
            EsmState::SafeOp,
            EsmState::Op,
        ] {
            assert_eq!(EsmState::from_status_byte(state.to_status_byte()), state);
        }
    }

    #[test]
    fn masks_off_error_bit() {
        assert_eq!(EsmState::from_status_byte(0x01 | 0x10), EsmState::Init);
    }

    #[test]
    fn unknown_byte_is_other() {
        assert_eq!(EsmState::from_status_byte(0x07), EsmState::Other(0x07));
    }
}
