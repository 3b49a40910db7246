//! A host-side runtime for driving an EtherCAT fieldbus from an ENI (EtherCAT Network
//! Information) description.
//!
//! This crate is not an EtherCAT master stack: it assumes a hardware-specific lower layer
//! (a [`hardware::HardwareLayer`] implementation) performs the wire-level datagram exchange,
//! and gives application code type-safe, synchronized access to the cyclic Process Data Image
//! (PDI) and the acyclic Service Data Objects (SDOs) that layer carries for it.
//!
//! Three pieces do the real work:
//! - [`translate`] — the codec framework that serializes/deserializes application values
//!   to and from bit-packed binary images.
//! - [`pdi`] — the per-cycle PDI exchange: shared buffers plus per-entry synchronized copies.
//! - [`eni`] / [`types`] — the object model read from ENI that the other two need: bit sizes,
//!   bit offsets, slave/PDO/entry wiring, SDO addresses.
//!
//! [`master::Master`] and [`slave::Slave`] are the facades application code actually drives.

// This mod MUST go first, so the others see its macros.
mod fmt;

pub mod config;
pub mod eni;
pub mod error;
pub mod event;
pub mod hardware;
pub mod pdi;
pub mod reference;
pub mod sdo;
pub mod slave;
pub mod state;
pub mod translate;
pub mod types;

mod master;

pub use error::Error;
pub use event::HandlerId;
pub use hardware::{HardwareLayer, SdoAccess, SdoAddress, SlaveHandle};
pub use master::{Master, MasterEvent};
pub use reference::Reference;
pub use sdo::Sdo;
pub use slave::{Slave, SlaveEvent};
pub use state::EsmState;

#[cfg(not(target_endian = "little"))]
compile_error!(
    "only little-endian targets are supported: the wire format is little-endian and the \
     default codec (coe_wire) reads/writes native byte order directly (spec.md §1, §9)"
);
