//! The `Slave` ENI view entity (spec §3, §4.2).

use super::document::Document;
use super::pdo::{Direction, Pdo};
use std::rc::Rc;

/// Owned slave description: name, addressing, and its PDOs. This is what [`Slave::autonomize`]
/// hands back — a value with no remaining dependency on the `Document` it was read from, safe
/// to store inside a constructed slave facade for its whole lifetime (spec §4.2, §4.7).
#[derive(Debug, Clone, PartialEq)]
pub struct SlaveData {
    pub(crate) name: String,
    pub(crate) phys_addr: u16,
    pub(crate) auto_inc_addr: u16,
    pub(crate) pdos: Vec<Pdo>,
}

impl SlaveData {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_fixed_addr(&self) -> u16 {
        self.phys_addr
    }

    pub fn get_auto_increment_addr(&self) -> u16 {
        self.auto_inc_addr
    }

    /// `1 - auto_increment_addr`, per spec §3.
    pub fn get_topological_addr(&self) -> i32 {
        1 - i32::from(self.auto_inc_addr)
    }

    /// All PDOs, mapped or not.
    pub fn get_pdos(&self) -> &[Pdo] {
        &self.pdos
    }

    /// Only the PDOs assigned to a SyncManager (i.e. actually exchanged cyclically).
    pub fn get_assigned_pdos(&self) -> impl Iterator<Item = &Pdo> {
        self.pdos.iter().filter(|p| p.is_assigned())
    }

    pub fn get_pdos_in_direction(&self, direction: Direction) -> impl Iterator<Item = &Pdo> {
        self.pdos.iter().filter(move |p| p.direction == direction)
    }

    pub fn has_pdo(&self, name: &str) -> bool {
        self.pdos.iter().any(|p| p.name == name)
    }

    pub fn get_pdo(&self, name: &str) -> Option<&Pdo> {
        self.pdos.iter().find(|p| p.name == name)
    }

    /// First PDO entry across all this slave's PDOs matching `name` (spec §4.7
    /// `get_pdo_entry`).
    pub fn get_pdo_entry(&self, name: &str) -> Option<&super::pdo::PdoEntry> {
        self.pdos.iter().find_map(|p| p.entry(name))
    }
}

/// A lazy, read-only view of one `<Slave>` element, sharing the parent `Document`'s storage.
///
/// Derefs to [`SlaveData`] for all queries; call [`Slave::autonomize`] to obtain an owned,
/// independent copy before storing it past the `Configuration`'s lifetime.
#[derive(Clone)]
pub struct Slave {
    pub(crate) doc: Rc<Document>,
    pub(crate) index: usize,
}

impl Slave {
    pub fn autonomize(&self) -> SlaveData {
        self.doc.slaves[self.index].clone()
    }
}

impl std::ops::Deref for Slave {
    type Target = SlaveData;

    fn deref(&self) -> &SlaveData {
        &self.doc.slaves[self.index]
    }
}
