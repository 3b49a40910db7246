//! `Pdo`/`PdoEntry` ENI view entities (spec §3).

use crate::types::Builtin;

/// Direction of a PDO: which SyncManager category it cyclically maps into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

/// A single addressable object within a PDO (spec §3, `PdoEntry`).
#[derive(Debug, Clone, PartialEq)]
pub struct PdoEntry {
    pub index: u16,
    pub subindex: u8,
    pub bit_len: usize,
    pub name: String,
    /// The raw ENI `DataType` string, resolved to a [`Builtin`] lazily by callers that need the
    /// full CoE type (most PDI-facing code only needs `bit_len`).
    pub data_type: String,
}

impl PdoEntry {
    /// Resolve `data_type` to a [`Builtin`] scalar/string descriptor.
    pub fn resolved_type(&self) -> Result<Builtin, crate::error::Error> {
        Builtin::from_name(&self.data_type)
    }
}

/// A mapping of one or more entries assigned to a SyncManager for cyclic exchange (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub struct Pdo {
    pub direction: Direction,
    pub index: u16,
    pub name: String,
    pub entries: Vec<PdoEntry>,
    /// SyncManager number this PDO is assigned to, if any (`SmNo`).
    pub sm: Option<u8>,
    pub fixed: bool,
    /// Indices of PDOs this one mutually excludes (`Excludes`).
    pub excludes: Vec<u16>,
}

impl Pdo {
    pub fn is_assigned(&self) -> bool {
        self.sm.is_some()
    }

    pub fn entry(&self, name: &str) -> Option<&PdoEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}
