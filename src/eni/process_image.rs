//! The `ProcessImage`/`ProcessImageVariable` ENI view entities (spec §3, §4.2).
//!
//! Variable names follow the dotted convention `<slave>.<pdo>.<entry>`, or `<pdo>.<entry>` for
//! master-owned variables such as `WcState` (spec §6). This module is the one place that
//! convention is parsed, so the rest of the crate can ask a `ProcessImageVariable` for its slave
//! name directly instead of re-deriving it from the fully qualified name.

use super::pdo::Direction;
use crate::types::Builtin;

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessImageVariable {
    /// The fully qualified name as written in ENI, e.g. `"Drive1.RxPDO.ControlWord"`.
    pub fully_qualified_name: String,
    /// `None` for a master-owned variable (`<pdo>.<entry>` form).
    pub slave_name: Option<String>,
    pub pdo_name: String,
    pub entry_name: String,
    pub bit_size: usize,
    pub bit_offset: usize,
    pub data_type: String,
    /// Which PDI (`Inputs`/`Outputs`) this variable was declared under. Uses [`Direction`] from
    /// the slave's own perspective: an `Outputs` (RxPDO) variable is master output / slave input.
    pub direction: Direction,
}

impl ProcessImageVariable {
    /// Split a fully qualified ENI variable name into its `(slave, pdo, entry)` components.
    pub(crate) fn classify(fully_qualified_name: &str) -> (Option<String>, String, String) {
        let parts: Vec<&str> = fully_qualified_name.split('.').collect();
        match parts.as_slice() {
            [slave, pdo, entry] => (Some((*slave).to_string()), (*pdo).to_string(), (*entry).to_string()),
            [pdo, entry] => (None, (*pdo).to_string(), (*entry).to_string()),
            _ => (None, String::new(), fully_qualified_name.to_string()),
        }
    }

    pub fn resolved_type(&self) -> Result<Builtin, crate::error::Error> {
        Builtin::from_name(&self.data_type)
    }
}

/// All PDI variables in one direction, plus the declared total size of that direction's image
/// (spec §3).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessImage {
    pub(crate) input_bits: usize,
    pub(crate) output_bits: usize,
    pub(crate) variables: Vec<ProcessImageVariable>,
}

impl ProcessImage {
    pub fn input_bits(&self) -> usize {
        self.input_bits
    }

    pub fn output_bits(&self) -> usize {
        self.output_bits
    }

    /// All mapped variables, in both directions.
    pub fn variables(&self) -> &[ProcessImageVariable] {
        &self.variables
    }

    /// Lookup by fully qualified name (spec §4.2).
    pub fn get_variable(&self, fully_qualified_name: &str) -> Option<&ProcessImageVariable> {
        self.variables
            .iter()
            .find(|v| v.fully_qualified_name == fully_qualified_name)
    }

    /// The sub-list of variables belonging to one slave.
    pub fn variables_for_slave<'a>(
        &'a self,
        slave_name: &'a str,
    ) -> impl Iterator<Item = &'a ProcessImageVariable> {
        self.variables
            .iter()
            .filter(move |v| v.slave_name.as_deref() == Some(slave_name))
    }

    /// The sub-list of variables belonging to one slave's PDO.
    pub fn variables_for_slave_pdo<'a>(
        &'a self,
        slave_name: &'a str,
        pdo_name: &'a str,
    ) -> impl Iterator<Item = &'a ProcessImageVariable> {
        self.variables.iter().filter(move |v| {
            v.slave_name.as_deref() == Some(slave_name) && v.pdo_name == pdo_name
        })
    }
}
