//! The top-level error type.
//!
//! Each subsystem keeps its own closed taxonomy (see [`crate::eni::EniError`] and
//! [`crate::translate::TranslationError`]) and folds into this one at the seam, the same way
//! `PduError`/`EepromError`/`MailboxError` fold into a single top-level `Error` in the library
//! this crate's shape is patterned on.

use crate::eni::EniError;
use crate::state::EsmState;
use crate::translate::TranslationError;
use core::fmt;

/// An `ethercat-rt` error.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A structural problem was found while parsing or querying an ENI document.
    Eni(EniError),
    /// A translation (codec) call failed.
    Translation(TranslationError),
    /// A PDO, entry, slave or process image variable lookup by name came up empty.
    EntryNotFound {
        /// What was being looked up.
        kind: &'static str,
        /// The name that was not found.
        name: String,
    },
    /// A typed reference or SDO proxy was constructed against a CoE type that cannot represent
    /// the target application type.
    TypeMismatch {
        /// What the entry's CoE descriptor says it is.
        expected: String,
        /// What the caller asked for.
        actual: &'static str,
    },
    /// An ENI `DataType` name did not resolve to any type this crate's closed `Builtin`
    /// enumeration knows, or was malformed (e.g. an unparsable `STRING(n)` length).
    InvalidType {
        /// The ENI `DataType` string that failed to resolve.
        name: String,
    },
    /// A hardware layer call did not complete within its deadline.
    IoTimeout,
    /// A hardware layer call failed for a reason other than a timeout.
    IoFailed(String),
    /// An ESM state was requested that is outside the enumerated set the hardware layer accepts.
    InvalidState(EsmState),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Eni(e) => write!(f, "eni: {e}"),
            Error::Translation(e) => write!(f, "translation: {e}"),
            Error::EntryNotFound { kind, name } => write!(f, "{kind} '{name}' not found"),
            Error::TypeMismatch { expected, actual } => write!(
                f,
                "reference type mismatch: entry describes a {expected}, caller asked for {actual}"
            ),
            Error::InvalidType { name } => {
                write!(f, "'{name}' is not a recognized builtin CoE data type name")
            }
            Error::IoTimeout => f.write_str("hardware layer call timed out"),
            Error::IoFailed(reason) => write!(f, "hardware layer call failed: {reason}"),
            Error::InvalidState(state) => write!(f, "invalid ESM state requested: {state:?}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<EniError> for Error {
    fn from(e: EniError) -> Self {
        Error::Eni(e)
    }
}

impl From<TranslationError> for Error {
    fn from(e: TranslationError) -> Self {
        Error::Translation(e)
    }
}
