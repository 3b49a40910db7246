//! ENI-specific error taxonomy; folds into [`crate::error::Error::Eni`].

use core::fmt;

/// Something went wrong loading or querying an ENI document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EniError {
    /// A mandatory element or attribute was missing, or a numeric attribute did not parse.
    ///
    /// `path` is the dotted element path that was being resolved, e.g.
    /// `"Config.Slave[0].Info.PhysAddr"`.
    Malformed { path: String, reason: String },
    /// The input could not be read at all (bad file path, I/O error, invalid UTF-8, not
    /// well-formed XML).
    Unreadable(String),
    /// ENI's declared `ProcessImage.{Inputs,Outputs}.ByteSize` disagreed with the sum of the
    /// section's `Variable` bit sizes.
    ProcessImageSizeMismatch {
        declared_bytes: usize,
        computed_bytes: usize,
    },
}

impl fmt::Display for EniError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EniError::Malformed { path, reason } => {
                write!(f, "malformed ENI at '{path}': {reason}")
            }
            EniError::Unreadable(reason) => write!(f, "could not read ENI document: {reason}"),
            EniError::ProcessImageSizeMismatch {
                declared_bytes,
                computed_bytes,
            } => write!(
                f,
                "process image ByteSize={declared_bytes} disagrees with the {computed_bytes} \
                 bytes computed from its Variable entries"
            ),
        }
    }
}

impl std::error::Error for EniError {}
