//! The CoE type model (spec §4.1): describes CoE types exactly enough that bit-precise layout
//! can be computed from them, without reference to any particular slave or PDI.

pub mod builtin;
pub mod numeric;
pub mod structural;

pub use builtin::{Builtin, TypeId};
pub use numeric::Numeric;
pub use structural::{Structural, Subitem};

/// A CoE type descriptor: a tagged union of `{ Builtin, Structural }` (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub enum CoeType {
    Builtin(Builtin),
    Structural(Structural),
}

impl CoeType {
    pub fn get_id(&self) -> TypeId {
        match self {
            CoeType::Builtin(b) => b.get_id(),
            CoeType::Structural(_) => TypeId::Structural,
        }
    }

    pub fn get_name(&self) -> String {
        match self {
            CoeType::Builtin(b) => b.get_name(),
            CoeType::Structural(s) => s.name().to_string(),
        }
    }

    pub fn get_bitsize(&self) -> usize {
        match self {
            CoeType::Builtin(b) => b.get_bitsize(),
            CoeType::Structural(s) => s.get_bitsize(),
        }
    }

    pub fn get_bytesize(&self) -> usize {
        (self.get_bitsize() + 7) / 8
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CoeType::Builtin(b) if b.is_numeric())
    }

    pub fn is_string(&self) -> bool {
        matches!(self, CoeType::Builtin(b) if b.is_string())
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, CoeType::Builtin(_))
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, CoeType::Structural(_))
    }

    pub fn is_scalar(&self) -> bool {
        match self {
            CoeType::Builtin(b) => b.is_scalar(),
            CoeType::Structural(_) => true,
        }
    }

    pub fn is_array(&self) -> bool {
        match self {
            CoeType::Builtin(b) => b.is_array(),
            CoeType::Structural(_) => false,
        }
    }
}

impl From<Builtin> for CoeType {
    fn from(b: Builtin) -> Self {
        CoeType::Builtin(b)
    }
}

impl From<Structural> for CoeType {
    fn from(s: Structural) -> Self {
        CoeType::Structural(s)
    }
}
