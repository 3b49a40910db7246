//! Builtin CoE types: numeric scalars and fixed-character-count strings, each optionally an
//! array of some arity.

use super::numeric::Numeric;
use crate::error::Error;
use core::fmt;

/// The closed tag set `Type::get_id()` draws from (spec §4.1, supplemented in §3.1 of
/// `SPEC_FULL.md` with a dedicated id per numeric variant plus `String`/`Structural`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TypeId {
    Bit,
    Bool,
    Bool8,
    Byte,
    Word,
    Dword,
    Sint,
    Usint,
    Int,
    Uint,
    Dint,
    Udint,
    Lint,
    Ulint,
    Real,
    Lreal,
    String,
    Structural,
}

/// A builtin CoE type: a numeric scalar or a fixed-width string, optionally repeated `arity`
/// times to describe a fixed-length array. `arity == 0` means a plain scalar/string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Builtin {
    kind: BuiltinKind,
    arity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum BuiltinKind {
    Numeric(Numeric),
    /// Character count of one string element.
    String(usize),
}

impl Builtin {
    /// Construct a scalar/string builtin, `arity` repetitions of it if `arity > 0`.
    pub fn numeric(kind: Numeric, arity: usize) -> Self {
        Builtin {
            kind: BuiltinKind::Numeric(kind),
            arity,
        }
    }

    /// Construct a `STRING(len)` builtin, `arity` repetitions of it if `arity > 0`.
    pub fn string(len: usize, arity: usize) -> Self {
        Builtin {
            kind: BuiltinKind::String(len),
            arity,
        }
    }

    /// Resolve an ENI `DataType` name (e.g. `"DINT"`, `"STRING(32)"`) to a scalar `Builtin`.
    /// Array arity is not encoded in the ENI `DataType` name — callers combine this with the
    /// entry's `BitLen` to detect arrays (spec §4.1 algorithm (c)).
    pub fn from_name(name: &str) -> Result<Self, Error> {
        if let Some(numeric) = Numeric::from_name(name) {
            return Ok(Builtin::numeric(numeric, 0));
        }

        if let Some(inner) = name
            .strip_prefix("STRING(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let len: usize = inner
                .parse()
                .map_err(|_| Error::InvalidType { name: name.to_string() })?;
            return Ok(Builtin::string(len, 0));
        }

        Err(Error::InvalidType { name: name.to_string() })
    }

    pub fn get_id(&self) -> TypeId {
        match self.kind {
            BuiltinKind::Numeric(Numeric::Bit) => TypeId::Bit,
            BuiltinKind::Numeric(Numeric::Bool) => TypeId::Bool,
            BuiltinKind::Numeric(Numeric::Bool8) => TypeId::Bool8,
            BuiltinKind::Numeric(Numeric::Byte) => TypeId::Byte,
            BuiltinKind::Numeric(Numeric::Word) => TypeId::Word,
            BuiltinKind::Numeric(Numeric::Dword) => TypeId::Dword,
            BuiltinKind::Numeric(Numeric::Sint) => TypeId::Sint,
            BuiltinKind::Numeric(Numeric::Usint) => TypeId::Usint,
            BuiltinKind::Numeric(Numeric::Int) => TypeId::Int,
            BuiltinKind::Numeric(Numeric::Uint) => TypeId::Uint,
            BuiltinKind::Numeric(Numeric::Dint) => TypeId::Dint,
            BuiltinKind::Numeric(Numeric::Udint) => TypeId::Udint,
            BuiltinKind::Numeric(Numeric::Lint) => TypeId::Lint,
            BuiltinKind::Numeric(Numeric::Ulint) => TypeId::Ulint,
            BuiltinKind::Numeric(Numeric::Real) => TypeId::Real,
            BuiltinKind::Numeric(Numeric::Lreal) => TypeId::Lreal,
            BuiltinKind::String(_) => TypeId::String,
        }
    }

    /// Human-readable CoE name, e.g. `"SINT"`, `"STRING(32)"`, `"DWORD_ARRAY"`.
    pub fn get_name(&self) -> String {
        let base = match self.kind {
            BuiltinKind::Numeric(n) => n.name().to_string(),
            BuiltinKind::String(len) => format!("STRING({len})"),
        };

        if self.is_array() {
            format!("{base}_ARRAY")
        } else {
            base
        }
    }

    /// Total bit size: one element's bit size, times `arity.max(1)`.
    pub fn get_bitsize(&self) -> usize {
        let element_bits = match self.kind {
            BuiltinKind::Numeric(n) => n.bitsize(),
            BuiltinKind::String(len) => 8 * len,
        };
        element_bits * self.arity.max(1)
    }

    /// `ceil(get_bitsize() / 8)`.
    pub fn get_bytesize(&self) -> usize {
        (self.get_bitsize() + 7) / 8
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn numeric(&self) -> Option<Numeric> {
        match self.kind {
            BuiltinKind::Numeric(n) => Some(n),
            BuiltinKind::String(_) => None,
        }
    }

    pub fn string_len(&self) -> Option<usize> {
        match self.kind {
            BuiltinKind::String(len) => Some(len),
            BuiltinKind::Numeric(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, BuiltinKind::Numeric(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, BuiltinKind::String(_))
    }

    pub fn is_scalar(&self) -> bool {
        self.arity == 0
    }

    pub fn is_array(&self) -> bool {
        self.arity > 0
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_name_suffix() {
        let scalar = Builtin::numeric(Numeric::Dword, 0);
        let array = Builtin::numeric(Numeric::Dword, 4);
        assert_eq!(scalar.get_name(), "DWORD");
        assert_eq!(array.get_name(), "DWORD_ARRAY");
    }

    #[test]
    fn string_bitsize() {
        let s = Builtin::string(32, 0);
        assert_eq!(s.get_bitsize(), 256);
        assert_eq!(s.get_bytesize(), 32);
        assert_eq!(s.get_name(), "STRING(32)");
    }

    #[test]
    fn from_name_resolves_string_len() {
        let b = Builtin::from_name("STRING(4)").unwrap();
        assert_eq!(b.string_len(), Some(4));
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert_eq!(
            Builtin::from_name("NOT_A_TYPE"),
            Err(Error::InvalidType { name: "NOT_A_TYPE".to_string() })
        );
    }

    #[test]
    fn from_name_rejects_an_unparsable_string_length() {
        assert_eq!(
            Builtin::from_name("STRING(n)"),
            Err(Error::InvalidType { name: "STRING(n)".to_string() })
        );
    }
}
