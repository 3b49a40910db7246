//! Structural (record) CoE types: a named, ordered sequence of subitems.

use super::builtin::Builtin;
use crate::error::Error;

/// A single named member of a [`Structural`] record.
#[derive(Debug, Clone, PartialEq)]
pub struct Subitem {
    /// The SDO subindex this member occupies within its parent object.
    pub subindex: u8,
    pub name: String,
    pub ty: Builtin,
    /// Bit offset of this member within the containing record.
    pub bit_offset: usize,
}

/// A structural (record) CoE type: an ordered sequence of [`Subitem`]s, as seen e.g. in a PDO
/// that maps several entries contiguously, or in an object dictionary entry with subindices.
#[derive(Debug, Clone, PartialEq)]
pub struct Structural {
    name: String,
    subitems: Vec<Subitem>,
    /// An explicit bit size, when ENI gives one directly rather than leaving it to be derived
    /// from the subitems' offsets and sizes (spec §4.1).
    explicit_bitsize: Option<usize>,
}

impl Structural {
    /// Build a `Structural` from its ordered subitems, asserting monotone, non-overlapping
    /// offsets (spec §4.1 invariant).
    pub fn new(name: impl Into<String>, subitems: Vec<Subitem>) -> Result<Self, Error> {
        Self::with_explicit_bitsize(name, subitems, None)
    }

    /// As [`Structural::new`], but with an ENI-declared bit size asserted against the derived
    /// one rather than always deriving it.
    pub fn with_explicit_bitsize(
        name: impl Into<String>,
        subitems: Vec<Subitem>,
        explicit_bitsize: Option<usize>,
    ) -> Result<Self, Error> {
        let mut end_of_previous = 0usize;
        for item in &subitems {
            if item.bit_offset < end_of_previous {
                return Err(Error::TypeMismatch {
                    expected: "monotone, non-overlapping subitem offsets".to_string(),
                    actual: "overlapping subitem",
                });
            }
            end_of_previous = item.bit_offset + item.ty.get_bitsize();
        }

        if let Some(explicit) = explicit_bitsize {
            if explicit < end_of_previous {
                return Err(Error::TypeMismatch {
                    expected: format!("at least {end_of_previous} bits from subitems"),
                    actual: "a smaller explicit bit size",
                });
            }
        }

        Ok(Structural {
            name: name.into(),
            subitems,
            explicit_bitsize,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subitems(&self) -> &[Subitem] {
        &self.subitems
    }

    pub fn subitem(&self, subindex: u8) -> Option<&Subitem> {
        self.subitems.iter().find(|s| s.subindex == subindex)
    }

    /// Sum over subitems of (bit_offset + bitsize), i.e. the offset just past the last member,
    /// or the ENI-declared size when one was given and is >= the derived size (padding).
    pub fn get_bitsize(&self) -> usize {
        let derived = self
            .subitems
            .iter()
            .map(|s| s.bit_offset + s.ty.get_bitsize())
            .max()
            .unwrap_or(0);

        self.explicit_bitsize.unwrap_or(derived).max(derived)
    }

    pub fn get_bytesize(&self) -> usize {
        (self.get_bitsize() + 7) / 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::numeric::Numeric;

    fn subitem(subindex: u8, offset: usize, ty: Builtin) -> Subitem {
        Subitem {
            subindex,
            name: format!("sub{subindex}"),
            ty,
            bit_offset: offset,
        }
    }

    #[test]
    fn bitsize_is_sum_of_subitems_plus_padding() {
        let s = Structural::new(
            "DriveStatus",
            vec![
                subitem(1, 0, Builtin::numeric(Numeric::Word, 0)),
                subitem(2, 16, Builtin::numeric(Numeric::Dword, 0)),
            ],
        )
        .unwrap();

        assert_eq!(s.get_bitsize(), 48);
        assert_eq!(s.get_bytesize(), 6);
    }

    #[test]
    fn rejects_overlapping_offsets() {
        let result = Structural::new(
            "Bad",
            vec![
                subitem(1, 0, Builtin::numeric(Numeric::Dword, 0)),
                subitem(2, 16, Builtin::numeric(Numeric::Word, 0)),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn explicit_bitsize_adds_trailing_padding() {
        let s = Structural::with_explicit_bitsize(
            "Padded",
            vec![subitem(1, 0, Builtin::numeric(Numeric::Word, 0))],
            Some(32),
        )
        .unwrap();
        assert_eq!(s.get_bitsize(), 32);
    }
}
