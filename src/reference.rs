//! Typed reference: binds a codec to a PDI entry buffer (spec §4.5).

use crate::error::Error;
use crate::pdi::Entry;
use crate::translate::{dispatch_input, dispatch_output, InputCodec, OutputCodec};
use std::marker::PhantomData;

/// A non-owning handle pairing a codec with a per-entry buffer, exposing `get`/`set` in
/// application units (spec §4.5).
///
/// `Reference` never buffers between cycles: every call reads or writes the entry's current
/// snapshot. The cycle boundary (`Master::read_bus`/`write_bus`) is the only synchronization
/// point with the bus.
///
/// The entry's own bit alignment within the shared PDI is resolved once per cycle by
/// `Entry::update_from_pdi`/`update_to_pdi`, so by the time a `Reference` dispatches a translation
/// call the entry's buffer is always byte-aligned; there is no [`crate::config::BitOffsetPolicy`]
/// to choose between here (that knob only matters for a non-bit-offset-aware codec asked to
/// translate at a genuinely nonzero offset, which a `Reference` never does).
pub struct Reference<'a, T, C> {
    entry: &'a Entry,
    codec: C,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T, C> Reference<'a, T, C> {
    pub fn new(entry: &'a Entry, codec: C) -> Self {
        Reference {
            entry,
            codec,
            _marker: PhantomData,
        }
    }
}

impl<'a, T, C> Reference<'a, T, C>
where
    C: InputCodec<T>,
{
    /// Decode the entry's current value. Requires `T: Default` only because the codec call
    /// needs somewhere to write into before returning it; see [`Reference::get_into`] to avoid
    /// that bound.
    pub fn get(&self) -> Result<T, Error>
    where
        T: Default,
    {
        let mut out = T::default();
        self.get_into(&mut out)?;
        Ok(out)
    }

    /// As [`Reference::get`], without requiring `T: Default`.
    pub fn get_into(&self, out: &mut T) -> Result<(), Error> {
        let codec = &self.codec;
        self.entry
            .with_buffer(|buf| dispatch_input(codec, buf, out, 0, Default::default()))?;
        Ok(())
    }

    /// `EnableBooleanReturn` form of [`Reference::get_into`] (spec §4.3): `true` on success,
    /// `false` on any translation failure, with no error detail retained.
    #[cfg(feature = "boolean-return")]
    pub fn get_into_bool(&self, out: &mut T) -> bool {
        let codec = &self.codec;
        self.entry
            .with_buffer(|buf| crate::translate::dispatch_input_bool(codec, buf, out, 0, Default::default()))
    }
}

impl<'a, T, C> Reference<'a, T, C>
where
    C: OutputCodec<T>,
{
    /// Encode `obj` into the entry's buffer.
    pub fn set(&self, obj: &T) -> Result<(), Error> {
        let codec = &self.codec;
        self.entry
            .with_buffer_mut(|buf| dispatch_output(codec, buf, obj, 0, Default::default()))?;
        Ok(())
    }

    /// `EnableBooleanReturn` form of [`Reference::set`] (spec §4.3).
    #[cfg(feature = "boolean-return")]
    pub fn set_bool(&self, obj: &T) -> bool {
        let codec = &self.codec;
        self.entry
            .with_buffer_mut(|buf| crate::translate::dispatch_output_bool(codec, buf, obj, 0, Default::default()))
    }
}
