//! The shared process-wide PDI buffers and the per-entry buffers that synchronize against them
//! once per cycle (spec §3, §4.4).

mod buffer;
mod entry;

pub use buffer::PdiBuffer;
pub use entry::{Entry, EntryDirection};
