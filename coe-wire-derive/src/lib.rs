//! Derive macro companion to the [`coe-wire`](https://docs.rs/coe-wire) crate.
//!
//! Generates [`CoeRead`](coe_wire::CoeRead), [`CoeWrite`](coe_wire::CoeWrite) and
//! [`CoeSized`](coe_wire::CoeSized) impls for a plain struct whose fields are each annotated
//! with their packed bit width, e.g.
//!
//! ```ignore
//! #[derive(CoeWireReadWrite)]
//! struct DriveStatus {
//!     #[coe(bits = 16)]
//!     status_word: u16,
//!     #[coe(bits = 32)]
//!     actual_position: i32,
//! }
//! ```
//!
//! Only byte-aligned subitems are supported by the derive; bit-packed structural records are
//! built directly on the CoE type model's `Structural` descriptor instead.

mod generate;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// See the crate-level docs.
#[proc_macro_derive(CoeWireReadWrite, attributes(coe))]
pub fn derive_coe_wire_read_write(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let parsed = match parse::parse_struct(&input) {
        Ok(parsed) => parsed,
        Err(e) => return e.to_compile_error().into(),
    };

    generate::generate(&parsed, &input).into()
}
