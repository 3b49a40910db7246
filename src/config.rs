//! Runtime configuration knobs for the translator framework (§6).
//!
//! Most of the knobs `spec.md` lists are compile-time choices and are expressed as Cargo
//! features (`bit-aligned`, `verify`, `exceptions`, `boolean-return` — see the crate's
//! `Cargo.toml`), exactly mirroring how the teacher's own `std`/`defmt` split is a feature, not a
//! runtime flag. `ArrayParsingMode` is the one knob that is legitimately a runtime choice: it
//! depends on the shape of the data the caller has in hand at the call site, not on the target
//! the crate is compiled for.

/// How the default codec sizes and validates an array of variable-length strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayParsingMode {
    /// Treat every element as having the length of element 0.
    #[default]
    AssumeEqualSize,
    /// Verify every element has the same length as element 0; fail otherwise.
    RequireEqualSize,
    /// Sum the actual lengths of every element.
    AllowVariableSize,
}

/// How the framework behaves when a codec that isn't bit-offset-aware is asked to translate at a
/// non-zero bit offset (spec §4.3 resolution rule 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitOffsetPolicy {
    /// Fail with [`crate::translate::TranslationError::MisalignedAccess`].
    #[default]
    Strict,
    /// Call the byte-only form anyway; a misaligned access is then the caller's problem.
    Lenient,
}

#[cfg(all(feature = "verify", not(any(feature = "exceptions", feature = "boolean-return"))))]
compile_error!(
    "the `verify` feature requires at least one of `exceptions` or `boolean-return` to be \
     enabled, so that a verification failure has somewhere to go"
);
