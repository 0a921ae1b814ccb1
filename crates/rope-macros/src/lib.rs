//! Derive macros for the Rope MIDI to CV converter.
//!
//! This crate provides `#[derive(EnumParameter)]`, which turns a unit enum into
//! an indexed parameter value: variant index ⇄ enum conversion, display names
//! for host value strings, and a default variant used when a host writes a
//! code that does not name any variant.
//!
//! Generated code refers to `::rope::core`, so use the derive through the
//! `rope` facade crate.
//!
//! # Example
//!
//! ```ignore
//! use rope::EnumParameter;
//!
//! #[derive(Copy, Clone, PartialEq, EnumParameter)]
//! pub enum CardFunction {
//!     #[default]
//!     Off,
//!     Gate,
//!     #[name = "Pitch Bend"]
//!     PitchBend,
//! }
//!
//! assert_eq!(CardFunction::from_code(7), CardFunction::Off);
//! assert_eq!(CardFunction::PitchBend.name(), "Pitch Bend");
//! ```

use proc_macro::TokenStream;

mod enum_parameter;

/// Derive macro for implementing `EnumParameterValue` on unit enums, plus
/// inherent `from_code`, `code` and `name` methods.
///
/// # Attributes
///
/// - `#[name = "..."]` - Display name for a variant (defaults to the identifier).
/// - `#[default]` - Variant returned for out-of-range indices (defaults to the
///   first variant).
#[proc_macro_derive(EnumParameter, attributes(name, default))]
pub fn derive_enum_parameter(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    match enum_parameter::derive_enum_parameter_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
