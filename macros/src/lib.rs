//! Procedural macros for the mode-stack handler system
//!
//! | Macro | Target | Purpose |
//! |-------|--------|---------|
//! | `#[derive(Mode)]` | struct | Wire a handler to its `ModeBase` field |
//!
//! ## Example
//!
//! ```ignore
//! #[derive(Mode)]
//! struct Logging {
//!     base: ModeBase<FunctionKind>,
//!     lines: RefCell<Vec<String>>,
//! }
//!
//! // Explicit form, for renamed or aliased base types:
//! #[derive(Mode)]
//! #[mode(kind = FunctionKind)]
//! struct Counting(#[mode(base)] Base, Cell<usize>);
//! ```

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

// =============================================================================
// Module Declarations
// =============================================================================

mod common;
mod user;

// =============================================================================
// User-Facing Macros (user/)
// =============================================================================

/// Implement `ModeHandler<Kind>` for a struct holding a `ModeBase<Kind>`.
///
/// The base field is the one marked `#[mode(base)]`, or else the only field
/// whose type is named `ModeBase`. The kind comes from `#[mode(kind = ...)]`
/// on the struct, or else from the base field's type argument.
#[proc_macro_derive(Mode, attributes(mode))]
pub fn derive_mode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    user::expand_derive_mode(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
