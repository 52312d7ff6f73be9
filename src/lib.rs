#![forbid(unsafe_code)]

//! # mode-stack
//!
//! Thread-local mode stacks: scoped, composable handler overrides.
//!
//! A *mode-kind* is one independent interception point. Each thread owns one
//! slot per kind holding the currently active *mode*: either a handler
//! instance or a bare type that provides the kind's capability. Handlers are
//! chained through their `inner` fallback, so pushing a handler layers it on
//! top of whatever was active before.
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------------+
//! |  Layer 0: Values                                                  |
//! |  - Mode (Handler | Type), ModeType, ModeError                      |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 1: Handlers & Kinds                                        |
//! |  - ModeInit / ModeBase (construction guard), ModeHandler          |
//! |  - ModeKind, ModeDescriptor, ModeSlot (per-thread state)          |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 2: Scopes                                                  |
//! |  - enable / push (RAII guards), with_enabled / with_pushed        |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 3: Declaration                                             |
//! |  - mode_kind!, mode_type!, #[derive(Mode)], built-in kinds        |
//! +-------------------------------------------------------------------+
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::rc::Rc;
//! use mode_stack::prelude::*;
//! use mode_stack::kinds::{Call, Reply};
//! use mode_stack::kinds::function::{FunctionKind, FunctionMode};
//!
//! #[derive(Mode)]
//! struct Tracing {
//!     base: ModeBase<FunctionKind>,
//! }
//!
//! impl FunctionMode for Tracing {
//!     fn handle_function(&self, call: &Call<'_>) -> Reply {
//!         println!("calling {}", call.op);
//!         None
//!     }
//! }
//!
//! fn tracing_mode(init: ModeInit<FunctionKind>) -> Result<ModeRef<FunctionKind>, ModeError> {
//!     Ok(Rc::new(Tracing { base: ModeBase::new::<Tracing>(init)? }))
//! }
//!
//! FunctionKind::descriptor().with_pushed(tracing_mode, |mode| {
//!     // `mode` is active here and falls back to the base handler.
//!     assert!(mode.inner().is_some());
//! })?;
//! ```

// Allow `::mode_stack` to work inside the crate itself
extern crate self as mode_stack;

// Re-export paste for mode_kind!
pub use paste;

// =============================================================================
// Layer 0: Values
// =============================================================================
pub mod error;
pub mod mode;

// =============================================================================
// Layer 1: Handlers & Kinds
// =============================================================================
pub mod descriptor;
pub mod handler;

// =============================================================================
// Layer 2: Scopes
// =============================================================================
pub mod scope;

// =============================================================================
// Layer 3: Declaration
// =============================================================================
#[cfg(feature = "detect")]
pub mod detect;

pub mod kind_macros;
pub mod kinds;

// =============================================================================
// Re-exports at Crate Root
// =============================================================================

pub use descriptor::{ModeChain, ModeDescriptor, ModeKind, ModeSlot};
pub use error::ModeError;
pub use handler::{ModeBase, ModeHandler, ModeInit};
pub use mode::{Mode, ModeCapability, ModeRef, ModeType};
pub use scope::{EnableGuard, EnableOptions, PushGuard};

// Re-export proc-macros
pub use macros::Mode;

/// Common items for defining and scoping modes.
pub mod prelude {
    pub use crate::descriptor::{ModeDescriptor, ModeKind};
    pub use crate::error::ModeError;
    pub use crate::handler::{ModeBase, ModeHandler, ModeInit};
    pub use crate::mode::{Mode, ModeCapability, ModeRef, ModeType};
    pub use crate::scope::EnableOptions;
    pub use macros::Mode;
    // Note: mode_kind! and mode_type! are #[macro_export] so they're at crate root
}
