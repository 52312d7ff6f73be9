//! User-facing macro implementations
//!
//! | Macro | Usage | Purpose |
//! |-------|-------|---------|
//! | `#[derive(Mode)]` | on struct | Implement `ModeHandler` via the base field |

mod mode;

pub use mode::expand_derive_mode;
