//! Built-in mode-kinds.
//!
//! | Kind | Handler trait | Capability | Base handler |
//! |------|---------------|------------|--------------|
//! | [`function::FunctionKind`] | `FunctionMode` | `handle_function` | `BaseFunctionMode` |
//! | [`dispatch::DispatchKind`] | `DispatchMode` | `handle_dispatch` | `BaseDispatchMode` |
//!
//! The stack never invokes a capability itself; [`Call`] and [`Reply`] only
//! fix the shape collaborators use when they do.

use core::any::Any;

pub mod dispatch;
pub mod function;

/// An intercepted operation.
#[derive(Clone, Copy)]
pub struct Call<'a> {
    pub op: &'a str,
    pub args: &'a [&'a dyn Any],
}

impl<'a> Call<'a> {
    #[must_use]
    pub fn new(op: &'a str, args: &'a [&'a dyn Any]) -> Self {
        Self { op, args }
    }
}

/// Result of a capability: `None` declines, letting the fallback run.
pub type Reply = Option<Box<dyn Any>>;
