//! The function kind: overrides of public function calls.

use super::{Call, Reply};
use crate::{Mode, ModeBase, ModeCapability, ModeError, ModeHandler, ModeInit, mode_kind};

/// Handler of the function kind.
pub trait FunctionMode: ModeHandler<FunctionKind> {
    fn handle_function(&self, call: &Call<'_>) -> Reply;
}

/// Function-kind capability of a bare type.
///
/// Implement this (not [`ModeCapability`]) to let a type be enabled as a
/// function mode without being a handler.
pub trait FunctionOverride {
    fn handle_function(call: &Call<'_>) -> Reply;
}

impl<T: ?Sized + FunctionOverride> ModeCapability<FunctionKind> for T {}

mode_kind! {
    /// Intercepts calls to public functions.
    pub struct FunctionKind {
        name: "function",
        handler: dyn FunctionMode,
        capability: "handle_function",
        base: BaseFunctionMode,
    }
}

/// Terminal function handler: declines every call so the intercepted operation runs unchanged.
#[derive(Debug, Mode)]
pub struct BaseFunctionMode {
    base: ModeBase<FunctionKind>,
}

impl BaseFunctionMode {
    /// # Errors
    ///
    /// [`ModeError::InvalidConstruction`] when `init` carries no `inner`.
    pub fn new(init: ModeInit<FunctionKind>) -> Result<Self, ModeError> {
        Ok(Self {
            base: ModeBase::new::<Self>(init)?,
        })
    }
}

impl FunctionMode for BaseFunctionMode {
    fn handle_function(&self, _call: &Call<'_>) -> Reply {
        None
    }
}
