//! The dispatch kind: overrides below the public API, at operator dispatch.

use super::{Call, Reply};
use crate::{Mode, ModeBase, ModeCapability, ModeError, ModeHandler, ModeInit, mode_kind};

/// Handler of the dispatch kind.
pub trait DispatchMode: ModeHandler<DispatchKind> {
    fn handle_dispatch(&self, call: &Call<'_>) -> Reply;
}

/// Dispatch-kind capability of a bare type.
pub trait DispatchOverride {
    fn handle_dispatch(call: &Call<'_>) -> Reply;
}

impl<T: ?Sized + DispatchOverride> ModeCapability<DispatchKind> for T {}

mode_kind! {
    /// Intercepts operator dispatch.
    pub struct DispatchKind {
        name: "dispatch",
        handler: dyn DispatchMode,
        capability: "handle_dispatch",
        base: BaseDispatchMode,
    }
}

#[derive(Debug, Mode)]
pub struct BaseDispatchMode {
    base: ModeBase<DispatchKind>,
}

impl BaseDispatchMode {
    /// # Errors
    ///
    /// [`ModeError::InvalidConstruction`] when `init` carries no `inner`.
    pub fn new(init: ModeInit<DispatchKind>) -> Result<Self, ModeError> {
        Ok(Self {
            base: ModeBase::new::<Self>(init)?,
        })
    }
}

impl DispatchMode for BaseDispatchMode {
    fn handle_dispatch(&self, _call: &Call<'_>) -> Reply {
        None
    }
}
