//! Handler construction guard.
//!
//! Handlers are never built with arbitrary state. Every handler constructor
//! receives a [`ModeInit`] and must turn it into a [`ModeBase`] before doing
//! anything else:
//!
//! ```ignore
//! impl Logging {
//!     pub fn new(init: ModeInit<FunctionKind>) -> Result<Self, ModeError> {
//!         let base = ModeBase::new::<Self>(init)?;
//!         // subtype-specific setup runs only once `inner` is captured
//!         Ok(Self { base, lines: RefCell::default() })
//!     }
//! }
//! ```
//!
//! An initializer only carries an `inner` when one was supplied explicitly,
//! which `push` always does. Binding one that doesn't fails with
//! [`ModeError::InvalidConstruction`].

use core::any::type_name;
use core::fmt;

use crate::descriptor::ModeKind;
use crate::error::ModeError;
use crate::mode::Mode;

/// Constructor input for a handler of kind `K`.
pub struct ModeInit<K: ModeKind> {
    // Outer `None`: no inner supplied. `Some(None)`: explicitly no fallback.
    inner: Option<Option<Mode<K>>>,
}

impl<K: ModeKind> ModeInit<K> {
    /// An initializer without an `inner`. Binding it fails.
    #[must_use]
    pub fn new() -> Self {
        Self { inner: None }
    }

    /// An initializer carrying `inner` as the handler's fallback.
    #[must_use]
    pub fn with_inner(inner: Option<Mode<K>>) -> Self {
        Self { inner: Some(inner) }
    }

    /// Supply the fallback on an existing initializer.
    #[must_use]
    pub fn inner(mut self, inner: Option<Mode<K>>) -> Self {
        self.inner = Some(inner);
        self
    }

    #[must_use]
    pub fn has_inner(&self) -> bool {
        self.inner.is_some()
    }
}

impl<K: ModeKind> Default for ModeInit<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared by every handler: its `inner` fallback.
///
/// `inner` is fixed at construction and never changes afterwards.
pub struct ModeBase<K: ModeKind> {
    inner: Option<Mode<K>>,
}

impl<K: ModeKind> ModeBase<K> {
    /// Capture `inner` from `init` for the handler type `H`.
    ///
    /// # Errors
    ///
    /// [`ModeError::InvalidConstruction`] when `init` carries no `inner`.
    pub fn new<H: ?Sized>(init: ModeInit<K>) -> Result<Self, ModeError> {
        match init.inner {
            Some(inner) => Ok(Self { inner }),
            None => Err(ModeError::InvalidConstruction {
                kind: K::descriptor().name(),
                handler: type_name::<H>(),
            }),
        }
    }

    #[must_use]
    pub fn inner(&self) -> Option<&Mode<K>> {
        self.inner.as_ref()
    }
}

impl<K: ModeKind> fmt::Debug for ModeBase<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeBase").field("inner", &self.inner).finish()
    }
}

/// Implemented by every handler of kind `K`.
///
/// Usually derived with `#[derive(Mode)]`. A kind's handler trait (the one
/// carrying its capability method) has this as a supertrait.
pub trait ModeHandler<K: ModeKind>: 'static {
    fn base(&self) -> &ModeBase<K>;

    /// The fallback this handler delegates to.
    fn inner(&self) -> Option<&Mode<K>> {
        self.base().inner()
    }

    fn mode_name(&self) -> &'static str {
        type_name::<Self>()
    }
}
