//! Enable and push scopes.
//!
//! Both scopes validate first, then swap the slot, then hand control to the
//! caller. The previous mode is put back when the returned guard is dropped,
//! whether the scope returns, bails out early or unwinds.
//!
//! | Operation | Slot afterwards | Guard restores |
//! |-----------|-----------------|----------------|
//! | `enable(m)` | `m` | previous mode |
//! | `enable(m)` with `m` already active | unchanged | nothing |
//! | `push(ctor)` | `ctor(inner = previous or base)` | previous mode |

use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::descriptor::{ModeDescriptor, ModeKind};
use crate::error::ModeError;
use crate::handler::{ModeHandler, ModeInit};
use crate::mode::{Mode, ModeRef, same};

// =============================================================================
// Options
// =============================================================================

/// How `enable` treats a mode that is already active.
pub struct EnableOptions<K: ModeKind> {
    replace: Option<Mode<K>>,
    ignore_preexisting: bool,
}

impl<K: ModeKind> EnableOptions<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            replace: None,
            ignore_preexisting: false,
        }
    }

    /// Permit overriding exactly this mode if it is the active one.
    #[must_use]
    pub fn replace(mut self, mode: Mode<K>) -> Self {
        self.replace = Some(mode);
        self
    }

    /// Permit overriding whatever mode is active.
    #[must_use]
    pub fn ignore_preexisting(mut self, ignore: bool) -> Self {
        self.ignore_preexisting = ignore;
        self
    }
}

impl<K: ModeKind> Default for EnableOptions<K> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Guards
// =============================================================================

/// Puts `previous` back into the slot on drop.
struct SlotRestore<K: ModeKind> {
    descriptor: &'static ModeDescriptor<K>,
    installed: Option<Mode<K>>,
    previous: Option<Mode<K>>,
}

impl<K: ModeKind> Drop for SlotRestore<K> {
    fn drop(&mut self) {
        let kind = self.descriptor.name();
        match self.descriptor.try_set_current(self.previous.take()) {
            Ok(displaced) => {
                if same(displaced.as_ref(), self.installed.as_ref()) {
                    trace!(kind, "restored previous mode");
                } else {
                    // Scopes were exited out of order; the restored value is stale.
                    warn!(
                        kind,
                        expected = ?self.installed,
                        found = ?displaced,
                        "mode scope exited out of order"
                    );
                }
            }
            Err(_) => trace!(kind, "mode slot already destroyed; nothing to restore"),
        }
    }
}

/// Scope of an `enable` call.
#[must_use = "the previous mode is restored as soon as the guard is dropped"]
pub struct EnableGuard<K: ModeKind> {
    // `None` when the requested mode was already active.
    restore: Option<SlotRestore<K>>,
}

impl<K: ModeKind> EnableGuard<K> {
    /// Whether entering the scope changed the slot.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.restore.is_none()
    }
}

/// Scope of a `push` call; holds the pushed handler.
#[must_use = "the pushed mode is popped as soon as the guard is dropped"]
pub struct PushGuard<K: ModeKind> {
    mode: ModeRef<K>,
    _restore: SlotRestore<K>,
}

impl<K: ModeKind> PushGuard<K> {
    #[must_use]
    pub fn mode(&self) -> &ModeRef<K> {
        &self.mode
    }
}

// =============================================================================
// Scope Operations
// =============================================================================

impl<K: ModeKind> ModeDescriptor<K> {
    /// Make `mode` the active mode until the guard drops.
    ///
    /// `mode` is a handler, a bare type providing the capability, or `None`
    /// to disable the kind.
    ///
    /// # Errors
    ///
    /// Checked in this order, before the slot is touched:
    /// - [`ModeError::InvalidArgument`] if `mode` is a bare handler type.
    /// - [`ModeError::ConflictingMode`] if another mode is active and
    ///   `options` allows neither replacing it nor ignoring it.
    /// - [`ModeError::MissingCapability`] if a bare type lacks the capability.
    pub fn enable(&'static self, mode: Option<Mode<K>>, options: EnableOptions<K>) -> Result<EnableGuard<K>, ModeError> {
        if let Some(Mode::Type(ty)) = &mode {
            if ty.is_handler() {
                return Err(self.reject(ModeError::InvalidArgument {
                    kind: self.name(),
                    operation: "enable",
                    reason: format!(
                        "expected a {} handler, a type providing {}, or None; got the handler type {} \
                         (pass its constructor to push_{}_mode instead)",
                        self.handler_type(),
                        self.required_capability(),
                        ty.name(),
                        self.name(),
                    ),
                }));
            }
        }

        let old = self.current();
        if same(old.as_ref(), mode.as_ref()) {
            trace!(kind = self.name(), "requested mode is already active");
            return Ok(EnableGuard { restore: None });
        }

        if let Some(active) = &old {
            if !options.ignore_preexisting && !same(Some(active), options.replace.as_ref()) {
                let help = match &mode {
                    Some(Mode::Handler(_)) => format!("Use push_{}_mode instead.", self.name()),
                    _ => format!(
                        "If you intended to completely override the preexisting mode, pass \
                         ignore_preexisting. This can result in unexpected behavior; please consider \
                         rewriting your mode as a {} that wraps its inner mode to make it compositional!",
                        self.handler_type(),
                    ),
                };
                return Err(self.reject(ModeError::ConflictingMode {
                    kind: self.name(),
                    active: active.to_string(),
                    help,
                }));
            }
        }

        // Only bare types are checked here. Handlers provide the capability
        // through their trait, and `None` disables the kind, which needs no
        // capability at all.
        if let Some(Mode::Type(ty)) = &mode {
            if !ty.has_capability() {
                return Err(self.reject(ModeError::MissingCapability {
                    kind: self.name(),
                    candidate: ty.name(),
                    capability: self.required_capability(),
                }));
            }
        }

        drop(old);
        let previous = self.set_current(mode.clone());
        trace!(kind = self.name(), mode = ?mode, "enabled mode");
        Ok(EnableGuard {
            restore: Some(SlotRestore {
                descriptor: self,
                installed: mode,
                previous,
            }),
        })
    }

    /// Layer a new handler over the active mode until the guard drops.
    ///
    /// `constructor` receives an initializer whose `inner` is the active
    /// mode, or a fresh base handler when the slot is empty.
    ///
    /// # Errors
    ///
    /// - Errors returned by `constructor` (or by the base handler), unchanged.
    /// - [`ModeError::InvalidArgument`] if the constructed handler is not
    ///   bound to the `inner` it was given.
    pub fn push<F>(&'static self, constructor: F) -> Result<PushGuard<K>, ModeError>
    where
        F: FnOnce(ModeInit<K>) -> Result<ModeRef<K>, ModeError>,
    {
        let old = self.current();
        let inner = match &old {
            Some(mode) => mode.clone(),
            None => Mode::Handler(self.new_base()?),
        };

        let mode = constructor(ModeInit::with_inner(Some(inner.clone())))?;
        if !same(mode.inner(), Some(&inner)) {
            return Err(self.reject(ModeError::InvalidArgument {
                kind: self.name(),
                operation: "push",
                reason: format!(
                    "the constructor must return a {} built from the inner mode it was given; {} is bound to {:?}",
                    self.handler_type(),
                    mode.mode_name(),
                    mode.inner(),
                ),
            }));
        }

        drop(old);
        let installed = Mode::Handler(Rc::clone(&mode));
        let previous = self.set_current(Some(installed.clone()));
        trace!(kind = self.name(), mode = mode.mode_name(), "pushed mode");
        Ok(PushGuard {
            mode,
            _restore: SlotRestore {
                descriptor: self,
                installed: Some(installed),
                previous,
            },
        })
    }

    /// Run `scope` with `mode` enabled, restoring the previous mode after.
    ///
    /// # Errors
    ///
    /// See [`enable`](Self::enable). `scope` does not run on error.
    pub fn with_enabled<R>(
        &'static self,
        mode: Option<Mode<K>>,
        options: EnableOptions<K>,
        scope: impl FnOnce() -> R,
    ) -> Result<R, ModeError> {
        let _guard = self.enable(mode, options)?;
        Ok(scope())
    }

    /// Run `scope` with a freshly pushed handler, popping it after.
    ///
    /// # Errors
    ///
    /// See [`push`](Self::push). `scope` does not run on error.
    pub fn with_pushed<F, R>(&'static self, constructor: F, scope: impl FnOnce(&ModeRef<K>) -> R) -> Result<R, ModeError>
    where
        F: FnOnce(ModeInit<K>) -> Result<ModeRef<K>, ModeError>,
    {
        let guard = self.push(constructor)?;
        Ok(scope(guard.mode()))
    }

    fn reject(&self, error: ModeError) -> ModeError {
        debug!(kind = self.name(), %error, "rejected mode request");
        error
    }
}
