//! Mode-kinds and their descriptors.
//!
//! Every kind has exactly one [`ModeDescriptor`], a `static` created by
//! `mode_kind!`. The descriptor is the only way to reach the kind's
//! per-thread [`ModeSlot`].

use core::cell::RefCell;
use std::thread::{AccessError, LocalKey};

use crate::error::ModeError;
use crate::handler::{ModeHandler, ModeInit};
use crate::mode::{Mode, ModeRef};

/// One independent interception point.
pub trait ModeKind: Sized + 'static {
    /// The handler trait object for this kind, e.g. `dyn FunctionMode`.
    type Handler: ?Sized + ModeHandler<Self>;

    fn descriptor() -> &'static ModeDescriptor<Self>;
}

// =============================================================================
// ModeSlot
// =============================================================================

/// Per-thread storage for the active mode of one kind.
///
/// Lives in a `thread_local!`; only the kind's descriptor reads or writes it.
pub struct ModeSlot<K: ModeKind> {
    current: RefCell<Option<Mode<K>>>,
}

impl<K: ModeKind> ModeSlot<K> {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: RefCell::new(None) }
    }
}

impl<K: ModeKind> Default for ModeSlot<K> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ModeDescriptor
// =============================================================================

/// Immutable description of a mode-kind.
pub struct ModeDescriptor<K: ModeKind> {
    name: &'static str,
    handler_type: &'static str,
    required_capability: &'static str,
    base: fn(ModeInit<K>) -> Result<ModeRef<K>, ModeError>,
    slot: &'static LocalKey<ModeSlot<K>>,
}

impl<K: ModeKind> ModeDescriptor<K> {
    /// Prefer `mode_kind!`, which also declares the slot.
    #[must_use]
    pub const fn new(
        name: &'static str,
        handler_type: &'static str,
        required_capability: &'static str,
        base: fn(ModeInit<K>) -> Result<ModeRef<K>, ModeError>,
        slot: &'static LocalKey<ModeSlot<K>>,
    ) -> Self {
        Self {
            name,
            handler_type,
            required_capability,
            base,
            slot,
        }
    }

    /// Identifier used in diagnostics, e.g. `"function"`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the handler trait every handler of this kind implements.
    #[must_use]
    pub fn handler_type(&self) -> &'static str {
        self.handler_type
    }

    /// Name of the capability method a mode must provide.
    #[must_use]
    pub fn required_capability(&self) -> &'static str {
        self.required_capability
    }

    /// Build a terminal base handler with no fallback.
    ///
    /// # Errors
    ///
    /// Whatever the base handler's constructor returns.
    pub fn new_base(&self) -> Result<ModeRef<K>, ModeError> {
        (self.base)(ModeInit::with_inner(None))
    }

    /// The mode active on this thread.
    #[must_use]
    pub fn current(&self) -> Option<Mode<K>> {
        self.slot.with(|slot| slot.current.borrow().clone())
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.slot.with(|slot| slot.current.borrow().is_some())
    }

    /// Replace the active mode without any validation, returning the
    /// displaced one. Scopes should go through `enable` or `push`.
    pub fn set_current(&self, mode: Option<Mode<K>>) -> Option<Mode<K>> {
        self.slot.with(|slot| slot.current.replace(mode))
    }

    /// Like [`set_current`](Self::set_current), but tolerates a slot that
    /// has already been torn down with its thread.
    pub(crate) fn try_set_current(&self, mode: Option<Mode<K>>) -> Result<Option<Mode<K>>, AccessError> {
        self.slot.try_with(|slot| slot.current.replace(mode))
    }

    /// Walk the active chain from the slot through each `inner` link.
    #[must_use]
    pub fn chain(&self) -> ModeChain<K> {
        ModeChain { next: self.current() }
    }

    /// Number of modes reachable from the slot.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.chain().count()
    }
}

/// Iterator over a chain of modes, outermost first.
pub struct ModeChain<K: ModeKind> {
    next: Option<Mode<K>>,
}

impl<K: ModeKind> ModeChain<K> {
    /// Start a walk at an arbitrary mode.
    #[must_use]
    pub fn from_mode(mode: Option<Mode<K>>) -> Self {
        Self { next: mode }
    }
}

impl<K: ModeKind> Iterator for ModeChain<K> {
    type Item = Mode<K>;

    fn next(&mut self) -> Option<Mode<K>> {
        let current = self.next.take()?;
        self.next = current.inner().cloned();
        Some(current)
    }
}
