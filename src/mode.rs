//! Slot values.
//!
//! A slot (and every `inner` link) holds a [`Mode`]: either a shared handler
//! instance or a [`ModeType`], a bare type standing in for a handler.
//! Comparison between modes is always by identity, never by value.

use core::any::{TypeId, type_name};
use core::fmt;
use core::marker::PhantomData;
use std::rc::Rc;

use crate::descriptor::ModeKind;
use crate::handler::ModeHandler;

/// Shared reference to a handler of kind `K`.
pub type ModeRef<K> = Rc<<K as ModeKind>::Handler>;

/// Static capability of kind `K`, provided by a bare type.
///
/// Handler instances provide their kind's capability through the kind's
/// handler trait. Bare types enabled in place of a handler advertise it with
/// this marker, usually through a blanket impl over the kind's static
/// capability trait.
pub trait ModeCapability<K: ModeKind> {}

// =============================================================================
// ModeType
// =============================================================================

/// A bare type used as a mode.
///
/// Carries the answers to the two static questions the enable protocol asks
/// about a type: is it itself a handler of `K`, and does it provide `K`'s
/// capability. With the `detect` feature, `mode_type!` answers both at
/// compile time.
pub struct ModeType<K: ModeKind> {
    id: TypeId,
    name: &'static str,
    is_handler: bool,
    has_capability: bool,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ModeKind> ModeType<K> {
    /// A bare type that provides `K`'s capability.
    ///
    /// The capability is proven by the bound, so a type without it cannot be
    /// described this way:
    ///
    /// ```compile_fail
    /// use mode_stack::ModeType;
    /// use mode_stack::kinds::function::FunctionKind;
    ///
    /// struct Plain;
    /// let _ = ModeType::<FunctionKind>::of::<Plain>();
    /// ```
    ///
    /// `T` is taken not to be a handler of `K`. Use `mode_type!` to check
    /// both questions for an arbitrary concrete type.
    #[must_use]
    pub fn of<T: ?Sized + ModeCapability<K> + 'static>() -> Self {
        Self::detected::<T>(false, true)
    }

    /// Describe `T` with answers computed by `mode_type!`.
    #[doc(hidden)]
    #[must_use]
    pub fn detected<T: ?Sized + 'static>(is_handler: bool, has_capability: bool) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            is_handler,
            has_capability,
            _kind: PhantomData,
        }
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the type is itself a handler of `K`.
    #[must_use]
    pub fn is_handler(&self) -> bool {
        self.is_handler
    }

    /// Whether the type provides `K`'s capability.
    #[must_use]
    pub fn has_capability(&self) -> bool {
        self.has_capability
    }
}

impl<K: ModeKind> Clone for ModeType<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ModeKind> Copy for ModeType<K> {}

impl<K: ModeKind> fmt::Debug for ModeType<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeType")
            .field("name", &self.name)
            .field("is_handler", &self.is_handler)
            .field("has_capability", &self.has_capability)
            .finish()
    }
}

// =============================================================================
// Mode
// =============================================================================

/// The value of a slot or of a handler's `inner` link.
pub enum Mode<K: ModeKind> {
    Handler(ModeRef<K>),
    Type(ModeType<K>),
}

impl<K: ModeKind> Mode<K> {
    /// Identity comparison: the same handler allocation, or the same type.
    ///
    /// Two distinct handlers with identical state are not the same mode.
    #[must_use]
    pub fn is(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Handler(a), Self::Handler(b)) => Rc::ptr_eq(a, b),
            (Self::Type(a), Self::Type(b)) => a.id == b.id,
            _ => false,
        }
    }

    #[must_use]
    pub fn as_handler(&self) -> Option<&ModeRef<K>> {
        match self {
            Self::Handler(handler) => Some(handler),
            Self::Type(_) => None,
        }
    }

    #[must_use]
    pub fn as_type(&self) -> Option<&ModeType<K>> {
        match self {
            Self::Handler(_) => None,
            Self::Type(ty) => Some(ty),
        }
    }

    /// The fallback this mode delegates to. Bare types have none.
    #[must_use]
    pub fn inner(&self) -> Option<&Mode<K>> {
        match self {
            Self::Handler(handler) => handler.inner(),
            Self::Type(_) => None,
        }
    }

    /// Type name of the handler or bare type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Handler(handler) => handler.mode_name(),
            Self::Type(ty) => ty.name(),
        }
    }
}

/// Identity comparison of optional modes; two empty slots are identical.
pub(crate) fn same<K: ModeKind>(a: Option<&Mode<K>>, b: Option<&Mode<K>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.is(b),
        _ => false,
    }
}

impl<K: ModeKind> Clone for Mode<K> {
    fn clone(&self) -> Self {
        match self {
            Self::Handler(handler) => Self::Handler(Rc::clone(handler)),
            Self::Type(ty) => Self::Type(*ty),
        }
    }
}

impl<K: ModeKind> From<ModeType<K>> for Mode<K> {
    fn from(ty: ModeType<K>) -> Self {
        Self::Type(ty)
    }
}

impl<K: ModeKind> From<ModeRef<K>> for Mode<K> {
    fn from(handler: ModeRef<K>) -> Self {
        Self::Handler(handler)
    }
}

impl<K: ModeKind> fmt::Debug for Mode<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(handler) => f
                .debug_tuple("Handler")
                .field(&format_args!("{} at {:p}", handler.mode_name(), Rc::as_ptr(handler)))
                .finish(),
            Self::Type(ty) => f.debug_tuple("Type").field(&ty.name()).finish(),
        }
    }
}

impl<K: ModeKind> fmt::Display for Mode<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(handler) => write!(f, "<{} at {:p}>", handler.mode_name(), Rc::as_ptr(handler)),
            Self::Type(ty) => write!(f, "<type {}>", ty.name()),
        }
    }
}
