//! Compile-time capability probing for bare types.
//!
//! This module implements the "Inherent Const Fallback" pattern:
//!
//! 1. A fallback trait provides `const IS_HANDLER: bool = false` (and
//!    `HAS_CAPABILITY`) for every `Probe<K, T>`.
//! 2. An inherent const `true` exists on `Probe<K, T>` only where `T`
//!    satisfies the bound.
//!
//! When resolving `Probe::<K, Concrete>::IS_HANDLER`, the compiler picks the
//! inherent const if the bound holds and the trait const otherwise.
//!
//! ## Limitation
//!
//! This only works for **concrete types** known at the call site, which is
//! why the entry point is the `mode_type!` macro and not a generic function.
//!
//! ```ignore
//! let ty = mode_type!(FunctionKind, MyTensor);
//! FunctionKind::descriptor().enable(Some(ty.into()), EnableOptions::new())?;
//! ```

use core::marker::PhantomData;

use crate::descriptor::ModeKind;
use crate::handler::ModeHandler;
use crate::mode::ModeCapability;

/// Detection wrapper type.
#[doc(hidden)]
pub struct Probe<K, T: ?Sized>(PhantomData<K>, PhantomData<T>);

#[doc(hidden)]
pub trait HandlerFallback {
    const IS_HANDLER: bool = false;
}
impl<K, T: ?Sized> HandlerFallback for Probe<K, T> {}
impl<K: ModeKind, T: ?Sized + ModeHandler<K>> Probe<K, T> {
    pub const IS_HANDLER: bool = true;
}

#[doc(hidden)]
pub trait CapabilityFallback {
    const HAS_CAPABILITY: bool = false;
}
impl<K, T: ?Sized> CapabilityFallback for Probe<K, T> {}
impl<K: ModeKind, T: ?Sized + ModeCapability<K>> Probe<K, T> {
    pub const HAS_CAPABILITY: bool = true;
}

/// Describe a concrete type as a bare mode of a kind.
///
/// Expands to a [`ModeType`](crate::ModeType) whose handler and capability
/// answers were computed at compile time.
///
/// # Example
///
/// ```ignore
/// struct Plain;
/// let ty = mode_type!(FunctionKind, Plain);
/// assert!(!ty.has_capability());
/// ```
#[macro_export]
macro_rules! mode_type {
    ($kind:ty, $ty:ty $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::detect::{CapabilityFallback as _, HandlerFallback as _};
        $crate::ModeType::<$kind>::detected::<$ty>(
            $crate::detect::Probe::<$kind, $ty>::IS_HANDLER,
            $crate::detect::Probe::<$kind, $ty>::HAS_CAPABILITY,
        )
    }};
}
