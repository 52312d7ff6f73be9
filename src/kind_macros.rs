//! Declaration macros for mode-kinds.

// =============================================================================
// mode_kind! - Declare a kind with its slot and descriptor
// =============================================================================

/// Declare a mode-kind.
///
/// Generates the kind's unit struct, its per-thread slot, its `static`
/// descriptor and the [`ModeKind`](crate::ModeKind) impl. The handler trait
/// and the base handler must be declared separately; the base handler needs
/// a `fn new(ModeInit<Kind>) -> Result<Self, ModeError>` constructor.
///
/// # Example
///
/// ```ignore
/// pub trait AuditMode: ModeHandler<AuditKind> {
///     fn handle_audit(&self, event: &str);
/// }
///
/// mode_kind! {
///     /// Audit hooks.
///     pub struct AuditKind {
///         name: "audit",
///         handler: dyn AuditMode,
///         capability: "handle_audit",
///         base: BaseAuditMode,
///     }
/// }
/// ```
#[macro_export]
macro_rules! mode_kind {
    (
        $(#[$meta:meta])*
        $vis:vis struct $kind:ident {
            name: $name:literal,
            handler: dyn $handler:path,
            capability: $capability:literal,
            base: $base:ty $(,)?
        }
    ) => {
        $crate::paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            $vis struct $kind;

            ::std::thread_local! {
                static [<__ $kind:snake:upper _SLOT>]: $crate::ModeSlot<$kind> = const { $crate::ModeSlot::new() };
            }

            fn [<__ $kind:snake _base>](
                init: $crate::ModeInit<$kind>,
            ) -> ::core::result::Result<::std::rc::Rc<dyn $handler>, $crate::ModeError> {
                ::core::result::Result::Ok(::std::rc::Rc::new(<$base>::new(init)?))
            }

            static [<__ $kind:snake:upper _DESCRIPTOR>]: $crate::ModeDescriptor<$kind> = $crate::ModeDescriptor::new(
                $name,
                ::core::stringify!($handler),
                $capability,
                [<__ $kind:snake _base>],
                &[<__ $kind:snake:upper _SLOT>],
            );

            impl $crate::ModeKind for $kind {
                type Handler = dyn $handler;

                fn descriptor() -> &'static $crate::ModeDescriptor<Self> {
                    &[<__ $kind:snake:upper _DESCRIPTOR>]
                }
            }
        }
    };
}
