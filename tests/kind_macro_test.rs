//! Tests for declaring custom kinds with mode_kind! and probing types with
//! mode_type!

use std::any::TypeId;
use std::cell::RefCell;
use std::rc::Rc;

use mode_stack::kinds::dispatch::DispatchKind;
use mode_stack::kinds::function::FunctionKind;
use mode_stack::mode_kind;
use mode_stack::prelude::*;

// =============================================================================
// A Custom Kind
// =============================================================================

pub trait AuditMode: ModeHandler<AuditKind> {
    /// Returns `true` once the event has been consumed.
    fn handle_audit(&self, event: &str) -> bool;
}

mode_kind! {
    /// Audit hooks.
    pub struct AuditKind {
        name: "audit",
        handler: dyn AuditMode,
        capability: "handle_audit",
        base: BaseAudit,
    }
}

#[derive(Debug, Mode)]
pub struct BaseAudit {
    base: ModeBase<AuditKind>,
}

impl BaseAudit {
    fn new(init: ModeInit<AuditKind>) -> Result<Self, ModeError> {
        Ok(Self {
            base: ModeBase::new::<Self>(init)?,
        })
    }
}

impl AuditMode for BaseAudit {
    fn handle_audit(&self, _event: &str) -> bool {
        false
    }
}

/// Records events with a given prefix and lets the rest fall through.
#[derive(Mode)]
struct Journal {
    base: ModeBase<AuditKind>,
    prefix: &'static str,
    seen: RefCell<Vec<String>>,
}

impl AuditMode for Journal {
    fn handle_audit(&self, event: &str) -> bool {
        if !event.starts_with(self.prefix) {
            return false;
        }
        self.seen.borrow_mut().push(event.to_owned());
        true
    }
}

fn journal(prefix: &'static str) -> impl FnOnce(ModeInit<AuditKind>) -> Result<ModeRef<AuditKind>, ModeError> {
    move |init| {
        Ok(Rc::new(Journal {
            base: ModeBase::new::<Journal>(init)?,
            prefix,
            seen: RefCell::default(),
        }))
    }
}

/// Bare types providing the audit capability.
struct Auditor;
struct Reviewer;

impl ModeCapability<AuditKind> for Auditor {}
impl ModeCapability<AuditKind> for Reviewer {}

/// Offer `event` to each handler in the active chain, outermost first.
fn emit(event: &str) -> bool {
    AuditKind::descriptor()
        .chain()
        .filter_map(|mode| mode.as_handler().cloned())
        .any(|handler| handler.handle_audit(event))
}

#[test]
fn test_descriptor_metadata() {
    let descriptor = AuditKind::descriptor();
    assert_eq!(descriptor.name(), "audit");
    assert_eq!(descriptor.handler_type(), "AuditMode");
    assert_eq!(descriptor.required_capability(), "handle_audit");
    assert!(std::ptr::eq(descriptor, AuditKind::descriptor()));
}

#[test]
fn test_builtin_kind_names() {
    assert_eq!(FunctionKind::descriptor().name(), "function");
    assert_eq!(FunctionKind::descriptor().required_capability(), "handle_function");
    assert_eq!(DispatchKind::descriptor().name(), "dispatch");
    assert_eq!(DispatchKind::descriptor().required_capability(), "handle_dispatch");
}

#[test]
fn test_new_base_is_terminal() {
    let base = AuditKind::descriptor().new_base().unwrap();
    assert!(base.inner().is_none());
    assert!(base.mode_name().ends_with("BaseAudit"));
    assert!(!base.handle_audit("anything"));
}

#[test]
fn test_custom_kind_push_and_fallthrough() {
    let descriptor = AuditKind::descriptor();
    let outer = descriptor.push(journal("net.")).unwrap();
    let inner = descriptor.push(journal("fs.")).unwrap();
    assert_eq!(descriptor.depth(), 3);

    assert!(emit("fs.open"));
    assert!(emit("net.connect"));
    assert!(!emit("proc.spawn"));

    drop(inner);
    assert!(!emit("fs.close"));
    drop(outer);
    assert!(!descriptor.is_active());
}

#[test]
fn test_custom_kind_has_its_own_slot() {
    AuditKind::descriptor()
        .with_pushed(journal(""), |_| {
            assert!(FunctionKind::descriptor().current().is_none());
            assert!(DispatchKind::descriptor().current().is_none());
        })
        .unwrap();
}

#[test]
fn test_custom_kind_construction_guard() {
    let err = BaseAudit::new(ModeInit::new()).unwrap_err();
    assert!(matches!(err, ModeError::InvalidConstruction { kind: "audit", .. }));
    assert!(err.to_string().contains("push_audit_mode"), "{err}");
}

#[test]
fn test_enable_custom_capable_type() {
    let ty: Mode<AuditKind> = ModeType::<AuditKind>::of::<Auditor>().into();
    AuditKind::descriptor()
        .with_enabled(Some(ty.clone()), EnableOptions::new(), || {
            assert!(AuditKind::descriptor().current().is_some_and(|current| current.is(&ty)));
            // Bare types sit outside the handler chain.
            assert!(!emit("fs.open"));
        })
        .unwrap();
}

#[test]
fn test_type_identity() {
    let a: Mode<AuditKind> = ModeType::<AuditKind>::of::<Auditor>().into();
    let b: Mode<AuditKind> = ModeType::<AuditKind>::of::<Auditor>().into();
    let c: Mode<AuditKind> = ModeType::<AuditKind>::of::<Reviewer>().into();
    assert!(a.is(&b));
    assert!(!a.is(&c));
    assert!(a.as_type().is_some_and(|ty| ty.type_id() == TypeId::of::<Auditor>()));
    assert_eq!(a.to_string(), format!("<type {}>", std::any::type_name::<Auditor>()));
}

// =============================================================================
// mode_type! Detection
// =============================================================================

#[cfg(feature = "detect")]
mod detection {
    use mode_stack::kinds::function::{BaseFunctionMode, FunctionKind, FunctionOverride};
    use mode_stack::kinds::{Call, Reply};
    use mode_stack::mode_type;
    use mode_stack::prelude::*;

    use super::{AuditKind, Auditor, BaseAudit, Journal};

    struct Tensorish;

    impl FunctionOverride for Tensorish {
        fn handle_function(_call: &Call<'_>) -> Reply {
            None
        }
    }

    #[test]
    fn test_detect_plain_types() {
        let ty = mode_type!(AuditKind, String);
        assert!(!ty.is_handler());
        assert!(!ty.has_capability());
        assert_eq!(ty.name(), std::any::type_name::<String>());
    }

    #[test]
    fn test_detect_capability_types() {
        assert!(mode_type!(AuditKind, Auditor).has_capability());
        assert!(!mode_type!(FunctionKind, Auditor).has_capability());

        assert!(mode_type!(FunctionKind, Tensorish).has_capability());
        assert!(!mode_type!(AuditKind, Tensorish).has_capability());
    }

    #[test]
    fn test_detect_handler_types() {
        assert!(mode_type!(FunctionKind, BaseFunctionMode).is_handler());
        assert!(mode_type!(AuditKind, BaseAudit).is_handler());
        assert!(mode_type!(AuditKind, Journal).is_handler());

        // A handler of one kind is not a handler of another.
        assert!(!mode_type!(AuditKind, BaseFunctionMode).is_handler());
        assert!(!mode_type!(FunctionKind, Auditor).is_handler());
    }

    #[test]
    fn test_detected_and_typed_constructor_agree() {
        let detected: Mode<AuditKind> = mode_type!(AuditKind, Auditor).into();
        let typed: Mode<AuditKind> = ModeType::<AuditKind>::of::<Auditor>().into();
        assert!(detected.is(&typed));
        assert_eq!(
            detected.as_type().map(ModeType::type_id),
            typed.as_type().map(ModeType::type_id)
        );
    }

    #[test]
    fn test_enable_rejects_detected_plain_type() {
        let result = AuditKind::descriptor().enable(Some(mode_type!(AuditKind, String).into()), EnableOptions::new());
        assert!(matches!(
            result,
            Err(ModeError::MissingCapability { kind: "audit", capability: "handle_audit", .. })
        ));
    }
}
