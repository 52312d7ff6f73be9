//! Tests for push scopes
//!
//! A push layers a new handler over the active mode (or over a fresh base
//! handler) and pops it again when the scope ends.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use std::thread;

use mode_stack::kinds::dispatch::DispatchKind;
use mode_stack::kinds::function::{FunctionKind, FunctionMode, FunctionOverride};
use mode_stack::kinds::{Call, Reply};
use mode_stack::ModeChain;
use mode_stack::prelude::*;

#[derive(Mode)]
struct Layer {
    base: ModeBase<FunctionKind>,
    name: &'static str,
}

impl Layer {
    fn new(init: ModeInit<FunctionKind>, name: &'static str) -> Result<Self, ModeError> {
        Ok(Self {
            base: ModeBase::new::<Self>(init)?,
            name,
        })
    }
}

impl FunctionMode for Layer {
    fn handle_function(&self, call: &Call<'_>) -> Reply {
        (call.op == self.name).then(|| Box::new(self.name) as Box<dyn std::any::Any>)
    }
}

struct Tensorish;

impl FunctionOverride for Tensorish {
    fn handle_function(_call: &Call<'_>) -> Reply {
        None
    }
}

fn functions() -> &'static ModeDescriptor<FunctionKind> {
    FunctionKind::descriptor()
}

fn layer(init: ModeInit<FunctionKind>) -> Result<ModeRef<FunctionKind>, ModeError> {
    Ok(Rc::new(Layer::new(init, "layer")?))
}

fn named(name: &'static str) -> impl FnOnce(ModeInit<FunctionKind>) -> Result<ModeRef<FunctionKind>, ModeError> {
    move |init| Ok(Rc::new(Layer::new(init, name)?))
}

// =============================================================================
// Chaining
// =============================================================================

#[test]
fn test_push_scenario() {
    assert!(functions().current().is_none());

    functions()
        .with_pushed(named("a"), |mode_a| {
            // a -> base -> None
            let base = mode_a.inner().expect("pushed onto a base handler");
            assert!(base.name().ends_with("BaseFunctionMode"));
            assert!(base.inner().is_none());

            functions()
                .with_pushed(named("b"), |mode_b| {
                    let inner = mode_b.inner().expect("b wraps a");
                    assert!(inner.is(&Mode::Handler(Rc::clone(mode_a))));
                })
                .unwrap();

            let current = functions().current().expect("a is active again");
            assert!(current.is(&Mode::Handler(Rc::clone(mode_a))));
        })
        .unwrap();

    assert!(functions().current().is_none());
}

#[test]
fn test_push_uses_a_fresh_base_each_time() {
    let first = functions().with_pushed(layer, |mode| mode.inner().cloned()).unwrap();
    let second = functions().with_pushed(layer, |mode| mode.inner().cloned()).unwrap();
    let (Some(first), Some(second)) = (first, second) else {
        panic!("both pushes wrap a base handler");
    };
    assert!(!first.is(&second));
}

#[test]
fn test_chain_and_depth() {
    let a = functions().push(named("a")).unwrap();
    let b = functions().push(named("b")).unwrap();
    let c = functions().push(named("c")).unwrap();

    assert_eq!(functions().depth(), 4);
    let names: Vec<_> = functions()
        .chain()
        .map(|mode| mode.as_handler().map(|h| h.mode_name()))
        .collect();
    assert_eq!(names.len(), 4);
    assert!(names[3].is_some_and(|name| name.ends_with("BaseFunctionMode")));

    // Walking from below the top skips the layers above it.
    let below_b = b.mode().inner().cloned();
    assert_eq!(ModeChain::from_mode(below_b).count(), 2);
    assert_eq!(ModeChain::<FunctionKind>::from_mode(None).count(), 0);

    let reply = c.mode().handle_function(&Call::new("c", &[])).expect("c answers its own op");
    assert_eq!(reply.downcast_ref::<&str>(), Some(&"c"));

    drop(c);
    drop(b);
    assert_eq!(functions().depth(), 2);
    drop(a);
    assert_eq!(functions().depth(), 0);
}

#[test]
fn test_push_over_enabled_bare_type() {
    let ty: Mode<FunctionKind> = ModeType::<FunctionKind>::of::<Tensorish>().into();
    let _enabled = functions().enable(Some(ty.clone()), EnableOptions::new()).unwrap();

    functions()
        .with_pushed(layer, |mode| {
            assert!(mode.inner().is_some_and(|inner| inner.is(&ty)));
        })
        .unwrap();
    assert!(functions().current().is_some_and(|current| current.is(&ty)));
}

#[test]
fn test_enable_conflicts_with_pushed_mode() {
    functions()
        .with_pushed(layer, |_| {
            let other = layer(ModeInit::with_inner(None)).unwrap();
            let result = functions().enable(Some(Mode::Handler(other)), EnableOptions::new());
            assert!(matches!(result, Err(ModeError::ConflictingMode { .. })));
        })
        .unwrap();
}

// =============================================================================
// Restoration
// =============================================================================

#[test]
fn test_push_restores_when_scope_fails() {
    let result = functions()
        .with_pushed(layer, |_| -> Result<(), String> { Err("scope failed".into()) })
        .unwrap();
    assert!(result.is_err());
    assert!(functions().current().is_none());
}

#[test]
fn test_push_restores_when_scope_panics() {
    let outer = functions().push(named("outer")).unwrap();

    let unwound = catch_unwind(AssertUnwindSafe(|| {
        functions().with_pushed(layer, |_| -> u8 { panic!("boom") })
    }));
    assert!(unwound.is_err());

    let current = functions().current().expect("outer is still pushed");
    assert!(current.is(&Mode::Handler(Rc::clone(outer.mode()))));
}

// =============================================================================
// Constructor Errors
// =============================================================================

#[test]
fn test_constructor_errors_propagate() {
    // Ignores the initializer it was given.
    let forgetful = |_init: ModeInit<FunctionKind>| -> Result<ModeRef<FunctionKind>, ModeError> {
        Ok(Rc::new(Layer::new(ModeInit::new(), "forgetful")?))
    };

    let err = functions().push(forgetful).err().expect("construction fails");
    assert!(matches!(err, ModeError::InvalidConstruction { .. }));
    assert!(functions().current().is_none());
}

#[test]
fn test_constructor_must_bind_given_inner() {
    let detached = |_init: ModeInit<FunctionKind>| layer(ModeInit::with_inner(None));

    let err = functions().push(detached).err().expect("detached handler is rejected");
    assert!(matches!(
        err,
        ModeError::InvalidArgument { kind: "function", operation: "push", .. }
    ));
    assert!(functions().current().is_none());
}

#[test]
fn test_constructor_cannot_return_active_mode() {
    let outer = functions().push(named("outer")).unwrap();
    let existing = Rc::clone(outer.mode());

    let result = functions().push(move |_init| Ok(existing));
    assert!(matches!(result, Err(ModeError::InvalidArgument { .. })));
    assert_eq!(functions().depth(), 2);
}

// =============================================================================
// Isolation
// =============================================================================

#[test]
fn test_kinds_have_independent_slots() {
    functions()
        .with_pushed(layer, |_| {
            assert!(DispatchKind::descriptor().current().is_none());
        })
        .unwrap();
}

#[test]
fn test_threads_have_independent_slots() {
    let _guard = functions().push(layer).unwrap();
    let other_thread_empty = thread::spawn(|| FunctionKind::descriptor().current().is_none())
        .join()
        .unwrap();
    assert!(other_thread_empty);
    assert!(functions().is_active());
}
