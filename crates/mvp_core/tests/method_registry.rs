use mvp_core::{method_keys, Diagnostics, MethodRegistry, MvpError};
use std::cell::Cell;
use std::rc::Rc;

method_keys! {
    enum Intent { AddGold, Rename, Missing }
}

fn registry() -> MethodRegistry {
    MethodRegistry::new("TestPresenter", Diagnostics::new())
}

#[test]
fn duplicate_registration_keeps_first_handler() {
    let registry = registry();
    let ran = Rc::new(Cell::new(""));

    let first = Rc::clone(&ran);
    registry
        .register0(Intent::AddGold, move || first.set("first"))
        .unwrap();
    let second = Rc::clone(&ran);
    let err = registry
        .register0(Intent::AddGold, move || second.set("second"))
        .unwrap_err();

    assert!(matches!(err, MvpError::DuplicateRegistration { .. }));
    assert!(registry.invoke0(Intent::AddGold));
    assert_eq!(ran.get(), "first");
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.diagnostics().count_code("duplicate_registration"),
        1
    );
}

#[test]
fn unknown_key_degrades_to_default_and_is_reported() {
    let registry = registry();
    let gold = Rc::new(Cell::new(0_i64));
    let target = Rc::clone(&gold);
    registry
        .register0(Intent::AddGold, move || target.set(target.get() + 10))
        .unwrap();

    assert!(!registry.invoke0(Intent::Missing));
    assert_eq!(registry.call0::<_, i64>(Intent::Missing), None);
    assert!(matches!(
        registry.try_call0::<_, ()>(Intent::Missing),
        Err(MvpError::UnknownKey { .. })
    ));

    assert_eq!(gold.get(), 0);
    assert_eq!(registry.diagnostics().count_code("unknown_key"), 3);
}

#[test]
fn wrong_shape_is_a_signature_mismatch_not_a_call() {
    let registry = registry();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    registry
        .register1(Intent::Rename, move |name: String| {
            counter.set(counter.get() + 1);
            name.len()
        })
        .unwrap();

    assert_eq!(registry.call1::<_, &str, usize>(Intent::Rename, "x"), None);
    assert_eq!(registry.call1::<_, String, u32>(Intent::Rename, "x".into()), None);
    assert!(!registry.invoke0(Intent::Rename));
    assert_eq!(calls.get(), 0);

    assert_eq!(
        registry.call1::<_, String, usize>(Intent::Rename, "hero".into()),
        Some(4)
    );
    assert_eq!(registry.diagnostics().count_code("signature_mismatch"), 3);
}

#[test]
fn unregister_removes_entry_and_reports_unknown_afterwards() {
    let registry = registry();
    registry.register0(Intent::AddGold, || ()).unwrap();

    registry.unregister(Intent::AddGold).unwrap();
    assert!(!registry.contains(Intent::AddGold));
    assert!(matches!(
        registry.unregister(Intent::AddGold),
        Err(MvpError::UnknownKey { .. })
    ));
}
