use mvp_core::{record_fields, ObservableRecord};
use std::cell::RefCell;
use std::rc::Rc;

record_fields! {
    enum Outer { Inner, Title }
}

record_fields! {
    enum Inner { Gold, Name }
}

fn recorder<F: mvp_core::FieldKey>(record: &ObservableRecord<F>) -> Rc<RefCell<Vec<String>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    record.subscribe(move |field| sink.borrow_mut().push(field.to_string()));
    seen
}

#[test]
fn set_then_get_returns_value_and_repeat_set_is_silent() {
    let record = ObservableRecord::<Outer>::new();
    let seen = recorder(&record);

    for value in ["a", "b", "b", "c"] {
        record.set(Outer::Title, value.to_string());
        assert_eq!(record.get::<String>(Outer::Title), value);
    }
    assert!(!record.set(Outer::Title, "c".to_string()));

    assert_eq!(*seen.borrow(), vec!["Title", "Title", "Title"]);
}

#[test]
fn every_subscriber_sees_a_change_once_before_set_returns() {
    let record = ObservableRecord::<Outer>::new();
    let first = recorder(&record);
    let second = recorder(&record);

    assert!(record.set(Outer::Title, "x".to_string()));

    assert_eq!(*first.borrow(), vec!["Title"]);
    assert_eq!(*second.borrow(), vec!["Title"]);
}

#[test]
fn nested_changes_relay_inner_name_until_replaced() {
    let outer = ObservableRecord::<Outer>::new();
    let first = ObservableRecord::<Inner>::new();
    let second = ObservableRecord::<Inner>::new();
    let seen = recorder(&outer);

    assert!(outer.set(Outer::Inner, first.clone()));
    first.set(Inner::Gold, 10_i64);
    assert_eq!(*seen.borrow(), vec!["Inner", "Gold"]);

    assert!(outer.set(Outer::Inner, second.clone()));
    first.set(Inner::Gold, 20_i64);
    second.set(Inner::Name, "hero".to_string());

    assert_eq!(*seen.borrow(), vec!["Inner", "Gold", "Inner", "Name"]);
    assert!(outer
        .get::<ObservableRecord<Inner>>(Outer::Inner)
        .ptr_eq(&second));
}

#[test]
fn same_nested_record_is_not_a_change_and_keeps_single_relay() {
    let outer = ObservableRecord::<Outer>::new();
    let inner = ObservableRecord::<Inner>::new();
    let seen = recorder(&outer);

    assert!(outer.set(Outer::Inner, inner.clone()));
    assert!(!outer.set(Outer::Inner, inner.clone()));
    inner.set(Inner::Gold, 1_i64);

    assert_eq!(*seen.borrow(), vec!["Inner", "Gold"]);
}

#[test]
fn unsubscribed_handler_stops_receiving() {
    let record = ObservableRecord::<Outer>::new();
    let seen = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&seen);
    let id = record.subscribe(move |_| *sink.borrow_mut() += 1);

    record.set(Outer::Title, "a".to_string());
    assert!(record.unsubscribe(id));
    assert!(!record.unsubscribe(id));
    record.set(Outer::Title, "b".to_string());

    assert_eq!(*seen.borrow(), 1);
}

#[test]
fn relay_is_swapped_before_outer_subscribers_hear_the_replacement() {
    let outer = ObservableRecord::<Outer>::new();
    let old = ObservableRecord::<Inner>::new();
    let new = ObservableRecord::<Inner>::new();
    outer.set(Outer::Inner, old.clone());

    let seen = recorder(&outer);
    {
        let old = old.clone();
        let new = new.clone();
        outer.subscribe(move |field| {
            if field == "Inner" {
                old.set(Inner::Gold, 5_i64);
                new.set(Inner::Name, "fresh".to_string());
            }
        });
    }

    assert!(outer.set(Outer::Inner, new.clone()));

    assert_eq!(*seen.borrow(), vec!["Inner", "Name"]);
    assert_eq!(old.get::<i64>(Inner::Gold), 5);
    assert_eq!(old.notifier().subscriber_count(), 0);
}
