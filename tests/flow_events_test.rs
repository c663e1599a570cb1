use std::{cell::RefCell, rc::Rc};

use futures::{channel::oneshot, executor::block_on};
use glass_logo::flow::forward_as_resolved;

#[test]
fn should_deliver_each_result_when_it_resolves() {
    let (release_model, model_gate) = oneshot::channel::<()>();
    let delivered = Rc::new(RefCell::new(Vec::new()));

    // The model only finishes after the background was delivered.
    let model = async move {
        let _ = model_gate.await;
        "model"
    };
    let background = async { "background" };

    let mut release_model = Some(release_model);
    let seen = delivered.clone();
    let loads: Vec<Box<dyn Future<Output = &'static str>>> = vec![Box::new(model), Box::new(background)];
    block_on(forward_as_resolved(loads, move |event| {
        seen.borrow_mut().push(event);
        if event == "background" {
            if let Some(release) = release_model.take() {
                let _ = release.send(());
            }
        }
        true
    }));

    assert_eq!(*delivered.borrow(), ["background", "model"]);
}

#[test]
fn should_stop_when_delivery_fails() {
    let results: Vec<Box<dyn Future<Output = u32>>> = vec![
        Box::new(async { 1 }),
        Box::new(async { 2 }),
        Box::new(async { 3 }),
    ];
    let mut count = 0;
    block_on(forward_as_resolved(results, |_| {
        count += 1;
        false
    }));
    assert_eq!(count, 1);
}

#[test]
fn should_accept_no_futures() {
    let mut called = false;
    block_on(forward_as_resolved(Vec::<Box<dyn Future<Output = ()>>>::new(), |_| {
        called = true;
        true
    }));
    assert!(!called);
}
