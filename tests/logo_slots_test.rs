use glass_logo::logo::{Attach, INITIAL_LOADS, LogoSlots};

type Slots = LogoSlots<&'static str, &'static str>;

#[test]
fn should_keep_one_model_attached() {
    let mut slots = Slots::default();
    assert_eq!(slots.attach_model("first"), Attach::Fresh);
    assert_eq!(slots.attach_model("second"), Attach::Replaced("first"));
    assert_eq!(slots.model(), Some(&"second"));
}

#[test]
fn should_keep_one_background_attached() {
    let mut slots = Slots::default();
    assert_eq!(slots.attach_background("skyline", "skyline", "a"), Attach::Fresh);

    assert_eq!(slots.attach_background("custom", "custom", "b"), Attach::Replaced("a"));
    assert_eq!(slots.background(), Some(&"b"));
    assert_eq!(slots.background_name(), Some("custom"));
}

#[test]
fn should_drop_stale_backgrounds() {
    let mut slots = Slots::default();
    slots.attach_background("skyline", "skyline", "a");

    // the selection moved on to "custom" while "mountains" was loading
    assert_eq!(
        slots.attach_background("mountains", "custom", "b"),
        Attach::Stale("b")
    );
    assert_eq!(slots.background(), Some(&"a"));
    assert_eq!(slots.background_name(), Some("skyline"));
}

#[test]
fn should_signal_ready_after_both_initial_loads() {
    assert_eq!(INITIAL_LOADS, 2);
    let mut slots = Slots::default();
    assert!(!slots.is_loaded());

    // a failed model load still settles
    assert!(!slots.settle());
    assert!(!slots.is_loaded());

    slots.attach_background("skyline", "skyline", "a");
    assert!(slots.settle());
    assert!(slots.is_loaded());
}

#[test]
fn should_signal_ready_only_once() {
    let mut slots = Slots::default();
    slots.settle();
    assert!(slots.settle());

    // reloads from the panel
    assert!(!slots.settle());
    assert!(!slots.settle());
    assert!(slots.is_loaded());
}

#[test]
fn should_not_count_attachments_as_settled_loads() {
    let mut slots = Slots::default();
    slots.attach_model("model");
    slots.attach_background("skyline", "skyline", "a");
    assert!(!slots.is_loaded());
}
