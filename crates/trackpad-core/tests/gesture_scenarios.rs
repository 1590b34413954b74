//! Integration tests for complete gesture sessions.
//!
//! These drive the public API the way the bridge does: touch batches with
//! browser timestamps in, actions out through a recording sender, with the
//! host-side drag-release timer simulated by `poll`.

use std::sync::Arc;

use trackpad_core::gesture::thresholds::TIMEOUT_MS;
use trackpad_core::{
    Action, GestureInterpreter, KeyboardInput, ModifierState, MouseButton, RecordingSender,
    Settings, SharedSettings, TouchPoint,
};

fn setup(settings: SharedSettings) -> (GestureInterpreter, Arc<RecordingSender>) {
    let sender = Arc::new(RecordingSender::new());
    let interp = GestureInterpreter::new(sender.clone(), Arc::new(settings));
    (interp, sender)
}

fn at(id: i64, x: f64, y: f64) -> TouchPoint {
    TouchPoint::new(id, x, y)
}

#[test]
fn test_quick_tap_clicks_then_releases_after_delay() {
    let (mut interp, sender) = setup(SharedSettings::default());

    interp.on_touch_start(&[at(1, 100.0, 100.0)], 0.0);
    interp.on_touch_end(&[at(1, 100.0, 100.0)], 50.0);

    // Timer has not elapsed yet.
    assert!(!interp.poll(50.0 + TIMEOUT_MS - 1.0));
    assert!(interp.poll(50.0 + TIMEOUT_MS));

    assert_eq!(
        sender.actions(),
        vec![
            Action::Click {
                button: MouseButton::Left,
                press: true
            },
            Action::Click {
                button: MouseButton::Left,
                press: false
            },
        ]
    );
}

#[test]
fn test_tap_and_drag_holds_until_final_lift() {
    let (mut interp, sender) = setup(SharedSettings::default());

    // Tap.
    interp.on_touch_start(&[at(1, 300.0, 300.0)], 1_000.0);
    interp.on_touch_end(&[at(1, 300.0, 300.0)], 1_040.0);

    // Touch again inside the window and drag around for a while.
    interp.on_touch_start(&[at(2, 300.0, 300.0)], 1_200.0);
    let mut t = 1_200.0;
    for step in 1..=20 {
        t += 16.0;
        interp.on_touch_move(&[at(2, 300.0 + 5.0 * step as f64, 300.0)], t);
        // The host's timer would have fired long ago; it must be disarmed.
        assert!(!interp.poll(t + 10_000.0));
    }
    interp.on_touch_end(&[at(2, 400.0, 300.0)], t + 16.0);

    let actions = sender.actions();
    let releases = actions
        .iter()
        .filter(|a| {
            matches!(
                a,
                Action::Click {
                    button: MouseButton::Left,
                    press: false
                }
            )
        })
        .count();
    assert_eq!(releases, 1, "exactly one release, at the final lift");
    assert_eq!(
        actions.last(),
        Some(&Action::Click {
            button: MouseButton::Left,
            press: false
        })
    );
    assert!(actions.iter().any(|a| matches!(a, Action::Move { .. })));
}

#[test]
fn test_pinch_session_never_scrolls_after_recognition() {
    let (mut interp, sender) = setup(SharedSettings::default());
    interp.on_touch_start(&[at(1, 200.0, 400.0), at(2, 250.0, 400.0)], 1_000.0);

    // Spread by 30 px: recognised as a pinch.
    interp.on_touch_move(&[at(1, 185.0, 400.0), at(2, 265.0, 400.0)], 1_016.0);

    // Then slide both fingers together, which alone would be a scroll.
    let mut t = 1_016.0;
    for step in 1..=5 {
        t += 16.0;
        let y = 400.0 + 10.0 * step as f64;
        interp.on_touch_move(&[at(1, 185.0, y), at(2, 265.0, y)], t);
    }

    let actions = sender.actions();
    assert_eq!(actions.len(), 6);
    assert!(actions.iter().all(|a| matches!(a, Action::Zoom { .. })));
}

#[test]
fn test_sensitivity_change_affects_only_later_actions() {
    let settings = SharedSettings::default();
    let (mut interp, sender) = setup(settings.clone());
    interp.on_touch_start(&[at(1, 0.0, 0.0)], 1_000.0);

    interp.on_touch_move(&[at(1, 0.0, 20.0)], 1_016.0);
    let before = sender.actions();

    settings.set(Settings {
        sensitivity: 0.5,
        invert_scroll: false,
    });
    interp.on_touch_move(&[at(1, 0.0, 40.0)], 1_032.0);
    let after = sender.actions();

    // Earlier output is untouched, later output is halved.
    assert_eq!(after[0], before[0]);
    match (&after[0], &after[1]) {
        (Action::Move { dy: first, .. }, Action::Move { dy: second, .. }) => {
            assert!((second - first * 0.5).abs() < 1e-9);
        }
        other => panic!("expected two moves, got {other:?}"),
    }
}

#[test]
fn test_five_finger_slap_never_clicks() {
    let (mut interp, sender) = setup(SharedSettings::default());
    let hand: Vec<TouchPoint> = (0..5).map(|i| at(i, 50.0 * i as f64, 0.0)).collect();

    interp.on_touch_start(&hand, 1_000.0);
    interp.on_touch_end(&hand, 1_030.0);

    assert!(sender.actions().is_empty());
    assert_eq!(interp.pending_drag_release(), None);
}

#[test]
fn test_keyboard_and_touch_share_one_sender() {
    let sender = Arc::new(RecordingSender::new());
    let mut interp = GestureInterpreter::new(sender.clone(), Arc::new(Settings::default()));
    let mut keyboard = KeyboardInput::new(sender.clone());

    keyboard.set_state(ModifierState::Active);
    keyboard.handle_key("Control");
    interp.on_touch_start(&[at(1, 10.0, 10.0)], 1_000.0);
    interp.on_touch_end(&[at(1, 10.0, 10.0)], 1_020.0);
    keyboard.handle_key("z");
    keyboard.confirm();

    assert_eq!(
        sender.actions(),
        vec![
            Action::Click {
                button: MouseButton::Left,
                press: true
            },
            Action::Combo {
                keys: vec!["Control".to_string(), "z".to_string()]
            },
        ]
    );
}
