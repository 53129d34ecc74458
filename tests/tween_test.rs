use matcap_flow::tween::{Ease, Tween, TweenSlot, TweenStatus};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn eases_start_at_zero_and_end_at_one() {
    for ease in [Ease::Linear, Ease::Power1Out, Ease::Power2InOut, Ease::SLOW] {
        assert_close(ease.apply(0.0), 0.0);
        assert_close(ease.apply(1.0), 1.0);
    }
}

#[test]
fn eases_clamp_time_outside_the_unit_range() {
    assert_close(Ease::Power1Out.apply(-1.0), 0.0);
    assert_close(Ease::Power1Out.apply(2.0), 1.0);
}

#[test]
fn power1_out_is_a_quadratic_ease_out() {
    assert_close(Ease::Power1Out.apply(0.5), 0.75);
    assert_eq!(Ease::default(), Ease::Power1Out);
}

#[test]
fn slow_mo_is_symmetric_around_the_middle() {
    assert_close(Ease::SLOW.apply(0.5), 0.5);
    assert_close(Ease::SLOW.apply(0.25) + Ease::SLOW.apply(0.75), 1.0);
}

#[test]
fn eases_are_monotonic() {
    for ease in [Ease::Power1Out, Ease::Power2InOut, Ease::SLOW] {
        let mut last = 0.0;
        for i in 0..=100 {
            let v = ease.apply(i as f32 / 100.0);
            assert!(v + 1e-6 >= last, "{ease:?} decreases at {i}");
            last = v;
        }
    }
}

#[test]
fn tween_lands_exactly_on_target() {
    let mut tween = Tween::new(0.0f32, 3.0, 0.3, Ease::SLOW);
    for _ in 0..100 {
        tween.advance(0.01);
    }
    assert!(tween.is_finished());
    assert_eq!(tween.value(), 3.0);
}

#[test]
fn zero_length_tween_completes_on_first_advance() {
    let mut slot = TweenSlot::new(1.0f32);
    slot.to(4.0, 0.0, Ease::Linear);
    assert_eq!(slot.advance(0.0), TweenStatus::Completed);
    assert_eq!(slot.value(), 4.0);
}

#[test]
fn new_tween_overwrites_running_one_from_current_value() {
    let mut slot = TweenSlot::new(0.0f32);
    slot.to(10.0, 1.0, Ease::Linear);
    assert_eq!(slot.advance(0.5), TweenStatus::Running);
    assert_close(slot.value(), 5.0);

    slot.to(0.0, 1.0, Ease::Linear);
    assert_eq!(slot.advance(0.5), TweenStatus::Running);
    assert_close(slot.value(), 2.5);
    assert_eq!(slot.advance(0.5), TweenStatus::Completed);
    assert_eq!(slot.value(), 0.0);
    assert_eq!(slot.advance(0.5), TweenStatus::Idle);
}

#[test]
fn set_cancels_the_running_tween() {
    let mut slot = TweenSlot::new(0.0f32);
    slot.to(1.0, 1.0, Ease::Linear);
    slot.set(7.0);
    assert!(!slot.is_running());
    assert_eq!(slot.advance(1.0), TweenStatus::Idle);
    assert_eq!(slot.value(), 7.0);
}
