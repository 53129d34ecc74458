use matcap_flow::{
    config::SceneConfig,
    material::MatcapId,
    scene::{HoverEvent, SceneDriver, SceneEvent},
    transition::{
        BLEND_BAND, MatcapTransition, Phase, Settled, TransitionSettings, TransitionState,
        blend_weight, view_factor,
    },
};

use crate::common::test_utils::{FRAME, assert_close, run_frames};

mod common;

fn transition() -> MatcapTransition {
    MatcapTransition::new(MatcapId(2), MatcapId(1), TransitionSettings::default())
}

#[test]
fn rest_state_shows_only_the_primary_matcap() {
    let state = TransitionState::idle(MatcapId(2));
    assert_close(state.sweep(), 0.0);
    for i in 0..=10 {
        assert_close(blend_weight(state.sweep(), i as f32 / 10.0), 1.0);
    }
}

#[test]
fn fade_start_shows_the_secondary_matcap_below_the_band() {
    let sweep = 1.0;
    for i in 0..=8 {
        let factor = i as f32 / 10.0;
        assert_close(blend_weight(sweep, factor), 0.0);
    }
    assert_close(blend_weight(sweep, 1.0 - BLEND_BAND / 2.0), 0.5);
}

#[test]
fn blend_weight_grows_with_progress() {
    for f in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let mut last = 0.0;
        for i in 0..=20 {
            let state = TransitionState {
                primary: MatcapId(8),
                secondary: MatcapId(2),
                progress: i as f32 / 20.0,
            };
            let w = blend_weight(state.sweep(), f);
            assert!(w + 1e-6 >= last, "weight falls at progress {i} for factor {f}");
            last = w;
        }
    }
}

#[test]
fn blend_weight_is_a_band_below_the_sweep() {
    for i in 0..=20 {
        let sweep = i as f32 / 20.0;
        let mut last = 0.0;
        for j in 0..=100 {
            let f = j as f32 / 100.0;
            let w = blend_weight(sweep, f);
            assert!(w + 1e-6 >= last, "weight falls at factor {f} for sweep {sweep}");
            if f < sweep - BLEND_BAND {
                assert_eq!(w, 0.0, "factor {f} below the band of sweep {sweep}");
            }
            if f > sweep {
                assert_eq!(w, 1.0, "factor {f} above sweep {sweep}");
            }
            last = w;
        }
    }
}

#[test]
fn view_factor_averages_view_coordinates() {
    assert_close(view_factor(0.0, 0.0), 0.5);
    assert_close(view_factor(-0.5, -0.5), 0.0);
    assert_close(view_factor(0.5, 0.5), 1.0);
}

#[test]
fn starts_idle_on_the_default() {
    let mut t = transition();
    assert_eq!(t.phase(), Phase::Idle(MatcapId(2)));
    assert_eq!(t.environment(), MatcapId(1));
    assert_eq!(t.advance(FRAME), None);
}

#[test]
fn enter_fades_and_settles_once() {
    let mut t = transition();
    t.enter(MatcapId(8), MatcapId(8));
    assert_eq!(
        t.phase(),
        Phase::Transitioning {
            from: MatcapId(2),
            to: MatcapId(8),
            progress: 0.0
        }
    );

    assert_eq!(t.advance(0.15), None);
    let progress = t.state().progress;
    assert!(progress > 0.0 && progress < 1.0);
    // environment follows only after the fade
    assert_eq!(t.environment(), MatcapId(1));

    let settled = t.advance(0.2);
    assert_eq!(
        settled,
        Some(Settled {
            active: MatcapId(8),
            environment: MatcapId(8)
        })
    );
    assert_eq!(t.state().secondary, MatcapId(8));
    assert_eq!(t.state().progress, 1.0);
    assert_eq!(t.phase(), Phase::Idle(MatcapId(8)));
    assert_eq!(t.advance(0.2), None);
}

#[test]
fn retrigger_restarts_from_the_rest_texture() {
    let mut t = transition();
    t.enter(MatcapId(8), MatcapId(8));
    t.advance(0.1);
    t.enter(MatcapId(13), MatcapId(13));

    assert_eq!(
        t.phase(),
        Phase::Transitioning {
            from: MatcapId(2),
            to: MatcapId(13),
            progress: 0.0
        }
    );
    let settled = run_frames(1.0, |dt| t.advance(dt));
    assert_eq!(
        settled,
        vec![Settled {
            active: MatcapId(13),
            environment: MatcapId(13)
        }]
    );
}

#[test]
fn fade_takes_the_configured_duration() {
    let mut t = transition();
    t.enter(MatcapId(9), MatcapId(9));
    assert_eq!(t.advance(0.29), None);
    assert!(t.advance(0.02).is_some());
}

#[test]
fn from_state_clamps_progress() {
    let state = TransitionState {
        primary: MatcapId(3),
        secondary: MatcapId(4),
        progress: 1.4,
    };
    let t = MatcapTransition::from_state(state, MatcapId(1), TransitionSettings::default());
    assert_eq!(t.state().progress, 1.0);
}

#[test]
fn hovering_navy_pier_then_opera_ends_on_opera() {
    let mut driver = SceneDriver::new(&SceneConfig::default());
    assert!(driver.enter_variant("navy-pier"));
    driver.advance(0.1);
    driver.handle(SceneEvent::Hover(HoverEvent::Enter("opera".to_string())));

    let settled = run_frames(1.0, |dt| driver.advance(dt).settled);
    assert_eq!(
        settled,
        vec![Settled {
            active: MatcapId(13),
            environment: MatcapId(13)
        }]
    );
    assert_eq!(driver.transition().phase(), Phase::Idle(MatcapId(13)));
}

#[test]
fn navy_pier_settles_after_the_fade() {
    let mut driver = SceneDriver::new(&SceneConfig::default());
    driver.handle(SceneEvent::Hover(HoverEvent::Enter("navy-pier".to_string())));
    let settled = driver.advance(0.3).settled;
    assert_eq!(
        settled,
        Some(Settled {
            active: MatcapId(8),
            environment: MatcapId(8)
        })
    );
    assert_eq!(driver.transition().phase(), Phase::Idle(MatcapId(8)));
}

#[test]
fn same_variant_twice_settles_once() {
    let mut driver = SceneDriver::new(&SceneConfig::default());
    driver.handle(SceneEvent::Hover(HoverEvent::Enter("navy-pier".to_string())));
    driver.advance(0.1);
    driver.handle(SceneEvent::Hover(HoverEvent::Enter("navy-pier".to_string())));

    let settled = run_frames(1.0, |dt| driver.advance(dt).settled);
    assert_eq!(settled.len(), 1);
    assert_eq!(driver.transition().phase(), Phase::Idle(MatcapId(8)));
}

#[test]
fn leave_returns_to_the_defaults() {
    let mut driver = SceneDriver::new(&SceneConfig::default());
    driver.enter_variant("kikk");
    run_frames(1.0, |dt| driver.advance(dt).settled);
    assert_eq!(driver.transition().environment(), MatcapId(10));

    driver.handle(SceneEvent::Hover(HoverEvent::Leave));
    let settled = run_frames(1.0, |dt| driver.advance(dt).settled);
    assert_eq!(
        settled,
        vec![Settled {
            active: MatcapId(2),
            environment: MatcapId(1)
        }]
    );
}

#[test]
fn unknown_variant_is_ignored() {
    let mut driver = SceneDriver::new(&SceneConfig::default());
    assert!(!driver.enter_variant("nowhere"));
    assert_eq!(driver.transition().phase(), Phase::Idle(MatcapId(2)));
}
