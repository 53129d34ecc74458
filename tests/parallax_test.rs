use cgmath::Vector2;
use matcap_flow::{
    config::SceneConfig,
    parallax::{ParallaxSettings, PointerParallax, logical_pixels},
    scene::{SceneDriver, SceneEvent},
    tween::TweenStatus,
};

use crate::common::test_utils::{assert_vec2_close, run_frames};

mod common;

fn viewport() -> Vector2<f32> {
    Vector2::new(800.0, 600.0)
}

#[test]
fn centred_pointer_has_no_offset() {
    let parallax = PointerParallax::new(ParallaxSettings::default());
    assert_vec2_close(
        parallax.target_for(Vector2::new(400.0, 300.0), viewport()),
        Vector2::new(0.0, 0.0),
    );
}

#[test]
fn target_is_the_centre_distance_over_depth() {
    let parallax = PointerParallax::new(ParallaxSettings::default());
    assert_vec2_close(
        parallax.target_for(Vector2::new(1000.0, 500.0), viewport()),
        Vector2::new(30.0, 10.0),
    );
}

#[test]
fn offset_settles_after_the_duration() {
    let mut parallax = PointerParallax::new(ParallaxSettings::default());
    parallax.pointer_moved(Vector2::new(1000.0, 500.0), viewport());
    assert!(parallax.is_moving());

    let statuses = run_frames(1.1, |dt| Some(parallax.advance(dt)));
    assert!(statuses.contains(&TweenStatus::Completed));
    assert_eq!(statuses.last(), Some(&TweenStatus::Idle));
    assert_vec2_close(parallax.offset(), Vector2::new(30.0, 10.0));
}

#[test]
fn new_pointer_position_overwrites_the_tween() {
    let mut parallax = PointerParallax::new(ParallaxSettings::default());
    parallax.pointer_moved(Vector2::new(800.0, 600.0), viewport());
    parallax.advance(0.5);
    parallax.pointer_moved(Vector2::new(0.0, 0.0), viewport());
    assert_eq!(parallax.advance(1.0), TweenStatus::Completed);
    assert_vec2_close(parallax.offset(), Vector2::new(-20.0, -15.0));
}

#[test]
fn ndc_offset_flips_y() {
    let mut parallax = PointerParallax::new(ParallaxSettings::default());
    parallax.pointer_moved(Vector2::new(1000.0, 500.0), viewport());
    parallax.advance(1.0);
    assert_vec2_close(
        parallax.ndc_offset(viewport()),
        Vector2::new(0.075, -20.0 / 600.0),
    );
    assert_vec2_close(
        parallax.ndc_offset(Vector2::new(0.0, 0.0)),
        Vector2::new(0.0, 0.0),
    );
}

#[test]
fn pointer_events_drive_the_scene_parallax() {
    let mut driver = SceneDriver::new(&SceneConfig::default());
    driver.handle(SceneEvent::PointerMoved {
        x: 1000.0,
        y: 500.0,
        viewport_w: 800.0,
        viewport_h: 600.0,
    });
    assert!(driver.parallax().is_moving());

    run_frames(1.1, |dt| Some(driver.advance(dt)));
    assert!(!driver.parallax().is_moving());
    assert_vec2_close(driver.parallax().offset(), Vector2::new(30.0, 10.0));
}

#[test]
fn offset_is_independent_of_pixel_density() {
    let scale = 2.0;
    let pointer = logical_pixels(Vector2::new(2000.0, 1000.0), scale);
    let viewport = logical_pixels(Vector2::new(1600.0, 1200.0), scale);
    assert_vec2_close(viewport, Vector2::new(800.0, 600.0));

    let mut driver = SceneDriver::new(&SceneConfig::default());
    driver.handle(SceneEvent::PointerMoved {
        x: pointer.x,
        y: pointer.y,
        viewport_w: viewport.x,
        viewport_h: viewport.y,
    });
    run_frames(1.1, |dt| Some(driver.advance(dt)));
    assert_vec2_close(driver.parallax().offset(), Vector2::new(30.0, 10.0));
    assert_vec2_close(
        driver.parallax().ndc_offset(viewport),
        Vector2::new(0.075, -10.0 / 300.0),
    );
}

#[test]
fn non_positive_scale_keeps_pixels() {
    let pixels = Vector2::new(640.0, 480.0);
    assert_vec2_close(logical_pixels(pixels, 0.0), pixels);
    assert_vec2_close(logical_pixels(pixels, 1.0), pixels);
}
